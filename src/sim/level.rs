//! Level descriptions and the entity factory
//!
//! A level is authored as a handful of points and wall segments;
//! [`build_level`] expands it into the entity list the simulation runs on.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Color, CollisionLayer, Entity, PLAYER_NAME, Sprite};
use crate::error::{Error, Result};
use crate::tuning::Tuning;

/// A wall from `start` to `end`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallSegment {
    pub start: Vec2,
    pub end: Vec2,
}

impl WallSegment {
    pub const fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }
}

/// Immutable, hand-authored layout of a single level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDescription {
    pub player_start: Vec2,
    pub walls: Vec<WallSegment>,
    #[serde(default)]
    pub holes: Vec<Vec2>,
    #[serde(default)]
    pub goals: Vec<Vec2>,
}

impl LevelDescription {
    fn points(&self) -> impl Iterator<Item = Vec2> + '_ {
        std::iter::once(self.player_start)
            .chain(self.walls.iter().flat_map(|w| [w.start, w.end]))
            .chain(self.holes.iter().copied())
            .chain(self.goals.iter().copied())
    }
}

/// Expand a wall segment into a rectangle entity
///
/// The box is centered on the segment midpoint and oriented along it for
/// rendering. Its extents are `(length, thickness)` for predominantly
/// horizontal segments and `(thickness, length)` otherwise.
pub fn wall_entity(wall: &WallSegment, thickness: f32) -> Entity {
    let d = wall.end - wall.start;
    let length = d.length();
    let angle = d.y.atan2(d.x);

    let scale = if d.x.abs() > d.y.abs() {
        Vec2::new(length, thickness)
    } else {
        Vec2::new(thickness, length)
    };

    Entity::new("Wall", CollisionLayer::Solid, (wall.start + wall.end) / 2.0, scale)
        .with_rotation(angle)
        .with_texture(Sprite::BlockSquare)
}

/// Build the entity list for a level
///
/// Order is fixed: floor, walls (input order), holes, goals, player last.
/// Every entity gets its own fresh vectors.
pub fn build_level(level: &LevelDescription, tuning: &Tuning) -> Vec<Entity> {
    let floor = &tuning.floor;
    let (cx, cy) = floor.center();

    let mut entities =
        Vec::with_capacity(2 + level.walls.len() + level.holes.len() + level.goals.len());

    entities.push(
        Entity::new(
            "Floor",
            CollisionLayer::Background,
            Vec2::new(cx, cy),
            Vec2::new(floor.width(), floor.height()),
        )
        .with_color(Color::GRAY),
    );

    entities.extend(
        level
            .walls
            .iter()
            .map(|wall| wall_entity(wall, tuning.wall_thickness)),
    );

    entities.extend(level.holes.iter().map(|&pos| {
        Entity::new("Hole", CollisionLayer::Hazard, pos, Vec2::splat(tuning.hole_size))
            .with_texture(Sprite::Hole)
    }));

    entities.extend(level.goals.iter().map(|&pos| {
        Entity::new("Goal", CollisionLayer::Goal, pos, Vec2::splat(tuning.goal_size))
            .with_texture(Sprite::HoleEnd)
    }));

    entities.push(
        Entity::new(
            PLAYER_NAME,
            CollisionLayer::Solid,
            level.player_start,
            Vec2::splat(tuning.player_size),
        )
        .with_texture(Sprite::BallBlue),
    );

    entities
}

/// Ordered set of levels, addressed by 1-based level number
///
/// Serialized as a bare array; deserializing runs the same checks as
/// [`LevelCatalog::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LevelDescription>", into = "Vec<LevelDescription>")]
pub struct LevelCatalog {
    levels: Vec<LevelDescription>,
}

impl TryFrom<Vec<LevelDescription>> for LevelCatalog {
    type Error = Error;

    fn try_from(levels: Vec<LevelDescription>) -> Result<Self> {
        Self::new(levels)
    }
}

impl From<LevelCatalog> for Vec<LevelDescription> {
    fn from(catalog: LevelCatalog) -> Self {
        catalog.levels
    }
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LevelCatalog {
    /// Build a catalog, rejecting empty lists and non-finite coordinates
    pub fn new(levels: Vec<LevelDescription>) -> Result<Self> {
        if levels.is_empty() {
            return Err(Error::EmptyCatalog);
        }
        for (i, level) in levels.iter().enumerate() {
            if let Some(p) = level.points().find(|p| !p.is_finite()) {
                return Err(Error::InvalidLevel {
                    index: i as u32 + 1,
                    reason: format!("non-finite coordinate {p}"),
                });
            }
        }
        Ok(Self { levels })
    }

    /// Parse a JSON array of level descriptions
    pub fn from_json(json: &str) -> Result<Self> {
        let levels: Vec<LevelDescription> = serde_json::from_str(json)?;
        Self::new(levels)
    }

    /// Level `number` (1-based), or `None` past the last level
    pub fn get(&self, number: u32) -> Option<&LevelDescription> {
        let index = number.checked_sub(1)?;
        self.levels.get(index as usize)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// The two shipped levels
    pub fn builtin() -> Self {
        Self {
            levels: vec![level_one(), level_two()],
        }
    }
}

fn outer_bounds() -> [WallSegment; 4] {
    [
        WallSegment::new(Vec2::new(-5.0, -10.0), Vec2::new(5.0, -10.0)), // Top
        WallSegment::new(Vec2::new(-5.0, 8.0), Vec2::new(5.0, 8.0)),     // Bottom
        WallSegment::new(Vec2::new(-5.0, -10.0), Vec2::new(-5.0, 8.0)),  // Left
        WallSegment::new(Vec2::new(5.0, -10.0), Vec2::new(5.0, 8.0)),    // Right
    ]
}

fn level_one() -> LevelDescription {
    LevelDescription {
        player_start: Vec2::ZERO,
        walls: outer_bounds().to_vec(),
        holes: vec![Vec2::new(-3.0, -2.0), Vec2::new(3.0, -2.0)],
        goals: vec![Vec2::new(0.0, 6.0)],
    }
}

fn level_two() -> LevelDescription {
    let mut walls = outer_bounds().to_vec();
    // Zigzag
    walls.extend([
        WallSegment::new(Vec2::new(-5.0, -6.0), Vec2::new(2.0, -6.0)),
        WallSegment::new(Vec2::new(-2.0, -2.0), Vec2::new(5.0, -2.0)),
        WallSegment::new(Vec2::new(-5.0, 2.0), Vec2::new(2.0, 2.0)),
        WallSegment::new(Vec2::new(-2.0, 6.0), Vec2::new(5.0, 6.0)),
    ]);

    LevelDescription {
        player_start: Vec2::new(0.0, -8.0),
        walls,
        holes: vec![
            Vec2::new(-4.0, -4.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(-4.0, 4.0),
        ],
        goals: vec![Vec2::new(0.0, 7.0)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_wall_expansion() {
        let wall = WallSegment::new(Vec2::new(-5.0, -10.0), Vec2::new(5.0, -10.0));
        let entity = wall_entity(&wall, 0.5);
        assert_eq!(entity.position, Vec2::new(0.0, -10.0));
        assert_eq!(entity.scale, Vec2::new(10.0, 0.5));
        assert_eq!(entity.rotation, 0.0);
        assert_eq!(entity.layer(), Some(CollisionLayer::Solid));
    }

    #[test]
    fn test_vertical_wall_expansion() {
        let wall = WallSegment::new(Vec2::new(5.0, -10.0), Vec2::new(5.0, 8.0));
        let entity = wall_entity(&wall, 0.5);
        assert_eq!(entity.position, Vec2::new(5.0, -1.0));
        assert_eq!(entity.scale, Vec2::new(0.5, 18.0));
        assert!((entity.rotation - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_wall_is_zero_length() {
        let wall = WallSegment::new(Vec2::new(1.0, 1.0), Vec2::new(1.0, 1.0));
        let entity = wall_entity(&wall, 0.5);
        assert_eq!(entity.position, Vec2::new(1.0, 1.0));
        assert_eq!(entity.scale, Vec2::new(0.5, 0.0));
    }

    #[test]
    fn test_build_order() {
        let level = level_two();
        let entities = build_level(&level, &Tuning::default());
        let names: Vec<&str> = entities.iter().map(|e| e.name.as_str()).collect();

        assert_eq!(entities.len(), 1 + 8 + 3 + 1 + 1);
        assert_eq!(names[0], "Floor");
        assert!(names[1..9].iter().all(|n| *n == "Wall"));
        assert!(names[9..12].iter().all(|n| *n == "Hole"));
        assert_eq!(names[12], "Goal");
        assert_eq!(names[13], PLAYER_NAME);

        assert_eq!(entities[13].position, level.player_start);
        assert_eq!(entities[13].scale, Vec2::splat(0.5));
        assert_eq!(entities[9].scale, Vec2::splat(0.8));
        assert_eq!(entities[12].scale, Vec2::splat(1.0));
        assert_eq!(entities[0].position, Vec2::new(0.0, -1.0));
        assert_eq!(entities[0].scale, Vec2::new(10.0, 18.0));
    }

    #[test]
    fn test_build_is_idempotent() {
        let level = level_one();
        let tuning = Tuning::default();
        assert_eq!(build_level(&level, &tuning), build_level(&level, &tuning));
    }

    #[test]
    fn test_catalog_lookup_is_one_based() {
        let catalog = LevelCatalog::builtin();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.get(0).is_none());
        assert_eq!(catalog.get(1).map(|l| l.player_start), Some(Vec2::ZERO));
        assert_eq!(catalog.get(2).map(|l| l.player_start), Some(Vec2::new(0.0, -8.0)));
        assert!(catalog.get(3).is_none());
    }

    #[test]
    fn test_catalog_from_json() {
        let json = r#"[
            {
                "player_start": [0.0, 0.0],
                "walls": [{ "start": [-1.0, 1.0], "end": [1.0, 1.0] }],
                "goals": [[0.0, 0.5]]
            }
        ]"#;
        let catalog = LevelCatalog::from_json(json).unwrap();
        let level = catalog.get(1).unwrap();
        assert_eq!(level.walls.len(), 1);
        assert!(level.holes.is_empty());
        assert_eq!(level.goals, vec![Vec2::new(0.0, 0.5)]);
    }

    #[test]
    fn test_catalog_rejects_empty() {
        assert!(matches!(LevelCatalog::new(Vec::new()), Err(Error::EmptyCatalog)));
        assert!(matches!(LevelCatalog::from_json("[]"), Err(Error::EmptyCatalog)));
    }

    #[test]
    fn test_deserialize_validates() {
        assert!(serde_json::from_str::<LevelCatalog>("[]").is_err());
        assert!(serde_json::from_str::<LevelCatalog>(r#"{ "levels": [] }"#).is_err());

        let json = serde_json::to_string(&LevelCatalog::builtin()).unwrap();
        assert!(json.starts_with('['));
        let catalog: LevelCatalog = serde_json::from_str(&json).unwrap();
        assert_eq!(catalog, LevelCatalog::builtin());
    }

    #[test]
    fn test_catalog_rejects_non_finite() {
        let mut level = level_one();
        level.holes.push(Vec2::new(f32::NAN, 0.0));
        let err = LevelCatalog::new(vec![level_two(), level]).unwrap_err();
        assert!(matches!(err, Error::InvalidLevel { index: 2, .. }));
    }
}
