//! Game state and core simulation types
//!
//! Everything the simulation mutates per tick lives in [`GameState`].

use glam::Vec2;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Player is steerable and collides with the level
    Normal,
    /// Player is shrinking into a hole
    Dying,
    /// Player is growing back at the level start
    Reviving,
    /// A goal was touched and the next level is being installed
    Transitioning,
    /// Every level is cleared; the simulation no longer ticks
    Completed,
}

/// RGB color, components in 0..=1 (not enforced)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const GRAY: Color = Color::rgb(0.5, 0.5, 0.5);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// Opaque texture handle, resolved by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sprite {
    BlockSquare,
    Hole,
    HoleEnd,
    BallBlue,
}

/// Collision behavior selected by an entity's layer tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionLayer {
    /// Floor/background, never collides (tag -1)
    Background,
    /// Walls (tag 0)
    Solid,
    /// Holes (tag 1)
    Hazard,
    /// Level exit (tag 2)
    Goal,
}

impl CollisionLayer {
    /// Raw tag stored on entities
    pub const fn tag(self) -> i32 {
        match self {
            CollisionLayer::Background => -1,
            CollisionLayer::Solid => 0,
            CollisionLayer::Hazard => 1,
            CollisionLayer::Goal => 2,
        }
    }

    /// Decode a raw tag. Tags outside {-1, 0, 1, 2} are inert.
    pub const fn from_tag(tag: i32) -> Option<Self> {
        match tag {
            -1 => Some(CollisionLayer::Background),
            0 => Some(CollisionLayer::Solid),
            1 => Some(CollisionLayer::Hazard),
            2 => Some(CollisionLayer::Goal),
            _ => None,
        }
    }
}

/// A positioned, sized, colored simulation object
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Free-form label ("Player", "Wall", "Hole", "Goal", "Floor")
    pub name: String,
    pub active: bool,
    /// Raw layer tag, see [`CollisionLayer`]
    pub collision_layer: i32,
    pub velocity: Vec2,
    /// Center point in world units
    pub position: Vec2,
    /// Full width (x) and height (y), not a multiplier
    pub scale: Vec2,
    /// Radians. Visual only; collision treats rectangles as axis-aligned.
    pub rotation: f32,
    pub color: Color,
    pub texture: Option<Sprite>,
}

impl Entity {
    pub fn new(name: impl Into<String>, layer: CollisionLayer, position: Vec2, scale: Vec2) -> Self {
        Self {
            name: name.into(),
            active: true,
            collision_layer: layer.tag(),
            velocity: Vec2::ZERO,
            position,
            scale,
            rotation: 0.0,
            color: Color::WHITE,
            texture: None,
        }
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_texture(mut self, texture: Sprite) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn layer(&self) -> Option<CollisionLayer> {
        CollisionLayer::from_tag(self.collision_layer)
    }
}

/// Something the tick observed, drained by the engine each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Player bounced off a wall hard enough to be heard
    WallImpact { speed: f32 },
    /// Player fell into a hole
    HazardDeath,
    /// Player touched a goal (level advance is pending)
    GoalReached,
}

/// Complete per-level simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Live entities in factory order
    pub entities: Vec<Entity>,
    /// Index of the player in `entities`
    pub player: Option<usize>,
    /// 1-based number of the level being played
    pub level_number: u32,
    /// Where the player respawns after dying
    pub player_start: Vec2,
    /// Player scale captured when dying started
    pub rest_scale: Vec2,
    /// Latest tilt acceleration (zeroed per axis on wall contact)
    pub acceleration: Vec2,
    pub phase: GamePhase,
    /// Seconds into the current death/revive animation
    pub animation_timer: f32,
    /// Set from goal contact until the next level is installed
    pub changing_levels: bool,
    /// Seconds of play, stopped on completion
    pub elapsed: f32,
    pub clock_running: bool,
    /// Observations from the last tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// State for `level_number` with the given factory output
    pub fn new(level_number: u32, entities: Vec<Entity>, player_start: Vec2) -> Self {
        let mut state = Self {
            entities: Vec::new(),
            player: None,
            level_number,
            player_start,
            rest_scale: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            phase: GamePhase::Normal,
            animation_timer: 0.0,
            changing_levels: false,
            elapsed: 0.0,
            clock_running: true,
            events: Vec::new(),
        };
        state.install_level(level_number, entities, player_start);
        state
    }

    /// Replace the entity list wholesale and reset per-level state
    pub fn install_level(&mut self, level_number: u32, entities: Vec<Entity>, player_start: Vec2) {
        self.player = entities.iter().rposition(|e| e.name == PLAYER_NAME);
        self.rest_scale = self
            .player
            .map(|i| entities[i].scale)
            .unwrap_or(Vec2::ZERO);
        self.entities = entities;
        self.level_number = level_number;
        self.player_start = player_start;
        self.acceleration = Vec2::ZERO;
        self.animation_timer = 0.0;
        self.changing_levels = false;
        self.phase = GamePhase::Normal;
    }

    pub fn player(&self) -> Option<&Entity> {
        self.player.and_then(|i| self.entities.get(i))
    }

    pub fn player_mut(&mut self) -> Option<&mut Entity> {
        self.player.and_then(|i| self.entities.get_mut(i))
    }

    /// Active entities in draw order, for the renderer
    pub fn visible(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.active)
    }
}

/// Name the level factory gives the player entity
pub const PLAYER_NAME: &str = "Player";
