//! Data-driven game balance
//!
//! Physics and level-geometry constants. Kept separate from [`Settings`]'s
//! audio/player preferences so a level designer can tweak feel without
//! touching anything else.
//!
//! [`Settings`]: crate::Settings

use serde::{Deserialize, Serialize};

/// Axis-aligned extent of the playfield, used to size the floor entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloorBounds {
    pub x_min: f32,
    pub x_max: f32,
    /// Top edge (screen space, y grows downward)
    pub y_min: f32,
    /// Bottom edge
    pub y_max: f32,
}

impl Default for FloorBounds {
    fn default() -> Self {
        Self {
            x_min: -5.0,
            x_max: 5.0,
            y_min: -10.0,
            y_max: 8.0,
        }
    }
}

impl FloorBounds {
    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f32 {
        self.y_max - self.y_min
    }

    pub fn center(&self) -> (f32, f32) {
        ((self.x_max + self.x_min) / 2.0, (self.y_max + self.y_min) / 2.0)
    }
}

/// Physics and geometry tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Multiplier from tilt input to acceleration (world units/s² per input unit)
    pub gravity_factor: f32,
    /// Per-tick velocity multiplier (< 1)
    pub friction: f32,
    /// Fraction of velocity kept (and inverted) on a wall bounce
    pub restitution: f32,
    /// Minimum |normal component| for an axis to count as hit
    pub normal_threshold: f32,
    /// Post-bounce speed above which a wall impact cue is emitted
    pub impact_cue_speed: f32,
    /// Hazard radius reduction before the overlap test
    pub hazard_inset: f32,
    /// Duration of the death shrink and of the revive grow (seconds)
    pub animation_duration: f32,

    // === Level geometry ===
    pub wall_thickness: f32,
    pub hole_size: f32,
    pub goal_size: f32,
    pub player_size: f32,
    pub floor: FloorBounds,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity_factor: 5.0,
            friction: 0.98,
            restitution: 0.5,
            normal_threshold: 0.1,
            impact_cue_speed: 10.0,
            hazard_inset: 0.2,
            animation_duration: 0.5,

            wall_thickness: 0.5,
            hole_size: 0.8,
            goal_size: 1.0,
            player_size: 0.5,
            floor: FloorBounds::default(),
        }
    }
}
