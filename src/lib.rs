//! Labyrinth Marble - a tilt-controlled marble labyrinth
//!
//! Core modules:
//! - `sim`: Per-frame simulation (entities, collisions, level progression)
//! - `input`: Latest-value tilt register shared with the sensor callback
//! - `audio`: Cue sink collaborator
//! - `highscores`: Completion-time leaderboard
//! - `tuning`: Data-driven physics balance

pub mod audio;
pub mod error;
pub mod highscores;
pub mod input;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use audio::{AudioManager, Cue, CueSink};
pub use error::{Error, Result};
pub use highscores::HighScores;
pub use input::TiltRegister;
pub use settings::Settings;
pub use tuning::Tuning;

/// Driver constants
pub mod consts {
    /// Fixed simulation timestep for the native driver (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
}
