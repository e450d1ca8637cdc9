//! Simulation module
//!
//! All gameplay logic lives here:
//! - Entities are plain data, owned by `GameState` in factory order
//! - The tick is a pure function of state, input and timestep
//! - Collaborators (audio, scores, shell) are only reached through the engine

pub mod collision;
pub mod engine;
pub mod level;
pub mod state;
pub mod tick;

pub use collision::{Circle, Contact, Rectangle, circle_rectangle_contact, circles_overlap};
pub use engine::{CompletionFlag, CompletionListener, CompletionRecord, ScoreSink, Simulation};
pub use level::{LevelCatalog, LevelDescription, WallSegment, build_level, wall_entity};
pub use state::{
    Color, CollisionLayer, Entity, GameEvent, GamePhase, GameState, PLAYER_NAME, Sprite,
};
pub use tick::{TickInput, bounce, tick};
