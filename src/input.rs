//! Tilt input register
//!
//! The sensor callback and the game loop run at independent cadences. They
//! share a single latest-value slot: writers overwrite, the reader takes
//! whatever is there. Intermediate samples may be lost; nobody ever waits.

use std::sync::Arc;

use crossbeam_utils::atomic::AtomicCell;
use glam::Vec2;

#[derive(Debug, Default)]
struct Slot {
    /// Sample not yet taken by the game loop
    pending: AtomicCell<Option<Vec2>>,
    /// Last sample ever stored
    latest: AtomicCell<Vec2>,
}

/// Shared latest-value register for tilt acceleration
#[derive(Debug, Clone, Default)]
pub struct TiltRegister {
    slot: Arc<Slot>,
}

impl TiltRegister {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the stored sample
    pub fn store(&self, tilt: Vec2) {
        self.slot.latest.store(tilt);
        self.slot.pending.store(Some(tilt));
    }

    /// Store a raw accelerometer reading using the device mapping:
    /// horizontal tilt inverted, vertical tilt direct.
    pub fn store_accelerometer(&self, raw_x: f32, raw_y: f32) {
        self.store(Vec2::new(-raw_x, raw_y));
    }

    /// Most recent sample regardless of whether it was already read
    pub fn peek(&self) -> Vec2 {
        self.slot.latest.load()
    }

    /// The latest sample if a new one arrived since the last `take`
    ///
    /// Each stored sample is handed out at most once.
    pub fn take(&self) -> Option<Vec2> {
        self.slot.pending.take()
    }
}
