//! Audio cues
//!
//! The simulation never produces sound. It hands discrete [`Cue`]s to a
//! [`CueSink`] injected at construction; what a sink does with them (play a
//! sample, log, record) is up to the shell.

use std::cell::RefCell;
use std::rc::Rc;

use crate::settings::Settings;

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Ball hit a wall hard
    WallImpact,
    /// Ball fell into a hole
    HazardDeath,
    /// Next level loaded
    LevelAdvance,
    /// Last level cleared
    GameCleared,
}

impl Cue {
    /// Sample the cue maps to in the shipped sound bank
    pub fn sample_name(&self) -> &'static str {
        match self {
            Cue::WallImpact => "collision_sfx",
            Cue::HazardDeath => "gamerestart_sfx",
            Cue::LevelAdvance => "nextlevel_sfx",
            Cue::GameCleared => "gamecleared_sfx",
        }
    }
}

/// Receiver of fire-and-forget cues
pub trait CueSink {
    fn play(&mut self, cue: Cue);
}

/// Volume/mute policy in front of a playback backend
///
/// Native builds have no mixer; cues are logged at the volume they would
/// have played at.
pub struct AudioManager {
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    music_playing: bool,
    played: u64,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.5,
            muted: false,
            music_playing: false,
            played: 0,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let mut audio = Self::new();
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_music_volume(settings.music_volume);
        audio.set_muted(settings.muted);
        audio
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set background music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Effective cue volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Effective music volume
    pub fn effective_music_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    /// Start the looping background track
    pub fn start_music(&mut self) {
        if !self.music_playing {
            self.music_playing = true;
            log::info!("Music started (volume {:.2})", self.effective_music_volume());
        }
    }

    pub fn stop_music(&mut self) {
        if self.music_playing {
            self.music_playing = false;
            log::info!("Music stopped");
        }
    }

    pub fn music_playing(&self) -> bool {
        self.music_playing
    }

    /// Number of cues actually played (not muted)
    pub fn played(&self) -> u64 {
        self.played
    }
}

impl CueSink for AudioManager {
    fn play(&mut self, cue: Cue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.played += 1;
        log::debug!("Cue {:?} ({}) at volume {:.2}", cue, cue.sample_name(), vol);
    }
}

/// Sink that records every cue, shareable with whoever inspects it
#[derive(Debug, Clone, Default)]
pub struct CueLog {
    cues: Rc<RefCell<Vec<Cue>>>,
}

impl CueLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cues received so far, oldest first
    pub fn snapshot(&self) -> Vec<Cue> {
        self.cues.borrow().clone()
    }

    pub fn count(&self, cue: Cue) -> usize {
        self.cues.borrow().iter().filter(|&&c| c == cue).count()
    }
}

impl CueSink for CueLog {
    fn play(&mut self, cue: Cue) {
        self.cues.borrow_mut().push(cue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_muted_manager_plays_nothing() {
        let mut audio = AudioManager::new();
        audio.set_muted(true);
        audio.play(Cue::WallImpact);
        assert_eq!(audio.played(), 0);

        audio.set_muted(false);
        audio.play(Cue::WallImpact);
        assert_eq!(audio.played(), 1);
    }

    #[test]
    fn test_volumes_clamp() {
        let mut audio = AudioManager::new();
        audio.set_master_volume(2.0);
        audio.set_sfx_volume(-1.0);
        assert_eq!(audio.effective_volume(), 0.0);

        audio.set_sfx_volume(0.5);
        assert_eq!(audio.effective_volume(), 0.5);
    }

    #[test]
    fn test_from_settings() {
        let settings = Settings {
            master_volume: 0.5,
            music_volume: 0.4,
            ..Settings::default()
        };
        let mut audio = AudioManager::from_settings(&settings);
        assert!((audio.effective_music_volume() - 0.2).abs() < 1e-6);

        audio.start_music();
        assert!(audio.music_playing());
        audio.stop_music();
        assert!(!audio.music_playing());
    }

    #[test]
    fn test_cue_log_shares_records() {
        let log = CueLog::new();
        let mut sink = log.clone();
        sink.play(Cue::LevelAdvance);
        sink.play(Cue::GameCleared);
        assert_eq!(log.snapshot(), vec![Cue::LevelAdvance, Cue::GameCleared]);
        assert_eq!(log.count(Cue::GameCleared), 1);
    }
}
