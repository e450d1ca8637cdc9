//! Simulation driver
//!
//! [`Simulation`] owns the game state together with the level catalog and
//! the collaborators it reports to. Each [`Simulation::advance`] runs one
//! tick, forwards cues, and performs the level advance when a goal was
//! reached.

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;

use super::level::{LevelCatalog, build_level};
use super::state::{Entity, GameEvent, GamePhase, GameState};
use super::tick::{TickInput, tick};
use crate::audio::{Cue, CueSink};
use crate::error::{Error, Result};
use crate::tuning::Tuning;

/// Result of a full game, handed to the score store once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRecord {
    pub levels_completed: u32,
    pub completion_seconds: u64,
    pub player_name: String,
}

/// Receiver of completion records. Must not block the caller.
pub trait ScoreSink {
    fn submit(&mut self, record: CompletionRecord);
}

/// Hands records to a persistence thread
impl ScoreSink for crossbeam_channel::Sender<CompletionRecord> {
    fn submit(&mut self, record: CompletionRecord) {
        if let Err(e) = self.try_send(record) {
            log::warn!("Completion record dropped: {e}");
        }
    }
}

/// Told once when every level is cleared
pub trait CompletionListener {
    fn on_game_completed(&mut self);
}

/// Listener that raises a shared flag
#[derive(Debug, Clone, Default)]
pub struct CompletionFlag {
    done: Rc<Cell<u32>>,
}

impl CompletionFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_set(&self) -> bool {
        self.done.get() > 0
    }

    /// How many completion notifications arrived
    pub fn times(&self) -> u32 {
        self.done.get()
    }
}

impl CompletionListener for CompletionFlag {
    fn on_game_completed(&mut self) {
        self.done.set(self.done.get() + 1);
    }
}

/// The per-frame simulation engine
pub struct Simulation {
    state: GameState,
    catalog: LevelCatalog,
    tuning: Tuning,
    player_name: String,
    cues: Box<dyn CueSink>,
    scores: Box<dyn ScoreSink>,
    shell: Box<dyn CompletionListener>,
}

impl Simulation {
    /// Start a game on level 1
    pub fn new(
        catalog: LevelCatalog,
        tuning: Tuning,
        player_name: impl Into<String>,
        cues: Box<dyn CueSink>,
        scores: Box<dyn ScoreSink>,
        shell: Box<dyn CompletionListener>,
    ) -> Result<Self> {
        let first = catalog.get(1).ok_or(Error::EmptyCatalog)?;
        let state = GameState::new(1, build_level(first, &tuning), first.player_start);
        log::info!("Level 1 loaded ({} entities)", state.entities.len());

        Ok(Self {
            state,
            catalog,
            tuning,
            player_name: player_name.into(),
            cues,
            scores,
            shell,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Entities for the renderer, in draw order
    pub fn entities(&self) -> &[Entity] {
        &self.state.entities
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn level_number(&self) -> u32 {
        self.state.level_number
    }

    pub fn elapsed(&self) -> f32 {
        self.state.elapsed
    }

    pub fn is_completed(&self) -> bool {
        self.state.phase == GamePhase::Completed
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Advance one frame of `dt` seconds; `tilt` is a fresh input sample
    pub fn advance(&mut self, dt: f32, tilt: Option<Vec2>) {
        if self.is_completed() {
            return;
        }

        tick(&mut self.state, &TickInput { tilt }, dt, &self.tuning);

        let mut goal_reached = false;
        for event in std::mem::take(&mut self.state.events) {
            match event {
                GameEvent::WallImpact { .. } => self.cues.play(Cue::WallImpact),
                GameEvent::HazardDeath => self.cues.play(Cue::HazardDeath),
                GameEvent::GoalReached => goal_reached = true,
            }
        }

        if goal_reached {
            self.advance_level();
        }
    }

    /// Move to the next level, or finish the game past the last one
    fn advance_level(&mut self) {
        let next = self.state.level_number + 1;

        let Some(level) = self.catalog.get(next) else {
            self.complete(next);
            return;
        };

        self.cues.play(Cue::LevelAdvance);
        let entities = build_level(level, &self.tuning);
        // Resets velocity, acceleration and the transition latch
        self.state.install_level(next, entities, level.player_start);
        log::info!("Level {} loaded ({} entities)", next, self.state.entities.len());
    }

    fn complete(&mut self, counter: u32) {
        self.cues.play(Cue::GameCleared);

        self.state.clock_running = false;
        self.state.level_number = counter;
        self.state.phase = GamePhase::Completed;

        let record = CompletionRecord {
            levels_completed: counter - 1,
            completion_seconds: self.state.elapsed.max(0.0).floor() as u64,
            player_name: self.player_name.clone(),
        };
        log::info!(
            "Game cleared: {} levels in {}s by {}",
            record.levels_completed,
            record.completion_seconds,
            record.player_name
        );

        self.scores.submit(record);
        self.shell.on_game_completed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::CueLog;
    use crate::sim::level::LevelDescription;

    #[derive(Clone, Default)]
    struct Records(Rc<std::cell::RefCell<Vec<CompletionRecord>>>);

    impl ScoreSink for Records {
        fn submit(&mut self, record: CompletionRecord) {
            self.0.borrow_mut().push(record);
        }
    }

    /// Player spawns on top of the goal
    fn instant_level() -> LevelDescription {
        LevelDescription {
            player_start: Vec2::ZERO,
            walls: Vec::new(),
            holes: Vec::new(),
            goals: vec![Vec2::ZERO],
        }
    }

    fn sim(levels: Vec<LevelDescription>) -> (Simulation, CueLog, Records, CompletionFlag) {
        let cues = CueLog::new();
        let records = Records::default();
        let flag = CompletionFlag::new();
        let sim = Simulation::new(
            LevelCatalog::new(levels).unwrap(),
            Tuning::default(),
            "Ada",
            Box::new(cues.clone()),
            Box::new(records.clone()),
            Box::new(flag.clone()),
        )
        .unwrap();
        (sim, cues, records, flag)
    }

    #[test]
    fn test_starts_on_level_one() {
        let (sim, _, _, _) = sim(vec![instant_level()]);
        assert_eq!(sim.level_number(), 1);
        assert_eq!(sim.phase(), GamePhase::Normal);
        assert_eq!(sim.entities().last().map(|e| e.name.as_str()), Some("Player"));
    }

    #[test]
    fn test_goal_loads_next_level() {
        let mut second = instant_level();
        second.player_start = Vec2::new(3.0, 3.0);
        let (mut sim, cues, records, flag) = sim(vec![instant_level(), second]);

        sim.advance(0.01, Some(Vec2::ONE));

        assert_eq!(sim.level_number(), 2);
        assert_eq!(sim.phase(), GamePhase::Normal);
        assert!(!sim.state().changing_levels);
        assert_eq!(sim.state().acceleration, Vec2::ZERO);
        let player = sim.state().player().unwrap();
        assert_eq!(player.position, Vec2::new(3.0, 3.0));
        assert_eq!(player.velocity, Vec2::ZERO);
        assert_eq!(cues.snapshot(), vec![Cue::LevelAdvance]);
        assert!(records.0.borrow().is_empty());
        assert!(!flag.is_set());
    }

    #[test]
    fn test_last_goal_completes_game() {
        let (mut sim, cues, records, flag) = sim(vec![instant_level()]);

        sim.advance(0.5, None);
        assert!(sim.is_completed());
        assert_eq!(sim.level_number(), 2);

        let elapsed = sim.elapsed();
        for _ in 0..10 {
            sim.advance(1.0, Some(Vec2::ONE));
        }
        assert_eq!(sim.elapsed(), elapsed);

        assert_eq!(cues.snapshot(), vec![Cue::GameCleared]);
        assert_eq!(
            *records.0.borrow(),
            vec![CompletionRecord {
                levels_completed: 1,
                completion_seconds: 0,
                player_name: "Ada".to_string(),
            }]
        );
        assert_eq!(flag.times(), 1);
    }

    #[test]
    fn test_empty_catalog_cannot_reach_the_engine() {
        // Neither construction path yields an empty catalog
        assert!(matches!(LevelCatalog::new(Vec::new()), Err(Error::EmptyCatalog)));
        assert!(serde_json::from_str::<LevelCatalog>("[]").is_err());
    }

    #[test]
    fn test_channel_sink_does_not_block() {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let mut sink = tx;
        let record = CompletionRecord {
            levels_completed: 2,
            completion_seconds: 30,
            player_name: "Ada".to_string(),
        };
        sink.submit(record.clone());
        // Full channel: dropped, not blocked
        sink.submit(record.clone());
        assert_eq!(rx.try_recv().ok(), Some(record));
        assert!(rx.try_recv().is_err());
    }
}
