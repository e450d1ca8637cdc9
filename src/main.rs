//! Labyrinth Marble entry point
//!
//! Native builds run headless: an autopilot feeds tilt samples steering the
//! marble toward the current goal, and the fixed-timestep loop drives the
//! simulation until the game is cleared or the time cap runs out.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::thread;

    use glam::Vec2;

    use labyrinth_marble::consts::{MAX_SUBSTEPS, SIM_DT};
    use labyrinth_marble::sim::{
        CollisionLayer, CompletionFlag, CompletionRecord, LevelCatalog, ScoreSink, Simulation,
    };
    use labyrinth_marble::{AudioManager, HighScores, Settings, TiltRegister, highscores};

    /// Wall-clock frame length of the simulated display
    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Give up after this much play time
    const MAX_PLAY_SECONDS: f32 = 120.0;
    /// Tilt magnitude the autopilot applies
    const AUTOPILOT_TILT: f32 = 2.0;

    /// Tilt toward the first goal, like a player leaning the board
    fn autopilot(sim: &Simulation) -> Option<Vec2> {
        let player = sim.state().player()?;
        let goal = sim
            .entities()
            .iter()
            .find(|e| e.active && e.layer() == Some(CollisionLayer::Goal))?;
        Some((goal.position - player.position).normalize_or_zero() * AUTOPILOT_TILT)
    }

    pub fn run() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        log::info!("Labyrinth Marble (native) starting...");

        let data_dir = std::env::args()
            .nth(1)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let settings_path = data_dir.join("settings.json");
        let scores_path = data_dir.join("highscores.json");

        let settings = Settings::load_from(&settings_path);
        let mut audio = AudioManager::from_settings(&settings);
        audio.start_music();

        // Scores are persisted off the simulation thread
        let (tx, rx) = crossbeam_channel::unbounded::<CompletionRecord>();
        let score_thread = thread::spawn(move || {
            for record in rx {
                let mut scores = HighScores::load_from(&scores_path);
                scores.submit(record);
                if let Err(e) = scores.save_to(&scores_path) {
                    log::warn!("Could not save high scores: {e}");
                }
                for (i, entry) in scores.entries.iter().enumerate() {
                    log::info!(
                        "#{} {} - {} levels in {}",
                        i + 1,
                        entry.player_name,
                        entry.levels_completed,
                        highscores::format_duration(entry.completion_seconds)
                    );
                }
            }
        });

        let completed = CompletionFlag::new();
        let mut sim = match Simulation::new(
            LevelCatalog::builtin(),
            settings.tuning,
            settings.player_name.clone(),
            Box::new(audio),
            Box::new(tx),
            Box::new(completed.clone()),
        ) {
            Ok(sim) => sim,
            Err(e) => {
                log::error!("Could not start: {e}");
                return;
            }
        };

        let tilt = TiltRegister::new();
        let mut accumulator = 0.0;
        let mut level = sim.level_number();

        while !completed.is_set() && sim.elapsed() < MAX_PLAY_SECONDS {
            if settings.use_tilt {
                if let Some(sample) = autopilot(&sim) {
                    tilt.store(sample);
                }
            }

            accumulator += FRAME_DT;
            let mut substeps = 0;
            while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                sim.advance(SIM_DT, tilt.take());
                accumulator -= SIM_DT;
                substeps += 1;
            }

            if sim.level_number() != level {
                level = sim.level_number();
                log::info!("Now on level {} at {:.1}s", level, sim.elapsed());
            }
        }

        if completed.is_set() {
            log::info!("Finished in {:.1}s", sim.elapsed());
        } else {
            log::info!(
                "Stopped on level {} after {:.0}s without clearing the game",
                sim.level_number(),
                sim.elapsed()
            );
        }

        // Closes the channel so the score thread drains and exits
        drop(sim);
        if score_thread.join().is_err() {
            log::error!("Score thread panicked");
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web builds are driven by the host page
}
