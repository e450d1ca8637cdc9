//! Completion-time leaderboard
//!
//! Persisted as JSON, keeps the top 10 runs. A run ranks higher when it
//! cleared more levels, and among equal level counts when it was faster.

use std::cmp::Ordering;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sim::{CompletionRecord, ScoreSink};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub levels_completed: u32,
    pub completion_seconds: u64,
    pub player_name: String,
}

impl From<CompletionRecord> for HighScoreEntry {
    fn from(record: CompletionRecord) -> Self {
        Self {
            levels_completed: record.levels_completed,
            completion_seconds: record.completion_seconds,
            player_name: record.player_name,
        }
    }
}

impl HighScoreEntry {
    /// Leaderboard order: `Less` means `self` ranks above `other`
    fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .levels_completed
            .cmp(&self.levels_completed)
            .then(self.completion_seconds.cmp(&other.completion_seconds))
    }
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a run would make the leaderboard
    pub fn qualifies(&self, entry: &HighScoreEntry) -> bool {
        if entry.levels_completed == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries
            .last()
            .map(|last| entry.rank_cmp(last) == Ordering::Less)
            .unwrap_or(true)
    }

    /// Add a run; returns the rank achieved (1-indexed) or None
    pub fn add_record(&mut self, record: CompletionRecord) -> Option<usize> {
        let entry = HighScoreEntry::from(record);
        if !self.qualifies(&entry) {
            return None;
        }

        // Ties keep the earlier run ahead
        let pos = self
            .entries
            .iter()
            .position(|e| entry.rank_cmp(e) == Ordering::Less)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(pos + 1)
    }

    /// Fastest run that cleared exactly `levels_completed` levels
    pub fn best_for_level(&self, levels_completed: u32) -> Option<&HighScoreEntry> {
        self.entries
            .iter()
            .filter(|e| e.levels_completed == levels_completed)
            .min_by_key(|e| e.completion_seconds)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load the leaderboard, starting fresh if there is none
    pub fn load_from(path: &Path) -> Self {
        let loaded = fs::read_to_string(path)
            .ok()
            .and_then(|json| serde_json::from_str::<HighScores>(&json).ok());

        match loaded {
            Some(scores) => {
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            None => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

impl ScoreSink for HighScores {
    fn submit(&mut self, record: CompletionRecord) {
        match self.add_record(record) {
            Some(rank) => log::info!("New high score, rank {rank}"),
            None => log::debug!("Run did not make the leaderboard"),
        }
    }
}

/// Format a completion time as `m:ss`
pub fn format_duration(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(levels: u32, secs: u64, name: &str) -> CompletionRecord {
        CompletionRecord {
            levels_completed: levels,
            completion_seconds: secs,
            player_name: name.to_string(),
        }
    }

    #[test]
    fn test_ordering_levels_then_time() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_record(record(2, 90, "a")), Some(1));
        assert_eq!(scores.add_record(record(2, 45, "b")), Some(1));
        assert_eq!(scores.add_record(record(1, 10, "c")), Some(3));
        assert_eq!(scores.add_record(record(3, 300, "d")), Some(1));

        let names: Vec<&str> = scores.entries.iter().map(|e| e.player_name.as_str()).collect();
        assert_eq!(names, vec!["d", "b", "a", "c"]);
    }

    #[test]
    fn test_ties_keep_earlier_run_ahead() {
        let mut scores = HighScores::new();
        scores.add_record(record(2, 60, "first"));
        assert_eq!(scores.add_record(record(2, 60, "second")), Some(2));
    }

    #[test]
    fn test_zero_levels_never_qualifies() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_record(record(0, 5, "x")), None);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_full_board_trims_and_rejects() {
        let mut scores = HighScores::new();
        for secs in 0..MAX_HIGH_SCORES as u64 {
            scores.add_record(record(2, 100 + secs, "p"));
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);

        assert_eq!(scores.add_record(record(2, 500, "slow")), None);
        assert_eq!(scores.add_record(record(2, 50, "fast")), Some(1));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.completion_seconds), Some(108));
    }

    #[test]
    fn test_best_for_level() {
        let mut scores = HighScores::new();
        scores.add_record(record(2, 80, "a"));
        scores.add_record(record(1, 20, "b"));
        scores.add_record(record(2, 70, "c"));

        assert_eq!(scores.best_for_level(2).map(|e| e.player_name.as_str()), Some("c"));
        assert!(scores.best_for_level(5).is_none());

        scores.clear();
        assert!(scores.best_for_level(2).is_none());
    }

    #[test]
    fn test_sink_and_file_round_trip() {
        let path = std::env::temp_dir()
            .join(format!("labyrinth-marble-{}-scores.json", std::process::id()));

        let mut scores = HighScores::new();
        scores.submit(record(2, 42, "Ada"));
        scores.save_to(&path).unwrap();

        assert_eq!(HighScores::load_from(&path), scores);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(75), "1:15");
    }
}
