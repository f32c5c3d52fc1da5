//! Tunables for a game session.
//!
//! Round length, feedback pause, leaderboard size and storage key all live
//! here, so tests can shrink or stretch a round.

use serde::{Deserialize, Serialize};

/// Namespace under which the leaderboard is persisted. Shared with data written
/// by earlier builds of the game, so it must not change.
pub const DEFAULT_STORAGE_KEY: &str = "guess-that-num-leaderboard";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Countdown length in ticks.
    pub round_seconds: u32,
    /// Pause between a resolved guess and the next target.
    pub feedback_delay_ms: u32,
    /// Real time per countdown tick in the browser shell.
    pub tick_interval_ms: u32,
    pub leaderboard_capacity: usize,
    pub storage_key: String,
    /// Player names are truncated to this many characters.
    pub max_name_len: usize,
    /// Remaining ticks at or below which the timer is drawn as "low".
    pub low_time_threshold: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            round_seconds: 15,
            feedback_delay_ms: 500,
            tick_interval_ms: 1000,
            leaderboard_capacity: 10,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            max_name_len: 12,
            low_time_threshold: 5,
        }
    }
}

impl GameConfig {
    pub fn is_low_time(&self, remaining: u32) -> bool {
        remaining <= self.low_time_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_rules() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.round_seconds, 15);
        assert_eq!(cfg.feedback_delay_ms, 500);
        assert_eq!(cfg.leaderboard_capacity, 10);
        assert_eq!(cfg.max_name_len, 12);
        assert_eq!(cfg.storage_key, "guess-that-num-leaderboard");
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: GameConfig = serde_json::from_str(r#"{"round_seconds":3}"#).unwrap();
        assert_eq!(cfg.round_seconds, 3);
        assert_eq!(cfg.leaderboard_capacity, 10);
    }

    #[test]
    fn low_time_threshold_is_inclusive() {
        let cfg = GameConfig::default();
        assert!(cfg.is_low_time(5));
        assert!(!cfg.is_low_time(6));
    }
}
