//! Tiered scoring and the per-round accumulator.
//!
//! The point bands are what the leaderboard ranks on, so they are fixed:
//!
//! | diff | points | tier  |
//! |------|--------|-------|
//! | 0    | 100    | exact |
//! | 1    | 50     | close |
//! | 2    | 20     | close |
//! | >2   | 0      | miss  |

use serde::{Deserialize, Serialize};

pub const EXACT_POINTS: u32 = 100;
pub const NEAR_POINTS: u32 = 50; // diff 1
pub const FAR_POINTS: u32 = 20; // diff 2

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Exact,
    Close,
    Miss,
}

impl Tier {
    pub fn label(self) -> &'static str {
        match self {
            Tier::Exact => "exact",
            Tier::Close => "close",
            Tier::Miss => "miss",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Score {
    pub points: u32,
    pub tier: Tier,
}

pub fn score(target: u8, result: u8) -> Score {
    let (points, tier) = match target.abs_diff(result) {
        0 => (EXACT_POINTS, Tier::Exact),
        1 => (NEAR_POINTS, Tier::Close),
        2 => (FAR_POINTS, Tier::Close),
        _ => (0, Tier::Miss),
    };
    Score { points, tier }
}

/// Running totals for one round.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundStats {
    pub score: u32,
    pub wins: u32,
    pub attempts: u32,
    pub current_streak: u32,
    pub max_streak: u32,
    pub close_calls: u32,
}

impl RoundStats {
    /// Folds one scored attempt into the totals.
    pub fn record(&mut self, s: Score) {
        self.attempts += 1;
        self.score += s.points;
        match s.tier {
            Tier::Exact => {
                self.wins += 1;
                self.current_streak += 1;
                self.max_streak = self.max_streak.max(self.current_streak);
            }
            Tier::Close => {
                self.close_calls += 1;
                self.current_streak = 0;
            }
            Tier::Miss => self.current_streak = 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands() {
        assert_eq!(score(3, 3), Score { points: 100, tier: Tier::Exact });
        assert_eq!(score(3, 4), Score { points: 50, tier: Tier::Close });
        assert_eq!(score(3, 1), Score { points: 20, tier: Tier::Close });
        assert_eq!(score(4, 1), Score { points: 0, tier: Tier::Miss });
        assert_eq!(score(0, 6), Score { points: 0, tier: Tier::Miss });
    }

    #[test]
    fn streak_resets_on_any_non_exact() {
        let mut stats = RoundStats::default();
        let mut streaks = Vec::new();
        for (target, result) in [(2, 2), (5, 5), (4, 3), (1, 1)] {
            stats.record(score(target, result));
            streaks.push(stats.current_streak);
        }
        assert_eq!(streaks, vec![1, 2, 0, 1]);
        assert_eq!(stats.max_streak, 2);
        assert_eq!(stats.wins, 3);
        assert_eq!(stats.close_calls, 1);
        assert_eq!(stats.attempts, 4);
        assert_eq!(stats.score, 350);
    }

    #[test]
    fn miss_counts_attempt_only() {
        let mut stats = RoundStats::default();
        stats.record(score(6, 0));
        assert_eq!(stats.attempts, 1);
        assert_eq!(stats.score, 0);
        assert_eq!(stats.wins + stats.close_calls, 0);
    }
}
