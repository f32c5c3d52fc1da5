//! Local top-N leaderboard.
//!
//! Entries are write-once: [`Leaderboard::record`] is the only mutator. Every
//! write re-sorts by score (descending, stable, so equal scores keep insertion
//! order) and truncates to capacity before persisting. Storage problems are
//! logged and swallowed so the game screens always have something to render.

mod store;

pub use store::{BrowserStorage, KeyValueStore, MemoryStore};

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_STORAGE_KEY, GameConfig};
use crate::error::Result;
use crate::round::RoundStats;

/// Stored with camelCase keys so payloads from earlier builds still load.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u32,
    pub wins: u32,
    pub attempts: u32,
    pub max_streak: u32,
    #[serde(default)]
    pub close_calls: u32,
    pub timestamp: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    /// Medal for a zero-based leaderboard position.
    pub fn for_rank(rank: usize) -> Option<Self> {
        match rank {
            0 => Some(Medal::Gold),
            1 => Some(Medal::Silver),
            2 => Some(Medal::Bronze),
            _ => None,
        }
    }
}

/// Result of a write: the new board and where the fresh entry landed
/// (`None` if it did not make the cut).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Recorded {
    pub entries: Vec<LeaderboardEntry>,
    pub rank: Option<usize>,
}

pub struct Leaderboard<S> {
    store: S,
    key: String,
    capacity: usize,
    clock: fn() -> u64,
}

impl<S: KeyValueStore> Leaderboard<S> {
    pub const DEFAULT_CAPACITY: usize = 10;

    pub fn new(store: S) -> Self {
        Self {
            store,
            key: DEFAULT_STORAGE_KEY.to_string(),
            capacity: Self::DEFAULT_CAPACITY,
            clock: crate::clock::now_millis,
        }
    }

    pub fn from_config(store: S, config: &GameConfig) -> Self {
        Self {
            key: config.storage_key.clone(),
            capacity: config.leaderboard_capacity,
            ..Self::new(store)
        }
    }

    /// Replaces the timestamp source (tests pin it).
    pub fn with_clock(mut self, clock: fn() -> u64) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Stored entries, best first. Missing or unreadable data yields an empty board.
    pub fn load(&self) -> Vec<LeaderboardEntry> {
        match self.try_load() {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(key = %self.key, %err, "discarding unreadable leaderboard");
                Vec::new()
            }
        }
    }

    fn try_load(&self) -> Result<Vec<LeaderboardEntry>> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(Vec::new());
        };
        let mut entries: Vec<LeaderboardEntry> = serde_json::from_str(&raw)?;
        // hand-edited payloads may be unsorted or oversized
        self.normalize(&mut entries);
        Ok(entries)
    }

    fn normalize(&self, entries: &mut Vec<LeaderboardEntry>) {
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(self.capacity);
    }

    /// Appends a new entry stamped with the current time, keeps the best
    /// `capacity` and persists them. Returns the resulting board.
    pub fn record(
        &mut self,
        name: &str,
        score: u32,
        wins: u32,
        attempts: u32,
        max_streak: u32,
        close_calls: u32,
    ) -> Vec<LeaderboardEntry> {
        self.write(LeaderboardEntry {
            name: name.to_string(),
            score,
            wins,
            attempts,
            max_streak,
            close_calls,
            timestamp: 0,
        })
        .entries
    }

    /// [`record`](Self::record) for a finished round, also reporting the new rank.
    pub fn record_stats(&mut self, name: &str, stats: &RoundStats) -> Recorded {
        self.write(LeaderboardEntry {
            name: name.to_string(),
            score: stats.score,
            wins: stats.wins,
            attempts: stats.attempts,
            max_streak: stats.max_streak,
            close_calls: stats.close_calls,
            timestamp: 0,
        })
    }

    fn write(&mut self, mut entry: LeaderboardEntry) -> Recorded {
        let mut entries = self.load();
        // newest entry carries the latest timestamp, even under a frozen clock
        entry.timestamp = entries
            .iter()
            .map(|e| e.timestamp.saturating_add(1))
            .fold((self.clock)(), u64::max);
        let timestamp = entry.timestamp;
        let position = insert_position(&entries, entry.score);
        entries.push(entry);
        self.normalize(&mut entries);

        if let Err(err) = self.persist(&entries) {
            tracing::warn!(key = %self.key, %err, "leaderboard not saved");
        }
        tracing::debug!(timestamp, size = entries.len(), "leaderboard entry recorded");
        let rank = (position < entries.len()).then_some(position);
        Recorded { entries, rank }
    }

    fn persist(&mut self, entries: &[LeaderboardEntry]) -> Result<()> {
        let payload = serde_json::to_string(entries)?;
        self.store.set(&self.key, &payload)
    }
}

/// Zero-based slot a new `score` takes on a sorted board. Equal scores already
/// on the board stay ahead of it.
pub fn insert_position(entries: &[LeaderboardEntry], score: u32) -> usize {
    entries.iter().take_while(|e| e.score >= score).count()
}
