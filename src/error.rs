//! Error types shared by the game core and the storage backends.

use thiserror::Error;

/// Failures of the key-value substrate behind the leaderboard.
///
/// None of these ever reach the player: the leaderboard logs them and carries on.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),

    #[error("failed to read key {key}: {reason}")]
    Read { key: String, reason: String },

    #[error("failed to write key {key}: {reason}")]
    Write { key: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rejected game transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("player name is empty")]
    EmptyName,

    #[error("cannot {action} while on the {screen} screen")]
    InvalidTransition {
        action: &'static str,
        screen: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, StorageError>;
