//! Guess That Num core crate.
//!
//! A 15-second speed arithmetic game: pick two operands (1–3) and `+`/`-` so that
//! `|a op b|` hits the hidden target. Exact hits score 100, near misses 50 or 20.
//! Finished runs go onto a local top-10 leaderboard.
//!
//! The game logic (`round`, `leaderboard`, `game`) is plain Rust and tested
//! natively; `web` is the wasm-bindgen shell that draws it into the page and
//! owns the timers. `start_game()` is the JS entrypoint.

use wasm_bindgen::prelude::*;

mod clock;
pub mod config;
pub mod error;
pub mod game;
pub mod leaderboard;
pub mod round;
pub mod web;

pub use config::GameConfig;
pub use error::{GameError, StorageError};
pub use game::{Game, GameOver, PlayerName, Screen};
pub use leaderboard::{KeyValueStore, Leaderboard, LeaderboardEntry, MemoryStore};
pub use round::{Guess, Operand, Operator, Resolution, RoundSession, RoundStats, Tier};
pub use web::{start_game, stop_game};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}
