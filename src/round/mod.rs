//! Round engine: targets, evaluation, scoring and the timed round session.

mod expr;
mod scoring;
mod session;

pub use expr::{Guess, GuessDraft, Operand, Operator, evaluate, generate_target, target_values};
pub use scoring::{EXACT_POINTS, FAR_POINTS, NEAR_POINTS, RoundStats, Score, Tier, score};
pub use session::{
    AdvanceTicket, Countdown, CountdownStep, GuessPhase, Resolution, RoundPhase, RoundSession,
};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// RNG for live play. Seeded from the platform entropy source (crypto.getRandomValues
/// in browsers); falls back to the wall clock if that is unavailable.
pub fn entropy_rng() -> ChaCha8Rng {
    let mut seed = [0u8; 8];
    match getrandom::getrandom(&mut seed) {
        Ok(()) => ChaCha8Rng::seed_from_u64(u64::from_le_bytes(seed)),
        Err(err) => {
            tracing::warn!(%err, "entropy source unavailable, seeding from clock");
            ChaCha8Rng::seed_from_u64(crate::clock::now_millis())
        }
    }
}
