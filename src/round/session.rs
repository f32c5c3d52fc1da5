//! One timed round: countdown, current target, guess machine and stats.
//!
//! Two nested machines:
//! - round level: `Playing -> Ended`, driven only by [`RoundSession::tick`];
//! - guess level (inside `Playing`): `Idle -> AwaitingGuess -> Resolved -> Idle`.
//!
//! The session never schedules anything itself. The host calls `tick()` once per
//! countdown unit and `advance(ticket)` once the feedback pause has elapsed; both
//! are harmless if they arrive late.

use rand::Rng;

use super::expr::{Guess, GuessDraft, Operand, Operator, evaluate, generate_target};
use super::scoring::{RoundStats, Tier, score};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundPhase {
    Playing,
    Ended,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuessPhase {
    Idle,
    AwaitingGuess,
    Resolved,
}

// --- Countdown -----------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CountdownStep {
    Running(u32),
    /// Reached zero on this tick. Reported once.
    Expired,
    /// Already at zero; the tick was ignored.
    Stopped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
}

impl Countdown {
    /// A zero-length countdown would end before the player sees it, so it is
    /// stretched to one tick.
    pub fn new(total: u32) -> Self {
        Self { remaining: total.max(1) }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn tick(&mut self) -> CountdownStep {
        match self.remaining {
            0 => CountdownStep::Stopped,
            1 => {
                self.remaining = 0;
                CountdownStep::Expired
            }
            n => {
                self.remaining = n - 1;
                CountdownStep::Running(self.remaining)
            }
        }
    }
}

// --- Resolution ----------------------------------------------------------------

/// Identifies the resolution a deferred auto-advance belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AdvanceTicket(u64);

/// Outcome of one submitted guess.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub guess: Guess,
    pub target: u8,
    pub result: u8,
    pub diff: u8,
    pub points: u32,
    pub tier: Tier,
    pub ticket: AdvanceTicket,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GuessState {
    Idle,
    AwaitingGuess(GuessDraft),
    Resolved(Resolution),
}

// --- Session -------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct RoundSession {
    phase: RoundPhase,
    countdown: Countdown,
    target: u8,
    guess: GuessState,
    stats: RoundStats,
    resolved_count: u64,
}

impl RoundSession {
    pub fn new<R: Rng + ?Sized>(round_seconds: u32, rng: &mut R) -> Self {
        Self {
            phase: RoundPhase::Playing,
            countdown: Countdown::new(round_seconds),
            target: generate_target(rng),
            guess: GuessState::Idle,
            stats: RoundStats::default(),
            resolved_count: 0,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_ended(&self) -> bool {
        self.phase == RoundPhase::Ended
    }

    pub fn guess_phase(&self) -> GuessPhase {
        match self.guess {
            GuessState::Idle => GuessPhase::Idle,
            GuessState::AwaitingGuess(_) => GuessPhase::AwaitingGuess,
            GuessState::Resolved(_) => GuessPhase::Resolved,
        }
    }

    pub fn target(&self) -> u8 {
        self.target
    }

    pub fn remaining(&self) -> u32 {
        self.countdown.remaining()
    }

    pub fn stats(&self) -> &RoundStats {
        &self.stats
    }

    pub fn draft(&self) -> GuessDraft {
        match self.guess {
            GuessState::AwaitingGuess(d) => d,
            GuessState::Resolved(r) => r.guess.into(),
            GuessState::Idle => GuessDraft::default(),
        }
    }

    /// The resolution currently on display, if the session is in its feedback pause.
    pub fn pending_resolution(&self) -> Option<&Resolution> {
        match &self.guess {
            GuessState::Resolved(r) => Some(r),
            _ => None,
        }
    }

    /// Value of the expression as currently selected, when it is complete.
    pub fn preview(&self) -> Option<u8> {
        self.draft().complete().map(|g| evaluate(&g))
    }

    /// Selections are only taken while playing and outside the feedback pause.
    fn accepts_input(&self) -> bool {
        self.phase == RoundPhase::Playing && !matches!(self.guess, GuessState::Resolved(_))
    }

    fn edit_draft(&mut self, f: impl FnOnce(&mut GuessDraft)) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let mut draft = self.draft();
        f(&mut draft);
        self.guess = if draft.is_empty() {
            GuessState::Idle
        } else {
            GuessState::AwaitingGuess(draft)
        };
        true
    }

    pub fn select_left(&mut self, operand: Operand) -> bool {
        self.edit_draft(|d| d.left = Some(operand))
    }

    pub fn select_operator(&mut self, operator: Operator) -> bool {
        self.edit_draft(|d| d.operator = Some(operator))
    }

    pub fn select_right(&mut self, operand: Operand) -> bool {
        self.edit_draft(|d| d.right = Some(operand))
    }

    pub fn clear_draft(&mut self) -> bool {
        self.edit_draft(|d| *d = GuessDraft::default())
    }

    /// Submits the current selection. Incomplete selections are ignored.
    pub fn submit(&mut self) -> Option<Resolution> {
        self.submit_guess(self.draft())
    }

    /// Submits an explicit guess, replacing whatever was selected.
    ///
    /// Returns `None` without touching any state when the guess is incomplete,
    /// the round has ended, or a previous guess is still on display.
    pub fn submit_guess(&mut self, draft: impl Into<GuessDraft>) -> Option<Resolution> {
        let guess = draft.into().complete()?;
        if !self.accepts_input() {
            return None;
        }

        let result = evaluate(&guess);
        let scored = score(self.target, result);
        self.stats.record(scored);
        self.resolved_count += 1;

        let resolution = Resolution {
            guess,
            target: self.target,
            result,
            diff: self.target.abs_diff(result),
            points: scored.points,
            tier: scored.tier,
            ticket: AdvanceTicket(self.resolved_count),
        };
        self.guess = GuessState::Resolved(resolution);
        tracing::debug!(%guess, target = self.target, result, points = scored.points, "guess resolved");
        Some(resolution)
    }

    /// Ends the feedback pause: fresh target, cleared selection.
    ///
    /// No-op (returns `false`) if the round has ended or the ticket does not
    /// match the resolution on display.
    pub fn advance<R: Rng + ?Sized>(&mut self, ticket: AdvanceTicket, rng: &mut R) -> bool {
        match self.guess {
            GuessState::Resolved(r) if self.phase == RoundPhase::Playing && r.ticket == ticket => {
                self.target = generate_target(rng);
                self.guess = GuessState::Idle;
                true
            }
            _ => false,
        }
    }

    /// Advances the countdown by one unit. Returns the frozen stats on the tick
    /// that ends the round, and `None` on every other call.
    pub fn tick(&mut self) -> Option<RoundStats> {
        if self.phase == RoundPhase::Ended {
            return None;
        }
        match self.countdown.tick() {
            CountdownStep::Running(_) => None,
            CountdownStep::Expired | CountdownStep::Stopped => {
                self.phase = RoundPhase::Ended;
                tracing::debug!(score = self.stats.score, "round ended");
                Some(self.stats.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn op(v: u8) -> Operand {
        Operand::new(v).unwrap()
    }

    fn session(secs: u32) -> (RoundSession, ChaCha8Rng) {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        (RoundSession::new(secs, &mut rng), rng)
    }

    #[test]
    fn countdown_expires_once() {
        let mut c = Countdown::new(2);
        assert_eq!(c.tick(), CountdownStep::Running(1));
        assert_eq!(c.tick(), CountdownStep::Expired);
        assert_eq!(c.tick(), CountdownStep::Stopped);
        assert_eq!(Countdown::new(0).remaining(), 1);
    }

    #[test]
    fn selection_walks_guess_phases() {
        let (mut s, mut rng) = session(15);
        assert_eq!(s.guess_phase(), GuessPhase::Idle);
        assert!(s.select_left(op(1)));
        assert_eq!(s.guess_phase(), GuessPhase::AwaitingGuess);
        assert!(s.submit().is_none(), "incomplete guess must be ignored");
        assert_eq!(s.stats().attempts, 0);

        s.select_operator(Operator::Plus);
        s.select_right(op(2));
        assert_eq!(s.preview(), Some(3));
        let res = s.submit().unwrap();
        assert_eq!(s.guess_phase(), GuessPhase::Resolved);
        assert_eq!(res.result, 3);

        // controls are locked during the feedback pause
        assert!(!s.select_left(op(3)));
        assert!(s.submit().is_none());

        assert!(s.advance(res.ticket, &mut rng));
        assert_eq!(s.guess_phase(), GuessPhase::Idle);
        assert_eq!(s.draft(), GuessDraft::default());
    }

    #[test]
    fn clearing_every_field_returns_to_idle() {
        let (mut s, _) = session(15);
        s.select_right(op(3));
        assert!(s.clear_draft());
        assert_eq!(s.guess_phase(), GuessPhase::Idle);
    }

    #[test]
    fn stale_ticket_is_ignored() {
        let (mut s, mut rng) = session(15);
        let first = s.submit_guess(Guess::new(op(1), Operator::Plus, op(1))).unwrap();
        assert!(s.advance(first.ticket, &mut rng));
        let second = s.submit_guess(Guess::new(op(2), Operator::Plus, op(1))).unwrap();
        assert!(!s.advance(first.ticket, &mut rng));
        assert_eq!(s.pending_resolution(), Some(&second));
    }

    #[test]
    fn round_ends_after_duration_and_freezes() {
        let (mut s, mut rng) = session(3);
        let res = s.submit_guess(Guess::new(op(3), Operator::Plus, op(3))).unwrap();
        assert_eq!(s.tick(), None);
        assert_eq!(s.tick(), None);
        let end = s.tick().expect("third tick ends the round");
        assert_eq!(end.attempts, 1);
        assert!(s.is_ended());

        assert_eq!(s.tick(), None);
        assert!(!s.advance(res.ticket, &mut rng), "advance after end is a no-op");
        assert!(s.submit_guess(Guess::new(op(1), Operator::Minus, op(1))).is_none());
        assert_eq!(s.stats(), &end);
    }

    #[test]
    fn incomplete_explicit_guess_leaves_draft_untouched() {
        let (mut s, _) = session(15);
        s.select_left(op(2));
        let partial = GuessDraft::new(Some(op(1)), None, Some(op(1)));
        assert!(s.submit_guess(partial).is_none());
        assert_eq!(s.draft().left, Some(op(2)));
    }
}
