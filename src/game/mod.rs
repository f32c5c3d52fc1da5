//! Screen-level state machine: `Title -> Playing -> GameOver`.
//!
//! [`Game`] owns the current [`RoundSession`], the injected [`Leaderboard`] and
//! the RNG, and is the only thing the presentation layer talks to. It never
//! touches timers; hosts feed it `tick()` and `advance()` calls.

mod player;

pub use player::PlayerName;

use rand::Rng;

use crate::config::GameConfig;
use crate::error::GameError;
use crate::leaderboard::{KeyValueStore, Leaderboard, LeaderboardEntry};
use crate::round::{
    AdvanceTicket, GuessDraft, Operand, Operator, Resolution, RoundSession, RoundStats,
};

/// Final snapshot shown on the game-over screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameOver {
    pub stats: RoundStats,
    /// Zero-based leaderboard position of this run, if it made the board.
    pub rank: Option<usize>,
}

#[derive(Clone, Debug)]
pub enum Screen {
    Title,
    Playing(RoundSession),
    GameOver(GameOver),
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Title => "title",
            Screen::Playing(_) => "playing",
            Screen::GameOver(_) => "game-over",
        }
    }
}

pub type RoundEndListener = Box<dyn FnMut(&RoundStats)>;

pub struct Game<S, R> {
    config: GameConfig,
    leaderboard: Leaderboard<S>,
    rng: R,
    screen: Screen,
    player: Option<PlayerName>,
    entries: Vec<LeaderboardEntry>,
    listeners: Vec<RoundEndListener>,
}

impl<S: KeyValueStore, R: Rng> Game<S, R> {
    pub fn new(config: GameConfig, leaderboard: Leaderboard<S>, rng: R) -> Self {
        let entries = leaderboard.load();
        Self {
            config,
            leaderboard,
            rng,
            screen: Screen::Title,
            player: None,
            entries,
            listeners: Vec::new(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn player(&self) -> Option<&PlayerName> {
        self.player.as_ref()
    }

    pub fn session(&self) -> Option<&RoundSession> {
        match &self.screen {
            Screen::Playing(s) => Some(s),
            _ => None,
        }
    }

    fn session_mut(&mut self) -> Option<&mut RoundSession> {
        match &mut self.screen {
            Screen::Playing(s) => Some(s),
            _ => None,
        }
    }

    pub fn leaderboard(&self) -> &Leaderboard<S> {
        &self.leaderboard
    }

    /// Board as of the last write (or the initial load).
    pub fn leaderboard_snapshot(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    /// Registers a callback fired once per round, with the frozen final stats.
    pub fn on_round_end(&mut self, listener: impl FnMut(&RoundStats) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    // --- Transitions -----------------------------------------------------------

    /// Title (or game over) -> Playing under a new name.
    pub fn start_round(&mut self, name: &str) -> Result<(), GameError> {
        if matches!(self.screen, Screen::Playing(_)) {
            return Err(self.invalid("start a round"));
        }
        let name = PlayerName::parse(name, self.config.max_name_len)?;
        tracing::debug!(player = %name, "starting round");
        self.player = Some(name);
        self.begin();
        Ok(())
    }

    /// Game over -> Playing with the same player.
    pub fn restart(&mut self) -> Result<(), GameError> {
        if !matches!(self.screen, Screen::GameOver(_)) || self.player.is_none() {
            return Err(self.invalid("restart"));
        }
        self.begin();
        Ok(())
    }

    /// Game over -> Title; forgets the player name.
    pub fn go_home(&mut self) -> Result<(), GameError> {
        if !matches!(self.screen, Screen::GameOver(_)) {
            return Err(self.invalid("return to the title screen"));
        }
        self.screen = Screen::Title;
        self.player = None;
        Ok(())
    }

    /// Abandons whatever is running without recording it. After this no tick
    /// or advance can reach the discarded round.
    pub fn teardown(&mut self) {
        if matches!(self.screen, Screen::Playing(_)) {
            tracing::debug!("round abandoned");
        }
        self.screen = Screen::Title;
        self.player = None;
    }

    fn begin(&mut self) {
        self.screen = Screen::Playing(RoundSession::new(self.config.round_seconds, &mut self.rng));
    }

    fn invalid(&self, action: &'static str) -> GameError {
        GameError::InvalidTransition {
            action,
            screen: self.screen.name(),
        }
    }

    // --- Round input -----------------------------------------------------------

    pub fn select_left(&mut self, operand: Operand) -> bool {
        self.session_mut().is_some_and(|s| s.select_left(operand))
    }

    pub fn select_operator(&mut self, operator: Operator) -> bool {
        self.session_mut().is_some_and(|s| s.select_operator(operator))
    }

    pub fn select_right(&mut self, operand: Operand) -> bool {
        self.session_mut().is_some_and(|s| s.select_right(operand))
    }

    pub fn clear_draft(&mut self) -> bool {
        self.session_mut().is_some_and(RoundSession::clear_draft)
    }

    pub fn submit(&mut self) -> Option<Resolution> {
        self.session_mut()?.submit()
    }

    /// Scores `guess` against the current target. Incomplete guesses, guesses
    /// outside a running round, and guesses during the feedback pause are ignored.
    pub fn submit_guess(&mut self, guess: impl Into<GuessDraft>) -> Option<Resolution> {
        self.session_mut()?.submit_guess(guess)
    }

    /// Completes the feedback pause started by the resolution holding `ticket`.
    pub fn advance(&mut self, ticket: AdvanceTicket) -> bool {
        match &mut self.screen {
            Screen::Playing(s) => s.advance(ticket, &mut self.rng),
            _ => false,
        }
    }

    /// One countdown unit. On the tick that ends the round the run is recorded,
    /// listeners fire, the screen moves to game over and the final stats are returned.
    pub fn tick(&mut self) -> Option<RoundStats> {
        let stats = self.session_mut()?.tick()?;
        self.finish(&stats);
        Some(stats)
    }

    fn finish(&mut self, stats: &RoundStats) {
        let name = self
            .player
            .as_ref()
            .map(PlayerName::as_str)
            .unwrap_or_default();
        let recorded = self.leaderboard.record_stats(name, stats);
        self.entries = recorded.entries;
        self.screen = Screen::GameOver(GameOver {
            stats: stats.clone(),
            rank: recorded.rank,
        });
        tracing::debug!(score = stats.score, rank = ?recorded.rank, "round recorded");
        for listener in &mut self.listeners {
            listener(stats);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::MemoryStore;
    use crate::round::{Guess, Tier};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn game(round_seconds: u32) -> Game<MemoryStore, ChaCha8Rng> {
        let config = GameConfig { round_seconds, ..GameConfig::default() };
        let lb = Leaderboard::from_config(MemoryStore::new(), &config);
        Game::new(config, lb, ChaCha8Rng::seed_from_u64(3))
    }

    fn op(v: u8) -> Operand {
        Operand::new(v).unwrap()
    }

    /// A guess that evaluates exactly to `target`.
    fn exact_for(target: u8) -> Guess {
        for a in Operand::ALL {
            for b in Operand::ALL {
                for o in Operator::ALL {
                    let g = Guess::new(a, o, b);
                    if g.evaluate() == target {
                        return g;
                    }
                }
            }
        }
        unreachable!("every target is reachable")
    }

    #[test]
    fn title_to_playing_requires_name() {
        let mut g = game(15);
        assert_eq!(g.start_round("   "), Err(GameError::EmptyName));
        assert!(matches!(g.screen(), Screen::Title));
        g.start_round(" Ada ").unwrap();
        assert_eq!(g.player().map(PlayerName::as_str), Some("Ada"));
        assert!(g.session().is_some());
        assert!(matches!(
            g.start_round("again"),
            Err(GameError::InvalidTransition { screen: "playing", .. })
        ));
    }

    #[test]
    fn round_end_records_and_notifies_once() {
        let mut g = game(2);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        g.on_round_end(move |s| sink.borrow_mut().push(s.clone()));

        g.start_round("ada").unwrap();
        let target = g.session().unwrap().target();
        let res = g.submit_guess(exact_for(target)).unwrap();
        assert_eq!(res.tier, Tier::Exact);

        assert!(g.tick().is_none());
        let end = g.tick().unwrap();
        assert_eq!(end.score, 100);
        assert!(g.tick().is_none());
        assert!(!g.advance(res.ticket));
        assert!(g.submit_guess(exact_for(0)).is_none());

        assert_eq!(seen.borrow().as_slice(), &[end.clone()]);
        match g.screen() {
            Screen::GameOver(over) => {
                assert_eq!(over.stats, end);
                assert_eq!(over.rank, Some(0));
            }
            other => panic!("expected game over, got {}", other.name()),
        }
        let snap = g.leaderboard_snapshot();
        assert_eq!(snap.len(), 1);
        assert_eq!(snap[0].name, "ada");
        assert_eq!(snap[0].wins, 1);
    }

    #[test]
    fn restart_keeps_player_and_resets_stats() {
        let mut g = game(1);
        g.start_round("bo").unwrap();
        g.submit_guess(Guess::new(op(1), Operator::Plus, op(1)));
        g.tick().unwrap();
        g.restart().unwrap();
        assert_eq!(g.player().map(PlayerName::as_str), Some("bo"));
        assert_eq!(g.session().unwrap().stats(), &RoundStats::default());
    }

    #[test]
    fn home_clears_player() {
        let mut g = game(1);
        assert!(g.go_home().is_err());
        g.start_round("cy").unwrap();
        g.tick().unwrap();
        g.go_home().unwrap();
        assert!(matches!(g.screen(), Screen::Title));
        assert!(g.player().is_none());
        assert!(g.restart().is_err());
    }

    #[test]
    fn teardown_discards_running_round() {
        let mut g = game(5);
        g.start_round("dee").unwrap();
        g.select_left(op(2));
        g.teardown();
        assert!(g.tick().is_none());
        assert!(g.leaderboard_snapshot().is_empty());
        assert!(!g.select_right(op(1)));
    }

    #[test]
    fn input_ignored_off_the_playing_screen() {
        let mut g = game(5);
        assert!(!g.select_left(op(1)));
        assert!(g.submit().is_none());
        assert!(!g.clear_draft());
    }
}
