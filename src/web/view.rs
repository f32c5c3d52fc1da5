//! HTML for the three screens, plus decoding of `data-action` attributes.
//!
//! Kept free of DOM calls so the markup can be checked natively.

use std::fmt::Write;

use rand::Rng;

use crate::game::{Game, GameOver, Screen};
use crate::leaderboard::{KeyValueStore, LeaderboardEntry, Medal};
use crate::round::{
    EXACT_POINTS, FAR_POINTS, GuessPhase, NEAR_POINTS, Operand, Operator, RoundSession, Tier,
};

pub const NAME_INPUT_ID: &str = "gtn-name";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TitleTab {
    #[default]
    Tutorial,
    Leaderboard,
}

/// Something the player clicked or typed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Start,
    Tab(TitleTab),
    Left(Operand),
    Operator(Operator),
    Right(Operand),
    /// A bare digit key: fills the left slot first, then the right one.
    Digit(Operand),
    Clear,
    Submit,
    Restart,
    Home,
}

impl Action {
    /// Decodes `data-action` / `data-value` pairs emitted by [`render`].
    pub fn parse(action: &str, value: Option<&str>) -> Option<Self> {
        let operand = || value?.parse::<u8>().ok().and_then(Operand::new);
        match action {
            "start" => Some(Action::Start),
            "tab" => match value? {
                "tutorial" => Some(Action::Tab(TitleTab::Tutorial)),
                "leaderboard" => Some(Action::Tab(TitleTab::Leaderboard)),
                _ => None,
            },
            "left" => operand().map(Action::Left),
            "right" => operand().map(Action::Right),
            "op" => value?.chars().next().and_then(Operator::from_symbol).map(Action::Operator),
            "clear" => Some(Action::Clear),
            "submit" => Some(Action::Submit),
            "restart" => Some(Action::Restart),
            "home" => Some(Action::Home),
            _ => None,
        }
    }

    /// Keyboard shortcuts while a round is running.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Enter" => Some(Action::Submit),
            "Escape" | "Backspace" => Some(Action::Clear),
            _ => {
                let mut chars = key.chars();
                let c = chars.next()?;
                if chars.next().is_some() {
                    return None;
                }
                if let Some(op) = Operator::from_symbol(c) {
                    return Some(Action::Operator(op));
                }
                c.to_digit(10)
                    .and_then(|d| Operand::new(d as u8))
                    .map(Action::Digit)
            }
        }
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render<S: KeyValueStore, R: Rng>(game: &Game<S, R>, tab: TitleTab) -> String {
    match game.screen() {
        Screen::Title => render_title(game, tab),
        Screen::Playing(session) => render_playing(session, game.config().is_low_time(session.remaining())),
        Screen::GameOver(over) => render_game_over(game, over),
    }
}

// --- Title -----------------------------------------------------------------------

fn render_title<S: KeyValueStore, R: Rng>(game: &Game<S, R>, tab: TitleTab) -> String {
    let cfg = game.config();
    let mut html = String::from(
        "<div class='gtn-title'><h1>GUESS THAT NUM</h1><p class='gtn-tagline'>Speed Math Challenge</p>",
    );

    let tab_btn = |t: TitleTab, value: &str, label: &str| {
        let active = if t == tab { " active" } else { "" };
        format!("<button class='gtn-tab{active}' data-action='tab' data-value='{value}'>{label}</button>")
    };
    html.push_str("<div class='gtn-panel'><div class='gtn-tabs'>");
    html.push_str(&tab_btn(TitleTab::Tutorial, "tutorial", "HOW TO PLAY"));
    html.push_str(&tab_btn(TitleTab::Leaderboard, "leaderboard", "LEADERBOARD"));
    html.push_str("</div>");
    match tab {
        TitleTab::Tutorial => {
            let _ = write!(
                html,
                "<div class='gtn-tutorial'>\
                 <p class='gtn-h'>{} Second Timer</p><p>Solve as many puzzles as possible. Every guess counts!</p>\
                 <p class='gtn-h'>Scoring Rules</p><ul>\
                 <li>Exact Match <span>+{EXACT_POINTS} pts</span></li>\
                 <li>&plusmn;1 Difference <span>+{NEAR_POINTS} pts</span></li>\
                 <li>&plusmn;2 Difference <span>+{FAR_POINTS} pts</span></li></ul>\
                 <p class='gtn-h'>Mechanics</p><p>Use numbers 1-3 and +/-. Results are always absolute (positive).</p></div>",
                cfg.round_seconds
            );
        }
        TitleTab::Leaderboard => html.push_str(&render_board(game.leaderboard_snapshot(), None)),
    }
    html.push_str("</div>");

    let _ = write!(
        html,
        "<div class='gtn-panel gtn-login'><h2>New Game</h2><p>Enter your name to start the challenge.</p>\
         <label for='{NAME_INPUT_ID}'>Display Name</label>\
         <input id='{NAME_INPUT_ID}' type='text' maxlength='{}' placeholder='Type your name...' autofocus>\
         <button class='gtn-glow' data-action='start'>START GAME</button></div></div>",
        cfg.max_name_len
    );
    html
}

// --- Playing ---------------------------------------------------------------------

fn render_playing(session: &RoundSession, low_time: bool) -> String {
    let stats = session.stats();
    let mut html = String::from("<div class='gtn-play'><div class='gtn-left'><div class='gtn-stats'>");
    let timer_class = if low_time { "gtn-timer low" } else { "gtn-timer" };
    let _ = write!(
        html,
        "<div class='{timer_class}'><span>TIME</span><b>{}</b></div>\
         <div class='gtn-score'><span>SCORE</span><b>{}</b></div></div>",
        session.remaining(),
        stats.score
    );

    html.push_str("<div class='gtn-target'><h3>Target Number</h3>");
    match session.pending_resolution() {
        Some(res) => {
            let (class, message) = match res.tier {
                Tier::Exact => ("won", "Correct!".to_string()),
                Tier::Close => ("partial", format!("So close! You calculated {}", res.result)),
                Tier::Miss => ("lost", format!("You calculated {}", res.result)),
            };
            let _ = write!(
                html,
                "<div class='gtn-reveal {class}'>{}</div><p class='gtn-msg {class}'>{message}</p>",
                res.target
            );
            if res.points > 0 {
                let _ = write!(html, "<div class='gtn-pop'>+{} pts</div>", res.points);
            }
        }
        None => html.push_str("<div class='gtn-reveal idle'>?</div>"),
    }
    let _ = write!(
        html,
        "<div class='gtn-mini'>Streak: <b>{}</b> Wins: <b>{}</b></div></div></div>",
        stats.current_streak, stats.wins
    );

    let locked = session.guess_phase() == GuessPhase::Resolved;
    let disabled = if locked { " disabled" } else { "" };
    let draft = session.draft();
    let column = |slot: &str, selected: Option<Operand>| {
        let mut col = String::from("<div class='gtn-col'>");
        for op in Operand::ALL {
            let sel = if selected == Some(op) { " selected" } else { "" };
            let _ = write!(
                col,
                "<button class='gtn-btn{sel}' data-action='{slot}' data-value='{v}'{disabled}>{v}</button>",
                v = op.value()
            );
        }
        col.push_str("</div>");
        col
    };

    html.push_str("<div class='gtn-right'><div class='gtn-controls'>");
    html.push_str(&column("left", draft.left));
    html.push_str("<div class='gtn-col gtn-ops'>");
    for op in Operator::ALL {
        let sel = if draft.operator == Some(op) { " selected" } else { "" };
        let _ = write!(
            html,
            "<button class='gtn-btn round{sel}' data-action='op' data-value='{s}'{disabled}>{s}</button>",
            s = op.symbol()
        );
    }
    html.push_str("</div>");
    html.push_str(&column("right", draft.right));
    html.push_str("</div>");

    let ready = draft.complete().is_some() && !locked;
    let _ = write!(
        html,
        "<button class='gtn-submit{}' data-action='submit'{}>SUBMIT</button></div></div>",
        if ready { " gtn-glow" } else { "" },
        if ready { "" } else { " disabled" }
    );
    html
}

// --- Game over -------------------------------------------------------------------

fn render_game_over<S: KeyValueStore, R: Rng>(game: &Game<S, R>, over: &GameOver) -> String {
    let s = &over.stats;
    let mut html = String::new();
    let _ = write!(
        html,
        "<div class='gtn-over'><div class='gtn-panel'><p class='gtn-h'>FINAL SCORE</p><h1>{}</h1>\
         <div class='gtn-grid'>\
         <div><span>Wins</span><b>{}</b></div>\
         <div><span>Best Streak</span><b>{}</b></div>\
         <div><span>Close Calls</span><b>{}</b></div>\
         <div><span>Attempts</span><b>{}</b></div></div>\
         <button class='gtn-glow' data-action='restart'>PLAY AGAIN</button>\
         <button class='gtn-btn' data-action='home'>TITLE SCREEN</button></div>",
        s.score, s.wins, s.max_streak, s.close_calls, s.attempts
    );
    html.push_str("<div class='gtn-panel'><p class='gtn-h'>TOP 10 LEADERBOARD</p>");
    html.push_str(&render_board(game.leaderboard_snapshot(), over.rank));
    html.push_str("</div></div>");
    html
}

/// Leaderboard rows; `highlight` marks the run that was just recorded.
pub fn render_board(entries: &[LeaderboardEntry], highlight: Option<usize>) -> String {
    if entries.is_empty() {
        return "<div class='gtn-empty'>No champions yet.<br>Be the first!</div>".to_string();
    }
    let mut html = String::from("<ol class='gtn-board'>");
    for (idx, e) in entries.iter().enumerate() {
        let medal = match Medal::for_rank(idx) {
            Some(Medal::Gold) => " gold",
            Some(Medal::Silver) => " silver",
            Some(Medal::Bronze) => " bronze",
            None => "",
        };
        let mine = if highlight == Some(idx) { " mine" } else { "" };
        let _ = write!(
            html,
            "<li class='gtn-row{mine}'><span class='gtn-rank{medal}'>{}</span>\
             <span class='gtn-name'>{}</span>\
             <span class='gtn-detail'>W:{} S:{} C:{}</span>\
             <span class='gtn-points'>{}</span></li>",
            idx + 1,
            escape_html(&e.name),
            e.wins,
            e.max_streak,
            e.close_calls,
            e.score
        );
    }
    html.push_str("</ol>");
    html
}

pub const STYLE: &str = "\
#gtn-root{min-height:100vh;background:#0f172a;color:#fff;font-family:system-ui,sans-serif;display:flex;align-items:center;justify-content:center}\
.gtn-title,.gtn-over,.gtn-play{display:flex;flex-wrap:wrap;gap:24px;justify-content:center;max-width:1100px}\
.gtn-title h1{width:100%;text-align:center;font-size:56px;margin:0}.gtn-tagline{width:100%;text-align:center;color:#c4b5fd}\
.gtn-panel,.gtn-target,.gtn-controls{background:rgba(15,23,42,.6);border:1px solid rgba(255,255,255,.1);border-radius:24px;padding:24px;min-width:320px}\
.gtn-h{color:#94a3b8;font-weight:700;letter-spacing:.1em}.gtn-tab.active{background:rgba(255,255,255,.1)}\
.gtn-btn,.gtn-tab,.gtn-submit,.gtn-glow{font-size:20px;padding:12px 20px;margin:4px;border-radius:16px;border:1px solid #334155;background:#1e293b;color:#fff;cursor:pointer}\
.gtn-btn.selected{background:#7c3aed}.gtn-btn.round{border-radius:50%}.gtn-glow{background:#8b5cf6;box-shadow:0 0 24px rgba(139,92,246,.5)}\
button:disabled{opacity:.4;cursor:default}.gtn-controls{display:flex;gap:16px}.gtn-col{display:flex;flex-direction:column}\
.gtn-stats{display:flex;gap:16px}.gtn-timer b,.gtn-score b{font-size:36px;display:block}.gtn-timer.low{color:#fca5a5}\
.gtn-reveal{font-size:40px;width:80px;height:80px;display:flex;align-items:center;justify-content:center;border-radius:16px;margin:auto}\
.gtn-reveal.won{background:#10b981}.gtn-reveal.partial{background:#f59e0b}.gtn-reveal.lost{background:#f43f5e}.gtn-reveal.idle{color:rgba(255,255,255,.2)}\
.gtn-pop{color:#facc15;font-weight:900;font-size:24px;text-align:center}\
.gtn-board{list-style:none;padding:0}.gtn-row{display:flex;gap:12px;padding:8px;border-radius:12px}.gtn-row.mine{background:rgba(139,92,246,.2)}\
.gtn-rank.gold{color:#facc15}.gtn-rank.silver{color:#cbd5e1}.gtn-rank.bronze{color:#fb923c}.gtn-points{margin-left:auto;font-weight:700}\
";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::leaderboard::{Leaderboard, MemoryStore};
    use crate::round::Guess;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn game() -> Game<MemoryStore, ChaCha8Rng> {
        let cfg = GameConfig::default();
        let lb = Leaderboard::from_config(MemoryStore::new(), &cfg);
        Game::new(cfg, lb, ChaCha8Rng::seed_from_u64(5))
    }

    #[test]
    fn parses_button_actions() {
        assert_eq!(Action::parse("left", Some("2")), Operand::new(2).map(Action::Left));
        assert_eq!(Action::parse("op", Some("-")), Some(Action::Operator(Operator::Minus)));
        assert_eq!(Action::parse("right", Some("7")), None);
        assert_eq!(Action::parse("tab", Some("leaderboard")), Some(Action::Tab(TitleTab::Leaderboard)));
        assert_eq!(Action::parse("bogus", None), None);
    }

    #[test]
    fn parses_keys() {
        assert_eq!(Action::from_key("Enter"), Some(Action::Submit));
        assert_eq!(Action::from_key("+"), Some(Action::Operator(Operator::Plus)));
        assert_eq!(Action::from_key("3"), Operand::new(3).map(Action::Digit));
        assert_eq!(Action::from_key("4"), None);
        assert_eq!(Action::from_key("Shift"), None);
    }

    #[test]
    fn escapes_names() {
        assert_eq!(escape_html("<b>&'\""), "&lt;b&gt;&amp;&#39;&quot;");
    }

    #[test]
    fn title_shows_tutorial_or_board() {
        let g = game();
        let tut = render(&g, TitleTab::Tutorial);
        assert!(tut.contains("15 Second Timer"));
        assert!(tut.contains("maxlength='12'"));
        let board = render(&g, TitleTab::Leaderboard);
        assert!(board.contains("No champions yet."));
    }

    #[test]
    fn playing_locks_controls_during_feedback() {
        let mut g = game();
        g.start_round("ada").unwrap();
        let before = render(&g, TitleTab::Tutorial);
        assert!(before.contains("gtn-reveal idle"));
        assert!(before.contains("data-action='submit' disabled"));

        let one = Operand::new(1).unwrap();
        g.submit_guess(Guess::new(one, Operator::Plus, one)).unwrap();
        let after = render(&g, TitleTab::Tutorial);
        assert!(!after.contains("gtn-reveal idle"));
        assert!(after.contains("data-value='1' disabled"));
    }

    #[test]
    fn board_highlights_and_escapes() {
        let entries = vec![
            LeaderboardEntry {
                name: "<x>".into(),
                score: 300,
                wins: 3,
                attempts: 3,
                max_streak: 3,
                close_calls: 0,
                timestamp: 1,
            },
            LeaderboardEntry {
                name: "me".into(),
                score: 100,
                wins: 1,
                attempts: 2,
                max_streak: 1,
                close_calls: 1,
                timestamp: 2,
            },
        ];
        let html = render_board(&entries, Some(1));
        assert!(html.contains("&lt;x&gt;"));
        assert!(html.contains("gtn-rank gold"));
        assert!(html.contains("gtn-row mine'><span class='gtn-rank silver'>2"));
    }
}
