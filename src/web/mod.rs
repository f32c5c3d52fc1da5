//! Browser shell: mounts the game into the page, routes DOM events into
//! [`Game`], and owns the countdown / feedback timers.
//!
//! State lives in a `thread_local!` slot so event closures can reach it. Every
//! handler re-renders the root element from scratch after mutating the game.

mod timer;
mod view;

pub use timer::{Interval, Timeout};
pub use view::{Action, TitleTab, escape_html, render, render_board};

use std::cell::RefCell;

use rand_chacha::ChaCha8Rng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlInputElement, window};

use crate::config::GameConfig;
use crate::game::{Game, Screen};
use crate::leaderboard::{BrowserStorage, KeyValueStore, Leaderboard, MemoryStore};
use crate::round::{AdvanceTicket, entropy_rng};

const ROOT_ID: &str = "gtn-root";
const STYLE_ID: &str = "gtn-style";

type BrowserGame = Game<Box<dyn KeyValueStore>, ChaCha8Rng>;

struct Shell {
    game: BrowserGame,
    root: Element,
    doc: Document,
    tab: TitleTab,
    countdown: Option<Interval>,
    feedback: Option<Timeout>,
}

thread_local! {
    static SHELL: RefCell<Option<Shell>> = RefCell::new(None);
}

/// Mounts the game into `#gtn-root`, creating it if needed.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let root = match doc.get_element_by_id(ROOT_ID) {
        Some(el) => el,
        None => {
            let el = doc.create_element("div")?;
            el.set_id(ROOT_ID);
            doc.body()
                .ok_or_else(|| JsValue::from_str("no body"))?
                .append_child(&el)?;
            el
        }
    };
    if doc.get_element_by_id(STYLE_ID).is_none() {
        let style = doc.create_element("style")?;
        style.set_id(STYLE_ID);
        style.set_text_content(Some(view::STYLE));
        if let Some(head) = doc.head() {
            head.append_child(&style)?;
        }
    }

    let config = GameConfig::default();
    let store: Box<dyn KeyValueStore> = match BrowserStorage::open() {
        Ok(s) => Box::new(s),
        Err(err) => {
            web_sys::console::warn_1(&JsValue::from_str(&format!(
                "leaderboard will not persist: {err}"
            )));
            Box::new(MemoryStore::new())
        }
    };
    let leaderboard = Leaderboard::from_config(store, &config);
    let mut game = Game::new(config, leaderboard, entropy_rng());
    game.on_round_end(|stats| {
        web_sys::console::log_1(&JsValue::from_str(&format!(
            "round over: {} pts, {} wins / {} attempts",
            stats.score, stats.wins, stats.attempts
        )));
    });

    // A second start_game() replaces the previous shell; its timers die with it.
    let already_wired = SHELL.with(|cell| cell.borrow().is_some());
    let shell = Shell {
        game,
        root: root.clone(),
        doc: doc.clone(),
        tab: TitleTab::default(),
        countdown: None,
        feedback: None,
    };
    shell.render();
    SHELL.with(|cell| cell.replace(Some(shell)));

    if !already_wired {
        wire_events(&doc, &root)?;
    }
    Ok(())
}

/// Cancels timers and unmounts. Late timer callbacks find no shell and do nothing.
#[wasm_bindgen]
pub fn stop_game() {
    let shell = SHELL.with(|cell| cell.borrow_mut().take());
    if let Some(mut shell) = shell {
        shell.stop_timers();
        shell.game.teardown();
        shell.root.set_inner_html("");
    }
}

fn wire_events(doc: &Document, root: &Element) -> Result<(), JsValue> {
    // Click delegation: every interactive element carries data-action.
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            let Some(target) = evt.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                return;
            };
            let Ok(Some(el)) = target.closest("[data-action]") else {
                return;
            };
            if el.has_attribute("disabled") {
                return;
            }
            let action = el.get_attribute("data-action").unwrap_or_default();
            let value = el.get_attribute("data-value");
            if let Some(action) = Action::parse(&action, value.as_deref()) {
                dispatch(action);
            }
        }) as Box<dyn FnMut(_)>);
        root.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Keyboard: Enter on the title screen starts, shortcuts while playing.
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
            let key = evt.key();
            let screen_is_title = SHELL.with(|cell| {
                cell.borrow()
                    .as_ref()
                    .map(|s| matches!(s.game.screen(), Screen::Title))
            });
            let action = match screen_is_title {
                None => None,
                Some(true) => (key == "Enter").then_some(Action::Start),
                Some(false) => Action::from_key(&key),
            };
            if let Some(action) = action {
                evt.prevent_default();
                dispatch(action);
            }
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

fn dispatch(action: Action) {
    SHELL.with(|cell| {
        if let Some(shell) = cell.borrow_mut().as_mut() {
            if let Err(err) = shell.apply(action) {
                web_sys::console::error_1(&err);
            }
            shell.render();
        }
    });
}

fn on_tick() {
    SHELL.with(|cell| {
        if let Some(shell) = cell.borrow_mut().as_mut() {
            if shell.game.tick().is_some() {
                shell.stop_timers();
            }
            shell.render();
        }
    });
}

fn on_feedback_elapsed(ticket: AdvanceTicket) {
    SHELL.with(|cell| {
        if let Some(shell) = cell.borrow_mut().as_mut() {
            if shell.game.advance(ticket) {
                shell.render();
            }
        }
    });
}

impl Shell {
    fn apply(&mut self, action: Action) -> Result<(), JsValue> {
        match action {
            Action::Start => {
                let name = self.name_input().map(|input| input.value()).unwrap_or_default();
                // an empty name just leaves the player on the title screen
                if self.game.start_round(&name).is_ok() {
                    self.start_countdown()?;
                }
            }
            Action::Restart => {
                if self.game.restart().is_ok() {
                    self.start_countdown()?;
                }
            }
            Action::Home => {
                if let Err(err) = self.game.go_home() {
                    tracing::debug!(%err, "home ignored");
                }
                self.tab = TitleTab::default();
            }
            Action::Tab(tab) => self.tab = tab,
            Action::Left(op) => {
                self.game.select_left(op);
            }
            Action::Right(op) => {
                self.game.select_right(op);
            }
            Action::Digit(op) => {
                let left_taken = self
                    .game
                    .session()
                    .is_some_and(|s| s.draft().left.is_some());
                if left_taken {
                    self.game.select_right(op);
                } else {
                    self.game.select_left(op);
                }
            }
            Action::Operator(op) => {
                self.game.select_operator(op);
            }
            Action::Clear => {
                self.game.clear_draft();
            }
            Action::Submit => {
                if let Some(res) = self.game.submit() {
                    let delay = self.game.config().feedback_delay_ms;
                    let ticket = res.ticket;
                    self.feedback = Some(Timeout::start(delay, move || on_feedback_elapsed(ticket))?);
                }
            }
        }
        Ok(())
    }

    fn start_countdown(&mut self) -> Result<(), JsValue> {
        self.stop_timers();
        let period = self.game.config().tick_interval_ms;
        self.countdown = Some(Interval::start(period, on_tick)?);
        Ok(())
    }

    /// Cancels without dropping: this may run inside the interval's own callback.
    fn stop_timers(&mut self) {
        if let Some(c) = self.countdown.as_mut() {
            c.cancel();
        }
        if let Some(f) = self.feedback.as_mut() {
            f.cancel();
        }
    }

    fn render(&self) {
        // tab switches re-render the title screen; keep what was typed
        let typed = self.name_input().map(|input| input.value());
        self.root.set_inner_html(&render(&self.game, self.tab));
        if matches!(self.game.screen(), Screen::Title) {
            if let Some(input) = self.name_input() {
                if let Some(typed) = typed {
                    input.set_value(&typed);
                }
                if let Err(err) = input.focus() {
                    tracing::debug!(?err, "name input not focused");
                }
            }
        }
    }

    fn name_input(&self) -> Option<HtmlInputElement> {
        self.doc
            .get_element_by_id(view::NAME_INPUT_ID)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
    }
}
