// Browser tests: `wasm-pack test --headless --chrome`.
// Native `cargo test` compiles this file to nothing.
#![cfg(target_arch = "wasm32")]

use guess_that_num::leaderboard::{BrowserStorage, KeyValueStore, Leaderboard};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const KEY: &str = "guess-that-num-leaderboard";

fn fresh_storage() -> BrowserStorage {
    let mut storage = BrowserStorage::open().expect("localStorage available in test browser");
    storage.set(KEY, "[]").unwrap();
    storage
}

#[wasm_bindgen_test]
fn local_storage_round_trips_the_board() {
    let mut lb = Leaderboard::new(fresh_storage());
    lb.record("ada", 120, 1, 2, 1, 1);
    lb.record("bo", 300, 3, 3, 3, 0);

    let reopened = Leaderboard::new(BrowserStorage::open().unwrap());
    let scores: Vec<u32> = reopened.load().iter().map(|e| e.score).collect();
    assert_eq!(scores, vec![300, 120]);
}

#[wasm_bindgen_test]
fn garbage_in_local_storage_loads_empty() {
    let mut storage = fresh_storage();
    storage.set(KEY, "definitely not json").unwrap();
    assert!(Leaderboard::new(storage).load().is_empty());
}

#[wasm_bindgen_test]
fn start_and_stop_mount_cleanly() {
    guess_that_num::start_game().unwrap();
    let doc = web_sys::window().unwrap().document().unwrap();
    let root = doc.get_element_by_id("gtn-root").unwrap();
    assert!(root.inner_html().contains("GUESS THAT NUM"));
    guess_that_num::stop_game();
    assert!(root.inner_html().is_empty());
}
