//! WASM bindings (feature `wasm`), for running the engine inside a browser
//! IME/keyboard host. One engine per worker thread via `thread_local!`,
//! matching the single-owner scheduling model (spec.md §5).

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use crate::SwipeEngine;

thread_local! {
    static ENGINE: RefCell<SwipeEngine> = RefCell::new(SwipeEngine::new());
}

#[wasm_bindgen]
pub fn load_layout(json: &str) -> bool {
    ENGINE.with(|e| e.borrow_mut().load_layout_from_str(json).is_ok())
}

#[wasm_bindgen]
pub fn load_dictionary(words_text: &str, freq_text: &str) -> bool {
    let freq = if freq_text.is_empty() { None } else { Some(freq_text) };
    ENGINE.with(|e| {
        let mut engine = e.borrow_mut();
        let lexicon = crate::lexicon::Lexicon::from_text(words_text, freq);
        let has_words = !lexicon.is_empty();
        engine.set_lexicon(lexicon);
        has_words
    })
}

/// `xs`/`ys` are parallel pixel-coordinate arrays. Returns the mapped key
/// sequence as a plain string (e.g. `"the"`), empty when nothing mapped.
#[wasm_bindgen]
pub fn map_path_to_sequence(xs: &[f64], ys: &[f64]) -> String {
    let path: Vec<swipe_types::Point> =
        xs.iter().zip(ys).map(|(&x, &y)| swipe_types::Point::new(x, y)).collect();
    ENGINE.with(|e| e.borrow().map_path_to_sequence(&path).into_iter().collect())
}

/// Returns a JSON array of candidates. `previous_word` empty means "none".
#[wasm_bindgen]
pub fn generate_candidates(key_seq: &str, previous_word: &str) -> String {
    let seq: Vec<char> = key_seq.chars().collect();
    let prev = if previous_word.is_empty() { None } else { Some(previous_word) };
    ENGINE.with(|e| {
        let candidates = e.borrow().generate_candidates(&seq, prev);
        serde_json::to_string(&candidates).unwrap_or_else(|_| "[]".to_string())
    })
}

#[wasm_bindgen]
pub fn record_commit(word: &str, previous_word: &str) {
    let prev = if previous_word.is_empty() { None } else { Some(previous_word) };
    ENGINE.with(|e| e.borrow().record_commit(word, prev));
}

#[wasm_bindgen]
pub fn reset() -> bool {
    ENGINE.with(|e| e.borrow().reset_user_data().is_ok())
}
