//! Engine Facade (spec.md §4.7): the single entry point hosts (CLI, FFI,
//! WASM) drive. Owns a `Layout`, a `Lexicon`, and a `UserDataStore`, and
//! wires the pipeline `points -> mapper -> candidates -> (boosted) ranking`.

use std::path::Path;

use swipe_types::{Candidate, Point};

use crate::error::{DictionaryLoadError, LayoutLoadError};
use crate::layout::Layout;
use crate::lexicon::Lexicon;
use crate::mapper;
use crate::user_data::UserDataStore;

/// Top-level engine. Not `Sync`-bound by design: a single owner per spec.md
/// §5 ("The engine is a single-owner library"); host layers add locking
/// where their threading model requires it (swipe-ffi, swipe-wasm).
pub struct SwipeEngine {
    layout: Option<Layout>,
    lexicon: Option<Lexicon>,
    user_data: UserDataStore,
}

impl Default for SwipeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SwipeEngine {
    pub fn new() -> Self {
        Self { layout: None, lexicon: None, user_data: UserDataStore::empty() }
    }

    /// Construct with a user-data file backing learning persistence.
    pub fn with_user_data_path(path: impl AsRef<Path>) -> Self {
        Self { layout: None, lexicon: None, user_data: UserDataStore::load(path) }
    }

    pub fn load_layout(&mut self, path: impl AsRef<Path>) -> Result<(), LayoutLoadError> {
        self.layout = Some(Layout::load(path)?);
        Ok(())
    }

    pub fn load_layout_from_str(&mut self, json: &str) -> Result<(), LayoutLoadError> {
        self.layout = Some(Layout::from_json_str(json)?);
        Ok(())
    }

    pub fn load_dictionary(
        &mut self,
        words_path: impl AsRef<Path>,
        freq_path: Option<&Path>,
    ) -> Result<(), DictionaryLoadError> {
        self.lexicon = Some(Lexicon::load(words_path, freq_path)?);
        Ok(())
    }

    /// Install an already-built lexicon directly (hosts without a
    /// filesystem, e.g. the WASM bindings, build one from in-memory text).
    pub fn set_lexicon(&mut self, lexicon: Lexicon) {
        self.lexicon = Some(lexicon);
    }

    /// Map a raw sample path to a deduplicated alphabetic key sequence.
    /// Returns the empty sequence when no layout is loaded (spec.md §7:
    /// mapping never fails).
    pub fn map_path_to_sequence(&self, path: &[Point]) -> Vec<char> {
        match &self.layout {
            Some(layout) => mapper::map_path_to_sequence(path, layout),
            None => Vec::new(),
        }
    }

    /// Generate ranked candidates for a key sequence, folding in the
    /// learning boost for each word. Returns empty when layout or
    /// dictionary is unloaded.
    pub fn generate_candidates(&self, key_seq: &[char], previous_word: Option<&str>) -> Vec<Candidate> {
        let (Some(layout), Some(lexicon)) = (&self.layout, &self.lexicon) else {
            return Vec::new();
        };
        crate::candidates::generate_candidates(key_seq, lexicon, layout, |word| {
            self.user_data.learning_boost(word, previous_word)
        })
    }

    /// Convenience: map then generate in one call.
    pub fn predict(&self, path: &[Point], previous_word: Option<&str>) -> Vec<Candidate> {
        let seq = self.map_path_to_sequence(path);
        self.generate_candidates(&seq, previous_word)
    }

    pub fn record_commit(&self, word: &str, previous_word: Option<&str>) {
        self.user_data.record_commit(word, previous_word);
    }

    pub fn save_user_data(&self) -> std::io::Result<()> {
        self.user_data.save()
    }

    pub fn reset_user_data(&self) -> std::io::Result<()> {
        self.user_data.reset()
    }

    /// Look up a key's centroid by id, for hosts that synthesize demo
    /// paths from typed text instead of real touch samples.
    pub fn key_centroid(&self, key_id: &str) -> Option<Point> {
        self.layout.as_ref()?.key(key_id).map(|k| k.centroid)
    }

    pub fn has_layout(&self) -> bool {
        self.layout.is_some()
    }

    pub fn has_dictionary(&self) -> bool {
        self.lexicon.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qwerty_json() -> &'static str {
        r#"{
            "keyUnit": 60, "keyHeight": 50, "keySpacing": 6,
            "rows": [
                {"y": 0, "offset": 0, "keys": [
                    {"code": "q"}, {"code": "w"}, {"code": "e"}, {"code": "r"},
                    {"code": "t"}, {"code": "y"}, {"code": "u"}, {"code": "i"},
                    {"code": "o"}, {"code": "p"}
                ]},
                {"y": 1, "offset": 0.5, "keys": [
                    {"code": "a"}, {"code": "s"}, {"code": "d"}, {"code": "f"},
                    {"code": "g"}, {"code": "h"}, {"code": "j"}, {"code": "k"}, {"code": "l"}
                ]}
            ]
        }"#
    }

    #[test]
    fn predict_without_layout_or_dictionary_is_empty() {
        let engine = SwipeEngine::new();
        assert!(engine.predict(&[Point::new(0.0, 0.0)], None).is_empty());
    }

    #[test]
    fn predict_end_to_end_on_an_exact_word() {
        let mut engine = SwipeEngine::new();
        engine.load_layout_from_str(qwerty_json()).unwrap();
        engine.lexicon = Some(Lexicon::from_text("the\ntree\n", None));

        let letters = ['t', 'h', 'e'];
        let path: Vec<Point> = {
            let layout = engine.layout.as_ref().unwrap();
            letters.iter().map(|c| layout.key(&c.to_string()).unwrap().centroid).collect()
        };

        let candidates = engine.predict(&path, None);
        assert_eq!(candidates[0].word, "the");
    }

    #[test]
    fn learning_boost_changes_ranking_after_commits() {
        let mut engine = SwipeEngine::new();
        engine.load_layout_from_str(qwerty_json()).unwrap();
        engine.lexicon = Some(Lexicon::from_text("help\nhelm\n", None));

        let seq: Vec<char> = "hekp".chars().collect();
        let before = engine.generate_candidates(&seq, Some("i"));
        let before_score = before.iter().find(|c| c.word == "help").unwrap().score;

        for _ in 0..5 {
            engine.record_commit("help", Some("i"));
        }

        let after = engine.generate_candidates(&seq, Some("i"));
        let after_score = after.iter().find(|c| c.word == "help").unwrap().score;
        assert!(after_score > before_score);
    }
}
