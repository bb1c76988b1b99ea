//! Candidate Generator (spec.md §4.5): turn a mapped key sequence into a
//! ranked, truncated candidate list.

use swipe_types::Candidate;

use crate::config::{MAX_CANDIDATES, MIN_CANDIDATE_SCORE, MIN_KEY_SEQUENCE_LENGTH};
use crate::layout::Layout;
use crate::lexicon::Lexicon;
use crate::scorer;

/// Run the shortlist -> score -> filter -> sort -> truncate pipeline.
/// Sequences shorter than `MIN_KEY_SEQUENCE_LENGTH` yield no candidates.
/// `boost` is consulted per-word (spec.md §4.6's learning boost); pass a
/// function returning `0.0` to score without it.
pub fn generate_candidates(
    key_seq: &[char],
    lexicon: &Lexicon,
    layout: &Layout,
    boost: impl Fn(&str) -> f64,
) -> Vec<Candidate> {
    if key_seq.len() < MIN_KEY_SEQUENCE_LENGTH {
        return Vec::new();
    }

    let shortlist = lexicon.shortlist(key_seq);
    let mut candidates: Vec<Candidate> = shortlist
        .into_iter()
        .map(|idx| {
            let entry = lexicon.entry(idx);
            let components = scorer::score(key_seq, entry, layout);
            let score = components.score + boost(&entry.word);
            Candidate {
                word: entry.word.clone(),
                score,
                edit_distance: components.edit_distance,
                bigram_overlap: components.bigram_overlap,
                frequency_component: components.frequency_component,
                spatial_component: components.spatial_component,
            }
        })
        .filter(|c| c.score >= MIN_CANDIDATE_SCORE)
        .collect();

    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.word.len().cmp(&b.word.len()))
            .then_with(|| {
                let freq_a = lexicon.frequency(&a.word).unwrap_or(0);
                let freq_b = lexicon.frequency(&b.word).unwrap_or(0);
                freq_b.cmp(&freq_a)
            })
            .then_with(|| a.word.cmp(&b.word))
    });

    candidates.truncate(MAX_CANDIDATES);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qwerty() -> Layout {
        Layout::from_json_str(
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
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn short_sequence_yields_no_candidates() {
        let lexicon = Lexicon::from_text("the\n", None);
        let layout = qwerty();
        let seq: Vec<char> = vec!['t'];
        assert!(generate_candidates(&seq, &lexicon, &layout, |_| 0.0).is_empty());
    }

    #[test]
    fn exact_sequence_ranks_the_matching_word_first() {
        let lexicon = Lexicon::from_text("the\ntree\nthat\n", None);
        let layout = qwerty();
        let seq: Vec<char> = "the".chars().collect();
        let candidates = generate_candidates(&seq, &lexicon, &layout, |_| 0.0);
        assert!(!candidates.is_empty());
        assert_eq!(candidates[0].word, "the");
        assert_eq!(candidates[0].edit_distance, 0);
    }

    #[test]
    fn candidates_are_ordered_by_descending_score() {
        let lexicon = Lexicon::from_text("the\ntree\nthaw\n", None);
        let layout = qwerty();
        let seq: Vec<char> = "the".chars().collect();
        let candidates = generate_candidates(&seq, &lexicon, &layout, |_| 0.0);
        assert!(candidates.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn candidate_count_never_exceeds_max() {
        let words: String = (0..50).map(|i| format!("t{}e\n", "h".repeat(i % 3 + 1))).collect();
        let lexicon = Lexicon::from_text(&words, None);
        let layout = qwerty();
        let seq: Vec<char> = "the".chars().collect();
        let candidates = generate_candidates(&seq, &lexicon, &layout, |_| 0.0);
        assert!(candidates.len() <= MAX_CANDIDATES);
    }

    #[test]
    fn every_candidate_meets_the_score_threshold() {
        let lexicon = Lexicon::from_text("the\ntree\nthaw\nthrow\n", None);
        let layout = qwerty();
        let seq: Vec<char> = "the".chars().collect();
        let candidates = generate_candidates(&seq, &lexicon, &layout, |_| 0.0);
        assert!(candidates.iter().all(|c| c.score >= MIN_CANDIDATE_SCORE));
    }

    #[test]
    fn boost_function_raises_a_words_score() {
        let lexicon = Lexicon::from_text("help\nhelm\n", None);
        let layout = qwerty();
        let seq: Vec<char> = "hekp".chars().collect();
        let baseline = generate_candidates(&seq, &lexicon, &layout, |_| 0.0);
        let boosted = generate_candidates(&seq, &lexicon, &layout, |w| if w == "help" { 5.0 } else { 0.0 });
        let help_baseline = baseline.iter().find(|c| c.word == "help").unwrap().score;
        let help_boosted = boosted.iter().find(|c| c.word == "help").unwrap().score;
        assert!(help_boosted > help_baseline);
    }
}
