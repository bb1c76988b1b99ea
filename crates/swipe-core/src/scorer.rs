//! Candidate scoring (spec.md §4.4): bounded-cost edit distance, bigram
//! overlap, frequency, and spatial proximity, combined into one composite.

use std::collections::HashSet;

use crate::config::{
    EDIT_DISTANCE_LIMIT, SPATIAL_NORM_DISTANCE, W_BIGRAM_OVERLAP, W_EDIT_DISTANCE, W_FREQUENCY,
    W_SPATIAL,
};
use crate::layout::Layout;
use crate::lexicon::DictEntry;

/// Per-component diagnostics plus the composite, mirroring
/// `swipe_types::Candidate` but keyed on score alone (word is attached by
/// the caller).
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreComponents {
    pub edit_distance: usize,
    pub bigram_overlap: usize,
    pub frequency_component: f64,
    pub spatial_component: f64,
    pub score: f64,
}

/// Score one dictionary entry against a mapped key sequence.
pub fn score(key_seq: &[char], entry: &DictEntry, layout: &Layout) -> ScoreComponents {
    let edit_distance = edit_distance(key_seq, &entry.word);
    let bigram_overlap = bigram_overlap(key_seq, &entry.word);
    let frequency_component = (1.0 + 1000.0 / (entry.freq as f64 + 1.0)).ln();
    let spatial_component = spatial_component(key_seq, &entry.word, layout);

    let score = W_EDIT_DISTANCE * edit_distance as f64
        + W_BIGRAM_OVERLAP * bigram_overlap as f64
        + W_FREQUENCY * frequency_component
        + W_SPATIAL * spatial_component;

    ScoreComponents { edit_distance, bigram_overlap, frequency_component, spatial_component, score }
}

/// Classical Levenshtein distance between `a` and `b`, case already folded
/// by callers. Short-circuits to `EDIT_DISTANCE_LIMIT + 1` on a length gap
/// larger than the limit, or as soon as an entire DP row exceeds it.
pub fn edit_distance(a: &[char], b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    if a.len().abs_diff(b.len()) > EDIT_DISTANCE_LIMIT {
        return EDIT_DISTANCE_LIMIT + 1;
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    for i in 1..=a.len() {
        let mut cur = vec![0usize; b.len() + 1];
        cur[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            cur[j] = (prev[j] + 1).min(cur[j - 1] + 1).min(prev[j - 1] + cost);
        }
        if *cur.iter().min().unwrap() > EDIT_DISTANCE_LIMIT {
            return EDIT_DISTANCE_LIMIT + 1;
        }
        prev = cur;
    }
    prev[b.len()]
}

/// Distinct letter-letter bigram set intersection cardinality.
pub fn bigram_overlap(a: &[char], b: &str) -> usize {
    let bigrams_a = letter_bigrams(a.iter().copied());
    let bigrams_b = letter_bigrams(b.chars());
    bigrams_a.intersection(&bigrams_b).count()
}

fn letter_bigrams(chars: impl Iterator<Item = char>) -> HashSet<(char, char)> {
    let chars: Vec<char> = chars.collect();
    chars
        .windows(2)
        .filter(|pair| pair[0].is_ascii_alphabetic() && pair[1].is_ascii_alphabetic())
        .map(|pair| (pair[0], pair[1]))
        .collect()
}

/// Length-aligning cursor walk (spec.md §4.4): advance whichever side has
/// more characters left, both on a tie, summing centroid distance between
/// matched letters. 0 when no pair had keys on the layout for both sides.
fn spatial_component(key_seq: &[char], word: &str, layout: &Layout) -> f64 {
    let word_chars: Vec<char> = word.chars().collect();
    let (mut i, mut j) = (0usize, 0usize);
    let mut sum = 0.0;
    let mut matched = 0usize;

    while i < key_seq.len() && j < word_chars.len() {
        let a = layout.key(&key_seq[i].to_string());
        let b = layout.key(&word_chars[j].to_string());
        if let (Some(ka), Some(kb)) = (a, b) {
            sum += ka.centroid.distance(&kb.centroid);
            matched += 1;
        }

        let remaining_i = key_seq.len() - i - 1;
        let remaining_j = word_chars.len() - j - 1;
        match remaining_i.cmp(&remaining_j) {
            std::cmp::Ordering::Greater => i += 1,
            std::cmp::Ordering::Less => j += 1,
            std::cmp::Ordering::Equal => {
                i += 1;
                j += 1;
            }
        }
    }

    if matched == 0 {
        return 0.0;
    }
    (1.0 - (sum / matched as f64) / SPATIAL_NORM_DISTANCE).max(-1.0)
}
