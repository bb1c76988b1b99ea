//! Dictionary storage, the 27-way prefix trie, and the first/last-letter
//! bucket index (spec.md §4.2). The trie is an arena (`Vec<TrieNode>`,
//! children addressed by index) rather than a pointer graph — cache
//! friendly, trivially serializable, no lifetime questions (spec.md §9).

use std::fs;
use std::path::Path;

use crate::config::{DEFAULT_FREQUENCY, LENGTH_TOLERANCE};
use crate::error::DictionaryLoadError;
use crate::normalize::{is_valid_word, lower_ascii};

/// One loaded dictionary word.
#[derive(Clone, Debug)]
pub struct DictEntry {
    pub word: String,
    pub freq: u32,
    pub len: usize,
    pub first: char,
    pub last: char,
}

const ALPHABET_SIZE: usize = 27; // a-z + apostrophe

fn child_slot(b: u8) -> Option<usize> {
    if b == b'\'' {
        Some(26)
    } else if b.is_ascii_lowercase() {
        Some((b - b'a') as usize)
    } else {
        None
    }
}

struct TrieNode {
    children: [Option<u32>; ALPHABET_SIZE],
    terminal_freq: Option<u32>,
}

impl TrieNode {
    fn empty() -> Self {
        Self { children: [None; ALPHABET_SIZE], terminal_freq: None }
    }
}

struct Trie {
    nodes: Vec<TrieNode>,
}

impl Trie {
    fn new() -> Self {
        Self { nodes: vec![TrieNode::empty()] }
    }

    fn insert(&mut self, word: &str, freq: u32) {
        let mut node_idx = 0usize;
        for b in word.bytes() {
            let Some(slot) = child_slot(b) else { return };
            node_idx = match self.nodes[node_idx].children[slot] {
                Some(next) => next as usize,
                None => {
                    self.nodes.push(TrieNode::empty());
                    let new_idx = (self.nodes.len() - 1) as u32;
                    self.nodes[node_idx].children[slot] = Some(new_idx);
                    new_idx as usize
                }
            };
        }
        self.nodes[node_idx].terminal_freq = Some(freq);
    }

    fn freq(&self, word: &str) -> Option<u32> {
        let mut node_idx = 0usize;
        for b in word.bytes() {
            let slot = child_slot(b)?;
            node_idx = self.nodes[node_idx].children[slot]? as usize;
        }
        self.nodes[node_idx].terminal_freq
    }

    fn contains(&self, word: &str) -> bool {
        self.freq(word).is_some()
    }
}

/// Bucket index keyed by (first letter, last letter), each holding the
/// dictionary indices of entries sharing that pair. Covers only `a`-`z`
/// (spec.md §9: apostrophe never appears as a first/last letter since any
/// word containing one is still alphabetic-with-apostrophe and the
/// first/last char of a valid word can itself be `'`, but the bucket grid
/// formalizes coverage to a-z per the design note).
struct BucketIndex {
    buckets: Vec<Vec<Vec<usize>>>, // [first][last] -> entry indices
}

impl BucketIndex {
    fn new() -> Self {
        Self { buckets: (0..26).map(|_| (0..26).map(|_| Vec::new()).collect()).collect() }
    }

    fn insert(&mut self, idx: usize, first: char, last: char) {
        if let (Some(f), Some(l)) = (letter_slot(first), letter_slot(last)) {
            self.buckets[f][l].push(idx);
        }
    }

    fn get(&self, first: char, last: char) -> Option<&[usize]> {
        let f = letter_slot(first)?;
        let l = letter_slot(last)?;
        Some(&self.buckets[f][l])
    }
}

fn letter_slot(c: char) -> Option<usize> {
    if c.is_ascii_lowercase() {
        Some((c as u8 - b'a') as usize)
    } else {
        None
    }
}

pub struct Lexicon {
    entries: Vec<DictEntry>,
    trie: Trie,
    buckets: BucketIndex,
}

impl Lexicon {
    pub fn load(words_path: impl AsRef<Path>, freq_path: Option<&Path>) -> Result<Self, DictionaryLoadError> {
        let words_path = words_path.as_ref();
        let words_text = fs::read_to_string(words_path).map_err(|source| DictionaryLoadError::Io {
            path: words_path.display().to_string(),
            source,
        })?;
        let freq_text = match freq_path {
            Some(p) => fs::read_to_string(p).ok(),
            None => None,
        };
        Ok(Self::from_text(&words_text, freq_text.as_deref()))
    }

    pub fn from_text(words_text: &str, freq_text: Option<&str>) -> Self {
        let freqs = parse_frequencies(freq_text.unwrap_or(""));

        let mut entries = Vec::new();
        let mut trie = Trie::new();
        let mut buckets = BucketIndex::new();

        for line in words_text.lines() {
            let word = lower_ascii(line.trim());
            if !is_valid_word(&word) {
                continue;
            }
            let freq = freqs.get(&word).copied().unwrap_or(DEFAULT_FREQUENCY);
            let mut chars = word.chars();
            let first = chars.next().unwrap();
            let last = word.chars().last().unwrap();
            let idx = entries.len();

            trie.insert(&word, freq);
            buckets.insert(idx, first, last);
            entries.push(DictEntry { word: word.clone(), freq, len: word.chars().count(), first, last });
        }

        tracing::info!(word_count = entries.len(), "loaded dictionary");
        Self { entries, trie, buckets }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, idx: usize) -> &DictEntry {
        &self.entries[idx]
    }

    pub fn contains(&self, word: &str) -> bool {
        self.trie.contains(&lower_ascii(word))
    }

    pub fn frequency(&self, word: &str) -> Option<u32> {
        self.trie.freq(&lower_ascii(word))
    }

    /// Shortlist query (spec.md §4.2): entries whose first/last letter match
    /// the key sequence's endpoints and whose length is within
    /// `LENGTH_TOLERANCE` of the sequence length. Empty or non-alphabetic
    /// endpoints yield an empty shortlist.
    pub fn shortlist(&self, key_sequence: &[char]) -> Vec<usize> {
        if key_sequence.len() < 2 {
            return Vec::new();
        }
        let first = key_sequence[0];
        let last = *key_sequence.last().unwrap();
        if !first.is_ascii_lowercase() || !last.is_ascii_lowercase() {
            return Vec::new();
        }
        let Some(candidates) = self.buckets.get(first, last) else {
            return Vec::new();
        };
        let seq_len = key_sequence.len();
        candidates
            .iter()
            .copied()
            .filter(|&idx| {
                let entry_len = self.entries[idx].len;
                entry_len.abs_diff(seq_len) <= LENGTH_TOLERANCE
            })
            .collect()
    }
}

fn parse_frequencies(text: &str) -> std::collections::HashMap<String, u32> {
    let mut map = std::collections::HashMap::new();
    for line in text.lines() {
        let Some((word, freq_str)) = line.split_once('\t') else { continue };
        let word = lower_ascii(word.trim());
        if let Ok(freq) = freq_str.trim().parse::<u32>() {
            map.insert(word, freq);
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_alphabetic_words() {
        let lex = Lexicon::from_text("the\nhello2\nworld\nfoo-bar\n", None);
        assert_eq!(lex.len(), 2);
        assert!(lex.contains("the"));
        assert!(lex.contains("world"));
        assert!(!lex.contains("hello2"));
    }

    #[test]
    fn missing_frequency_defaults_to_1000() {
        let lex = Lexicon::from_text("the\n", None);
        assert_eq!(lex.frequency("the"), Some(1000));
    }

    #[test]
    fn frequency_file_overrides_default() {
        let lex = Lexicon::from_text("the\nworld\n", Some("the\t50\n"));
        assert_eq!(lex.frequency("the"), Some(50));
        assert_eq!(lex.frequency("world"), Some(1000));
    }

    #[test]
    fn shortlist_filters_by_endpoints_and_length() {
        let lex = Lexicon::from_text("the\nhello\nhelp\nworld\ntree\n", None);
        let seq: Vec<char> = "the".chars().collect();
        let short = lex.shortlist(&seq);
        let words: Vec<&str> = short.iter().map(|&i| lex.entry(i).word.as_str()).collect();
        assert!(words.contains(&"the"));
        assert!(words.contains(&"tree"));
        assert!(!words.contains(&"hello"));
    }

    #[test]
    fn shortlist_empty_for_short_sequence() {
        let lex = Lexicon::from_text("the\n", None);
        assert!(lex.shortlist(&['t']).is_empty());
        assert!(lex.shortlist(&[]).is_empty());
    }

    #[test]
    fn apostrophe_mid_word_is_a_normal_bucket_entry() {
        let lex = Lexicon::from_text("don't\n", None);
        assert!(lex.contains("don't"));
        let short = lex.shortlist(&['d', 'o', 'n', 't']);
        assert!(short.iter().any(|&i| lex.entry(i).word == "don't"));
    }

    #[test]
    fn apostrophe_as_endpoint_never_matches_the_a_to_z_bucket_grid() {
        let lex = Lexicon::from_text("'tis\n", None);
        assert!(lex.contains("'tis"));
        assert!(lex.shortlist(&['\'', 't', 'i', 's']).is_empty());
    }
}
