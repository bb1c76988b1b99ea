//! User Data Store (spec.md §4.6): per-user unigram/bigram counters with
//! decay, pruning, a fixed binary persistence format, and boost lookup.
//! Corruption never surfaces as an error — a bad file degrades to an empty
//! store and is only logged (spec.md §7: "User-data corruption is silently
//! absorbed").

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::config::{
    AUTO_SAVE_INTERVAL, BIGRAM_SEPARATOR, BIGRAM_WEIGHT, DECAY_FACTOR, MAX_BIGRAMS,
    MAX_BIGRAM_RECORD_BYTES, MAX_UNIGRAMS, MAX_UNIGRAM_RECORD_BYTES, PRUNE_RETAIN_FRACTION,
    UNIGRAM_WEIGHT, USER_DATA_MAGIC, USER_DATA_VERSION,
};
use crate::error::UserDataLoadError;
use crate::normalize::lower_ascii;

/// A counter's frequency plus the order it was first inserted in, so pruning
/// can break frequency ties by insertion order (spec.md §3) instead of
/// `HashMap` iteration order.
#[derive(Clone, Copy)]
struct Counter {
    count: u32,
    seq: u64,
}

struct Counters {
    unigrams: HashMap<String, Counter>,
    bigrams: HashMap<String, Counter>,
    last_word: Option<String>,
    commits_since_save: u32,
    next_seq: u64,
}

impl Counters {
    fn empty() -> Self {
        Self {
            unigrams: HashMap::new(),
            bigrams: HashMap::new(),
            last_word: None,
            commits_since_save: 0,
            next_seq: 0,
        }
    }
}

/// Increment `key`'s count in `map`, assigning it the next insertion
/// ordinal the first time it is seen.
fn bump(map: &mut HashMap<String, Counter>, next_seq: &mut u64, key: String) {
    use std::collections::hash_map::Entry;
    match map.entry(key) {
        Entry::Occupied(mut e) => e.get_mut().count += 1,
        Entry::Vacant(e) => {
            let seq = *next_seq;
            *next_seq += 1;
            e.insert(Counter { count: 1, seq });
        }
    }
}

/// Thread-safe unigram/bigram learning store, one per loaded `path`.
pub struct UserDataStore {
    path: Option<PathBuf>,
    state: Mutex<Counters>,
}

impl UserDataStore {
    /// Start with no persisted state (in-memory only; `save` is a no-op).
    pub fn empty() -> Self {
        Self { path: None, state: Mutex::new(Counters::empty()) }
    }

    /// Load from `path` if present; any corruption degrades to an empty
    /// store (logged, never returned).
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let counters = match fs::read(&path) {
            Ok(bytes) => match decode(&bytes) {
                Ok(mut counters) => {
                    decay(&mut counters);
                    counters
                }
                Err(err) => {
                    tracing::warn!(?err, path = %path.display(), "discarding corrupt user data");
                    Counters::empty()
                }
            },
            Err(_) => Counters::empty(),
        };
        Self { path: Some(path), state: Mutex::new(counters) }
    }

    /// Record a committed word, case-folding both operands. `previous`
    /// overrides the remembered last word when supplied.
    pub fn record_commit(&self, word: &str, previous: Option<&str>) {
        let word = lower_ascii(word);
        let mut state = self.state.lock().unwrap();

        bump(&mut state.unigrams, &mut state.next_seq, word.clone());
        prune_if_needed(&mut state.unigrams, MAX_UNIGRAMS);

        let prev = previous.map(lower_ascii).or_else(|| state.last_word.clone());
        if let Some(prev) = prev {
            let key = format!("{prev}{BIGRAM_SEPARATOR}{word}");
            bump(&mut state.bigrams, &mut state.next_seq, key);
            prune_if_needed(&mut state.bigrams, MAX_BIGRAMS);
        }
        state.last_word = Some(word);

        state.commits_since_save += 1;
        if state.commits_since_save >= AUTO_SAVE_INTERVAL {
            state.commits_since_save = 0;
            drop(state);
            if let Err(err) = self.save() {
                tracing::warn!(?err, "auto-save of user data failed");
            }
        }
    }

    /// `unigramBoost(w) = log(1 + count) * UNIGRAM_WEIGHT`; 0 when absent.
    pub fn unigram_boost(&self, word: &str) -> f64 {
        let word = lower_ascii(word);
        let state = self.state.lock().unwrap();
        state.unigrams.get(&word).map(|c| ((1 + c.count) as f64).ln() * UNIGRAM_WEIGHT).unwrap_or(0.0)
    }

    /// `bigramBoost(w, prev) = log(1 + count) * BIGRAM_WEIGHT`; 0 when
    /// absent or `prev` empty.
    pub fn bigram_boost(&self, word: &str, previous: &str) -> f64 {
        if previous.is_empty() {
            return 0.0;
        }
        let key = format!("{}{BIGRAM_SEPARATOR}{}", lower_ascii(previous), lower_ascii(word));
        let state = self.state.lock().unwrap();
        state.bigrams.get(&key).map(|c| ((1 + c.count) as f64).ln() * BIGRAM_WEIGHT).unwrap_or(0.0)
    }

    /// Sum of both boosts; substitutes the remembered last word when
    /// `previous` is `None`.
    pub fn learning_boost(&self, word: &str, previous: Option<&str>) -> f64 {
        let prev = previous.map(str::to_string).or_else(|| self.state.lock().unwrap().last_word.clone());
        let bigram = prev.as_deref().map(|p| self.bigram_boost(word, p)).unwrap_or(0.0);
        self.unigram_boost(word) + bigram
    }

    /// Persist the current counters to `path`. A no-op (`Ok`) when no path
    /// was supplied at construction.
    pub fn save(&self) -> std::io::Result<()> {
        let Some(path) = &self.path else { return Ok(()) };
        let state = self.state.lock().unwrap();
        let bytes = encode(&state);
        fs::write(path, bytes)
    }

    /// Clear in-memory counters and remove the on-disk file, if any.
    pub fn reset(&self) -> std::io::Result<()> {
        *self.state.lock().unwrap() = Counters::empty();
        if let Some(path) = &self.path {
            match fs::remove_file(path) {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(err) => Err(err),
            }
        } else {
            Ok(())
        }
    }

    pub fn unigram_count(&self) -> usize {
        self.state.lock().unwrap().unigrams.len()
    }

    pub fn bigram_count(&self) -> usize {
        self.state.lock().unwrap().bigrams.len()
    }
}

/// Retain the top `PRUNE_RETAIN_FRACTION` by frequency once `limit` is
/// exceeded; ties broken by insertion order, then lexicographically
/// (spec.md §3).
fn prune_if_needed(map: &mut HashMap<String, Counter>, limit: usize) {
    if map.len() <= limit {
        return;
    }
    let keep = ((limit as f64) * PRUNE_RETAIN_FRACTION).round() as usize;
    let mut entries: Vec<(String, Counter)> = map.drain().collect();
    entries.sort_by(|a, b| {
        b.1.count.cmp(&a.1.count).then_with(|| a.1.seq.cmp(&b.1.seq)).then_with(|| a.0.cmp(&b.0))
    });
    entries.truncate(keep.max(1));
    map.extend(entries);
}

fn decay(counters: &mut Counters) {
    counters.unigrams.retain(|_, c| {
        c.count = (c.count as f64 * DECAY_FACTOR).floor() as u32;
        c.count > 1
    });
    counters.bigrams.retain(|_, c| {
        c.count = (c.count as f64 * DECAY_FACTOR).floor() as u32;
        c.count > 1
    });
}

fn encode(state: &Counters) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(USER_DATA_MAGIC);
    out.push(USER_DATA_VERSION);
    out.extend_from_slice(&(state.unigrams.len() as u32).to_le_bytes());

    // Written in insertion order (not alphabetical) so that `decode`, which
    // assigns `seq` by read order, reconstructs the same relative insertion
    // order used for the pruning tie-break (spec.md §3) on the next load.
    let mut unigrams: Vec<(&String, &Counter)> = state.unigrams.iter().collect();
    unigrams.sort_by_key(|(_, counter)| counter.seq);
    for (word, counter) in unigrams {
        write_record(&mut out, word, counter.count);
    }

    out.extend_from_slice(&(state.bigrams.len() as u32).to_le_bytes());
    let mut bigrams: Vec<(&String, &Counter)> = state.bigrams.iter().collect();
    bigrams.sort_by_key(|(_, counter)| counter.seq);
    for (word, counter) in bigrams {
        write_record(&mut out, word, counter.count);
    }

    out
}

fn write_record(out: &mut Vec<u8>, word: &str, freq: u32) {
    out.extend_from_slice(&(word.len() as u16).to_le_bytes());
    out.extend_from_slice(word.as_bytes());
    out.extend_from_slice(&freq.to_le_bytes());
}

fn decode(bytes: &[u8]) -> Result<Counters, UserDataLoadError> {
    if bytes.len() < USER_DATA_MAGIC.len() + 1 + 4 {
        return Err(UserDataLoadError::TruncatedHeader);
    }
    if &bytes[..4] != USER_DATA_MAGIC {
        return Err(UserDataLoadError::BadMagic);
    }
    let version = bytes[4];
    if version != USER_DATA_VERSION {
        return Err(UserDataLoadError::UnsupportedVersion(version));
    }

    let mut cursor = 5usize;
    let mut next_seq = 0u64;
    let unigrams = read_section(bytes, &mut cursor, MAX_UNIGRAM_RECORD_BYTES, &mut next_seq);
    let bigrams = read_section(bytes, &mut cursor, MAX_BIGRAM_RECORD_BYTES, &mut next_seq);

    Ok(Counters { unigrams, bigrams, last_word: None, commits_since_save: 0, next_seq })
}

/// Read one length-prefixed record section. Any record that fails sanity
/// checks or runs past the buffer silently terminates the section — the
/// records already read are kept, the rest are discarded (spec.md §4.6).
/// Records are assigned insertion order by their on-disk position, via
/// `next_seq`, shared across both sections so bigrams don't collide with
/// unigram ordinals.
fn read_section(
    bytes: &[u8],
    cursor: &mut usize,
    max_record_bytes: usize,
    next_seq: &mut u64,
) -> HashMap<String, Counter> {
    let mut map = HashMap::new();

    let Some(count_bytes) = bytes.get(*cursor..*cursor + 4) else { return map };
    let count = u32::from_le_bytes(count_bytes.try_into().unwrap());
    *cursor += 4;

    for _ in 0..count {
        let Some(len_bytes) = bytes.get(*cursor..*cursor + 2) else { break };
        let len = u16::from_le_bytes(len_bytes.try_into().unwrap()) as usize;
        if len == 0 || len > max_record_bytes {
            break;
        }
        let word_start = *cursor + 2;
        let word_end = word_start + len;
        let freq_end = word_end + 4;
        let Some(word_bytes) = bytes.get(word_start..word_end) else { break };
        let Some(freq_bytes) = bytes.get(word_end..freq_end) else { break };
        let Ok(word) = std::str::from_utf8(word_bytes) else { break };

        let count = u32::from_le_bytes(freq_bytes.try_into().unwrap());
        let seq = *next_seq;
        *next_seq += 1;
        map.insert(word.to_string(), Counter { count, seq });
        *cursor = freq_end;
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn commit_then_boost_reflects_the_count() {
        let store = UserDataStore::empty();
        store.record_commit("help", None);
        assert!(store.unigram_boost("help") > 0.0);
        assert_eq!(store.unigram_boost("missing"), 0.0);
    }

    #[test]
    fn bigram_boost_needs_a_previous_word() {
        let store = UserDataStore::empty();
        store.record_commit("help", Some("i"));
        assert!(store.bigram_boost("help", "i") > 0.0);
        assert_eq!(store.bigram_boost("help", ""), 0.0);
    }

    #[test]
    fn remembered_last_word_feeds_the_next_bigram() {
        let store = UserDataStore::empty();
        store.record_commit("i", None);
        store.record_commit("help", None);
        assert!(store.bigram_boost("help", "i") > 0.0);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("user.mkld");
        let store = UserDataStore::load(&path);
        // 3 commits so the counts survive load-time decay (floor(3 * 0.95) = 2,
        // which is > 1 and is kept); a single commit would decay to 0 and be
        // pruned, which is the scenario `count_one_entry_decays_away` covers.
        for _ in 0..3 {
            store.record_commit("help", Some("i"));
        }
        store.save().unwrap();

        let reloaded = UserDataStore::load(&path);
        assert!(reloaded.unigram_boost("help") > 0.0);
        assert!(reloaded.bigram_boost("help", "i") > 0.0);
    }

    #[test]
    fn count_one_entry_decays_away_on_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("user.mkld");
        let store = UserDataStore::load(&path);
        store.record_commit("help", Some("i"));
        store.save().unwrap();

        let reloaded = UserDataStore::load(&path);
        assert_eq!(reloaded.unigram_boost("help"), 0.0);
        assert_eq!(reloaded.bigram_boost("help", "i"), 0.0);
    }

    #[test]
    fn reset_clears_memory_and_deletes_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("user.mkld");
        let store = UserDataStore::load(&path);
        store.record_commit("help", None);
        store.save().unwrap();
        assert!(path.exists());

        store.reset().unwrap();
        assert_eq!(store.unigram_boost("help"), 0.0);
        assert!(!path.exists());
    }

    #[test]
    fn corrupt_file_degrades_to_empty_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("user.mkld");
        fs::write(&path, b"not the right format at all").unwrap();

        let store = UserDataStore::load(&path);
        assert_eq!(store.unigram_count(), 0);
        assert_eq!(store.bigram_count(), 0);
    }

    #[test]
    fn unigram_count_never_exceeds_the_cap() {
        let store = UserDataStore::empty();
        for i in 0..(MAX_UNIGRAMS + 50) {
            store.record_commit(&format!("word{i}"), None);
        }
        assert!(store.unigram_count() <= MAX_UNIGRAMS);
    }
}
