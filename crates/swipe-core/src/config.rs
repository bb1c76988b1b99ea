//! Every tunable constant in the engine, in one place (design note in
//! spec.md §9: "any tuning campaign needs one place to edit"). Grouped by
//! the component each group implements.

// --- Layout (spec.md §4.1) ---

/// Nominal key width in pixels when the layout document omits `keyUnit`.
pub const DEFAULT_KEY_UNIT: f64 = 60.0;
/// Key row height in pixels when the layout document omits `keyHeight`.
pub const DEFAULT_KEY_HEIGHT: f64 = 50.0;
/// Gap between keys in pixels when the layout document omits `keySpacing`.
pub const DEFAULT_KEY_SPACING: f64 = 6.0;
/// Key width, in key-units, when a key omits `w`.
pub const DEFAULT_KEY_WIDTH: f64 = 1.0;
/// Neighbor radius, as a multiple of `keyUnit`: two alphabetic keys are
/// neighbors when their centroids are within `NEIGHBOR_RADIUS_FACTOR *
/// keyUnit` of each other (spec.md §3: "≈ 90 px default" at keyUnit = 60).
pub const NEIGHBOR_RADIUS_FACTOR: f64 = 1.5;

// --- Path Mapper (spec.md §4.3) ---

/// Samples farther than this from every key's centroid (when no bounding
/// rectangle claims them) are off-keyboard noise and are dropped.
pub const OFF_KEYBOARD_DISTANCE_PX: f64 = 100.0;
/// Distance-ratio rule: `dist(sample, best) < DISTANCE_RATIO_THRESHOLD *
/// dist(sample, current)` is half of the two-part test for accepting a key
/// switch away from hysteresis.
pub const DISTANCE_RATIO_THRESHOLD: f64 = 0.8;
/// Distance-ratio rule, other half: the absolute gap between the distance
/// to `current` and the distance to `best` must exceed this many pixels.
pub const DISTANCE_GAP_MIN_PX: f64 = 8.0;
/// Consecutive-observation rule: accept a switch once the same non-current
/// best key has been observed this many samples in a row.
pub const CONSECUTIVE_SAMPLES_THRESHOLD: usize = 3;
/// Bounce removal: an A, B, A run collapses to A when B's dwell is below
/// this count.
pub const MIN_DWELL_FOR_BOUNCE: usize = 2;

// --- Lexicon (spec.md §4.2) ---

/// Shortlist length tolerance: a dictionary entry is eligible when its
/// length differs from the key sequence length by at most this much.
pub const LENGTH_TOLERANCE: usize = 2;
/// Frequency used for a dictionary word absent from the frequency file.
pub const DEFAULT_FREQUENCY: u32 = 1000;

// --- Scorer (spec.md §4.4) ---

/// Levenshtein distance is capped here; a distance that would exceed this
/// short-circuits to `EDIT_DISTANCE_LIMIT + 1`.
pub const EDIT_DISTANCE_LIMIT: usize = 4;
/// Centroid distance (px) at which the spatial component bottoms out at
/// -1.0; `score = max(-1, 1 - avg_distance / SPATIAL_NORM_DISTANCE)`.
pub const SPATIAL_NORM_DISTANCE: f64 = 150.0;

/// Composite score weights (spec.md §4.4). `W_EDIT_DISTANCE` is the only
/// negative weight — distance is a penalty, everything else is a reward.
pub const W_EDIT_DISTANCE: f64 = -2.0;
pub const W_BIGRAM_OVERLAP: f64 = 0.5;
pub const W_FREQUENCY: f64 = 1.0;
pub const W_SPATIAL: f64 = 1.0;

// --- Candidate Generator (spec.md §4.5) ---

pub const MIN_KEY_SEQUENCE_LENGTH: usize = 2;
/// Candidates scoring below this are dropped before sort/truncate. Tuned
/// against the weights above so that anything needing 2+ edits without
/// strong frequency/bigram support is filtered (an edit distance of 2 costs
/// `2 * W_EDIT_DISTANCE = -4.0`, already below this floor).
pub const MIN_CANDIDATE_SCORE: f64 = -3.5;
pub const MAX_CANDIDATES: usize = 8;

// --- User Data Store (spec.md §4.6) ---

pub const MAX_UNIGRAMS: usize = 10_000;
pub const MAX_BIGRAMS: usize = 5_000;
/// Fraction of (by-frequency) entries kept when a pruning pass triggers.
pub const PRUNE_RETAIN_FRACTION: f64 = 0.9;
/// Per-load decay multiplier; entries at or below 1 after decay are
/// dropped.
pub const DECAY_FACTOR: f64 = 0.95;
pub const AUTO_SAVE_INTERVAL: u32 = 10;
pub const UNIGRAM_WEIGHT: f64 = 1.0;
pub const BIGRAM_WEIGHT: f64 = 1.5;
/// Separator between the previous and current word in a bigram key. Words
/// cannot contain it (ASCII-letter-and-apostrophe tokenization only).
pub const BIGRAM_SEPARATOR: char = '|';

/// Binary persistence format (spec.md §4.6).
pub const USER_DATA_MAGIC: &[u8; 4] = b"MKLD";
pub const USER_DATA_VERSION: u8 = 1;
pub const MAX_UNIGRAM_RECORD_BYTES: usize = 100;
pub const MAX_BIGRAM_RECORD_BYTES: usize = 200;
