//! Path Mapper (spec.md §4.3): noisy sample stream -> clean alphabetic key
//! sequence, via hysteresis, dwell tracking, and bounce removal.
//!
//! This is the hardest part of the engine: raw samples chatter between
//! adjacent keys near a shared boundary, and users briefly clip through a
//! key between two intended ones. The four phases below exist to absorb
//! both without losing genuine short taps.

use swipe_types::{Key, Point};

use crate::config::{
    CONSECUTIVE_SAMPLES_THRESHOLD, DISTANCE_GAP_MIN_PX, DISTANCE_RATIO_THRESHOLD,
    MIN_DWELL_FOR_BOUNCE, OFF_KEYBOARD_DISTANCE_PX,
};
use crate::layout::Layout;

/// A run of consecutive identical key assignments produced by Phase 1 and
/// consumed by bounce removal. `dwell` is literally the number of
/// consecutive accepted samples assigned to this key (the glossary's
/// definition), not a count of emission events.
#[derive(Clone, Debug, PartialEq)]
struct Run {
    id: String,
    dwell: usize,
}

/// Map a raw sample path to a deduplicated alphabetic key sequence. Empty
/// path, empty layout, or no sample ever accepted all yield the empty
/// sequence — this never fails (spec.md §4.3, §7).
pub fn map_path_to_sequence(path: &[Point], layout: &Layout) -> Vec<char> {
    let keys: Vec<&Key> = layout.alphabetic_keys().collect();
    if path.is_empty() || keys.is_empty() {
        return Vec::new();
    }

    let emitted = phase1_assign_with_hysteresis(path, &keys);
    let runs = phase2_dwell_compress(&emitted);
    let bounced = phase3_remove_bounces(&runs);
    phase4_recollapse(&bounced)
}

struct Candidate<'a> {
    key: &'a Key,
    count: usize,
}

fn phase1_assign_with_hysteresis(path: &[Point], keys: &[&Key]) -> Vec<String> {
    let mut emitted = Vec::new();
    let mut current: Option<&Key> = None;
    let mut candidate: Option<Candidate> = None;

    for sample in path {
        let Some(best) = find_best_key(sample, keys) else {
            continue; // off-keyboard noise, drop silently
        };

        let Some(cur) = current else {
            current = Some(best);
            emitted.push(best.id.clone());
            continue;
        };

        if best.id == cur.id {
            candidate = None;
            emitted.push(cur.id.clone());
            continue;
        }

        let hard_hit = best.bounds.contains(sample);
        let dist_best = sample.distance(&best.centroid);
        let dist_current = sample.distance(&cur.centroid);
        let ratio_pass =
            dist_best < DISTANCE_RATIO_THRESHOLD * dist_current && (dist_current - dist_best) > DISTANCE_GAP_MIN_PX;

        let accept_switch = if hard_hit || ratio_pass {
            true
        } else {
            match &mut candidate {
                Some(c) if c.key.id == best.id => c.count += 1,
                _ => candidate = Some(Candidate { key: best, count: 1 }),
            }
            candidate.as_ref().is_some_and(|c| c.count >= CONSECUTIVE_SAMPLES_THRESHOLD)
        };

        if accept_switch {
            current = Some(best);
            candidate = None;
        }

        emitted.push(current.unwrap().id.clone());
    }

    tracing::debug!(accepted_samples = emitted.len(), total_samples = path.len(), "phase 1 assignment complete");
    emitted
}

/// `best` per spec.md §4.3: a bounding-box hit wins immediately; otherwise
/// the smallest squared centroid distance wins. Ties keep the
/// layout-iteration-order winner (deterministic). Samples whose best
/// squared distance exceeds `OFF_KEYBOARD_DISTANCE_PX^2` are dropped.
fn find_best_key<'a>(sample: &Point, keys: &[&'a Key]) -> Option<&'a Key> {
    if let Some(hit) = keys.iter().find(|k| k.bounds.contains(sample)) {
        return Some(hit);
    }

    let mut best: Option<(&Key, f64)> = None;
    for &k in keys {
        let d = sample.squared_distance(&k.centroid);
        if best.is_none_or(|(_, bd)| d < bd) {
            best = Some((k, d));
        }
    }

    let (key, dist_sq) = best?;
    let threshold_sq = OFF_KEYBOARD_DISTANCE_PX * OFF_KEYBOARD_DISTANCE_PX;
    if dist_sq > threshold_sq {
        None
    } else {
        Some(key)
    }
}

fn phase2_dwell_compress(emitted: &[String]) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();
    for id in emitted {
        match runs.last_mut() {
            Some(last) if &last.id == id => last.dwell += 1,
            _ => runs.push(Run { id: id.clone(), dwell: 1 }),
        }
    }
    runs
}

fn phase3_remove_bounces(runs: &[Run]) -> Vec<Run> {
    let mut result = Vec::new();
    let mut i = 0;
    while i < runs.len() {
        if i + 2 < runs.len() && runs[i].id == runs[i + 2].id && runs[i + 1].dwell < MIN_DWELL_FOR_BOUNCE {
            result.push(runs[i].clone());
            i += 2; // drop the middle run; the second A is reconsidered next iteration
        } else {
            result.push(runs[i].clone());
            i += 1;
        }
    }
    result
}

fn phase4_recollapse(runs: &[Run]) -> Vec<char> {
    let mut out: Vec<char> = Vec::new();
    for run in runs {
        if out.last().map(|c| c.to_string()) != Some(run.id.clone()) {
            // alphabetic key ids are always a single char (layout.rs enforces this)
            if let Some(c) = run.id.chars().next() {
                out.push(c);
            }
        }
    }
    out
}
