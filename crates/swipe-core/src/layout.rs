//! Keyboard layout loading and the derived neighbor map (spec.md §4.1).

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use swipe_types::{Key, Point, RawLayout, Rect};

use crate::config::NEIGHBOR_RADIUS_FACTOR;
use crate::error::LayoutLoadError;
use crate::normalize::lower_ascii;

/// A loaded, immutable keyboard geometry plus its neighbor graph.
pub struct Layout {
    keys: Vec<Key>,
    by_id: HashMap<String, usize>,
    /// Alphabetic-key-id -> sorted alphabetic neighbor ids, within
    /// `NEIGHBOR_RADIUS_FACTOR * keyUnit` of the key's centroid.
    neighbors: HashMap<String, Vec<String>>,
}

impl Layout {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LayoutLoadError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| LayoutLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(src: &str) -> Result<Self, LayoutLoadError> {
        let raw: RawLayout = serde_json::from_str(src)?;
        Self::build(raw)
    }

    fn build(raw: RawLayout) -> Result<Self, LayoutLoadError> {
        let key_unit = raw.key_unit;
        let key_height = raw.key_height;
        let key_spacing = raw.key_spacing;

        let mut keys = Vec::new();
        for row in &raw.rows {
            let mut cursor_x = row.offset;
            for raw_key in &row.keys {
                let x = raw_key.x.unwrap_or(cursor_x);
                let w = raw_key.w;
                cursor_x = x + w;

                let bounds = Rect {
                    x: x * key_unit + x.floor() * key_spacing,
                    y: row.y as f64 * (key_height + key_spacing),
                    w: w * key_unit + (w - 1.0).max(0.0) * key_spacing,
                    h: key_height,
                };
                let centroid = bounds.centroid();
                let alphabetic = !raw_key.special && !raw_key.action && is_alphabetic_code(&raw_key.code);
                let id = if alphabetic {
                    lower_ascii(&raw_key.code)
                } else {
                    raw_key.code.clone()
                };

                keys.push(Key { id, bounds, centroid, alphabetic });
            }
        }

        if keys.is_empty() {
            return Err(LayoutLoadError::Empty);
        }

        let mut by_id = HashMap::with_capacity(keys.len());
        for (idx, key) in keys.iter().enumerate() {
            by_id.insert(key.id.clone(), idx);
        }

        let radius = NEIGHBOR_RADIUS_FACTOR * key_unit;
        let neighbors = build_neighbor_map(&keys, radius);

        tracing::info!(key_count = keys.len(), "loaded keyboard layout");
        Ok(Self { keys, by_id, neighbors })
    }

    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    pub fn key(&self, id: &str) -> Option<&Key> {
        self.by_id.get(id).map(|&idx| &self.keys[idx])
    }

    /// Sorted alphabetic neighbor ids for an alphabetic key; empty for
    /// special keys or unknown ids.
    pub fn neighbors(&self, id: &str) -> &[String] {
        self.neighbors.get(id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn alphabetic_keys(&self) -> impl Iterator<Item = &Key> {
        self.keys.iter().filter(|k| k.alphabetic)
    }
}

fn is_alphabetic_code(code: &str) -> bool {
    let mut chars = code.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.is_ascii_alphabetic() || c == '\'',
        _ => false,
    }
}

fn build_neighbor_map(keys: &[Key], radius: f64) -> HashMap<String, Vec<String>> {
    let alphabetic: Vec<&Key> = keys.iter().filter(|k| k.alphabetic).collect();
    let mut map = HashMap::with_capacity(alphabetic.len());

    for key in &alphabetic {
        let mut neighbor_ids: Vec<String> = alphabetic
            .iter()
            .filter(|other| other.id != key.id && other.centroid.distance(&key.centroid) <= radius)
            .map(|other| other.id.clone())
            .collect();
        neighbor_ids.sort();
        map.insert(key.id.clone(), neighbor_ids);
    }

    map
}
