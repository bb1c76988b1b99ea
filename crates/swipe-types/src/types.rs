//! Shared types for the swipe-typing engine: geometry, the raw layout
//! document schema, and the result type returned to hosts.

use serde::{Deserialize, Serialize};

/// A 2D point in pixel space. Used both for sample points on the incoming
/// swipe path and for key centroids in the layout.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn squared_distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn distance(&self, other: &Point) -> f64 {
        self.squared_distance(other).sqrt()
    }
}

/// Axis-aligned bounding rectangle, in pixel units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn contains(&self, p: &Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }

    pub fn centroid(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// A single key on the loaded layout. Immutable after load.
#[derive(Clone, Debug)]
pub struct Key {
    pub id: String,
    pub bounds: Rect,
    pub centroid: Point,
    pub alphabetic: bool,
}

/// A candidate word produced by one `generateCandidates` call, carrying the
/// diagnostic component scores for telemetry/tuning. Never persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub word: String,
    pub score: f64,
    pub edit_distance: usize,
    pub bigram_overlap: usize,
    pub frequency_component: f64,
    pub spatial_component: f64,
}

// --- Raw layout document schema (§6: keyboard layout file) ---

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLayout {
    #[serde(default = "default_key_unit")]
    pub key_unit: f64,
    #[serde(default = "default_key_height")]
    pub key_height: f64,
    #[serde(default = "default_key_spacing")]
    pub key_spacing: f64,
    pub rows: Vec<RawRow>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRow {
    pub y: i64,
    #[serde(default)]
    pub offset: f64,
    pub keys: Vec<RawKey>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawKey {
    pub code: String,
    #[serde(default)]
    pub label: String,
    pub x: Option<f64>,
    #[serde(default = "default_key_width")]
    pub w: f64,
    #[serde(default)]
    pub special: bool,
    #[serde(default)]
    pub action: bool,
}

pub fn default_key_unit() -> f64 {
    60.0
}

pub fn default_key_height() -> f64 {
    50.0
}

pub fn default_key_spacing() -> f64 {
    6.0
}

pub fn default_key_width() -> f64 {
    1.0
}
