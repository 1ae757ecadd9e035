// src/core/types.rs
use serde::{Deserialize, Serialize};

/// A 2D coordinate in the host's screen coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle: origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

/// A key label together with its hit rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyRect {
    pub label: String,
    #[serde(flatten)]
    pub rect: Rect,
}

impl KeyRect {
    pub fn new(label: impl Into<String>, rect: Rect) -> Self {
        Self { label: label.into(), rect }
    }
}

/// A single (word, frequency) pair as supplied by a dictionary source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub word: String,
    /// Always > 0 once accepted into a `Dictionary`.
    pub frequency: f64,
}

impl DictionaryEntry {
    pub fn new(word: impl Into<String>, frequency: f64) -> Self {
        Self { word: word.into(), frequency }
    }
}

/// A candidate word with its score breakdown. Higher `total` is better.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub word: String,
    /// Per-point Gaussian log-probability, non-positive.
    pub spatial: f64,
    /// Raw frequency used for the prior.
    pub frequency: f64,
    /// `spatial + ln(frequency + 1)`.
    pub total: f64,
}
