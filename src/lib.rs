// src/lib.rs
//! Swipe typing decoder.
//!
//! Turns a finished finger-swipe path over a soft keyboard into the most
//! likely intended word. Candidates are pruned by start key, end key and an
//! estimated length, scored against the ideal path through their key centers
//! with a Gaussian spatial model, and combined with a log-frequency prior.

pub mod config;
pub mod core;
pub mod lexicon;
pub mod persistence;

pub use crate::config::DecoderConfig;
pub use crate::core::dictionary::{Dictionary, DictionaryCache, DictionaryProvider};
pub use crate::core::engine::{decode, DecodeTicket, Decoder};
pub use crate::core::layout::KeyLayout;
pub use crate::core::types::{DictionaryEntry, KeyRect, Point, Rect, ScoredCandidate};

/// Result type alias for the decoder library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building the decoder's inputs.
///
/// Decoding itself never fails; these only surface when constructing a
/// dictionary or layout, loading configuration, or reading snapshots.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("duplicate dictionary word: {0}")]
    DuplicateWord(String),

    #[error("invalid dictionary word {0:?}: expected lowercase letters only")]
    InvalidWord(String),

    #[error("duplicate key label in layout: {0}")]
    DuplicateKey(String),

    #[error("key {0:?} has a zero-area rectangle")]
    DegenerateKey(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("dictionary provider error: {0}")]
    Provider(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot encoding error: {0}")]
    Snapshot(#[from] bincode::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}
