// src/core/mod.rs
//! Decoding pipeline, leaf components first.

pub mod geometry;
pub mod types;

pub mod candidates;
pub mod dictionary;
pub mod frequency;
pub mod layout;
pub mod path;
pub mod ranker;
pub mod scorer;

pub mod engine;
