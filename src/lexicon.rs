// File: src/lexicon.rs
//! Dictionary sources.
//!
//! The decoder only sees `(word, frequency)` pairs; these providers turn the
//! host's lexicons into such pairs. Word lists are plain newline-delimited
//! lowercase words, optionally followed by a frequency column.

use crate::core::dictionary::{Dictionary, DictionaryProvider};
use crate::core::frequency::HeuristicFrequency;
use crate::core::types::DictionaryEntry;
use crate::persistence::SnapshotProvider;
use crate::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Fallback vocabulary shipped with the crate.
const BUNDLED_WORDS: &str = include_str!("../assets/words.txt");

/// Parses a word list into entries.
///
/// Blank lines and `#` comments are skipped. A line is `word` or
/// `word <whitespace> frequency`; without a usable count (missing, unreadable,
/// or not a finite positive number) the frequency comes from
/// `HeuristicFrequency`. Lines that are not letters-only are skipped.
pub fn parse_word_list(text: &str) -> Vec<DictionaryEntry> {
    let heuristic = HeuristicFrequency;
    let mut entries = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.split_whitespace();
        let Some(raw_word) = fields.next() else {
            continue;
        };
        let word = raw_word.to_ascii_lowercase();
        if !word.chars().all(|c| c.is_ascii_lowercase()) {
            warn!(line = line_no + 1, word = raw_word, "skipping non-letter word list entry");
            continue;
        }

        let frequency = match fields.next().map(str::parse::<f64>) {
            Some(Ok(count)) if count.is_finite() && count > 0.0 => count,
            Some(_) => {
                warn!(line = line_no + 1, word = raw_word, "unusable frequency, using heuristic");
                heuristic.score(&word)
            }
            None => heuristic.score(&word),
        };
        entries.push(DictionaryEntry::new(word, frequency));
    }
    entries
}

/// A word list file on disk, read on every load.
#[derive(Debug, Clone)]
pub struct WordListProvider {
    path: PathBuf,
    name: String,
}

impl WordListProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = format!("word list {}", path.display());
        Self { path, name }
    }
}

impl DictionaryProvider for WordListProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn entries(&self) -> Result<Vec<DictionaryEntry>> {
        let text = fs::read_to_string(&self.path)?;
        Ok(parse_word_list(&text))
    }
}

/// The word list compiled into the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledWordList;

impl DictionaryProvider for BundledWordList {
    fn name(&self) -> &str {
        "bundled word list"
    }

    fn entries(&self) -> Result<Vec<DictionaryEntry>> {
        Ok(parse_word_list(BUNDLED_WORDS))
    }
}

/// Entries held in memory, e.g. a lexicon the host already fetched.
#[derive(Debug, Clone)]
pub struct StaticProvider {
    name: String,
    entries: Vec<DictionaryEntry>,
}

impl StaticProvider {
    pub fn new(name: impl Into<String>, entries: Vec<DictionaryEntry>) -> Self {
        Self { name: name.into(), entries }
    }
}

impl DictionaryProvider for StaticProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn entries(&self) -> Result<Vec<DictionaryEntry>> {
        Ok(self.entries.clone())
    }
}

/// Several sources folded into one, e.g. bundled list plus the platform's
/// personal lexicon. Overlapping words keep their highest frequency.
pub struct MergedProvider {
    sources: Vec<Box<dyn DictionaryProvider>>,
}

impl MergedProvider {
    pub fn new() -> Self {
        Self { sources: Vec::new() }
    }

    pub fn with_source(mut self, source: impl DictionaryProvider + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl Default for MergedProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DictionaryProvider for MergedProvider {
    fn name(&self) -> &str {
        "merged sources"
    }

    fn entries(&self) -> Result<Vec<DictionaryEntry>> {
        Ok(self.load()?.entries())
    }

    fn load(&self) -> Result<Dictionary> {
        let sources = self
            .sources
            .iter()
            .map(|source| source.entries())
            .collect::<Result<Vec<_>>>()?;
        Dictionary::merge(sources)
    }
}

/// The usual host setup: a compiled snapshot when one exists (otherwise the
/// bundled list), plus an optional user word list on top.
pub fn default_sources(word_list: Option<&Path>, snapshot: Option<&Path>) -> MergedProvider {
    let mut merged = MergedProvider::new();
    match snapshot.filter(|path| path.exists()) {
        Some(path) => merged = merged.with_source(SnapshotProvider::new(path)),
        None => merged = merged.with_source(BundledWordList),
    }
    if let Some(path) = word_list {
        merged = merged.with_source(WordListProvider::new(path));
    }
    merged
}
