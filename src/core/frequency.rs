// src/core/frequency.rs
use crate::core::dictionary::Dictionary;

/// Prior used for the most common English words.
pub const HIGH_FREQUENCY: f64 = 1000.0;
/// Prior used for the next tier of common words.
pub const MEDIUM_FREQUENCY: f64 = 500.0;

const HIGH_FREQUENCY_WORDS: &[&str] = &[
    "the", "be", "to", "of", "and", "in", "that", "have", "it", "for", "not", "on", "with",
    "he", "as", "you", "do", "at", "this", "but", "his", "by", "from", "they", "we", "say",
    "her", "she", "or", "an", "will", "my", "one", "all", "would", "there", "their", "what",
    "is", "are", "was", "were", "me", "so", "if", "no", "go", "can", "just", "know",
];

const MEDIUM_FREQUENCY_WORDS: &[&str] = &[
    "about", "after", "again", "also", "back", "because", "come", "could", "day", "even",
    "first", "get", "give", "good", "hello", "here", "how", "into", "like", "look", "make",
    "more", "new", "now", "only", "other", "our", "over", "people", "see", "some", "take",
    "than", "thanks", "then", "them", "these", "think", "time", "two", "up", "use", "very",
    "want", "way", "well", "when", "which", "who", "work", "year", "your",
];

/// Maps a word to the positive prior weight the ranker adds as `ln(f + 1)`.
pub trait FrequencyModel: Send + Sync {
    /// Must be finite and > 0 for the word to be ranked.
    fn frequency(&self, word: &str, dictionary: &Dictionary) -> f64;
}

/// Uses the frequency stored with each dictionary entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct DictionaryFrequency;

impl FrequencyModel for DictionaryFrequency {
    fn frequency(&self, word: &str, dictionary: &Dictionary) -> f64 {
        dictionary.frequency(word).unwrap_or(0.0)
    }
}

/// Crude bucketed prior for word lists that carry no counts.
///
/// Two hand-picked tiers of very common words get fixed high weights;
/// everything else decays with length in steps of ten letters.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicFrequency;

impl HeuristicFrequency {
    pub fn score(&self, word: &str) -> f64 {
        if HIGH_FREQUENCY_WORDS.contains(&word) {
            return HIGH_FREQUENCY;
        }
        if MEDIUM_FREQUENCY_WORDS.contains(&word) {
            return MEDIUM_FREQUENCY;
        }
        let len = word.chars().count();
        (100.0 - ((len / 10) * 10) as f64).max(1.0)
    }
}

impl FrequencyModel for HeuristicFrequency {
    fn frequency(&self, word: &str, _dictionary: &Dictionary) -> f64 {
        self.score(word)
    }
}
