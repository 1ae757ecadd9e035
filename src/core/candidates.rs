// src/core/candidates.rs
use crate::core::dictionary::Dictionary;

/// Shortest word worth decoding from a swipe.
pub const MIN_WORD_LENGTH: usize = 2;
/// Floor of the length tolerance band.
pub const MIN_LENGTH_SLACK: usize = 5;

/// Whether `word` survives pruning for the observed endpoints and length.
///
/// The length band is `max(5, len / 2)` around the word's own length, so it
/// widens for long words where the points-per-letter estimate is least reliable.
pub fn qualifies(word: &str, start: char, end: char, estimated_length: usize) -> bool {
    let len = word.chars().count();
    if len < MIN_WORD_LENGTH {
        return false;
    }

    let first = word.chars().next().map(fold);
    let last = word.chars().last().map(fold);
    if first != Some(fold(start)) || last != Some(fold(end)) {
        return false;
    }

    len.abs_diff(estimated_length) <= MIN_LENGTH_SLACK.max(len / 2)
}

/// Words worth scoring for this gesture, in lexicographic order.
pub fn filter_candidates<'d>(
    dictionary: &'d Dictionary,
    start: char,
    end: char,
    estimated_length: usize,
) -> Vec<&'d str> {
    dictionary
        .words_with_endpoints(fold(start), fold(end))
        .iter()
        .map(String::as_str)
        .filter(|word| qualifies(word, start, end, estimated_length))
        .collect()
}

fn fold(c: char) -> char {
    c.to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::DictionaryEntry;

    fn dictionary(words: &[&str]) -> Dictionary {
        Dictionary::from_entries(words.iter().map(|w| DictionaryEntry::new(*w, 1.0))).unwrap()
    }

    #[test]
    fn matches_endpoints_and_length() {
        let dict = dictionary(&["cat", "cut", "cot", "cart", "dog", "c", "coat"]);
        let found = filter_candidates(&dict, 'c', 't', 3);
        assert_eq!(found, vec!["cart", "cat", "coat", "cot", "cut"]);
    }

    #[test]
    fn single_letter_words_never_qualify() {
        assert!(!qualifies("a", 'a', 'a', 1));
        assert!(qualifies("aa", 'a', 'a', 1));
    }

    #[test]
    fn length_band_widens_for_long_words() {
        // len 3: band is 5.
        assert!(qualifies("cat", 'c', 't', 8));
        assert!(!qualifies("cat", 'c', 't', 9));
        // len 14: band is 7.
        let long = "categorization";
        assert!(qualifies(long, 'c', 'n', 7));
        assert!(!qualifies(long, 'c', 'n', 6));
        assert!(qualifies(long, 'c', 'n', 21));
        assert!(!qualifies(long, 'c', 'n', 22));
    }

    #[test]
    fn endpoint_chars_are_case_folded() {
        assert!(qualifies("cat", 'C', 'T', 3));
        let dict = dictionary(&["cat"]);
        assert_eq!(filter_candidates(&dict, 'C', 'T', 3), vec!["cat"]);
    }
}
