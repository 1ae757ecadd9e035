// src/core/dictionary.rs
use crate::core::types::DictionaryEntry;
use crate::lexicon::StaticProvider;
use crate::{Error, Result};
use parking_lot::RwLock;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// An immutable, validated word -> frequency snapshot.
///
/// Words are unique, non-empty lowercase ASCII letters, and every frequency
/// is finite and positive. Words are also bucketed by (first, last)
/// character so candidate filtering never walks the whole vocabulary.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    frequencies: HashMap<String, f64>,
    by_endpoints: HashMap<(char, char), Vec<String>>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a dictionary from a single source.
    ///
    /// A repeated word is a data error and fails the whole build. Entries
    /// with a non-positive frequency are dropped.
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = DictionaryEntry>,
    {
        let mut frequencies = HashMap::new();
        for entry in entries {
            let Some((word, frequency)) = validate(entry)? else {
                continue;
            };
            match frequencies.entry(word) {
                Entry::Occupied(slot) => return Err(Error::DuplicateWord(slot.key().clone())),
                Entry::Vacant(slot) => {
                    slot.insert(frequency);
                }
            }
        }
        Ok(Self::indexed(frequencies))
    }

    /// Combines several sources. A word present in more than one source
    /// keeps its highest frequency; repeats inside one source still fail.
    pub fn merge<I>(sources: I) -> Result<Self>
    where
        I: IntoIterator<Item = Vec<DictionaryEntry>>,
    {
        let mut frequencies: HashMap<String, f64> = HashMap::new();
        for source in sources {
            let single = Self::from_entries(source)?;
            for (word, frequency) in single.frequencies {
                let slot = frequencies.entry(word).or_insert(frequency);
                *slot = slot.max(frequency);
            }
        }
        Ok(Self::indexed(frequencies))
    }

    fn indexed(frequencies: HashMap<String, f64>) -> Self {
        let mut by_endpoints: HashMap<(char, char), Vec<String>> = HashMap::new();
        for word in frequencies.keys() {
            if let (Some(first), Some(last)) = (word.chars().next(), word.chars().last()) {
                by_endpoints.entry((first, last)).or_default().push(word.clone());
            }
        }
        for bucket in by_endpoints.values_mut() {
            bucket.sort_unstable();
        }
        Self { frequencies, by_endpoints }
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.frequencies.contains_key(word)
    }

    pub fn frequency(&self, word: &str) -> Option<f64> {
        self.frequencies.get(word).copied()
    }

    /// Words starting with `first` and ending with `last`, in lexicographic order.
    pub fn words_with_endpoints(&self, first: char, last: char) -> &[String] {
        self.by_endpoints
            .get(&(first, last))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All entries, sorted by word.
    pub fn entries(&self) -> Vec<DictionaryEntry> {
        let mut entries: Vec<DictionaryEntry> = self
            .frequencies
            .iter()
            .map(|(word, &frequency)| DictionaryEntry::new(word.clone(), frequency))
            .collect();
        entries.sort_by(|a, b| a.word.cmp(&b.word));
        entries
    }
}

fn validate(entry: DictionaryEntry) -> Result<Option<(String, f64)>> {
    let word = entry.word.trim();
    if word.is_empty() || !word.chars().all(|c| c.is_ascii_lowercase()) {
        return Err(Error::InvalidWord(entry.word));
    }
    if !(entry.frequency.is_finite() && entry.frequency > 0.0) {
        warn!(word, frequency = entry.frequency, "dropping entry with non-positive frequency");
        return Ok(None);
    }
    Ok(Some((word.to_string(), entry.frequency)))
}

/// A source of dictionary entries owned by the host (bundled list, system
/// lexicon, compiled snapshot...). The decoder never cares which.
pub trait DictionaryProvider: Send + Sync {
    /// Short description used in logs.
    fn name(&self) -> &str;

    fn entries(&self) -> Result<Vec<DictionaryEntry>>;

    fn load(&self) -> Result<Dictionary> {
        Dictionary::from_entries(self.entries()?)
    }
}

impl<P: DictionaryProvider + ?Sized> DictionaryProvider for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn entries(&self) -> Result<Vec<DictionaryEntry>> {
        (**self).entries()
    }

    fn load(&self) -> Result<Dictionary> {
        (**self).load()
    }
}

/// Lazily loaded, atomically swapped dictionary snapshot.
///
/// Starts empty and loads from its provider on first read. `refresh` and
/// `replace` build the new snapshot before taking the write lock and swap the
/// `Arc` in one assignment, so readers see the old or the new dictionary.
pub struct DictionaryCache {
    provider: Box<dyn DictionaryProvider>,
    current: RwLock<Option<Arc<Dictionary>>>,
}

impl DictionaryCache {
    pub fn new(provider: impl DictionaryProvider + 'static) -> Self {
        Self {
            provider: Box::new(provider),
            current: RwLock::new(None),
        }
    }

    /// A cache already holding `dictionary`; reloading yields the same entries.
    pub fn preloaded(dictionary: Dictionary) -> Self {
        let provider = StaticProvider::new("preloaded", dictionary.entries());
        Self {
            provider: Box::new(provider),
            current: RwLock::new(Some(Arc::new(dictionary))),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.current.read().is_some()
    }

    /// The current snapshot, loading it from the provider if needed.
    pub fn snapshot(&self) -> Result<Arc<Dictionary>> {
        if let Some(dictionary) = self.current.read().as_ref() {
            return Ok(Arc::clone(dictionary));
        }

        let mut slot = self.current.write();
        // Another reader may have loaded it while we waited for the lock.
        if let Some(dictionary) = slot.as_ref() {
            return Ok(Arc::clone(dictionary));
        }
        let dictionary = Arc::new(self.provider.load()?);
        info!(provider = self.provider.name(), words = dictionary.len(), "dictionary loaded");
        *slot = Some(Arc::clone(&dictionary));
        Ok(dictionary)
    }

    /// Reloads from the provider and swaps the result in.
    pub fn refresh(&self) -> Result<Arc<Dictionary>> {
        let dictionary = Arc::new(self.provider.load()?);
        info!(provider = self.provider.name(), words = dictionary.len(), "dictionary refreshed");
        *self.current.write() = Some(Arc::clone(&dictionary));
        Ok(dictionary)
    }

    /// Swaps in a snapshot supplied directly by the host.
    pub fn replace(&self, dictionary: Dictionary) -> Arc<Dictionary> {
        let dictionary = Arc::new(dictionary);
        *self.current.write() = Some(Arc::clone(&dictionary));
        dictionary
    }

    /// Drops the cached snapshot; the next read reloads.
    pub fn invalidate(&self) {
        *self.current.write() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn entries(pairs: &[(&str, f64)]) -> Vec<DictionaryEntry> {
        pairs.iter().map(|&(w, f)| DictionaryEntry::new(w, f)).collect()
    }

    #[test]
    fn builds_endpoint_index() {
        let dict = Dictionary::from_entries(entries(&[
            ("cat", 100.0),
            ("cot", 10.0),
            ("cut", 50.0),
            ("dog", 5.0),
        ]))
        .unwrap();
        assert_eq!(dict.len(), 4);
        assert_eq!(dict.words_with_endpoints('c', 't'), ["cat", "cot", "cut"]);
        assert!(dict.words_with_endpoints('x', 'y').is_empty());
        assert_eq!(dict.frequency("cut"), Some(50.0));
    }

    #[test]
    fn duplicate_word_fails_fast() {
        let result = Dictionary::from_entries(entries(&[("cat", 1.0), ("cat", 2.0)]));
        assert!(matches!(result, Err(Error::DuplicateWord(w)) if w == "cat"));
    }

    #[test]
    fn invalid_word_is_rejected() {
        assert!(matches!(
            Dictionary::from_entries(entries(&[("Cat", 1.0)])),
            Err(Error::InvalidWord(_))
        ));
        assert!(matches!(
            Dictionary::from_entries(entries(&[("don't", 1.0)])),
            Err(Error::InvalidWord(_))
        ));
    }

    #[test]
    fn non_positive_frequency_is_dropped() {
        let dict = Dictionary::from_entries(entries(&[
            ("cat", 0.0),
            ("cot", -3.0),
            ("cut", f64::NAN),
            ("cab", 2.0),
        ]))
        .unwrap();
        assert_eq!(dict.len(), 1);
        assert!(dict.contains("cab"));
    }

    #[test]
    fn merge_keeps_highest_frequency() {
        let dict = Dictionary::merge(vec![
            entries(&[("cat", 10.0), ("dog", 3.0)]),
            entries(&[("cat", 40.0), ("emu", 1.0)]),
        ])
        .unwrap();
        assert_eq!(dict.len(), 3);
        assert_eq!(dict.frequency("cat"), Some(40.0));
    }

    struct CountingProvider {
        loads: Arc<AtomicUsize>,
    }

    impl DictionaryProvider for CountingProvider {
        fn name(&self) -> &str {
            "counting"
        }

        fn entries(&self) -> Result<Vec<DictionaryEntry>> {
            let n = self.loads.fetch_add(1, Ordering::SeqCst);
            if n == 0 {
                Ok(entries(&[("cat", 1.0)]))
            } else {
                Ok(entries(&[("cat", 1.0), ("cart", 2.0)]))
            }
        }
    }

    #[test]
    fn cache_loads_once_then_swaps_on_refresh() {
        let loads = Arc::new(AtomicUsize::new(0));
        let cache = DictionaryCache::new(CountingProvider { loads: Arc::clone(&loads) });
        assert!(!cache.is_loaded());

        let first = cache.snapshot().unwrap();
        let again = cache.snapshot().unwrap();
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(loads.load(Ordering::SeqCst), 1);

        let refreshed = cache.refresh().unwrap();
        assert_eq!(refreshed.len(), 2);
        // Old snapshot holders are unaffected.
        assert_eq!(first.len(), 1);

        cache.invalidate();
        assert!(!cache.is_loaded());
        cache.snapshot().unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn preloaded_cache_serves_without_loading() {
        let dict = Dictionary::from_entries(entries(&[("cat", 1.0)])).unwrap();
        let cache = DictionaryCache::preloaded(dict);
        assert!(cache.is_loaded());
        assert!(cache.snapshot().unwrap().contains("cat"));
        let replaced = cache.replace(Dictionary::new());
        assert!(replaced.is_empty());
        assert!(cache.refresh().unwrap().contains("cat"));
    }
}
