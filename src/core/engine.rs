// src/core/engine.rs
use crate::config::DecoderConfig;
use crate::core::candidates::filter_candidates;
use crate::core::dictionary::{Dictionary, DictionaryCache};
use crate::core::frequency::{DictionaryFrequency, FrequencyModel};
use crate::core::layout::{single_char, KeyLayout};
use crate::core::path::{estimate_word_length, filter_path};
use crate::core::ranker::{rank, select};
use crate::core::types::{Point, ScoredCandidate};
use crate::Result;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// Raw paths with this many points or fewer are taps, not swipes.
pub const MIN_RAW_POINTS: usize = 5;

/// Decodes one finished gesture into a word.
///
/// Every failure (too few points, endpoints off the keyboard, no candidates,
/// low confidence) collapses to `None`; the host just lets tap typing proceed.
pub fn decode(
    raw_path: &[Point],
    layout: &KeyLayout,
    dictionary: &Dictionary,
    config: &DecoderConfig,
    frequency: &dyn FrequencyModel,
) -> Option<String> {
    let ranked = rank_candidates(raw_path, layout, dictionary, config, frequency);
    let Some(best) = select(&ranked, config.confidence_threshold) else {
        if let Some(top) = ranked.first() {
            debug!(
                word = %top.word,
                total = top.total,
                threshold = config.confidence_threshold,
                "best candidate below confidence threshold"
            );
        }
        return None;
    };
    debug!(word = %best.word, total = best.total, candidates = ranked.len(), "decoded gesture");
    Some(best.word.clone())
}

/// Every scored candidate for the gesture, best first, without applying the
/// confidence gate. Empty when the gesture is rejected before scoring.
pub fn rank_candidates(
    raw_path: &[Point],
    layout: &KeyLayout,
    dictionary: &Dictionary,
    config: &DecoderConfig,
    frequency: &dyn FrequencyModel,
) -> Vec<ScoredCandidate> {
    // 1. A handful of points is a tap or a twitch
    if raw_path.len() <= MIN_RAW_POINTS {
        debug!(points = raw_path.len(), "path too short to be a swipe");
        return Vec::new();
    }

    // 2. Noise filter
    let filtered = filter_path(raw_path, config.min_path_distance);
    if filtered.len() < config.min_path_points {
        debug!(
            raw = raw_path.len(),
            filtered = filtered.len(),
            "filtered path below minimum point count"
        );
        return Vec::new();
    }

    // 3. Start and end keys must both be character keys
    let (Some(start), Some(end)) = (
        endpoint_char(&filtered[0], layout),
        endpoint_char(&filtered[filtered.len() - 1], layout),
    ) else {
        debug!("path endpoints do not resolve to character keys");
        return Vec::new();
    };

    // 4. Length estimate
    let estimated_length = estimate_word_length(filtered.len());

    // 5. Prune the dictionary
    let candidates = filter_candidates(dictionary, start, end, estimated_length);
    if candidates.is_empty() {
        debug!(%start, %end, estimated_length, "no dictionary candidates");
        return Vec::new();
    }

    // 6. Score and order
    rank(&candidates, &filtered, layout, dictionary, frequency, config.sigma)
}

fn endpoint_char(point: &Point, layout: &KeyLayout) -> Option<char> {
    layout.key_for(point).and_then(single_char)
}

/// Where an asynchronous decode stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeStatus {
    Pending,
    Done(Option<String>),
}

/// Handle to a decode running on a background thread.
///
/// Dropping the ticket discards the result; there is no cancellation.
pub struct DecodeTicket {
    receiver: Receiver<Option<String>>,
}

impl DecodeTicket {
    /// Blocks until the decode finishes.
    pub fn wait(self) -> Option<String> {
        self.receiver.recv().ok().flatten()
    }

    /// Non-blocking check for the result.
    pub fn poll(&self) -> DecodeStatus {
        match self.receiver.try_recv() {
            Ok(word) => DecodeStatus::Done(word),
            Err(TryRecvError::Empty) => DecodeStatus::Pending,
            Err(TryRecvError::Disconnected) => DecodeStatus::Done(None),
        }
    }
}

/// Decoder service bound to a dictionary cache and a frequency model.
///
/// Cheap to clone; clones share the same cache, so a dictionary refresh is
/// seen by every clone on its next decode.
#[derive(Clone)]
pub struct Decoder {
    config: DecoderConfig,
    dictionary: Arc<DictionaryCache>,
    frequency: Arc<dyn FrequencyModel>,
}

impl Decoder {
    /// Default tuning, ranking by the dictionary's own frequencies.
    pub fn new(dictionary: DictionaryCache) -> Self {
        Self::with_shared_cache(Arc::new(dictionary))
    }

    pub fn with_shared_cache(dictionary: Arc<DictionaryCache>) -> Self {
        Self {
            config: DecoderConfig::default(),
            dictionary,
            frequency: Arc::new(DictionaryFrequency),
        }
    }

    pub fn with_config(mut self, config: DecoderConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn with_frequency_model(mut self, model: impl FrequencyModel + 'static) -> Self {
        self.frequency = Arc::new(model);
        self
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// The cache the host refreshes when a richer lexicon becomes available.
    pub fn dictionary(&self) -> &Arc<DictionaryCache> {
        &self.dictionary
    }

    fn snapshot(&self) -> Option<Arc<Dictionary>> {
        match self.dictionary.snapshot() {
            Ok(dictionary) => Some(dictionary),
            Err(e) => {
                warn!(error = %e, "dictionary unavailable, skipping decode");
                None
            }
        }
    }

    pub fn decode(&self, path: &[Point], layout: &KeyLayout) -> Option<String> {
        let dictionary = self.snapshot()?;
        decode(path, layout, &dictionary, &self.config, self.frequency.as_ref())
    }

    /// Up to `count` candidates above the confidence threshold, best first.
    pub fn suggestions(&self, path: &[Point], layout: &KeyLayout, count: usize) -> Vec<ScoredCandidate> {
        let Some(dictionary) = self.snapshot() else {
            return Vec::new();
        };
        rank_candidates(path, layout, &dictionary, &self.config, self.frequency.as_ref())
            .into_iter()
            .take_while(|candidate| candidate.total > self.config.confidence_threshold)
            .take(count)
            .collect()
    }

    /// Decodes on a background thread that owns its inputs.
    pub fn spawn_decode(&self, path: Vec<Point>, layout: KeyLayout) -> DecodeTicket {
        let (sender, receiver) = channel();
        let decoder = self.clone();
        thread::spawn(move || {
            let word = decoder.decode(&path, &layout);
            // The caller may have dropped the ticket for a newer gesture.
            let _ = sender.send(word);
        });
        DecodeTicket { receiver }
    }

    /// Decodes on a background thread and hands the result to `on_done`.
    pub fn decode_with_callback<F>(&self, path: Vec<Point>, layout: KeyLayout, on_done: F) -> JoinHandle<()>
    where
        F: FnOnce(Option<String>) + Send + 'static,
    {
        let decoder = self.clone();
        thread::spawn(move || on_done(decoder.decode(&path, &layout)))
    }

    /// Reloads the dictionary on a background thread and hands the word count
    /// (or the load error) to `on_done`. Decodes keep using the previous
    /// snapshot until the new one is swapped in.
    pub fn refresh_with_callback<F>(&self, on_done: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<usize>) + Send + 'static,
    {
        let dictionary = Arc::clone(&self.dictionary);
        thread::spawn(move || on_done(dictionary.refresh().map(|snapshot| snapshot.len())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{DictionaryEntry, KeyRect, Rect};

    fn strip_layout() -> KeyLayout {
        // Three keys in a row, 100 units wide each.
        KeyLayout::new(vec![
            KeyRect::new("a", Rect::new(0.0, 0.0, 100.0, 100.0)),
            KeyRect::new("b", Rect::new(100.0, 0.0, 100.0, 100.0)),
            KeyRect::new("c", Rect::new(200.0, 0.0, 100.0, 100.0)),
            KeyRect::new("shift", Rect::new(0.0, 100.0, 300.0, 50.0)),
        ])
        .unwrap()
    }

    fn sweep(from: f64, to: f64, y: f64, n: usize) -> Vec<Point> {
        let step = (to - from) / (n - 1) as f64;
        (0..n).map(|i| Point::new(from + step * i as f64, y)).collect()
    }

    fn dictionary(pairs: &[(&str, f64)]) -> Dictionary {
        Dictionary::from_entries(pairs.iter().map(|&(w, f)| DictionaryEntry::new(w, f))).unwrap()
    }

    #[test]
    fn decodes_straight_sweep() {
        let dict = dictionary(&[("abc", 10.0), ("ac", 10.0)]);
        let path = sweep(50.0, 250.0, 50.0, 21);
        let word = decode(&path, &strip_layout(), &dict, &DecoderConfig::default(), &DictionaryFrequency);
        assert_eq!(word.as_deref(), Some("abc"));
    }

    #[test]
    fn non_character_endpoint_is_rejected() {
        let dict = dictionary(&[("abc", 10.0)]);
        let path = sweep(50.0, 250.0, 125.0, 21);
        let word = decode(&path, &strip_layout(), &dict, &DecoderConfig::default(), &DictionaryFrequency);
        assert_eq!(word, None);
    }

    #[test]
    fn dense_short_path_fails_min_points() {
        let dict = dictionary(&[("abc", 10.0)]);
        // 30 raw points but only ~8 survive the 8-unit filter.
        let path = sweep(50.0, 110.0, 50.0, 30);
        let ranked = rank_candidates(&path, &strip_layout(), &dict, &DecoderConfig::default(), &DictionaryFrequency);
        assert!(ranked.is_empty());
    }

    #[test]
    fn async_paths_match_sync_result() {
        let dict = dictionary(&[("abc", 10.0), ("ac", 10.0)]);
        let decoder = Decoder::new(DictionaryCache::preloaded(dict));
        let path = sweep(50.0, 250.0, 50.0, 21);
        let layout = strip_layout();

        let sync = decoder.decode(&path, &layout);
        let ticket = decoder.spawn_decode(path.clone(), layout.clone());
        assert_eq!(ticket.wait(), sync);

        let (tx, rx) = channel();
        decoder
            .decode_with_callback(path, layout, move |word| {
                tx.send(word).unwrap();
            })
            .join()
            .unwrap();
        assert_eq!(rx.recv().unwrap(), sync);
    }

    #[test]
    fn ticket_poll_reaches_done() {
        let dict = dictionary(&[("abc", 10.0)]);
        let decoder = Decoder::new(DictionaryCache::preloaded(dict));
        let ticket = decoder.spawn_decode(sweep(50.0, 250.0, 50.0, 21), strip_layout());
        let status = loop {
            match ticket.poll() {
                DecodeStatus::Pending => thread::yield_now(),
                done => break done,
            }
        };
        assert_eq!(status, DecodeStatus::Done(Some("abc".to_string())));
    }

    #[test]
    fn suggestions_are_ordered_and_capped() {
        let dict = dictionary(&[("abc", 10.0), ("ac", 10.0), ("abbc", 1.0)]);
        let decoder = Decoder::new(DictionaryCache::preloaded(dict));
        let path = sweep(50.0, 250.0, 50.0, 21);
        let suggestions = decoder.suggestions(&path, &strip_layout(), 2);
        assert_eq!(suggestions.len(), 2);
        assert!(suggestions[0].total >= suggestions[1].total);
        assert_eq!(suggestions[0].word, "abc");
    }

    #[test]
    fn raw_point_floor_applies_before_filtering() {
        let dict = dictionary(&[("abc", 10.0)]);
        let config = DecoderConfig { min_path_points: 1, ..DecoderConfig::default() };
        let layout = strip_layout();

        let five = sweep(50.0, 250.0, 50.0, MIN_RAW_POINTS);
        assert_eq!(decode(&five, &layout, &dict, &config, &DictionaryFrequency), None);

        let six = sweep(50.0, 250.0, 50.0, MIN_RAW_POINTS + 1);
        assert_eq!(
            decode(&six, &layout, &dict, &config, &DictionaryFrequency).as_deref(),
            Some("abc")
        );
    }

    #[test]
    fn background_refresh_reports_new_size() {
        use crate::lexicon::StaticProvider;

        let provider = StaticProvider::new(
            "fixed",
            vec![DictionaryEntry::new("abc", 10.0), DictionaryEntry::new("ac", 5.0)],
        );
        let decoder = Decoder::new(DictionaryCache::new(provider));
        assert!(!decoder.dictionary().is_loaded());

        let (tx, rx) = channel();
        decoder
            .refresh_with_callback(move |result| {
                tx.send(result.map_err(|e| e.to_string())).unwrap();
            })
            .join()
            .unwrap();
        assert_eq!(rx.recv().unwrap(), Ok(2));
        assert!(decoder.dictionary().is_loaded());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let decoder = Decoder::new(DictionaryCache::preloaded(Dictionary::new()));
        let config = DecoderConfig { sigma: -1.0, ..DecoderConfig::default() };
        assert!(decoder.with_config(config).is_err());
    }
}
