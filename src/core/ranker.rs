// src/core/ranker.rs
use crate::core::dictionary::Dictionary;
use crate::core::frequency::FrequencyModel;
use crate::core::layout::KeyLayout;
use crate::core::scorer::spatial_score;
use crate::core::types::{Point, ScoredCandidate};
use std::cmp::Ordering;
use tracing::trace;

/// Scores every candidate against `user_path` and returns them best first.
///
/// Candidates with no ideal path (none of their letters are on the layout)
/// or without a usable frequency are skipped.
pub fn rank(
    candidates: &[&str],
    user_path: &[Point],
    layout: &KeyLayout,
    dictionary: &Dictionary,
    frequency: &dyn FrequencyModel,
    sigma: f64,
) -> Vec<ScoredCandidate> {
    let mut scored: Vec<ScoredCandidate> = candidates
        .iter()
        .filter_map(|&word| {
            let ideal = layout.ideal_path(word);
            if ideal.is_empty() {
                return None;
            }
            let freq = frequency.frequency(word, dictionary);
            if !(freq.is_finite() && freq > 0.0) {
                return None;
            }
            let spatial = spatial_score(user_path, &ideal, sigma);
            let total = spatial + (freq + 1.0).ln();
            trace!(word, spatial, freq, total, "scored candidate");
            Some(ScoredCandidate {
                word: word.to_string(),
                spatial,
                frequency: freq,
                total,
            })
        })
        .collect();

    scored.sort_by(compare_best_first);
    scored
}

/// Higher total first; equal totals fall back to higher frequency, then the
/// lexicographically smaller word, so the outcome never depends on input order.
pub fn compare_best_first(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.total
        .total_cmp(&a.total)
        .then_with(|| b.frequency.total_cmp(&a.frequency))
        .then_with(|| a.word.cmp(&b.word))
}

/// The best candidate, if its total clears `threshold` (strictly).
pub fn select(ranked: &[ScoredCandidate], threshold: f64) -> Option<&ScoredCandidate> {
    ranked.first().filter(|best| best.total > threshold)
}
