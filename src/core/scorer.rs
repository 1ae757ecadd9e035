// src/core/scorer.rs
use crate::core::geometry::nearest_distance;
use crate::core::types::Point;

/// Mean Gaussian log-probability of `user_path` under `ideal_path`.
///
/// Each user point is compared with its nearest ideal point, which tolerates
/// unequal lengths and uneven sampling but ignores ordering. The sum is
/// divided by the number of user points so candidates of different lengths
/// land on the same per-point scale.
///
/// Returns `-inf` when `ideal_path` is empty and `0.0` for an empty user path.
pub fn spatial_score(user_path: &[Point], ideal_path: &[Point], sigma: f64) -> f64 {
    if ideal_path.is_empty() {
        return f64::NEG_INFINITY;
    }
    if user_path.is_empty() {
        return 0.0;
    }

    let two_sigma_sq = 2.0 * sigma * sigma;
    let total: f64 = user_path
        .iter()
        .filter_map(|point| nearest_distance(point, ideal_path))
        .map(|d| -(d * d) / two_sigma_sq)
        .sum();

    total / user_path.len() as f64
}
