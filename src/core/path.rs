// src/core/path.rs
use crate::core::geometry::distance;
use crate::core::types::Point;

/// Roughly how many filtered points a swipe produces per letter.
pub const POINTS_PER_LETTER: usize = 4;

/// Drops points closer than `min_distance` to the last kept point.
///
/// The first point is always kept. The reference moves only when a point is
/// kept, so dwelling on a key collapses to a single point while fast strokes
/// keep most of their samples. O(n), order preserving.
pub fn filter_path(path: &[Point], min_distance: f64) -> Vec<Point> {
    let Some((&first, rest)) = path.split_first() else {
        return Vec::new();
    };

    let mut kept = Vec::with_capacity(path.len());
    kept.push(first);
    let mut last = first;
    for &point in rest {
        if distance(&last, &point) >= min_distance {
            kept.push(point);
            last = point;
        }
    }
    kept
}

/// Estimated word length for a filtered path (integer division).
pub fn estimate_word_length(filtered_len: usize) -> usize {
    filtered_len / POINTS_PER_LETTER
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize, step: f64) -> Vec<Point> {
        (0..n).map(|i| Point::new(i as f64 * step, 0.0)).collect()
    }

    #[test]
    fn short_paths_pass_through() {
        assert!(filter_path(&[], 8.0).is_empty());
        let single = [Point::new(3.0, 4.0)];
        assert_eq!(filter_path(&single, 8.0), single.to_vec());
    }

    #[test]
    fn dwell_cluster_collapses() {
        let mut path = vec![Point::new(0.0, 0.0); 20];
        path.push(Point::new(50.0, 0.0));
        let filtered = filter_path(&path, 8.0);
        assert_eq!(filtered, vec![Point::new(0.0, 0.0), Point::new(50.0, 0.0)]);
    }

    #[test]
    fn reference_is_last_kept_point() {
        // Steps of 3 units: every third point reaches 9 >= 8 from the reference.
        let filtered = filter_path(&line(10, 3.0), 8.0);
        let xs: Vec<f64> = filtered.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 9.0, 18.0, 27.0]);
    }

    #[test]
    fn exact_threshold_is_kept() {
        let filtered = filter_path(&line(3, 8.0), 8.0);
        assert_eq!(filtered.len(), 3);
    }

    #[test]
    fn length_estimate_uses_integer_division() {
        assert_eq!(estimate_word_length(0), 0);
        assert_eq!(estimate_word_length(11), 2);
        assert_eq!(estimate_word_length(12), 3);
    }
}
