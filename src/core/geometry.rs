// src/core/geometry.rs
use crate::core::types::{Point, Rect};

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: &Point, b: &Point) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// Distance from `point` to the closest point of `cloud`.
/// Returns `None` for an empty cloud.
pub fn nearest_distance(point: &Point, cloud: &[Point]) -> Option<f64> {
    cloud
        .iter()
        .map(|candidate| distance(point, candidate))
        .min_by(f64::total_cmp)
}

impl Rect {
    /// Edge-inclusive containment test.
    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}
