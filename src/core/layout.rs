// src/core/layout.rs
use crate::core::types::{KeyRect, Point, Rect};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

const QWERTY_ROWS: [(&str, f64); 3] = [("qwertyuiop", 0.0), ("asdfghjkl", 0.5), ("zxcvbnm", 1.5)];

/// A read-only snapshot of the keyboard's key hit rectangles.
///
/// Iteration order is the order keys were supplied in; `key_for` relies on
/// it to resolve overlapping rectangles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<KeyRect>", into = "Vec<KeyRect>")]
pub struct KeyLayout {
    keys: Vec<KeyRect>,
    /// Single-character labels (case-folded) -> position in `keys`.
    char_index: HashMap<char, usize>,
}

impl KeyLayout {
    /// Builds a layout, rejecting duplicate labels and zero-area rectangles.
    pub fn new(keys: Vec<KeyRect>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(keys.len());
        let mut char_index = HashMap::new();

        for (idx, key) in keys.iter().enumerate() {
            if !seen.insert(key.label.as_str()) {
                return Err(Error::DuplicateKey(key.label.clone()));
            }
            let area = key.rect.area();
            if !(area.is_finite() && area > 0.0) {
                return Err(Error::DegenerateKey(key.label.clone()));
            }
            if let Some(c) = single_char(&key.label) {
                char_index.entry(c).or_insert(idx);
            }
        }

        Ok(Self { keys, char_index })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// A plain three-row QWERTY layout with the top-left key at the origin.
    pub fn qwerty(key_width: f64, key_height: f64) -> Result<Self> {
        let mut keys = Vec::with_capacity(26);
        for (row, (letters, offset)) in QWERTY_ROWS.iter().enumerate() {
            for (col, letter) in letters.chars().enumerate() {
                let x = (col as f64 + offset) * key_width;
                let y = row as f64 * key_height;
                keys.push(KeyRect::new(letter, Rect::new(x, y, key_width, key_height)));
            }
        }
        Self::new(keys)
    }

    pub fn keys(&self) -> &[KeyRect] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Label of the first key whose rectangle contains `point`.
    pub fn key_for(&self, point: &Point) -> Option<&str> {
        self.keys
            .iter()
            .find(|key| key.rect.contains(point))
            .map(|key| key.label.as_str())
    }

    /// Rectangle of the single-character key for `c` (case-folded).
    pub fn rect_for_char(&self, c: char) -> Option<&Rect> {
        let c = fold(c);
        self.char_index.get(&c).map(|&idx| &self.keys[idx].rect)
    }

    /// Center of each of `word`'s keys, in order. Characters without a key
    /// contribute nothing, so the result may be shorter than the word.
    pub fn ideal_path(&self, word: &str) -> Vec<Point> {
        word.chars()
            .filter_map(|c| self.rect_for_char(c))
            .map(Rect::center)
            .collect()
    }
}

impl TryFrom<Vec<KeyRect>> for KeyLayout {
    type Error = Error;

    fn try_from(keys: Vec<KeyRect>) -> Result<Self> {
        Self::new(keys)
    }
}

impl From<KeyLayout> for Vec<KeyRect> {
    fn from(layout: KeyLayout) -> Self {
        layout.keys
    }
}

/// The label's only character, case-folded, if it has exactly one.
pub fn single_char(label: &str) -> Option<char> {
    let mut chars = label.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(fold(c)),
        _ => None,
    }
}

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qwerty_has_all_letters() {
        let layout = KeyLayout::qwerty(40.0, 60.0).unwrap();
        assert_eq!(layout.len(), 26);
        for c in 'a'..='z' {
            assert!(layout.rect_for_char(c).is_some(), "missing {c}");
        }
        assert_eq!(layout.rect_for_char('Q'), layout.rect_for_char('q'));
    }

    #[test]
    fn key_for_resolves_points() {
        let layout = KeyLayout::qwerty(40.0, 60.0).unwrap();
        assert_eq!(layout.key_for(&Point::new(20.0, 30.0)), Some("q"));
        // "a" row is offset by half a key.
        assert_eq!(layout.key_for(&Point::new(40.0, 90.0)), Some("a"));
        assert_eq!(layout.key_for(&Point::new(-5.0, 30.0)), None);
        assert_eq!(layout.key_for(&Point::new(10.0, 500.0)), None);
    }

    #[test]
    fn overlapping_keys_first_wins() {
        let layout = KeyLayout::new(vec![
            KeyRect::new("x", Rect::new(0.0, 0.0, 10.0, 10.0)),
            KeyRect::new("y", Rect::new(5.0, 5.0, 10.0, 10.0)),
        ])
        .unwrap();
        assert_eq!(layout.key_for(&Point::new(7.0, 7.0)), Some("x"));
        assert_eq!(layout.key_for(&Point::new(12.0, 12.0)), Some("y"));
    }

    #[test]
    fn rejects_duplicate_and_degenerate_keys() {
        let dup = KeyLayout::new(vec![
            KeyRect::new("a", Rect::new(0.0, 0.0, 10.0, 10.0)),
            KeyRect::new("a", Rect::new(20.0, 0.0, 10.0, 10.0)),
        ]);
        assert!(matches!(dup, Err(Error::DuplicateKey(label)) if label == "a"));

        let flat = KeyLayout::new(vec![KeyRect::new("b", Rect::new(0.0, 0.0, 10.0, 0.0))]);
        assert!(matches!(flat, Err(Error::DegenerateKey(_))));

        let unbounded = KeyLayout::new(vec![KeyRect::new("c", Rect::new(0.0, 0.0, f64::INFINITY, 10.0))]);
        assert!(matches!(unbounded, Err(Error::DegenerateKey(_))));
        let undefined = KeyLayout::new(vec![KeyRect::new("d", Rect::new(0.0, 0.0, f64::NAN, 10.0))]);
        assert!(matches!(undefined, Err(Error::DegenerateKey(_))));
    }

    #[test]
    fn ideal_path_skips_unknown_characters() {
        let layout = KeyLayout::new(vec![
            KeyRect::new("c", Rect::new(0.0, 0.0, 10.0, 10.0)),
            KeyRect::new("t", Rect::new(20.0, 0.0, 10.0, 10.0)),
            KeyRect::new("shift", Rect::new(40.0, 0.0, 10.0, 10.0)),
        ])
        .unwrap();
        assert_eq!(
            layout.ideal_path("cat"),
            vec![Point::new(5.0, 5.0), Point::new(25.0, 5.0)]
        );
        assert!(layout.ideal_path("zzz").is_empty());
    }

    #[test]
    fn deserializes_from_json_list() {
        let json = r#"[
            {"label": "a", "x": 0, "y": 0, "width": 10, "height": 10},
            {"label": "space", "x": 0, "y": 10, "width": 50, "height": 10}
        ]"#;
        let layout: KeyLayout = serde_json::from_str(json).unwrap();
        assert_eq!(layout.len(), 2);
        assert_eq!(layout.key_for(&Point::new(25.0, 15.0)), Some("space"));
        assert!(layout.rect_for_char('a').is_some());
    }
}
