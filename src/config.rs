//! Decoder tuning parameters.
//!
//! Defaults work for phone-sized layouts measured in points. Hosts may
//! override any subset from a TOML file; missing keys keep their defaults.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Default gesture-sloppiness tolerance.
pub const DEFAULT_SIGMA: f64 = 22.0;
/// Default noise-filter threshold in the path's coordinate units.
pub const DEFAULT_MIN_PATH_DISTANCE: f64 = 8.0;
/// Default minimum filtered-path length to attempt decoding.
pub const DEFAULT_MIN_PATH_POINTS: usize = 10;
/// Default minimum combined score to accept a result.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = -500.0;

/// Tunables for a decode.
///
/// ```toml
/// sigma = 22.0
/// min_path_distance = 8.0
/// min_path_points = 10
/// confidence_threshold = -500.0
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DecoderConfig {
    /// Standard deviation of the spatial Gaussian. Smaller is stricter.
    #[serde(default = "default_sigma")]
    pub sigma: f64,
    /// Points closer than this to the last kept point are dropped.
    #[serde(default = "default_min_path_distance")]
    pub min_path_distance: f64,
    /// Filtered paths shorter than this are not decoded.
    #[serde(default = "default_min_path_points")]
    pub min_path_points: usize,
    /// Best combined score must be strictly above this.
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,
}

fn default_sigma() -> f64 {
    DEFAULT_SIGMA
}

fn default_min_path_distance() -> f64 {
    DEFAULT_MIN_PATH_DISTANCE
}

fn default_min_path_points() -> usize {
    DEFAULT_MIN_PATH_POINTS
}

fn default_confidence_threshold() -> f64 {
    DEFAULT_CONFIDENCE_THRESHOLD
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            sigma: DEFAULT_SIGMA,
            min_path_distance: DEFAULT_MIN_PATH_DISTANCE,
            min_path_points: DEFAULT_MIN_PATH_POINTS,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }
}

impl DecoderConfig {
    /// Checks:
    /// - `sigma` is finite and positive
    /// - `min_path_distance` is finite and non-negative
    /// - `min_path_points` is at least 1
    /// - `confidence_threshold` is not NaN
    pub fn validate(&self) -> Result<()> {
        if !(self.sigma.is_finite() && self.sigma > 0.0) {
            return Err(Error::Config(format!(
                "sigma must be a positive number, got {}",
                self.sigma
            )));
        }
        if !(self.min_path_distance.is_finite() && self.min_path_distance >= 0.0) {
            return Err(Error::Config(format!(
                "min_path_distance must be a non-negative number, got {}",
                self.min_path_distance
            )));
        }
        if self.min_path_points == 0 {
            return Err(Error::Config("min_path_points must be at least 1".to_string()));
        }
        if self.confidence_threshold.is_nan() {
            return Err(Error::Config("confidence_threshold must be a number".to_string()));
        }
        Ok(())
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads from `path`, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Writes the config as TOML using temp file + rename.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;
        let content = toml::to_string_pretty(self)?;

        let parent_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent_dir)?;

        let mut temp_file = NamedTempFile::new_in(parent_dir)?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.persist(path).map_err(std::io::Error::from)?;
        Ok(())
    }
}
