use crate::aggregate::Attractor;
use crate::error::AggregateError;
use crate::settings::{Dimension, GrowthSettings, Lattice};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors from reading or writing configuration files
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[source] std::io::Error),
    #[error("failed to write config file: {0}")]
    Write(#[source] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("could not determine config directory")]
    NoConfigDir,
}

/// Complete description of one aggregate run, exportable as JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateConfig {
    /// Version field for future compatibility
    pub version: u32,
    pub dim: Dimension,
    pub lattice: Lattice,
    pub attractor: Attractor,
    /// Probability that a coincident collision actually sticks
    pub stickiness: f64,
    pub settings: GrowthSettings,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            version: 1,
            dim: Dimension::Two,
            lattice: Lattice::Square,
            attractor: Attractor::Point,
            stickiness: 1.0,
            settings: GrowthSettings::default(),
        }
    }
}

impl AggregateConfig {
    /// Check the construction contract: stickiness in [0, 1], an attractor
    /// admissible in the chosen dimensionality, and a non-degenerate seed.
    pub fn validate(&self) -> Result<(), AggregateError> {
        if !(0.0..=1.0).contains(&self.stickiness) {
            return Err(AggregateError::StickinessOutOfRange(self.stickiness));
        }
        if !self.attractor.supported_in(self.dim) {
            return Err(AggregateError::UnsupportedAttractor {
                dim: self.dim,
                attractor: self.attractor,
            });
        }
        if self.settings.attractor_size == 0 {
            return Err(AggregateError::ZeroAttractorSize);
        }
        Ok(())
    }

    /// Export config to a JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        fs::write(path, json).map_err(ConfigError::Write)?;
        Ok(())
    }

    /// Import config from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(ConfigError::Read)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }
}
