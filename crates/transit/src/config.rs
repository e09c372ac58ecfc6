//! Tunable parameters of the detection pipeline.
//!
//! Every field has a default, so an empty JSON object is a valid config.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::models::types::Result;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub search: StopSearchConfig,
    pub scoring: ScoringConfig,
}

impl DetectorConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Adaptive stop search around a trip endpoint
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StopSearchConfig {
    /// Half-width of the first search square, in degrees
    pub initial_radius: f64,
    /// Widen the square while fewer stops than this are found
    pub min_results: usize,
    pub max_attempts: usize,
    /// Radius multiplier applied between attempts
    pub growth_factor: f64,
}

impl Default for StopSearchConfig {
    fn default() -> Self {
        Self {
            initial_radius: 0.001,
            min_results: 3,
            max_attempts: 5,
            growth_factor: 1.5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Distance in degrees within which a trip point counts as on the route
    pub buffer: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self { buffer: 0.0003 }
    }
}
