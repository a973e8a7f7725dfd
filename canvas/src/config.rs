//! Map settings supplied by the host page.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_RING_DIAMETER_MM;
use crate::pattern::{Partition, TestPattern};

/// Settings that stay fixed for a session unless the page changes them.
///
/// Missing JSON keys take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Diameter of the calibration ring in mm.
    pub ring_diameter_mm: f64,
    pub pattern: TestPattern,
    pub partition: Partition,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            ring_diameter_mm: DEFAULT_RING_DIAMETER_MM,
            pattern: TestPattern::default(),
            partition: Partition::default(),
        }
    }
}

impl MapConfig {
    /// Parse settings from the host's JSON.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for malformed input or unknown values.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
