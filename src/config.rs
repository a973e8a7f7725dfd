//! CLI configuration parsed from environment variables.

use std::path::PathBuf;

use canvas::consts::DEFAULT_RING_DIAMETER_MM;

pub const DEFAULT_TABLE_PATH: &str = "data/sector_table.json";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub table_path: PathBuf,
    pub ring_diameter_mm: f64,
}

impl Config {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `ONHMAP_TABLE`: sector table path, default `data/sector_table.json`
    /// - `ONHMAP_RING_DIAMETER_MM`: calibration ring diameter, default 3.5
    #[must_use]
    pub fn from_env() -> Self {
        let table_path = std::env::var("ONHMAP_TABLE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_TABLE_PATH), PathBuf::from);
        let ring_diameter_mm = env_parse_mm("ONHMAP_RING_DIAMETER_MM", DEFAULT_RING_DIAMETER_MM);
        Self { table_path, ring_diameter_mm }
    }

    /// Replace fields given on the command line.
    #[must_use]
    pub fn with_overrides(mut self, table: Option<PathBuf>, ring_diameter_mm: Option<f64>) -> Self {
        if let Some(path) = table {
            self.table_path = path;
        }
        if let Some(mm) = ring_diameter_mm {
            self.ring_diameter_mm = mm;
        }
        self
    }
}

fn env_parse_mm(key: &str, default: f64) -> f64 {
    let Ok(raw) = std::env::var(key) else {
        return default;
    };
    match raw.trim().parse::<f64>() {
        Ok(mm) if mm.is_finite() && mm > 0.0 => mm,
        _ => {
            tracing::warn!(key, value = %raw, default, "ignoring invalid millimetre value");
            default
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
