//! Sector table: the precomputed map from anatomy to per-location sectors.
//!
//! The table is an external data asset, loaded once and never mutated. Each
//! layer covers one `(pattern, partition)` pair and holds one cell per
//! `(onhx, onhy, raphe)` combination; a cell lists one sector index per test
//! location in grid order.
//!
//! Lookups never clamp. Out-of-range parameters are an error here and callers
//! are expected to clamp before asking.

#[cfg(test)]
#[path = "sector_test.rs"]
mod sector_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::consts::{ONHX_MAX, ONHX_MIN, ONHY_MAX, ONHY_MIN, RAPHE_MAX, RAPHE_MIN};
use crate::params::{AnatomicalParameters, Eye, Param};
use crate::pattern::{Partition, TestPattern};

/// Asset format version understood by this build.
pub const TABLE_VERSION: u32 = 1;

#[allow(clippy::cast_sign_loss)]
const NX: usize = (ONHX_MAX - ONHX_MIN + 1) as usize;
#[allow(clippy::cast_sign_loss)]
const NY: usize = (ONHY_MAX - ONHY_MIN + 1) as usize;
#[allow(clippy::cast_sign_loss)]
const NR: usize = (RAPHE_MAX - RAPHE_MIN + 1) as usize;

/// Number of cells in a complete layer.
pub const CELLS_PER_LAYER: usize = NX * NY * NR;

/// Lookup failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SectorError {
    /// A parameter lies outside the table's bounds.
    #[error("{param} = {value} is out of range [{min}, {max}]")]
    OutOfRange { param: &'static str, value: i32, min: i32, max: i32 },
    /// The table has no layer for this pattern and partition.
    #[error("sector table has no layer for pattern {pattern} with {partition} partition")]
    MissingLayer { pattern: TestPattern, partition: Partition },
}

/// Failure while loading or validating a table asset.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("failed to parse sector table: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unsupported sector table version {found} (expected {expected})")]
    Version { found: u32, expected: u32 },
    #[error("duplicate layer for pattern {pattern} with {partition} partition")]
    DuplicateLayer { pattern: TestPattern, partition: Partition },
    #[error("layer {pattern}/{partition} has {found} cells (expected {expected})")]
    CellCount { pattern: TestPattern, partition: Partition, found: usize, expected: usize },
    #[error("layer {pattern}/{partition} cell {cell} has {found} entries (expected {expected})")]
    CellLength { pattern: TestPattern, partition: Partition, cell: usize, found: usize, expected: usize },
    #[error("layer {pattern}/{partition} cell {cell} holds sector {sector} (scheme has {count})")]
    SectorIndex { pattern: TestPattern, partition: Partition, cell: usize, sector: u8, count: usize },
}

/// On-disk form of one layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerAsset {
    pub pattern: TestPattern,
    pub partition: Partition,
    /// Indexed `(ix * NY + iy) * NR + ir`.
    pub cells: Vec<Vec<u8>>,
}

/// On-disk form of the whole table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableAsset {
    pub version: u32,
    pub layers: Vec<LayerAsset>,
}

/// A validated, immutable sector table.
#[derive(Debug, Clone, Default)]
pub struct SectorTable {
    layers: HashMap<(TestPattern, Partition), Vec<Vec<u8>>>,
}

impl SectorTable {
    /// Parse and validate a JSON table asset.
    ///
    /// # Errors
    ///
    /// Returns a [`TableError`] if the JSON is malformed or any layer has the
    /// wrong dimensions or out-of-scheme sector indices.
    pub fn from_json(json: &str) -> Result<Self, TableError> {
        let asset: TableAsset = serde_json::from_str(json)?;
        Self::from_asset(asset)
    }

    /// Validate a deserialised asset.
    ///
    /// # Errors
    ///
    /// See [`Self::from_json`].
    pub fn from_asset(asset: TableAsset) -> Result<Self, TableError> {
        if asset.version != TABLE_VERSION {
            return Err(TableError::Version { found: asset.version, expected: TABLE_VERSION });
        }
        let mut layers = HashMap::new();
        for layer in asset.layers {
            validate_layer(&layer)?;
            let key = (layer.pattern, layer.partition);
            if layers.contains_key(&key) {
                return Err(TableError::DuplicateLayer { pattern: layer.pattern, partition: layer.partition });
            }
            tracing::debug!(pattern = %layer.pattern, partition = %layer.partition, "sector layer loaded");
            layers.insert(key, layer.cells);
        }
        tracing::info!(layers = layers.len(), "sector table loaded");
        Ok(Self { layers })
    }

    /// Whether a layer exists for this pattern and partition.
    #[must_use]
    pub fn has_layer(&self, pattern: TestPattern, partition: Partition) -> bool {
        self.layers.contains_key(&(pattern, partition))
    }

    /// The `(pattern, partition)` pairs present, in a stable order.
    #[must_use]
    pub fn layer_keys(&self) -> Vec<(TestPattern, Partition)> {
        let mut keys = Vec::new();
        for pattern in TestPattern::ALL {
            for partition in Partition::ALL {
                if self.has_layer(pattern, partition) {
                    keys.push((pattern, partition));
                }
            }
        }
        keys
    }

    /// Sector index per test location.
    ///
    /// `onhx` carries the sign displayed for `eye`: negative for a left eye,
    /// positive for a right eye.
    ///
    /// # Errors
    ///
    /// [`SectorError::OutOfRange`] if a parameter is outside its bounds, or
    /// [`SectorError::MissingLayer`] if the table lacks this layer.
    pub fn lookup(
        &self,
        eye: Eye,
        onhx: i32,
        onhy: i32,
        raphe: i32,
        pattern: TestPattern,
        partition: Partition,
    ) -> Result<&[u8], SectorError> {
        let cell = cell_index(eye.stored_onhx(onhx), onhy, raphe)?;
        let layer = self
            .layers
            .get(&(pattern, partition))
            .ok_or(SectorError::MissingLayer { pattern, partition })?;
        layer
            .get(cell)
            .map(Vec::as_slice)
            .ok_or(SectorError::MissingLayer { pattern, partition })
    }

    /// [`Self::lookup`] for a parameter set.
    ///
    /// # Errors
    ///
    /// See [`Self::lookup`].
    pub fn lookup_params(
        &self,
        params: &AnatomicalParameters,
        pattern: TestPattern,
        partition: Partition,
    ) -> Result<&[u8], SectorError> {
        self.lookup(params.eye, params.display_onhx(), params.onhy, params.raphe, pattern, partition)
    }
}

fn check(param: Param, value: i32) -> Result<usize, SectorError> {
    let (min, max) = param.bounds();
    if !param.contains(value) {
        return Err(SectorError::OutOfRange { param: param.name(), value, min, max });
    }
    usize::try_from(value - min).map_err(|_| SectorError::OutOfRange { param: param.name(), value, min, max })
}

/// Flat cell index for stored (left-eye) parameters.
///
/// # Errors
///
/// [`SectorError::OutOfRange`] if any value is outside its bounds.
pub fn cell_index(onhx: i32, onhy: i32, raphe: i32) -> Result<usize, SectorError> {
    let ix = check(Param::Onhx, onhx)?;
    let iy = check(Param::Onhy, onhy)?;
    let ir = check(Param::Raphe, raphe)?;
    Ok((ix * NY + iy) * NR + ir)
}

fn validate_layer(layer: &LayerAsset) -> Result<(), TableError> {
    let (pattern, partition) = (layer.pattern, layer.partition);
    if layer.cells.len() != CELLS_PER_LAYER {
        return Err(TableError::CellCount { pattern, partition, found: layer.cells.len(), expected: CELLS_PER_LAYER });
    }
    let expected = pattern.location_count();
    let count = partition.sector_count();
    for (cell, sectors) in layer.cells.iter().enumerate() {
        if sectors.len() != expected {
            return Err(TableError::CellLength { pattern, partition, cell, found: sectors.len(), expected });
        }
        if let Some(&sector) = sectors.iter().find(|&&s| usize::from(s) >= count) {
            return Err(TableError::SectorIndex { pattern, partition, cell, sector, count });
        }
    }
    Ok(())
}
