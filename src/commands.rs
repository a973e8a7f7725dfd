//! Subcommand bodies. Each returns the JSON document `main` prints.

#[cfg(test)]
#[path = "commands_test.rs"]
mod tests;

use std::path::Path;

use canvas::calibration::{self, LandmarkTriple, OnhEstimate};
use canvas::params::{AnatomicalParameters, Eye, Param};
use canvas::pattern::{Partition, TestPattern};
use canvas::sector::{CELLS_PER_LAYER, SectorTable, TABLE_VERSION};
use canvas::viewport::Point;
use clap::Args;
use serde_json::{Value, json};

use crate::CliError;

#[derive(Args, Debug, Clone)]
pub struct LookupArgs {
    #[arg(long)]
    pub eye: Eye,
    /// Horizontal ONH offset in degrees, signed as displayed for the eye.
    #[arg(long, allow_hyphen_values = true)]
    pub onhx: i32,
    #[arg(long, allow_hyphen_values = true)]
    pub onhy: i32,
    #[arg(long)]
    pub raphe: i32,
    #[arg(long, default_value = "24-2")]
    pub pattern: TestPattern,
    #[arg(long, default_value = "thirty")]
    pub partition: Partition,
    /// Clamp parameters into the table's bounds instead of rejecting them.
    #[arg(long, default_value_t = false)]
    pub clamp: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CalibrateArgs {
    /// Fovea centre in image pixels, as `x,y`.
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    pub fovea: Point,
    /// ONH centre in image pixels.
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    pub onh: Point,
    /// A point on the ring edge; the ring is centred on the ONH.
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true, required_unless_present = "scale")]
    pub ring: Option<Point>,
    /// Two points one ring radius apart, used instead of `--ring`.
    #[arg(long, value_parser = parse_point, num_args = 2, allow_hyphen_values = true, conflicts_with = "ring")]
    pub scale: Vec<Point>,
    /// Raphe angle carried into the resulting parameters.
    #[arg(long, default_value_t = 170)]
    pub raphe: i32,
}

/// Parse `"x,y"` into a point.
///
/// # Errors
///
/// Returns a message naming the malformed input.
pub fn parse_point(raw: &str) -> Result<Point, String> {
    let Some((x, y)) = raw.split_once(',') else {
        return Err(format!("expected 'x,y', got '{raw}'"));
    };
    let parse = |s: &str| {
        let s = s.trim();
        s.parse::<f64>().map_err(|e| format!("bad coordinate '{s}' in '{raw}': {e}"))
    };
    let point = Point::new(parse(x)?, parse(y)?);
    if point.x.is_finite() && point.y.is_finite() {
        Ok(point)
    } else {
        Err(format!("coordinates must be finite, got '{raw}'"))
    }
}

/// Read and validate the table asset at `path`.
///
/// # Errors
///
/// [`CliError::Read`] if the file cannot be read, [`CliError::Table`] if it
/// does not validate.
pub fn load_table(path: &Path) -> Result<SectorTable, CliError> {
    let json = std::fs::read_to_string(path)
        .map_err(|source| CliError::Read { path: path.display().to_string(), source })?;
    Ok(SectorTable::from_json(&json)?)
}

/// # Errors
///
/// [`CliError::Sector`] when a parameter is out of range (and `--clamp` was
/// not given) or the table lacks the requested layer.
pub fn lookup(table: &SectorTable, args: &LookupArgs) -> Result<Value, CliError> {
    let (onhx, onhy, raphe) = if args.clamp {
        let params = AnatomicalParameters::new(args.eye, args.eye.stored_onhx(args.onhx), args.onhy, args.raphe);
        (params.display_onhx(), params.onhy, params.raphe)
    } else {
        (args.onhx, args.onhy, args.raphe)
    };

    let sectors = table.lookup(args.eye, onhx, onhy, raphe, args.pattern, args.partition)?;
    let colors: Vec<&str> = sectors.iter().filter_map(|&s| args.partition.color(s)).collect();
    tracing::debug!(eye = args.eye.as_str(), onhx, onhy, raphe, "lookup");

    Ok(json!({
        "eye": args.eye,
        "onhx": onhx,
        "onhy": onhy,
        "raphe": raphe,
        "pattern": args.pattern,
        "partition": args.partition,
        "sectors": sectors,
        "colors": colors,
    }))
}

/// # Errors
///
/// [`CliError::Calibration`] for degenerate landmarks or ring diameter,
/// [`CliError::ScalePair`] if `--scale` did not carry two points.
pub fn calibrate(args: &CalibrateArgs, ring_diameter_mm: f64) -> Result<Value, CliError> {
    let estimate = match (args.ring, args.scale.as_slice()) {
        (Some(ring), _) => {
            let triple = LandmarkTriple { fovea: args.fovea, ring, onh: args.onh };
            calibration::estimate_from_triple(&triple, ring_diameter_mm)?
        }
        (None, [a, b]) => calibration::estimate_direct(args.fovea, (*a, *b), args.onh, ring_diameter_mm)?,
        (None, other) => return Err(CliError::ScalePair(other.len())),
    };
    Ok(estimate_json(&estimate, args.raphe))
}

fn estimate_json(estimate: &OnhEstimate, raphe: i32) -> Value {
    let base = AnatomicalParameters { raphe: Param::Raphe.clamp(raphe), ..AnatomicalParameters::default() };
    let params = estimate.apply_to(base);
    json!({
        "eye": estimate.eye,
        "onhx_deg": estimate.onhx_deg,
        "onhy_deg": estimate.onhy_deg,
        "onhx_label": estimate.onhx_label(),
        "onhy_label": estimate.onhy_label(),
        "params": {
            "eye": params.eye,
            "onhx": params.display_onhx(),
            "onhy": params.onhy,
            "raphe": params.raphe,
        },
    })
}

/// Summary of a loaded table: which layers exist and which are missing.
pub fn validate(path: &Path, table: &SectorTable) -> Value {
    let present = table.layer_keys();
    let layers: Vec<Value> = present
        .iter()
        .map(|&(pattern, partition)| {
            json!({
                "pattern": pattern,
                "partition": partition,
                "locations": pattern.location_count(),
                "sectors": partition.sector_count(),
            })
        })
        .collect();
    let missing: Vec<Value> = TestPattern::ALL
        .into_iter()
        .flat_map(|pattern| Partition::ALL.into_iter().map(move |partition| (pattern, partition)))
        .filter(|key| !present.contains(key))
        .map(|(pattern, partition)| json!({ "pattern": pattern, "partition": partition }))
        .collect();
    if !missing.is_empty() {
        tracing::warn!(missing = missing.len(), "sector table is missing layers");
    }
    json!({
        "path": path.display().to_string(),
        "version": TABLE_VERSION,
        "cells_per_layer": CELLS_PER_LAYER,
        "layers": layers,
        "missing": missing,
    })
}
