mod commands;
mod config;

use std::path::PathBuf;

use canvas::calibration::CalibrationError;
use canvas::sector::{SectorError, TableError};
use clap::{Parser, Subcommand};
use serde_json::Value;

use commands::{CalibrateArgs, LookupArgs};
use config::Config;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("failed to read {path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("invalid sector table: {0}")]
    Table(#[from] TableError),
    #[error("lookup failed: {0}")]
    Sector(#[from] SectorError),
    #[error("{0}")]
    Calibration(#[from] CalibrationError),
    #[error("scale pair needs exactly two points, got {0}")]
    ScalePair(usize),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "onhmap", about = "Visual-field sector map lookups and ONH calibration")]
struct Cli {
    /// Sector table asset; overrides `ONHMAP_TABLE`.
    #[arg(long, global = true)]
    table: Option<PathBuf>,

    /// Calibration ring diameter in mm; overrides `ONHMAP_RING_DIAMETER_MM`.
    #[arg(long, global = true)]
    ring_diameter_mm: Option<f64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the sector of every test location for one set of parameters.
    Lookup(LookupArgs),
    /// Estimate the ONH position from image landmarks.
    Calibrate(CalibrateArgs),
    /// Load the sector table and report its layers.
    Validate,
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let config = Config::from_env().with_overrides(cli.table, cli.ring_diameter_mm);
    tracing::debug!(?config, "onhmap starting");

    let json = match cli.command {
        Command::Lookup(args) => commands::lookup(&commands::load_table(&config.table_path)?, &args)?,
        Command::Calibrate(args) => commands::calibrate(&args, config.ring_diameter_mm)?,
        Command::Validate => commands::validate(&config.table_path, &commands::load_table(&config.table_path)?),
    };
    print_json(&json)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
