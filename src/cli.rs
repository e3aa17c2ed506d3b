//! CLI argument parsing for eventview

use crate::config::ZeroChargePolicy;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for event scenes
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for renderers
    Json,
    /// CSV module table for spreadsheet analysis
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "eventview")]
#[command(version)]
#[command(about = "Build detector event display scenes from pulse and geometry tables", long_about = None)]
pub struct Cli {
    /// Pulse table (JSON array of run/event/string/om/time/charge records)
    #[arg(long = "pulses", value_name = "FILE")]
    pub pulses: PathBuf,

    /// Geometry table (JSON array of string/om/x/y/z records)
    #[arg(long = "geometry", value_name = "FILE")]
    pub geometry: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short = 'C', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Run number of the event to display (requires --event)
    #[arg(long = "run", value_name = "RUN", requires = "event")]
    pub run: Option<u32>,

    /// Event number of the event to display (requires --run)
    #[arg(long = "event", value_name = "EVENT", requires = "run")]
    pub event: Option<u32>,

    /// Display the first N events of the table
    #[arg(short = 'n', long = "events", value_name = "N", conflicts_with_all = ["run", "all"])]
    pub events: Option<usize>,

    /// Display every event in the table
    #[arg(long = "all", conflicts_with = "run")]
    pub all: bool,

    /// Minimum hit modules for automatic event selection (overrides config)
    #[arg(long = "min-modules", value_name = "M")]
    pub min_modules: Option<usize>,

    /// Fraction of hits the color window must cover (overrides config)
    #[arg(long = "coverage", value_name = "FRACTION")]
    pub coverage: Option<f64>,

    /// Handling of events whose modules carry no positive charge (overrides config)
    #[arg(long = "zero-charge", value_enum, value_name = "POLICY")]
    pub zero_charge: Option<ZeroChargePolicy>,

    /// List events in the pulse table and exit
    #[arg(long = "list-events")]
    pub list_events: bool,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long = "debug")]
    pub debug: bool,
}
