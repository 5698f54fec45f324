// cli/src/cli/commands.rs

use std::path::PathBuf;

use clap::Parser;

/// Command-line arguments. Every option overrides the matching key in the
/// YAML config file.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "rolling-degree")]
#[command(version = "0.1.0")]
#[command(about = "Median degree of a payment graph over a trailing time window")]
pub struct CliArgs {
    /// JSON-lines input, one payment per line. Reads stdin when omitted.
    #[arg(short = 'i', long = "input", value_name = "PATH")]
    pub input: Option<PathBuf>,
    /// Destination for the median lines. Writes stdout when omitted.
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
    /// YAML config file with a top-level `engine:` key.
    #[arg(short = 'c', long = "config", value_name = "PATH", env = "ROLLING_DEGREE_CONFIG")]
    pub config: Option<PathBuf>,
    /// Width of the trailing window in seconds.
    #[arg(short = 'w', long = "window-seconds", value_name = "SECS")]
    pub window_seconds: Option<u64>,
    /// Log filter used when RUST_LOG is unset (error, warn, info, debug, trace).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,
    /// Log ledger and graph statistics after the stream ends.
    #[arg(long = "summary")]
    pub summary: bool,
}
