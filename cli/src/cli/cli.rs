// cli/src/cli/cli.rs

use std::env;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, LevelFilter};
use rolling_degree_lib::config::{default_config_path, EngineConfig, DEFAULT_LOG_LEVEL};
use rolling_degree_lib::{StreamProcessor, StreamStats};

use crate::cli::commands::CliArgs;
use crate::cli::handlers::log_summary;

/// CLI entry point: parse arguments, start logging, resolve config and run
/// the stream to completion.
pub fn start_cli() -> Result<()> {
    let args = CliArgs::parse();
    let from_env = init_logging(args.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL));
    let config = resolve_config(&args)?;
    if !from_env {
        log::set_max_level(level_filter(&config.log_level));
    }
    debug!("Resolved configuration: {:?}", config);

    let mut processor = StreamProcessor::from_config(&config)?;
    let stats = match &config.input_path {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("Failed to open input file {}", path.display()))?;
            info!("Reading events from {}", path.display());
            run_stream(&mut processor, BufReader::new(file), &config)?
        }
        None => {
            info!("Reading events from stdin");
            run_stream(&mut processor, io::stdin().lock(), &config)?
        }
    };

    if args.summary {
        log_summary(&processor, &stats);
    }
    Ok(())
}

/// Loads the config file (explicit path, or the default file name if it
/// exists) and applies command-line overrides on top.
pub fn resolve_config(args: &CliArgs) -> Result<EngineConfig> {
    let path = args.config.clone().unwrap_or_else(default_config_path);
    let mut config = EngineConfig::load(&path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;

    if let Some(input) = &args.input {
        config.input_path = Some(input.clone());
    }
    if let Some(output) = &args.output {
        config.output_path = Some(output.clone());
    }
    if let Some(window_seconds) = args.window_seconds {
        config.window_seconds = window_seconds;
    }
    if let Some(level) = &args.log_level {
        config.log_level = level.clone();
    }
    config.validate().context("Invalid configuration")
}

// Returns whether RUST_LOG controls filtering. Otherwise the logger passes
// every record and the global max level filters.
fn init_logging(level: &str) -> bool {
    if env::var_os("RUST_LOG").is_some() {
        env_logger::Builder::from_env(env_logger::Env::default()).init();
        return true;
    }
    env_logger::Builder::new().filter_level(LevelFilter::Trace).init();
    log::set_max_level(level_filter(level));
    false
}

fn level_filter(level: &str) -> LevelFilter {
    level.parse().unwrap_or(LevelFilter::Info)
}

fn run_stream<R: BufRead>(processor: &mut StreamProcessor, input: R, config: &EngineConfig) -> Result<StreamStats> {
    let stats = match &config.output_path {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("Failed to create output file {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            let stats = processor.run(input, &mut writer)?;
            writer.flush()?;
            info!("Wrote {} medians to {}", stats.processed(), path.display());
            stats
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            processor.run(input, &mut writer)?
        }
    };
    Ok(stats)
}
