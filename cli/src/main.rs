// cli/src/main.rs

// Entry point for the rolling-degree binary. Argument parsing, logging setup
// and stream handling live in the cli module.

use anyhow::Result;
use rolling_degree_cli::cli::start_cli;

fn main() -> Result<()> {
    start_cli()
}
