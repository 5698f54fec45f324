// cli/src/cli/mod.rs

pub mod cli;
pub mod commands;
pub mod handlers;

pub use cli::{resolve_config, start_cli};
pub use commands::CliArgs;
pub use handlers::log_summary;
