// lib/src/config/config_structs.rs

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Duration;
use log::{debug, info};
use models::{GraphError, GraphResult};
use serde::{Deserialize, Serialize};

use crate::config::config_defaults::*;

/// Runtime settings for the rolling median engine and its stream driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Width of the trailing window, in seconds of event time.
    #[serde(default = "default_window_seconds")]
    pub window_seconds: u64,
    /// Fallback log filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// JSON-lines input; stdin when absent.
    #[serde(default)]
    pub input_path: Option<PathBuf>,
    /// Median output; stdout when absent.
    #[serde(default)]
    pub output_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            window_seconds: default_window_seconds(),
            log_level: default_log_level(),
            input_path: None,
            output_path: None,
        }
    }
}

// Matches the `engine:` key at the top of the YAML file.
#[derive(Debug, Deserialize)]
struct EngineConfigWrapper {
    engine: EngineConfig,
}

impl EngineConfig {
    /// Loads the configuration from a YAML file with a top-level `engine:`
    /// key. A missing or empty file yields the defaults.
    pub fn load(path: &Path) -> GraphResult<EngineConfig> {
        if !path.exists() {
            info!("Config file not found at {:?}, using defaults", path);
            return Ok(EngineConfig::default());
        }

        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            info!("Config file {:?} is empty, using defaults", path);
            return Ok(EngineConfig::default());
        }

        let wrapper: EngineConfigWrapper = serde_yaml2::from_str(&content).map_err(|e| {
            GraphError::ConfigurationError(format!("Failed to parse YAML from {}: {}", path.display(), e))
        })?;
        let config = wrapper.engine.validate()?;
        debug!("Loaded config from {:?}: {:?}", path, config);
        Ok(config)
    }

    pub fn validate(self) -> GraphResult<EngineConfig> {
        if self.window_seconds == 0 {
            return Err(GraphError::ConfigurationError(
                "window_seconds must be greater than zero".to_string(),
            ));
        }
        if self.window_seconds > MAX_WINDOW_SECONDS {
            return Err(GraphError::ConfigurationError(format!(
                "window_seconds {} exceeds the maximum of {}",
                self.window_seconds, MAX_WINDOW_SECONDS
            )));
        }
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(GraphError::ConfigurationError(format!(
                "unknown log_level '{}', expected one of {:?}",
                self.log_level, LOG_LEVELS
            )));
        }
        Ok(self)
    }

    pub fn window(&self) -> GraphResult<Duration> {
        i64::try_from(self.window_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or_else(|| {
                GraphError::ConfigurationError(format!("window_seconds {} is out of range", self.window_seconds))
            })
    }
}
