//! JSON configuration file adapter.
//!
//! Implements [`ConfigPort`] by reading an optional file.  Without a path
//! the defaults are returned.

use std::fs;
use std::path::PathBuf;

use log::info;

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::HarnessConfig;

/// Environment variable naming the config file when no CLI argument is given.
pub const CONFIG_ENV: &str = "POWERBLOCK_CONFIG";

pub struct JsonConfigFile {
    path: Option<PathBuf>,
}

impl JsonConfigFile {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// First CLI argument, else `$POWERBLOCK_CONFIG`, else none.
    pub fn from_env() -> Self {
        let path = std::env::args_os()
            .nth(1)
            .or_else(|| std::env::var_os(CONFIG_ENV))
            .map(PathBuf::from);
        Self::new(path)
    }
}

impl ConfigPort for JsonConfigFile {
    fn load(&self) -> Result<HarnessConfig, ConfigError> {
        let Some(path) = &self.path else {
            info!("No config file given, using defaults");
            return Ok(HarnessConfig::default());
        };
        let text = fs::read_to_string(path).map_err(ConfigError::Io)?;
        let config = HarnessConfig::from_json(&text)?;
        info!("Config loaded from {}", path.display());
        Ok(config)
    }
}
