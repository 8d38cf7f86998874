//! Application configuration loaded from config files and environment
//!
//! Sources, in override order: `conf/dcman.yml` (optional), then
//! `dcman`-prefixed environment variables (e.g. `DCMAN.LOG.DIR`).

use std::path::PathBuf;

use config::{Config, Environment, File};
use dcman_common::DcmanError;

use super::logging::LoggingConfig;

#[derive(Clone, Debug, Default)]
pub struct Configuration {
    config: Config,
}

impl Configuration {
    /// Load configuration from the default file location and environment
    pub fn new() -> Result<Self, DcmanError> {
        Self::from_file(None)
    }

    /// Load configuration, optionally from an explicit file path
    pub fn from_file(path: Option<&str>) -> Result<Self, DcmanError> {
        let mut builder = Config::builder();
        builder = match path {
            Some(p) => builder.add_source(File::with_name(p)),
            None => builder.add_source(File::with_name("conf/dcman.yml").required(false)),
        };
        let config = builder
            .add_source(Environment::with_prefix("dcman").separator(".").try_parsing(true))
            .build()
            .map_err(|e| DcmanError::ConfigError(e.to_string()))?;
        Ok(Configuration { config })
    }

    pub fn log_dir(&self) -> Option<PathBuf> {
        self.config.get_string("log.dir").ok().map(PathBuf::from)
    }

    pub fn log_level(&self) -> String {
        self.config
            .get_string("log.level")
            .unwrap_or_else(|_| "info".to_string())
    }

    /// Path to a JSON device inventory loaded at startup
    pub fn inventory_path(&self) -> Option<String> {
        self.config.get_string("inventory.path").ok()
    }

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            dir: self.log_dir(),
            level: self.log_level(),
        }
    }
}
