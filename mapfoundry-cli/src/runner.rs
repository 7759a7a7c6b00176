//! CLI runner for common setup and operations.
//!
//! Encapsulates logging initialization and config loading to reduce
//! duplication across command handlers.

use std::path::Path;

use tracing::info;

use mapfoundry::config::ProjectConfig;
use mapfoundry::logging::{default_log_dir, default_log_file, init_logging, LoggingGuard};

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
}

impl CliRunner {
    /// Create a new CLI runner with optional debug logging.
    ///
    /// # Arguments
    ///
    /// * `debug_mode` - When true, enables debug-level logging regardless of RUST_LOG
    pub fn with_debug(debug_mode: bool) -> Result<Self, CliError> {
        let logging_guard = init_logging(default_log_dir(), default_log_file(), debug_mode)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self { logging_guard })
    }

    /// Load a project configuration from `path`.
    pub fn load_config(&self, path: &Path) -> Result<ProjectConfig, CliError> {
        let config = ProjectConfig::load_from(path)?;
        info!("loaded config for project '{}' from {}", config.name, path.display());
        Ok(config)
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("MapFoundry v{}", mapfoundry::VERSION);
        info!("MapFoundry CLI: {} command", command);
    }
}
