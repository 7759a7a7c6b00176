//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::io;
use std::process;

use mapfoundry::build::BuildError;
use mapfoundry::config::ConfigError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration file could not be loaded or is invalid
    Config(ConfigError),
    /// The build pipeline failed
    Build(BuildError),
    /// Project scaffolding failed
    Scaffold { path: String, error: io::Error },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Config(_) => {
                eprintln!();
                eprintln!("Check the config file, or scaffold a fresh project with:");
                eprintln!("  mapfoundry init <directory>");
            }
            CliError::Build(BuildError::LocatorMissing(_)) => {
                eprintln!();
                eprintln!("Add a locator to [project] in the config file:");
                eprintln!("  locator = /path/to/address.loc");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Build(e) => write!(f, "Build failed: {}", e),
            CliError::Scaffold { path, error } => {
                write!(f, "Failed to scaffold project at '{}': {}", path, error)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Build(e) => Some(e),
            CliError::Scaffold { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<BuildError> for CliError {
    fn from(e: BuildError) -> Self {
        CliError::Build(e)
    }
}
