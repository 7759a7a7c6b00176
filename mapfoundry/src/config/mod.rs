//! Project configuration loading.
//!
//! A project is described by a single INI file. Loading lives in
//! [`file`], INI-to-struct mapping in [`parser`]. Parse and validation
//! failures surface as [`ConfigError`] before any build stage runs.

mod file;
mod parser;

pub use file::{ConfigError, LegendConfig, ProjectConfig};
