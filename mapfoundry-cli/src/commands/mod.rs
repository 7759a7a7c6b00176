//! CLI command implementations.
//!
//! Each subcommand has its own module with its handler.
//!
//! # Command Modules
//!
//! - [`build`] - Run the full build pipeline against the filesystem backend
//! - [`init`] - Scaffold a new project directory
//! - [`plan`] - Dry-run the pipeline and print the operations it would perform
//! - [`validate`] - Load and check a config file without building

pub mod build;
pub mod init;
pub mod plan;
pub mod validate;
