//! MapFoundry CLI - Command-line interface
//!
//! This binary provides a command-line interface to the MapFoundry library.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod error;
mod runner;

use error::CliError;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "mapfoundry")]
#[command(version)]
#[command(about = "Build map documents from declarative project configs", long_about = None)]
struct Cli {
    /// Enable debug-level logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full build pipeline
    Build {
        /// Path to the project config file
        #[arg(long, default_value = "config.ini")]
        config: PathBuf,
    },

    /// Print the operations a build would perform, without running them
    Plan {
        /// Path to the project config file
        #[arg(long, default_value = "config.ini")]
        config: PathBuf,
    },

    /// Check a config file without building
    Validate {
        /// Path to the project config file
        #[arg(long, default_value = "config.ini")]
        config: PathBuf,
    },

    /// Scaffold a new project directory
    Init {
        /// Directory to create the project in
        dir: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let runner = match CliRunner::with_debug(cli.debug) {
        Ok(runner) => runner,
        Err(e) => e.exit(),
    };

    let result = match cli.command {
        Commands::Build { config } => commands::build::run(&runner, &config),
        Commands::Plan { config } => commands::plan::run(&runner, &config),
        Commands::Validate { config } => commands::validate::run(&runner, &config),
        Commands::Init { dir } => commands::init::run(&runner, &dir),
    };

    if let Err(e) = result {
        e.exit();
    }
}
