//! Plan command: dry-run the pipeline and print what it would do.

use std::path::Path;

use mapfoundry::build::run_build;
use mapfoundry::engine::RecordingEngine;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the pipeline against a recording backend and print every engine
/// operation in execution order. Nothing touches the filesystem.
pub fn run(runner: &CliRunner, config_path: &Path) -> Result<(), CliError> {
    runner.log_startup("plan");
    let config = runner.load_config(config_path)?;

    println!("Plan for project '{}':", config.name);

    let engine = RecordingEngine::new();
    let (_, summary) = run_build(config, &engine, &engine, &engine, &engine)?;

    for (index, op) in engine.operations().iter().enumerate() {
        println!("{:3}. {}", index + 1, op);
    }
    println!();
    println!("{}", summary);

    Ok(())
}
