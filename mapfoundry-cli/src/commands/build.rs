//! Build command: run the full pipeline against the filesystem backend.

use std::path::Path;

use mapfoundry::build::run_build;
use mapfoundry::engine::FsEngine;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Run a build from the config file at `config_path`.
pub fn run(runner: &CliRunner, config_path: &Path) -> Result<(), CliError> {
    runner.log_startup("build");
    let config = runner.load_config(config_path)?;

    println!("Building project '{}'...", config.name);

    let engine = FsEngine::new();
    let (ctx, summary) = run_build(config, &engine, &engine, &engine, &engine)?;

    println!("Build complete: {}", summary);
    println!("Workspace: {}", ctx.workspace_path.display());
    for output in &ctx.outputs {
        println!("  output: {}", output.name);
    }

    Ok(())
}
