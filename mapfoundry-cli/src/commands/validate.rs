//! Validate command: load and check a config file without building.

use std::path::Path;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Parse the config file and report what it declares. Parsing performs
/// full validation, so reaching the summary means the file is usable.
pub fn run(runner: &CliRunner, config_path: &Path) -> Result<(), CliError> {
    runner.log_startup("validate");
    let config = runner.load_config(config_path)?;

    println!("Config OK: project '{}' by {}", config.name, config.author);
    println!("  base path: {}", config.base_path.display());
    println!("  template:  {}", config.template.display());
    println!("  tables:    {}", config.tables.len());
    println!("  layers:    {}", config.layers.len());
    println!("  joins:     {}", config.spatial_joins.len());
    println!("  sorts:     {}", config.sort_rules.len());
    println!("  outputs:   {}", config.outputs.len());

    let wants_geocode = config.tables.iter().any(|t| t.geocode);
    if wants_geocode && config.locator.is_none() {
        println!();
        println!("Warning: a table requests geocoding but [project] has no locator.");
        println!("The build will fail until one is configured.");
    }

    Ok(())
}
