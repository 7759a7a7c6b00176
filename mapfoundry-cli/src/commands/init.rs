//! Init command: scaffold a new project directory.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Starter template: an empty document manifest.
const TEMPLATE: &str = "{}\n";

/// Scaffold a project at `dir`: data and style directories, an empty
/// document template, and a starter config wired to all of them. The
/// resulting project builds as-is (producing an empty document).
pub fn run(runner: &CliRunner, dir: &Path) -> Result<(), CliError> {
    runner.log_startup("init");

    scaffold(dir).map_err(|error| CliError::Scaffold {
        path: dir.display().to_string(),
        error,
    })?;

    println!("Project scaffolded at {}", dir.display());
    println!("  edit {} and run:", dir.join("config.ini").display());
    println!("  mapfoundry build --config {}", dir.join("config.ini").display());
    Ok(())
}

fn scaffold(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir.join("Data"))?;
    fs::create_dir_all(dir.join("Styles"))?;

    let template = dir.join("base.mapdoc");
    fs::write(&template, TEMPLATE)?;

    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Project".to_string());

    let config = format!(
        "[project]\n\
         name = {name}\n\
         author = Unknown Author\n\
         base_path = {base}\n\
         template = {template}\n\
         # locator = /path/to/address.loc\n\
         # header_prefix = {name} Maps\n\
         # output_prefix = Map\n\
         \n\
         # [table addresses]\n\
         # extension = .txt\n\
         # geocode = true\n\
         \n\
         # [layer roads]\n\
         # path = /path/to/roads\n\
         # style = roads.style\n\
         \n\
         # [output Overview]\n\
         # xmin = 0\n\
         # ymin = 0\n\
         # xmax = 1\n\
         # ymax = 1\n",
        name = name,
        base = dir.display(),
        template = template.display(),
    );
    fs::write(dir.join("config.ini"), config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapfoundry::build::run_build;
    use mapfoundry::config::ProjectConfig;
    use mapfoundry::engine::FsEngine;
    use tempfile::TempDir;

    #[test]
    fn test_scaffold_creates_project_layout() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("campus");
        scaffold(&dir).unwrap();

        assert!(dir.join("Data").is_dir());
        assert!(dir.join("Styles").is_dir());
        assert!(dir.join("base.mapdoc").is_file());
        assert!(dir.join("config.ini").is_file());
    }

    #[test]
    fn test_scaffolded_project_builds() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("campus");
        scaffold(&dir).unwrap();

        let config = ProjectConfig::load_from(&dir.join("config.ini")).unwrap();
        assert_eq!(config.name, "campus");

        let engine = FsEngine::new();
        let (ctx, summary) = run_build(config, &engine, &engine, &engine, &engine).unwrap();
        assert_eq!(summary.tables_added, 0);
        assert!(ctx.workspace_path.join("campus.mapdoc").exists());
    }
}
