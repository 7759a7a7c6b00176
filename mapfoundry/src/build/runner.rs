//! Drives a full build from a parsed configuration.

use std::fmt;

use tracing::info;

use super::{BuildContext, BuildResult};
use crate::config::ProjectConfig;
use crate::engine::{DocumentEngine, GeocodeEngine, SpatialJoinEngine, StoreEngine};

/// Counts from a completed build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildSummary {
    pub tables_added: usize,
    pub layers_geocoded: usize,
    pub joins_applied: usize,
    pub layers_added: usize,
    pub layers_skipped: usize,
    pub outputs_exported: usize,
}

impl fmt::Display for BuildSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} table(s), {} geocoded, {} join(s), {} layer(s) added ({} skipped), {} output(s)",
            self.tables_added,
            self.layers_geocoded,
            self.joins_applied,
            self.layers_added,
            self.layers_skipped,
            self.outputs_exported
        )
    }
}

/// Run the complete pipeline in its fixed order: initialize, add tables
/// (and geocode), run spatial joins, add layers, sort, configure the
/// legend, style, export. Returns the finished context alongside the
/// summary so callers can inspect committed entities.
pub fn run_build<D, S, G, J>(
    config: ProjectConfig,
    documents: &D,
    store: &S,
    geocoder: &G,
    joiner: &J,
) -> BuildResult<(BuildContext<D>, BuildSummary)>
where
    D: DocumentEngine,
    S: StoreEngine,
    G: GeocodeEngine,
    J: SpatialJoinEngine,
{
    let spatial_joins = config.spatial_joins.clone();
    let sort_rules = config.sort_rules.clone();

    let mut ctx = BuildContext::new(config);
    ctx.initialize(documents, store)?;

    let tables = ctx.add_tables(documents, store, geocoder)?;
    let joins_applied = ctx.run_spatial_joins(joiner, &spatial_joins)?;
    let layers = ctx.add_layers(documents)?;

    ctx.sort_layers(documents, &sort_rules)?;
    ctx.configure_legend(documents)?;
    ctx.style_layers(documents)?;

    let outputs = ctx.save_outputs(documents)?;

    let summary = BuildSummary {
        tables_added: tables.tables_added,
        layers_geocoded: tables.layers_geocoded,
        joins_applied,
        layers_added: layers.added,
        layers_skipped: layers.skipped,
        outputs_exported: outputs.exported,
    };
    info!("build complete: {}", summary);
    Ok((ctx, summary))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::build::testutil::test_config;
    use crate::build::BuildState;
    use crate::descriptor::{SpatialJoinSpec, Table};
    use crate::engine::RecordingEngine;

    #[test]
    fn test_full_pipeline_with_derived_layers() {
        let mut config = test_config();
        let mut addr = Table::new("addr", "/projects/campus/Data/addr.txt");
        addr.geocode = true;
        config.tables = vec![addr];
        config.spatial_joins = vec![SpatialJoinSpec {
            layer_name: "counties".to_string(),
            layer_path: PathBuf::from("/data/counties"),
            table_name: "addr".to_string(),
            layer_style: None,
        }];

        let engine = RecordingEngine::new();
        let (ctx, summary) = run_build(config, &engine, &engine, &engine, &engine).unwrap();

        assert_eq!(summary.tables_added, 1);
        assert_eq!(summary.layers_geocoded, 1);
        assert_eq!(summary.joins_applied, 1);
        // geocoded layer plus join layer, both committed
        assert_eq!(summary.layers_added, 2);
        assert_eq!(summary.layers_skipped, 0);
        assert_eq!(summary.outputs_exported, 0);
        assert_eq!(ctx.state(), BuildState::Exported);

        let names: Vec<_> = ctx.committed_layers.iter().map(|l| l.name.as_str()).collect();
        assert!(names.contains(&"addr_Geocoded"));
        assert!(names.contains(&"counties__addr"));
    }

    #[test]
    fn test_summary_display() {
        let summary = BuildSummary {
            tables_added: 1,
            layers_geocoded: 1,
            joins_applied: 0,
            layers_added: 2,
            layers_skipped: 1,
            outputs_exported: 3,
        };
        let text = summary.to_string();
        assert!(text.contains("1 table(s)"));
        assert!(text.contains("2 layer(s) added (1 skipped)"));
    }
}
