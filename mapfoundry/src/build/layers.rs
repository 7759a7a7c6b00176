//! Stages 4-7: layer insertion, sorting, legend configuration, styling.

use tracing::{debug, info};

use super::context::{BuildContext, BuildState};
use super::{BuildError, BuildResult};
use crate::descriptor::SortRule;
use crate::engine::DocumentEngine;

/// Counts reported by the layer-insertion stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerReport {
    /// Layers inserted into the document.
    pub added: usize,

    /// Layers discarded for being invisible.
    pub skipped: usize,
}

impl<D: DocumentEngine> BuildContext<D> {
    /// Consume every pending layer, configured and derived alike. Layers
    /// with `visible = false` are counted as skipped and discarded; they
    /// are never inserted, styled, or sortable. The document is saved
    /// once after the loop, not per layer.
    pub fn add_layers(&mut self, engine: &D) -> BuildResult<LayerReport> {
        self.expect_state(BuildState::TablesCommitted, "add_layers")?;

        let mut added = 0;
        let mut skipped = 0;
        while let Some(layer) = self.pending_layers.pop() {
            if !layer.visible {
                debug!("layer '{}' skipped: not visible", layer.name);
                skipped += 1;
                continue;
            }

            let doc = self
                .document
                .as_mut()
                .ok_or_else(|| BuildError::missing_document("add_layers"))?;
            engine
                .insert_layer(doc, &layer.path, &layer.name, layer.definition_query.as_deref())
                .map_err(|e| BuildError::engine("add_layers", &layer.name, e))?;

            debug!("layer '{}' committed from {}", layer.name, layer.path.display());
            self.committed_layers.push(layer);
            added += 1;
        }

        let doc = self
            .document
            .as_mut()
            .ok_or_else(|| BuildError::missing_document("add_layers"))?;
        engine
            .save(doc)
            .map_err(|e| BuildError::engine("add_layers", &self.name, e))?;

        self.state = BuildState::LayersCommitted;
        info!("{} layer(s) added, {} skipped for visibility", added, skipped);
        Ok(LayerReport { added, skipped })
    }

    /// Re-order committed layers. Both layers named by a rule must have
    /// been committed; otherwise the build halts before the move. An
    /// empty rule list is a logged no-op, never an error.
    pub fn sort_layers(&mut self, engine: &D, rules: &[SortRule]) -> BuildResult<()> {
        self.expect_state(BuildState::LayersCommitted, "sort_layers")?;

        if rules.is_empty() {
            info!("no sort defined");
            self.state = BuildState::Sorted;
            return Ok(());
        }

        for rule in rules {
            for name in [&rule.move_layer_name, &rule.ref_layer_name] {
                if !self.committed_layers.iter().any(|l| &l.name == name) {
                    return Err(BuildError::LayerNotFound(name.clone()));
                }
            }

            let doc = self
                .document
                .as_mut()
                .ok_or_else(|| BuildError::missing_document("sort_layers"))?;
            engine
                .move_layer(
                    doc,
                    &rule.move_layer_name,
                    &rule.ref_layer_name,
                    rule.insert_position,
                )
                .map_err(|e| BuildError::engine("sort_layers", &rule.move_layer_name, e))?;
            debug!(
                "moved layer '{}' {} '{}'",
                rule.move_layer_name, rule.insert_position, rule.ref_layer_name
            );
        }

        self.state = BuildState::Sorted;
        Ok(())
    }

    /// Configure the legend: enable auto-add, position it, apply the item
    /// style, disable auto-add. The enable/disable pair brackets legend
    /// mutation; applying the style re-scans already-inserted layers, so
    /// auto-add need not have been active while layers were committed.
    pub fn configure_legend(&mut self, engine: &D) -> BuildResult<()> {
        self.expect_state(BuildState::Sorted, "configure_legend")?;

        let Self {
            document, legend, ..
        } = self;
        let doc = document
            .as_mut()
            .ok_or_else(|| BuildError::missing_document("configure_legend"))?;
        let wrap = |e| BuildError::engine("configure_legend", "legend", e);

        engine.set_legend_auto_add(doc, true).map_err(wrap)?;
        engine
            .set_legend_position(doc, legend.x, legend.y)
            .map_err(wrap)?;
        engine.apply_legend_style(doc, &legend.style).map_err(wrap)?;
        engine.set_legend_auto_add(doc, false).map_err(wrap)?;

        debug!(
            "legend configured at ({}, {}) with style '{}'",
            legend.x, legend.y, legend.style
        );
        Ok(())
    }

    /// Apply every committed layer's style, resolved against the project
    /// style path. Layers without a style are left as inserted.
    pub fn style_layers(&mut self, engine: &D) -> BuildResult<()> {
        self.expect_state(BuildState::Sorted, "style_layers")?;

        let Self {
            document,
            committed_layers,
            style_path,
            ..
        } = self;
        let doc = document
            .as_mut()
            .ok_or_else(|| BuildError::missing_document("style_layers"))?;

        for layer in committed_layers.iter() {
            let Some(style) = layer.style.as_deref().filter(|s| !s.is_empty()) else {
                continue;
            };
            let path = style_path.join(style);
            engine
                .apply_symbology(doc, &layer.name, &path)
                .map_err(|e| BuildError::engine("style_layers", &layer.name, e))?;
            debug!("styled layer '{}' from {}", layer.name, path.display());
        }

        self.state = BuildState::Styled;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::testutil::{initialized, test_config};
    use crate::config::ProjectConfig;
    use crate::descriptor::{InsertPosition, Layer};
    use crate::engine::{Operation, RecordingEngine};

    fn layer(name: &str) -> Layer {
        Layer::new(name, format!("/data/{}", name))
    }

    fn committed(
        config: ProjectConfig,
    ) -> (RecordingEngine, crate::build::BuildContext<RecordingEngine>) {
        let (engine, mut ctx) = initialized(config);
        ctx.add_tables(&engine, &engine, &engine).unwrap();
        ctx.add_layers(&engine).unwrap();
        (engine, ctx)
    }

    #[test]
    fn test_invisible_layers_skipped_and_never_committed() {
        let mut config = test_config();
        let mut hidden = layer("hidden");
        hidden.visible = false;
        config.layers = vec![layer("roads"), hidden];

        let (engine, mut ctx) = initialized(config);
        ctx.add_tables(&engine, &engine, &engine).unwrap();
        let report = ctx.add_layers(&engine).unwrap();

        assert_eq!(report.added, 1);
        assert_eq!(report.skipped, 1);
        assert!(ctx.committed_layers.iter().all(|l| l.name != "hidden"));
        assert!(!engine.operations().iter().any(
            |op| matches!(op, Operation::InsertLayer { name, .. } if name == "hidden"),
        ));
    }

    #[test]
    fn test_layers_pop_in_reverse_insertion_order() {
        let mut config = test_config();
        config.layers = vec![layer("first"), layer("second")];
        let (_engine, ctx) = committed(config);

        let names: Vec<_> = ctx.committed_layers.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["second", "first"]);
    }

    #[test]
    fn test_add_layers_saves_once() {
        let mut config = test_config();
        config.layers = vec![layer("a"), layer("b"), layer("c")];
        let (engine, _ctx) = committed(config);

        // one save from add_tables, one from add_layers
        let saves = engine
            .operations()
            .iter()
            .filter(|op| matches!(op, Operation::Save))
            .count();
        assert_eq!(saves, 2);
    }

    #[test]
    fn test_sort_no_rules_is_a_no_op() {
        let (engine, mut ctx) = committed(test_config());
        ctx.sort_layers(&engine, &[]).unwrap();
        assert_eq!(ctx.state(), BuildState::Sorted);
        assert!(!engine
            .operations()
            .iter()
            .any(|op| matches!(op, Operation::MoveLayer { .. })));
    }

    #[test]
    fn test_sort_unknown_layer_halts_before_move() {
        let mut config = test_config();
        config.layers = vec![layer("roads")];
        let (engine, mut ctx) = committed(config);

        let rule = SortRule {
            move_layer_name: "ghost".to_string(),
            ref_layer_name: "roads".to_string(),
            insert_position: InsertPosition::Before,
        };
        let err = ctx.sort_layers(&engine, &[rule]).unwrap_err();
        assert!(matches!(err, BuildError::LayerNotFound(name) if name == "ghost"));
        assert!(!engine
            .operations()
            .iter()
            .any(|op| matches!(op, Operation::MoveLayer { .. })));
    }

    #[test]
    fn test_sort_applies_rules() {
        let mut config = test_config();
        config.layers = vec![layer("roads"), layer("parcels")];
        let (engine, mut ctx) = committed(config);

        let rule = SortRule {
            move_layer_name: "roads".to_string(),
            ref_layer_name: "parcels".to_string(),
            insert_position: InsertPosition::After,
        };
        ctx.sort_layers(&engine, &[rule]).unwrap();

        assert!(engine.operations().iter().any(|op| matches!(
            op,
            Operation::MoveLayer { move_name, .. } if move_name == "roads"
        )));
    }

    #[test]
    fn test_legend_brackets_with_auto_add() {
        let (engine, mut ctx) = committed(test_config());
        ctx.sort_layers(&engine, &[]).unwrap();
        ctx.configure_legend(&engine).unwrap();

        let legend_ops: Vec<_> = engine
            .operations()
            .into_iter()
            .filter(|op| {
                matches!(
                    op,
                    Operation::SetLegendAutoAdd(_)
                        | Operation::SetLegendPosition { .. }
                        | Operation::ApplyLegendStyle(_)
                )
            })
            .collect();

        assert_eq!(legend_ops.first(), Some(&Operation::SetLegendAutoAdd(true)));
        assert_eq!(legend_ops.last(), Some(&Operation::SetLegendAutoAdd(false)));
        assert_eq!(legend_ops.len(), 4);
    }

    #[test]
    fn test_style_layers_only_styles_styled_layers() {
        let mut config = test_config();
        let mut styled = layer("styled");
        styled.style = Some("styled.style".to_string());
        config.layers = vec![layer("plain"), styled];

        let (engine, mut ctx) = committed(config);
        ctx.sort_layers(&engine, &[]).unwrap();
        ctx.configure_legend(&engine).unwrap();
        ctx.style_layers(&engine).unwrap();

        let styled_ops: Vec<_> = engine
            .operations()
            .into_iter()
            .filter_map(|op| match op {
                Operation::ApplySymbology { target_name, style_path } => {
                    Some((target_name, style_path))
                }
                _ => None,
            })
            .collect();

        assert_eq!(styled_ops.len(), 1);
        assert_eq!(styled_ops[0].0, "styled");
        assert_eq!(
            styled_ops[0].1,
            std::path::PathBuf::from("/projects/campus/Styles/styled.style")
        );
        assert_eq!(ctx.state(), BuildState::Styled);
    }
}
