//! Stage 2: table insertion and the geocode pass.

use tracing::{debug, info};

use super::context::{BuildContext, BuildState};
use super::{BuildError, BuildResult};
use crate::descriptor::Layer;
use crate::engine::{DocumentEngine, GeocodeEngine, StoreEngine};

/// Locator field to table column mapping used for every geocode call.
const ADDRESS_FIELDS: &str = "Street street_1; City city; State state; Zip zip";

/// Counts reported by the table stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableReport {
    /// Tables committed into the document.
    pub tables_added: usize,

    /// Derived layers produced by the geocode pass.
    pub layers_geocoded: usize,
}

impl<D: DocumentEngine> BuildContext<D> {
    /// Consume every pending table: copy its data into the backing store
    /// (replacing any same-name entry), insert it as a tabular view, and
    /// commit it. Then geocode every committed table that asks for it,
    /// enqueueing one derived layer per geocoded table. Saves the
    /// document once at the end.
    pub fn add_tables(
        &mut self,
        engine: &D,
        store: &impl StoreEngine,
        geocoder: &impl GeocodeEngine,
    ) -> BuildResult<TableReport> {
        self.expect_state(BuildState::Initialized, "add_tables")?;

        let mut added = 0;
        while let Some(table) = self.pending_tables.pop() {
            let stored = store
                .copy_table_in(&table.path, &self.store_path, &table.name)
                .map_err(|e| BuildError::engine("add_tables", &table.name, e))?;

            let doc = self
                .document
                .as_mut()
                .ok_or_else(|| BuildError::missing_document("add_tables"))?;
            engine
                .insert_table_view(doc, &stored, &table.name)
                .map_err(|e| BuildError::engine("add_tables", &table.name, e))?;

            debug!("table '{}' committed from {}", table.name, table.path.display());
            self.committed_tables.push(table);
            added += 1;
        }

        let geocoded = self.geocode_tables(geocoder)?;

        let doc = self
            .document
            .as_mut()
            .ok_or_else(|| BuildError::missing_document("add_tables"))?;
        engine
            .save(doc)
            .map_err(|e| BuildError::engine("add_tables", &self.name, e))?;

        self.state = BuildState::TablesCommitted;
        info!("{} table(s) added, {} layer(s) geocoded", added, geocoded);
        Ok(TableReport {
            tables_added: added,
            layers_geocoded: geocoded,
        })
    }

    /// Geocode pass over the committed tables. Each geocodable table's
    /// backing-store copy becomes a point dataset named by its
    /// `geocoded_layer_name`, and the matching derived layer re-enters
    /// the pending layer queue.
    fn geocode_tables(&mut self, geocoder: &impl GeocodeEngine) -> BuildResult<usize> {
        let Some(first) = self.committed_tables.iter().find(|t| t.geocode) else {
            return Ok(0);
        };
        let Some(locator) = self.locator.clone() else {
            return Err(BuildError::LocatorMissing(first.name.clone()));
        };

        let Self {
            committed_tables,
            pending_layers,
            store_path,
            ..
        } = self;

        let mut geocoded = 0;
        for table in committed_tables.iter().filter(|t| t.geocode) {
            let table_path = store_path.join(&table.name);
            let out_path = store_path.join(&table.geocoded_layer_name);
            geocoder
                .geocode(&table_path, &locator, ADDRESS_FIELDS, &out_path)
                .map_err(|e| BuildError::engine("geocode", &table.name, e))?;

            info!(
                "geocoded table '{}' into layer '{}'",
                table.name, table.geocoded_layer_name
            );
            pending_layers.push(Layer::geocoded(table, out_path));
            geocoded += 1;
        }
        Ok(geocoded)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::build::testutil::{initialized, test_config};
    use crate::descriptor::Table;
    use crate::engine::Operation;

    fn table(name: &str) -> Table {
        Table::new(name, format!("/projects/campus/Data/{}.txt", name))
    }

    #[test]
    fn test_tables_consumed_exactly_once() {
        let mut config = test_config();
        config.tables = vec![table("addr"), table("sites")];
        let (_engine, mut ctx) = initialized(config);

        let report = ctx.add_tables(&_engine, &_engine, &_engine).unwrap();
        assert_eq!(report.tables_added, 2);
        assert!(ctx.pending_tables.is_empty());
        assert_eq!(ctx.committed_tables.len(), 2);
        assert_eq!(ctx.state(), BuildState::TablesCommitted);
    }

    #[test]
    fn test_tables_pop_in_reverse_insertion_order() {
        let mut config = test_config();
        config.tables = vec![table("first"), table("second")];
        let (engine, mut ctx) = initialized(config);

        ctx.add_tables(&engine, &engine, &engine).unwrap();

        let committed: Vec<_> = ctx.committed_tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(committed, vec!["second", "first"]);
    }

    #[test]
    fn test_no_geocode_produces_no_pending_layer() {
        let mut config = test_config();
        config.tables = vec![table("addr")];
        let (engine, mut ctx) = initialized(config);

        let report = ctx.add_tables(&engine, &engine, &engine).unwrap();
        assert_eq!(report.layers_geocoded, 0);
        assert!(ctx.pending_layers.is_empty());
    }

    #[test]
    fn test_geocode_produces_exactly_one_pending_layer() {
        let mut config = test_config();
        let mut addr = table("addr");
        addr.geocode = true;
        addr.visible = true;
        config.tables = vec![addr];
        let (engine, mut ctx) = initialized(config);

        let report = ctx.add_tables(&engine, &engine, &engine).unwrap();
        assert_eq!(report.tables_added, 1);
        assert_eq!(report.layers_geocoded, 1);

        let committed: Vec<_> = ctx.committed_tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(committed, vec!["addr"]);

        assert_eq!(ctx.pending_layers.len(), 1);
        let layer = &ctx.pending_layers[0];
        assert_eq!(layer.name, "addr_Geocoded");
        assert!(layer.visible);
        assert_eq!(
            layer.path,
            PathBuf::from("/projects/campus/Output/Campus.store/addr_Geocoded")
        );
    }

    #[test]
    fn test_geocoded_layer_inherits_visibility() {
        let mut config = test_config();
        let mut addr = table("addr");
        addr.geocode = true;
        addr.visible = false;
        config.tables = vec![addr];
        let (engine, mut ctx) = initialized(config);

        ctx.add_tables(&engine, &engine, &engine).unwrap();
        assert!(!ctx.pending_layers[0].visible);
    }

    #[test]
    fn test_geocode_without_locator_fails_before_engine_call() {
        let mut config = test_config();
        config.locator = None;
        let mut addr = table("addr");
        addr.geocode = true;
        config.tables = vec![addr];
        let (engine, mut ctx) = initialized(config);

        let err = ctx.add_tables(&engine, &engine, &engine).unwrap_err();
        assert!(matches!(err, BuildError::LocatorMissing(name) if name == "addr"));
        assert!(!engine
            .operations()
            .iter()
            .any(|op| matches!(op, Operation::Geocode { .. })));
    }

    #[test]
    fn test_saves_document_once_after_tables() {
        let mut config = test_config();
        config.tables = vec![table("addr"), table("sites")];
        let (engine, mut ctx) = initialized(config);

        ctx.add_tables(&engine, &engine, &engine).unwrap();
        let saves = engine
            .operations()
            .iter()
            .filter(|op| matches!(op, Operation::Save))
            .count();
        assert_eq!(saves, 1);
    }
}
