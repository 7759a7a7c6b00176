//! Stage 3: spatial joins.
//!
//! Runs after table insertion (join tables must already be materialized
//! in the backing store) and before layer insertion (the derived layers
//! must re-enter the pending queue in time to be committed).

use tracing::{debug, info};

use super::context::{BuildContext, BuildState};
use super::{BuildError, BuildResult};
use crate::descriptor::SpatialJoinSpec;
use crate::engine::{DocumentEngine, SpatialJoinEngine};

impl<D: DocumentEngine> BuildContext<D> {
    /// Run every spatial join, writing each result dataset into the
    /// backing store and enqueueing the matching derived layer. Returns
    /// the number of joins applied.
    pub fn run_spatial_joins(
        &mut self,
        joiner: &impl SpatialJoinEngine,
        specs: &[SpatialJoinSpec],
    ) -> BuildResult<usize> {
        self.expect_state(BuildState::TablesCommitted, "run_spatial_joins")?;
        if specs.is_empty() {
            debug!("no spatial joins defined");
            return Ok(0);
        }

        for spec in specs {
            let out_path = spec.output_path(&self.store_path);
            let join_path = self.store_path.join(&spec.table_name);
            joiner
                .spatial_join(&spec.layer_path, &join_path, &out_path)
                .map_err(|e| BuildError::engine("spatial_join", spec.output_name(), e))?;

            info!(
                "spatial join of '{}' against '{}' produced layer '{}'",
                spec.layer_name,
                spec.table_name,
                spec.output_name()
            );
            self.pending_layers.push(spec.derived_layer(out_path));
        }
        Ok(specs.len())
    }
}
