//! Build context: the caller-owned state every stage operates on.

use std::fmt;
use std::path::PathBuf;

use tracing::{debug, info};

use super::{BuildError, BuildResult};
use crate::config::{LegendConfig, ProjectConfig};
use crate::descriptor::{Layer, OutputSpec, Table};
use crate::engine::{DocumentEngine, StoreEngine};

/// Project lifecycle states. Transitions are strictly forward and occur
/// only when the corresponding stage completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BuildState {
    Uninitialized,
    Initialized,
    TablesCommitted,
    LayersCommitted,
    Sorted,
    Styled,
    Exported,
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuildState::Uninitialized => "uninitialized",
            BuildState::Initialized => "initialized",
            BuildState::TablesCommitted => "tables committed",
            BuildState::LayersCommitted => "layers committed",
            BuildState::Sorted => "sorted",
            BuildState::Styled => "styled",
            BuildState::Exported => "exported",
        };
        write!(f, "{}", name)
    }
}

/// All mutable state of one build, owned by the caller.
///
/// Pending queues are consumed by popping from the end, so entities are
/// processed in reverse insertion order. Derived layers (geocoded tables,
/// spatial joins) are appended to `pending_layers` mid-pipeline and are
/// indistinguishable from configured layers thereafter.
pub struct BuildContext<D: DocumentEngine> {
    pub name: String,
    pub author: String,
    pub description: Option<String>,

    pub base_path: PathBuf,
    /// `{base_path}/Output`: document, store, and exports land here.
    pub workspace_path: PathBuf,
    /// `{base_path}/Data`: default directory for table source data.
    pub data_path: PathBuf,
    /// `{base_path}/Styles`: layer style references resolve against this.
    pub style_path: PathBuf,
    /// Backing store location inside the workspace.
    pub store_path: PathBuf,

    pub(super) template: PathBuf,
    pub(super) locator: Option<PathBuf>,
    pub(super) header_prefix: Option<String>,
    pub(super) output_prefix: Option<String>,
    pub(super) legend: LegendConfig,

    pub pending_tables: Vec<Table>,
    pub pending_layers: Vec<Layer>,
    pub committed_tables: Vec<Table>,
    pub committed_layers: Vec<Layer>,
    pub outputs: Vec<OutputSpec>,

    pub(super) document: Option<D::Doc>,
    pub(super) state: BuildState,
}

impl<D: DocumentEngine> BuildContext<D> {
    /// Build a context from a validated configuration. Derives the
    /// workspace, data, style, and store paths from `base_path`.
    pub fn new(config: ProjectConfig) -> Self {
        let workspace_path = config.base_path.join("Output");
        let data_path = config.base_path.join("Data");
        let style_path = config.base_path.join("Styles");
        let store_path = workspace_path.join(format!("{}.store", config.name));

        Self {
            name: config.name,
            author: config.author,
            description: config.description,
            base_path: config.base_path,
            workspace_path,
            data_path,
            style_path,
            store_path,
            template: config.template,
            locator: config.locator,
            header_prefix: config.header_prefix,
            output_prefix: config.output_prefix,
            legend: config.legend,
            pending_tables: config.tables,
            pending_layers: config.layers,
            committed_tables: Vec::new(),
            committed_layers: Vec::new(),
            outputs: config.outputs,
            document: None,
            state: BuildState::Uninitialized,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> BuildState {
        self.state
    }

    /// The document handle, if one has been created.
    pub fn document(&self) -> Option<&D::Doc> {
        self.document.as_ref()
    }

    /// Stage 1: force-create the document and backing store.
    ///
    /// The document is created even if no tables or layers are ever
    /// added. Store creation is idempotent across builds: a pre-existing
    /// store of the same name is deleted first, so re-running a build
    /// leaves exactly the entities of the final run.
    pub fn initialize(&mut self, engine: &D, store: &impl StoreEngine) -> BuildResult<()> {
        self.expect_state(BuildState::Uninitialized, "initialize")?;
        self.ensure_document(engine, store)?;
        self.state = BuildState::Initialized;
        info!(
            "project '{}' initialized, workspace {}",
            self.name,
            self.workspace_path.display()
        );
        Ok(())
    }

    /// Create the document and backing store on first access; reused
    /// afterwards. At most one of each per context lifetime.
    fn ensure_document(&mut self, engine: &D, store: &impl StoreEngine) -> BuildResult<()> {
        if self.document.is_some() {
            return Ok(());
        }

        let target = self.workspace_path.join(format!("{}.mapdoc", self.name));
        debug!("creating document {} from template {}", target.display(), self.template.display());
        let doc = engine
            .create_document(&self.template, &target, &self.name, &self.author)
            .map_err(|e| BuildError::engine("initialize", &self.name, e))?;
        self.document = Some(doc);

        if store.store_exists(&self.store_path) {
            debug!("removing existing store {}", self.store_path.display());
            store
                .delete_store(&self.store_path)
                .map_err(|e| BuildError::engine("initialize", &self.name, e))?;
        }
        let store_name = format!("{}.store", self.name);
        store
            .create_store(&self.workspace_path, &store_name)
            .map_err(|e| BuildError::engine("initialize", &self.name, e))?;
        debug!("created store {}", self.store_path.display());
        Ok(())
    }

    /// Fail unless the context is in `expected` state.
    pub(super) fn expect_state(
        &self,
        expected: BuildState,
        stage: &'static str,
    ) -> BuildResult<()> {
        if self.state != expected {
            return Err(BuildError::OutOfOrder {
                stage,
                state: self.state,
                expected,
            });
        }
        Ok(())
    }
}
