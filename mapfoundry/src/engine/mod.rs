//! Trait seams for the external geospatial collaborators.
//!
//! The build pipeline never draws, geocodes, joins, or persists anything
//! itself. Every such call goes through one of the traits here:
//!
//! - [`DocumentEngine`] - the map document: layers, tables, layout
//!   elements, extent, export, save
//! - [`StoreEngine`] - the per-project backing store datasets are
//!   materialized in
//! - [`GeocodeEngine`] - address table → point dataset
//! - [`SpatialJoinEngine`] - layer × table → joined dataset
//!
//! Two implementations ship with the crate: [`FsEngine`], a filesystem
//! reference backend, and [`RecordingEngine`], which records calls for
//! tests and dry runs.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::descriptor::{Extent, InsertPosition};

mod fs;
mod recording;

pub use fs::{FsDocument, FsEngine};
pub use recording::{Operation, RecordedDoc, RecordingEngine};

/// Result alias for engine calls.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced by external engine calls.
///
/// The orchestrator wraps these with the failing stage and entity name;
/// engines only report what went wrong at their own boundary.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Filesystem access failed
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document content could not be read or written
    #[error("document format error: {0}")]
    Format(String),

    /// An engine operation failed
    #[error("{0}")]
    Operation(String),
}

impl EngineError {
    /// I/O error carrying the path it happened at.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EngineError::Io {
            path: path.into(),
            source,
        }
    }
}

/// The map document: an ordered set of layers, tables, and layout
/// elements, persisted by the engine that owns it.
pub trait DocumentEngine {
    /// Opaque document handle.
    type Doc;

    /// Create a new document at `target` as a copy of `template`, with
    /// title and author set.
    fn create_document(
        &self,
        template: &Path,
        target: &Path,
        title: &str,
        author: &str,
    ) -> EngineResult<Self::Doc>;

    /// Insert a tabular view of the dataset at `path`.
    fn insert_table_view(&self, doc: &mut Self::Doc, path: &Path, name: &str) -> EngineResult<()>;

    /// Insert a spatial layer, filtered by `definition_query` when given.
    fn insert_layer(
        &self,
        doc: &mut Self::Doc,
        path: &Path,
        name: &str,
        definition_query: Option<&str>,
    ) -> EngineResult<()>;

    /// Reposition `move_name` relative to `ref_name`. Both layers must
    /// already be in the document.
    fn move_layer(
        &self,
        doc: &mut Self::Doc,
        move_name: &str,
        ref_name: &str,
        position: InsertPosition,
    ) -> EngineResult<()>;

    /// Apply the reference style at `style_path` to the named layer.
    fn apply_symbology(
        &self,
        doc: &mut Self::Doc,
        target_name: &str,
        style_path: &Path,
    ) -> EngineResult<()>;

    /// Enable or disable automatic legend membership for new layers.
    fn set_legend_auto_add(&self, doc: &mut Self::Doc, enabled: bool) -> EngineResult<()>;

    /// Position the legend on the layout page.
    fn set_legend_position(&self, doc: &mut Self::Doc, x: f64, y: f64) -> EngineResult<()>;

    /// Apply the named item style to every legend entry.
    fn apply_legend_style(&self, doc: &mut Self::Doc, style_name: &str) -> EngineResult<()>;

    fn set_header_text(&self, doc: &mut Self::Doc, text: &str) -> EngineResult<()>;

    fn set_footer_text(&self, doc: &mut Self::Doc, text: &str) -> EngineResult<()>;

    /// Set the data frame's visible extent.
    fn set_extent(&self, doc: &mut Self::Doc, extent: Extent) -> EngineResult<()>;

    /// Export the current document state to `path`.
    fn export_to_file(&self, doc: &mut Self::Doc, path: &Path) -> EngineResult<()>;

    /// Persist the document.
    fn save(&self, doc: &mut Self::Doc) -> EngineResult<()>;
}

/// The per-project backing store that materializes copies of input tables
/// and derived datasets.
pub trait StoreEngine {
    /// Create a store named `name` under `parent`, returning its path.
    fn create_store(&self, parent: &Path, name: &str) -> EngineResult<PathBuf>;

    /// Whether a store exists at `path`.
    fn store_exists(&self, path: &Path) -> bool;

    /// Delete the store at `path` and everything in it.
    fn delete_store(&self, path: &Path) -> EngineResult<()>;

    /// Copy external data into the store under `name`, replacing any
    /// pre-existing entry of the same name. Returns the stored path.
    fn copy_table_in(&self, src: &Path, store: &Path, name: &str) -> EngineResult<PathBuf>;
}

/// Resolves postal addresses in a table into a point dataset.
pub trait GeocodeEngine {
    /// Geocode `table_path` using the locator, writing the result dataset
    /// to `out_path`. `address_fields` maps locator fields to table
    /// columns.
    fn geocode(
        &self,
        table_path: &Path,
        locator_path: &Path,
        address_fields: &str,
        out_path: &Path,
    ) -> EngineResult<()>;
}

/// Combines a layer and a store dataset by spatial relationship.
pub trait SpatialJoinEngine {
    /// Join `join_path` features onto `target_path` features, writing the
    /// result dataset to `out_path`.
    fn spatial_join(
        &self,
        target_path: &Path,
        join_path: &Path,
        out_path: &Path,
    ) -> EngineResult<()>;
}
