//! Filesystem reference backend.
//!
//! Persists the map document as a JSON manifest, the backing store as a
//! directory of dataset files, and exports as snapshot files. This backend
//! exists so the pipeline has a real end-to-end target: integration tests
//! assert idempotence and layer ordering against it, and the CLI `build`
//! command runs against it. It is a reference implementation, not a
//! contract; production deployments supply their own engines.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{
    DocumentEngine, EngineError, EngineResult, GeocodeEngine, SpatialJoinEngine, StoreEngine,
};
use crate::descriptor::{Extent, InsertPosition};

/// A table entry in the document manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocTable {
    pub name: String,
    pub path: PathBuf,
}

/// A layer entry in the document manifest. Order in the vector is draw
/// order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocLayer {
    pub name: String,
    pub path: PathBuf,
    #[serde(default)]
    pub definition_query: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
}

/// Legend state in the document manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocLegend {
    pub auto_add: bool,
    pub x: f64,
    pub y: f64,
    pub style: Option<String>,
}

/// The document manifest persisted by [`FsEngine`].
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FsDocument {
    /// Manifest location on disk; not part of the persisted content.
    #[serde(skip)]
    path: PathBuf,

    pub title: String,
    pub author: String,
    pub tables: Vec<DocTable>,
    pub layers: Vec<DocLayer>,
    pub legend: DocLegend,
    pub header: Option<String>,
    pub footer: Option<String>,
    pub extent: Option<Extent>,
}

impl FsDocument {
    /// Layer names in draw order.
    pub fn layer_names(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.name.as_str()).collect()
    }

    /// Find a layer entry by name.
    pub fn layer(&self, name: &str) -> Option<&DocLayer> {
        self.layers.iter().find(|l| l.name == name)
    }
}

/// Filesystem implementation of all four engine seams.
#[derive(Debug, Default)]
pub struct FsEngine;

impl FsEngine {
    pub fn new() -> Self {
        Self
    }

    fn position(layers: &[DocLayer], name: &str) -> EngineResult<usize> {
        layers
            .iter()
            .position(|l| l.name == name)
            .ok_or_else(|| EngineError::Operation(format!("layer '{}' not in document", name)))
    }
}

impl DocumentEngine for FsEngine {
    type Doc = FsDocument;

    fn create_document(
        &self,
        template: &Path,
        target: &Path,
        title: &str,
        author: &str,
    ) -> EngineResult<FsDocument> {
        let content =
            fs::read_to_string(template).map_err(|e| EngineError::io(template, e))?;
        let mut doc: FsDocument = serde_json::from_str(&content)
            .map_err(|e| EngineError::Format(format!("template {}: {}", template.display(), e)))?;

        doc.path = target.to_path_buf();
        doc.title = title.to_string();
        doc.author = author.to_string();

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| EngineError::io(parent, e))?;
        }
        self.save(&mut doc)?;
        Ok(doc)
    }

    fn insert_table_view(&self, doc: &mut FsDocument, path: &Path, name: &str) -> EngineResult<()> {
        doc.tables.push(DocTable {
            name: name.to_string(),
            path: path.to_path_buf(),
        });
        Ok(())
    }

    fn insert_layer(
        &self,
        doc: &mut FsDocument,
        path: &Path,
        name: &str,
        definition_query: Option<&str>,
    ) -> EngineResult<()> {
        doc.layers.push(DocLayer {
            name: name.to_string(),
            path: path.to_path_buf(),
            definition_query: definition_query.map(str::to_string),
            style: None,
        });
        Ok(())
    }

    fn move_layer(
        &self,
        doc: &mut FsDocument,
        move_name: &str,
        ref_name: &str,
        position: InsertPosition,
    ) -> EngineResult<()> {
        let from = Self::position(&doc.layers, move_name)?;
        let moved = doc.layers.remove(from);
        let anchor = Self::position(&doc.layers, ref_name)?;
        let to = match position {
            InsertPosition::Before => anchor,
            InsertPosition::After => anchor + 1,
        };
        doc.layers.insert(to, moved);
        Ok(())
    }

    fn apply_symbology(
        &self,
        doc: &mut FsDocument,
        target_name: &str,
        style_path: &Path,
    ) -> EngineResult<()> {
        let index = Self::position(&doc.layers, target_name)?;
        doc.layers[index].style = Some(style_path.to_string_lossy().into_owned());
        Ok(())
    }

    fn set_legend_auto_add(&self, doc: &mut FsDocument, enabled: bool) -> EngineResult<()> {
        doc.legend.auto_add = enabled;
        Ok(())
    }

    fn set_legend_position(&self, doc: &mut FsDocument, x: f64, y: f64) -> EngineResult<()> {
        doc.legend.x = x;
        doc.legend.y = y;
        Ok(())
    }

    fn apply_legend_style(&self, doc: &mut FsDocument, style_name: &str) -> EngineResult<()> {
        doc.legend.style = Some(style_name.to_string());
        Ok(())
    }

    fn set_header_text(&self, doc: &mut FsDocument, text: &str) -> EngineResult<()> {
        doc.header = Some(text.to_string());
        Ok(())
    }

    fn set_footer_text(&self, doc: &mut FsDocument, text: &str) -> EngineResult<()> {
        doc.footer = Some(text.to_string());
        Ok(())
    }

    fn set_extent(&self, doc: &mut FsDocument, extent: Extent) -> EngineResult<()> {
        doc.extent = Some(extent);
        Ok(())
    }

    fn export_to_file(&self, doc: &mut FsDocument, path: &Path) -> EngineResult<()> {
        let snapshot = serde_json::json!({
            "exported_at": chrono::Utc::now().to_rfc3339(),
            "document": doc,
        });
        let content = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| EngineError::Format(e.to_string()))?;
        fs::write(path, content).map_err(|e| EngineError::io(path, e))
    }

    fn save(&self, doc: &mut FsDocument) -> EngineResult<()> {
        let content =
            serde_json::to_string_pretty(doc).map_err(|e| EngineError::Format(e.to_string()))?;
        fs::write(&doc.path, content).map_err(|e| EngineError::io(doc.path.clone(), e))
    }
}

impl StoreEngine for FsEngine {
    fn create_store(&self, parent: &Path, name: &str) -> EngineResult<PathBuf> {
        let path = parent.join(name);
        fs::create_dir_all(&path).map_err(|e| EngineError::io(&path, e))?;
        Ok(path)
    }

    fn store_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn delete_store(&self, path: &Path) -> EngineResult<()> {
        fs::remove_dir_all(path).map_err(|e| EngineError::io(path, e))
    }

    fn copy_table_in(&self, src: &Path, store: &Path, name: &str) -> EngineResult<PathBuf> {
        let dest = store.join(name);
        if dest.exists() {
            fs::remove_file(&dest).map_err(|e| EngineError::io(&dest, e))?;
        }
        fs::copy(src, &dest).map_err(|e| EngineError::io(src, e))?;
        Ok(dest)
    }
}

impl GeocodeEngine for FsEngine {
    fn geocode(
        &self,
        table_path: &Path,
        locator_path: &Path,
        address_fields: &str,
        out_path: &Path,
    ) -> EngineResult<()> {
        if !table_path.exists() {
            return Err(EngineError::io(table_path, not_found("table")));
        }
        let content = format!(
            "geocoded\nsource: {}\nlocator: {}\nfields: {}\n",
            table_path.display(),
            locator_path.display(),
            address_fields
        );
        fs::write(out_path, content).map_err(|e| EngineError::io(out_path, e))
    }
}

impl SpatialJoinEngine for FsEngine {
    fn spatial_join(
        &self,
        target_path: &Path,
        join_path: &Path,
        out_path: &Path,
    ) -> EngineResult<()> {
        if !target_path.exists() {
            return Err(EngineError::io(target_path, not_found("target layer")));
        }
        if !join_path.exists() {
            return Err(EngineError::io(join_path, not_found("join dataset")));
        }
        let content = format!(
            "spatial join\ntarget: {}\njoin: {}\n",
            target_path.display(),
            join_path.display()
        );
        fs::write(out_path, content).map_err(|e| EngineError::io(out_path, e))
    }
}

fn not_found(what: &str) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("{} does not exist", what))
}
