//! Call-recording backend.
//!
//! Records every engine call as an [`Operation`] without touching the
//! filesystem. Unit tests assert on the recorded sequence, and the CLI
//! `plan` command prints it as a dry run of the build.

use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};

use super::{
    DocumentEngine, EngineResult, GeocodeEngine, SpatialJoinEngine, StoreEngine,
};
use crate::descriptor::{Extent, InsertPosition};

/// One recorded engine call.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    CreateDocument {
        template: PathBuf,
        target: PathBuf,
    },
    InsertTableView {
        name: String,
    },
    InsertLayer {
        name: String,
        definition_query: Option<String>,
    },
    MoveLayer {
        move_name: String,
        ref_name: String,
        position: InsertPosition,
    },
    ApplySymbology {
        target_name: String,
        style_path: PathBuf,
    },
    SetLegendAutoAdd(bool),
    SetLegendPosition {
        x: f64,
        y: f64,
    },
    ApplyLegendStyle(String),
    SetHeaderText(String),
    SetFooterText(String),
    SetExtent(Extent),
    ExportToFile(PathBuf),
    Save,
    CreateStore {
        path: PathBuf,
    },
    DeleteStore {
        path: PathBuf,
    },
    CopyTableIn {
        name: String,
    },
    Geocode {
        out_path: PathBuf,
    },
    SpatialJoin {
        out_path: PathBuf,
    },
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::CreateDocument { target, .. } => {
                write!(f, "create document {}", target.display())
            }
            Operation::InsertTableView { name } => write!(f, "insert table view '{}'", name),
            Operation::InsertLayer {
                name,
                definition_query,
            } => match definition_query {
                Some(query) => write!(f, "insert layer '{}' where {}", name, query),
                None => write!(f, "insert layer '{}'", name),
            },
            Operation::MoveLayer {
                move_name,
                ref_name,
                position,
            } => write!(f, "move layer '{}' {} '{}'", move_name, position, ref_name),
            Operation::ApplySymbology {
                target_name,
                style_path,
            } => write!(
                f,
                "style layer '{}' from {}",
                target_name,
                style_path.display()
            ),
            Operation::SetLegendAutoAdd(enabled) => {
                write!(f, "legend auto-add {}", if *enabled { "on" } else { "off" })
            }
            Operation::SetLegendPosition { x, y } => write!(f, "legend position ({}, {})", x, y),
            Operation::ApplyLegendStyle(style) => write!(f, "legend style '{}'", style),
            Operation::SetHeaderText(_) => write!(f, "set header text"),
            Operation::SetFooterText(_) => write!(f, "set footer text"),
            Operation::SetExtent(extent) => write!(
                f,
                "set extent ({}, {}) - ({}, {})",
                extent.xmin, extent.ymin, extent.xmax, extent.ymax
            ),
            Operation::ExportToFile(path) => write!(f, "export {}", path.display()),
            Operation::Save => write!(f, "save document"),
            Operation::CreateStore { path } => write!(f, "create store {}", path.display()),
            Operation::DeleteStore { path } => write!(f, "delete store {}", path.display()),
            Operation::CopyTableIn { name } => write!(f, "copy table '{}' into store", name),
            Operation::Geocode { out_path } => write!(f, "geocode -> {}", out_path.display()),
            Operation::SpatialJoin { out_path } => {
                write!(f, "spatial join -> {}", out_path.display())
            }
        }
    }
}

/// Handle type for the recording document. Carries no state; the engine
/// itself holds the operation log.
#[derive(Debug, Default)]
pub struct RecordedDoc;

/// Engine that records calls instead of performing them.
///
/// Every operation succeeds. Single-threaded by design, matching the
/// pipeline's execution model.
#[derive(Debug, Default)]
pub struct RecordingEngine {
    ops: RefCell<Vec<Operation>>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, op: Operation) {
        self.ops.borrow_mut().push(op);
    }

    /// All recorded operations, in call order.
    pub fn operations(&self) -> Vec<Operation> {
        self.ops.borrow().clone()
    }

    /// Number of export calls recorded.
    pub fn export_count(&self) -> usize {
        self.ops
            .borrow()
            .iter()
            .filter(|op| matches!(op, Operation::ExportToFile(_)))
            .count()
    }
}

impl DocumentEngine for RecordingEngine {
    type Doc = RecordedDoc;

    fn create_document(
        &self,
        template: &Path,
        target: &Path,
        _title: &str,
        _author: &str,
    ) -> EngineResult<RecordedDoc> {
        self.record(Operation::CreateDocument {
            template: template.to_path_buf(),
            target: target.to_path_buf(),
        });
        Ok(RecordedDoc)
    }

    fn insert_table_view(
        &self,
        _doc: &mut RecordedDoc,
        _path: &Path,
        name: &str,
    ) -> EngineResult<()> {
        self.record(Operation::InsertTableView {
            name: name.to_string(),
        });
        Ok(())
    }

    fn insert_layer(
        &self,
        _doc: &mut RecordedDoc,
        _path: &Path,
        name: &str,
        definition_query: Option<&str>,
    ) -> EngineResult<()> {
        self.record(Operation::InsertLayer {
            name: name.to_string(),
            definition_query: definition_query.map(str::to_string),
        });
        Ok(())
    }

    fn move_layer(
        &self,
        _doc: &mut RecordedDoc,
        move_name: &str,
        ref_name: &str,
        position: InsertPosition,
    ) -> EngineResult<()> {
        self.record(Operation::MoveLayer {
            move_name: move_name.to_string(),
            ref_name: ref_name.to_string(),
            position,
        });
        Ok(())
    }

    fn apply_symbology(
        &self,
        _doc: &mut RecordedDoc,
        target_name: &str,
        style_path: &Path,
    ) -> EngineResult<()> {
        self.record(Operation::ApplySymbology {
            target_name: target_name.to_string(),
            style_path: style_path.to_path_buf(),
        });
        Ok(())
    }

    fn set_legend_auto_add(&self, _doc: &mut RecordedDoc, enabled: bool) -> EngineResult<()> {
        self.record(Operation::SetLegendAutoAdd(enabled));
        Ok(())
    }

    fn set_legend_position(&self, _doc: &mut RecordedDoc, x: f64, y: f64) -> EngineResult<()> {
        self.record(Operation::SetLegendPosition { x, y });
        Ok(())
    }

    fn apply_legend_style(&self, _doc: &mut RecordedDoc, style_name: &str) -> EngineResult<()> {
        self.record(Operation::ApplyLegendStyle(style_name.to_string()));
        Ok(())
    }

    fn set_header_text(&self, _doc: &mut RecordedDoc, text: &str) -> EngineResult<()> {
        self.record(Operation::SetHeaderText(text.to_string()));
        Ok(())
    }

    fn set_footer_text(&self, _doc: &mut RecordedDoc, text: &str) -> EngineResult<()> {
        self.record(Operation::SetFooterText(text.to_string()));
        Ok(())
    }

    fn set_extent(&self, _doc: &mut RecordedDoc, extent: Extent) -> EngineResult<()> {
        self.record(Operation::SetExtent(extent));
        Ok(())
    }

    fn export_to_file(&self, _doc: &mut RecordedDoc, path: &Path) -> EngineResult<()> {
        self.record(Operation::ExportToFile(path.to_path_buf()));
        Ok(())
    }

    fn save(&self, _doc: &mut RecordedDoc) -> EngineResult<()> {
        self.record(Operation::Save);
        Ok(())
    }
}

impl StoreEngine for RecordingEngine {
    fn create_store(&self, parent: &Path, name: &str) -> EngineResult<PathBuf> {
        let path = parent.join(name);
        self.record(Operation::CreateStore { path: path.clone() });
        Ok(path)
    }

    fn store_exists(&self, _path: &Path) -> bool {
        false
    }

    fn delete_store(&self, path: &Path) -> EngineResult<()> {
        self.record(Operation::DeleteStore {
            path: path.to_path_buf(),
        });
        Ok(())
    }

    fn copy_table_in(&self, _src: &Path, store: &Path, name: &str) -> EngineResult<PathBuf> {
        self.record(Operation::CopyTableIn {
            name: name.to_string(),
        });
        Ok(store.join(name))
    }
}

impl GeocodeEngine for RecordingEngine {
    fn geocode(
        &self,
        _table_path: &Path,
        _locator_path: &Path,
        _address_fields: &str,
        out_path: &Path,
    ) -> EngineResult<()> {
        self.record(Operation::Geocode {
            out_path: out_path.to_path_buf(),
        });
        Ok(())
    }
}

impl SpatialJoinEngine for RecordingEngine {
    fn spatial_join(
        &self,
        _target_path: &Path,
        _join_path: &Path,
        out_path: &Path,
    ) -> EngineResult<()> {
        self.record(Operation::SpatialJoin {
            out_path: out_path.to_path_buf(),
        });
        Ok(())
    }
}
