//! Spatial join definition.

use std::path::{Path, PathBuf};

use super::Layer;

/// Definition query applied to every spatial-join result layer, keeping
/// only features that matched at least one join feature.
pub const JOIN_COUNT_QUERY: &str = "Join_Count > 0";

/// A spatial join of a layer against a table already materialized in the
/// backing store.
///
/// Produces exactly one derived [`Layer`] named
/// `{layer_name}__{table_name}` whose backing data is the join output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpatialJoinSpec {
    /// Name of the target layer.
    pub layer_name: String,

    /// Path to the target layer's spatial data.
    pub layer_path: PathBuf,

    /// Name of the join table inside the backing store.
    pub table_name: String,

    /// Style applied to the result layer, if any.
    pub layer_style: Option<String>,
}

impl SpatialJoinSpec {
    /// Name of the dataset and layer this join produces.
    pub fn output_name(&self) -> String {
        format!("{}__{}", self.layer_name, self.table_name)
    }

    /// Path of the join output inside the backing store.
    pub fn output_path(&self, store_path: &Path) -> PathBuf {
        store_path.join(self.output_name())
    }

    /// Layer synthesized from the join output at `path`.
    pub fn derived_layer(&self, path: PathBuf) -> Layer {
        Layer {
            name: self.output_name(),
            path,
            style: self.layer_style.clone(),
            visible: true,
            definition_query: Some(JOIN_COUNT_QUERY.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> SpatialJoinSpec {
        SpatialJoinSpec {
            layer_name: "counties".to_string(),
            layer_path: PathBuf::from("/data/counties"),
            table_name: "addr".to_string(),
            layer_style: Some("choropleth.style".to_string()),
        }
    }

    #[test]
    fn test_output_name() {
        assert_eq!(spec().output_name(), "counties__addr");
    }

    #[test]
    fn test_derived_layer() {
        let layer = spec().derived_layer(PathBuf::from("/store/counties__addr"));
        assert_eq!(layer.name, "counties__addr");
        assert_eq!(layer.definition_query.as_deref(), Some(JOIN_COUNT_QUERY));
        assert_eq!(layer.style.as_deref(), Some("choropleth.style"));
        assert!(layer.visible);
    }
}
