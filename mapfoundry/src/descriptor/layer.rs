//! Spatial layer descriptor.

use std::path::PathBuf;

use super::Table;

/// A named reference to spatial data plus display attributes.
///
/// Layers are either declared in configuration or synthesized mid-build by
/// the geocode and spatial-join passes. Once enqueued, derived layers are
/// indistinguishable from configured ones.
///
/// A layer with `visible = false` is counted as skipped by the
/// layer-insertion stage and is excluded from all later stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    /// Layer identity within the document.
    pub name: String,

    /// Path to the backing spatial data.
    pub path: PathBuf,

    /// Reference style applied during the styling stage, if any.
    pub style: Option<String>,

    /// Whether the layer is inserted into the document at all.
    pub visible: bool,

    /// Attribute filter applied at insertion time, if any.
    pub definition_query: Option<String>,
}

impl Layer {
    /// Create a visible layer with no style and no definition query.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            style: None,
            visible: true,
            definition_query: None,
        }
    }

    /// Layer synthesized by geocoding `table`.
    ///
    /// Inherits the table's visibility and geocode layer style; `path` is
    /// the geocoded dataset inside the backing store.
    pub fn geocoded(table: &Table, path: PathBuf) -> Self {
        Self {
            name: table.geocoded_layer_name.clone(),
            path,
            style: table.geocode_layer_style.clone(),
            visible: table.visible,
            definition_query: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults() {
        let layer = Layer::new("roads", "/data/roads");
        assert!(layer.visible);
        assert!(layer.style.is_none());
        assert!(layer.definition_query.is_none());
    }

    #[test]
    fn test_geocoded_inherits_table_fields() {
        let mut table = Table::new("addr", "/data/addr.txt");
        table.geocode = true;
        table.visible = false;
        table.geocode_layer_style = Some("points.style".to_string());

        let layer = Layer::geocoded(&table, PathBuf::from("/store/addr_Geocoded"));
        assert_eq!(layer.name, "addr_Geocoded");
        assert!(!layer.visible);
        assert_eq!(layer.style.as_deref(), Some("points.style"));
        assert!(layer.definition_query.is_none());
    }
}
