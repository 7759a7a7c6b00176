//! Attribute table descriptor.

use std::path::PathBuf;

/// A named reference to non-spatial tabular data, optionally geocodable.
///
/// Tables are consumed exactly once by the table-insertion stage. A table
/// with `geocode` set additionally produces exactly one derived [`Layer`]
/// during the geocode pass.
///
/// [`Layer`]: super::Layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Table identity; also the entry name in the backing store.
    pub name: String,

    /// Path to the external source data.
    pub path: PathBuf,

    /// Whether the table participates in attribute joins.
    pub join: bool,

    /// Whether the geocode pass should resolve this table's addresses
    /// into a point layer.
    pub geocode: bool,

    /// Name of the layer the geocode pass produces.
    pub geocoded_layer_name: String,

    /// Style applied to the geocoded layer, if any.
    pub geocode_layer_style: Option<String>,

    /// Visibility inherited by the geocoded layer.
    pub visible: bool,
}

impl Table {
    /// Create a table with default optional fields: no join, no geocoding,
    /// visible, geocoded layer named [`Table::default_geocoded_name`].
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let name = name.into();
        let geocoded_layer_name = Self::default_geocoded_name(&name);
        Self {
            name,
            path: path.into(),
            join: false,
            geocode: false,
            geocoded_layer_name,
            geocode_layer_style: None,
            visible: true,
        }
    }

    /// Default name for the layer produced by geocoding a table.
    pub fn default_geocoded_name(table_name: &str) -> String {
        format!("{}_Geocoded", table_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults() {
        let table = Table::new("addr", "/data/addr.txt");
        assert_eq!(table.name, "addr");
        assert!(!table.join);
        assert!(!table.geocode);
        assert!(table.visible);
        assert!(table.geocode_layer_style.is_none());
    }

    #[test]
    fn test_default_geocoded_name() {
        let table = Table::new("addr", "/data/addr.txt");
        assert_eq!(table.geocoded_layer_name, "addr_Geocoded");
    }
}
