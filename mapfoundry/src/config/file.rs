//! Configuration file handling.
//!
//! Loads the project INI file and hands it to [`super::parser`] for
//! mapping into [`ProjectConfig`].

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use crate::descriptor::{Layer, OutputSpec, SortRule, SpatialJoinSpec, Table};

/// Default legend position, in layout page units.
pub const DEFAULT_LEGEND_X: f64 = 8.8858;
pub const DEFAULT_LEGEND_Y: f64 = 0.3768;

/// Default legend item style name.
pub const DEFAULT_LEGEND_STYLE: &str = "Horizontal with Heading and Labels";

/// Configuration errors.
///
/// All of these abort the build before any engine call is made.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or parse the INI file
    #[error("Failed to read config file: {0}")]
    Read(#[from] ini::Error),

    /// One or more required fields are absent from a section
    #[error("Section [{section}] is missing required field(s): {}", .fields.join(", "))]
    MissingFields {
        section: String,
        fields: Vec<String>,
    },

    /// A field is present but its value cannot be used
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

/// Legend placement and style.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendConfig {
    /// Horizontal position on the layout page.
    pub x: f64,

    /// Vertical position on the layout page.
    pub y: f64,

    /// Named legend item style applied to every legend entry.
    pub style: String,
}

impl Default for LegendConfig {
    fn default() -> Self {
        Self {
            x: DEFAULT_LEGEND_X,
            y: DEFAULT_LEGEND_Y,
            style: DEFAULT_LEGEND_STYLE.to_string(),
        }
    }
}

/// A fully validated project configuration.
///
/// Entity lists preserve the order of their sections in the INI file.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectConfig {
    /// Project name; used for the document and backing store names.
    pub name: String,

    /// Document author.
    pub author: String,

    /// Free-form project description.
    pub description: Option<String>,

    /// Root directory the workspace, data, and style paths derive from.
    pub base_path: PathBuf,

    /// Template the map document is created from.
    pub template: PathBuf,

    /// Address locator used by the geocode pass. Required only when some
    /// table sets `geocode`.
    pub locator: Option<PathBuf>,

    /// Second header line on every exported output.
    pub header_prefix: Option<String>,

    /// Prefix prepended to every output's file name.
    pub output_prefix: Option<String>,

    /// Legend placement and style.
    pub legend: LegendConfig,

    pub tables: Vec<Table>,
    pub layers: Vec<Layer>,
    pub spatial_joins: Vec<SpatialJoinSpec>,
    pub sort_rules: Vec<SortRule>,
    pub outputs: Vec<OutputSpec>,
}

impl ProjectConfig {
    /// Load and validate a project configuration from an INI file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }
}
