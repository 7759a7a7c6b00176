//! Output extent descriptors.

use serde::{Deserialize, Serialize};

/// A geographic bounding box in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

/// One exported rendering of the document restricted to an extent.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSpec {
    /// Output name; appears in the header and the exported file name.
    pub name: String,

    /// Visible extent applied before export.
    pub extent: Extent,
}

impl OutputSpec {
    /// File/display name for this output, with the project-wide output
    /// prefix prepended when one is configured.
    pub fn display_name(&self, output_prefix: Option<&str>) -> String {
        match output_prefix {
            Some(prefix) => format!("{} - {}", prefix, self.name),
            None => self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output() -> OutputSpec {
        OutputSpec {
            name: "Service Area".to_string(),
            extent: Extent {
                xmin: -106.103,
                ymin: 39.844,
                xmax: -103.541,
                ymax: 41.015,
            },
        }
    }

    #[test]
    fn test_display_name_with_prefix() {
        assert_eq!(output().display_name(Some("Map")), "Map - Service Area");
    }

    #[test]
    fn test_display_name_without_prefix() {
        assert_eq!(output().display_name(None), "Service Area");
    }
}
