//! Stage 8: the output renderer.
//!
//! Exports one artifact per committed output spec, in list order. Export
//! is not transactional across outputs: a failure on output k leaves
//! outputs 1..k-1 on disk.

use tracing::info;

use super::context::{BuildContext, BuildState};
use super::{BuildError, BuildResult};
use crate::engine::DocumentEngine;

/// Attribution shown in the footer of every exported output.
const FOOTER_ATTRIBUTION: &str = "(c) OpenStreetMap Contributors & U.S. Census Bureau";

/// First header line on every exported output.
const HEADER_ORGANIZATION: &str = "Front Range Community College";

/// Counts reported by the export stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputReport {
    /// Artifacts written to the workspace.
    pub exported: usize,
}

impl<D: DocumentEngine> BuildContext<D> {
    /// Export every output spec: set the footer attribution once, then
    /// per output set the extent and the three-line header (organization,
    /// configured prefix, output name) and export to
    /// `{workspace}/{display name}.pdf`. The document is saved once after
    /// all exports. An empty output list performs zero engine calls.
    pub fn save_outputs(&mut self, engine: &D) -> BuildResult<OutputReport> {
        self.expect_state(BuildState::Styled, "save_outputs")?;

        if self.outputs.is_empty() {
            info!("no outputs defined, nothing exported");
            self.state = BuildState::Exported;
            return Ok(OutputReport { exported: 0 });
        }

        info!(
            "saving {} output(s) to {}",
            self.outputs.len(),
            self.workspace_path.display()
        );

        let Self {
            document,
            outputs,
            workspace_path,
            header_prefix,
            output_prefix,
            ..
        } = self;
        let doc = document
            .as_mut()
            .ok_or_else(|| BuildError::missing_document("save_outputs"))?;

        engine
            .set_footer_text(doc, FOOTER_ATTRIBUTION)
            .map_err(|e| BuildError::engine("save_outputs", "footer", e))?;

        let mut exported = 0;
        for output in outputs.iter() {
            engine
                .set_extent(doc, output.extent)
                .map_err(|e| BuildError::engine("save_outputs", &output.name, e))?;

            let header = format!(
                "{}\n{}\n{}",
                HEADER_ORGANIZATION,
                header_prefix.as_deref().unwrap_or(""),
                output.name
            );
            engine
                .set_header_text(doc, &header)
                .map_err(|e| BuildError::engine("save_outputs", &output.name, e))?;

            let display = output.display_name(output_prefix.as_deref());
            let path = workspace_path.join(format!("{}.pdf", display));
            engine
                .export_to_file(doc, &path)
                .map_err(|e| BuildError::engine("save_outputs", &output.name, e))?;

            info!("exported {}", path.display());
            exported += 1;
        }

        engine
            .save(doc)
            .map_err(|e| BuildError::engine("save_outputs", "document", e))?;

        self.state = BuildState::Exported;
        Ok(OutputReport { exported })
    }
}
