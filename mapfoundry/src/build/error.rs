//! Error types for the build pipeline.
//!
//! Errors are categorized by origin: configuration problems abort before
//! any engine call, lookup failures abort before the offending operation,
//! and engine failures carry the stage and entity that was being
//! processed. The build halts on the first error; there is no retry and
//! no rollback.

use thiserror::Error;

use super::context::BuildState;
use crate::config::ConfigError;
use crate::engine::EngineError;

/// Result alias for build operations.
pub type BuildResult<T> = Result<T, BuildError>;

/// Errors that halt a build.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Configuration was invalid or incomplete
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A sort or style rule referenced a layer that was never committed
    #[error("layer '{0}' not found among committed layers")]
    LayerNotFound(String),

    /// A table asked for geocoding but the project configures no locator
    #[error("table '{0}' requires geocoding but no locator is configured")]
    LocatorMissing(String),

    /// An external engine call failed
    #[error("{stage} failed for '{entity}': {source}")]
    Engine {
        stage: &'static str,
        entity: String,
        #[source]
        source: EngineError,
    },

    /// A stage was invoked out of pipeline order
    #[error("stage '{stage}' invoked in state '{state}', expected '{expected}'")]
    OutOfOrder {
        stage: &'static str,
        state: BuildState,
        expected: BuildState,
    },
}

impl BuildError {
    /// Wrap an engine failure with the stage and entity being processed.
    pub(crate) fn engine(
        stage: &'static str,
        entity: impl Into<String>,
        source: EngineError,
    ) -> Self {
        BuildError::Engine {
            stage,
            entity: entity.into(),
            source,
        }
    }

    /// A stage found no document handle; only reachable when stages are
    /// driven outside the state machine.
    pub(crate) fn missing_document(stage: &'static str) -> Self {
        BuildError::OutOfOrder {
            stage,
            state: BuildState::Uninitialized,
            expected: BuildState::Initialized,
        }
    }
}
