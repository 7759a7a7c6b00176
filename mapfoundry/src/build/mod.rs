//! The build orchestrator.
//!
//! [`BuildContext`] holds all mutable build state: pending and committed
//! entity queues, derived workspace paths, and the lazily created document
//! handle. It is owned by the caller and passed explicitly to every stage;
//! there is no process-wide singleton.
//!
//! Stages run in a fixed order enforced by a strictly forward state
//! machine ([`BuildState`]); later stages depend on entities only earlier
//! stages can produce. [`run_build`] drives a full pipeline from a parsed
//! configuration.
//!
//! Execution is single-threaded and strictly sequential. Saves happen at
//! defined checkpoints (end of table-add, end of layer-add, end of
//! export) and are not transactional: a failure leaves the document in
//! whatever state the last successful save reflects.

mod context;
mod error;
mod joins;
mod layers;
mod output;
mod runner;
mod tables;

pub use context::{BuildContext, BuildState};
pub use error::{BuildError, BuildResult};
pub use layers::LayerReport;
pub use output::OutputReport;
pub use runner::{run_build, BuildSummary};
pub use tables::TableReport;
