//! Entity descriptors resolved from project configuration.
//!
//! Descriptors are immutable value objects describing what a build should
//! contain: attribute tables, spatial layers, spatial join definitions,
//! layer sort rules, and output extents. They are validated once at
//! configuration time; the build pipeline never re-checks optional fields.

mod join;
mod layer;
mod output;
mod sort;
mod table;

pub use join::{SpatialJoinSpec, JOIN_COUNT_QUERY};
pub use layer::Layer;
pub use output::{Extent, OutputSpec};
pub use sort::{InsertPosition, SortRule};
pub use table::Table;
