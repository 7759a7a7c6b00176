//! MapFoundry builds cartographic projects from declarative configuration.
//!
//! A project configuration names tabular datasets, spatial layers, spatial
//! join definitions, sort rules, and output extents. MapFoundry resolves the
//! configuration into typed entity descriptors, drives them through a fixed
//! multi-stage build pipeline, and commits the result into a map document
//! backed by an external geospatial engine:
//!
//! 1. Initialize the document and its backing store
//! 2. Add tables (then geocode the ones that ask for it)
//! 3. Run spatial joins
//! 4. Add layers (declared plus derived)
//! 5. Sort layers
//! 6. Configure the legend
//! 7. Style layers
//! 8. Export one artifact per output extent
//!
//! Geocoded tables and spatial joins synthesize *new* layers that re-enter
//! the pipeline before layer insertion, so derived layers are
//! indistinguishable from configured ones by the time they are committed.
//!
//! The engines that actually persist data, geocode addresses, join
//! geometries, and render exports are external collaborators behind the
//! trait seams in [`engine`]. A filesystem reference backend
//! ([`engine::FsEngine`]) and a call-recording backend
//! ([`engine::RecordingEngine`]) ship with the crate for testing and dry
//! runs.

pub mod build;
pub mod config;
pub mod descriptor;
pub mod engine;
pub mod logging;

/// Crate version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
