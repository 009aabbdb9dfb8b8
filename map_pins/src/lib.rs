// THEORY:
// This file is the main entry point for the `map_pins` library crate. It exposes
// the clustering core consumed by request-handling layers (the HTTP glue in
// `map_pins_server`, the `pin_tester` CLI).
//
// The primary export is `ClusteringPipeline` (aggregate, then reconcile) together
// with its data types. The building blocks in `core_modules` are public as well,
// so a caller that already has cluster summaries from another aggregator can run
// the reconciler on its own.

pub mod config;
pub mod core_modules;
pub mod error;
pub mod pipeline;

pub use config::ClusteringConfig;
pub use core_modules::aggregator::{Aggregator, SuperCluster};
pub use core_modules::cluster_summary::ClusterSummary;
pub use core_modules::coordinate::Coordinate;
pub use core_modules::display_object::DisplayObject;
pub use core_modules::identity::{ClusterIdGenerator, SequentialIdGenerator, UuidGenerator};
pub use core_modules::point::Point;
pub use core_modules::reconciler::{
    reconcile, Reconciler, Reconciliation, UnmatchedCluster, DISTANCE_THRESHOLD,
};
pub use error::{PreconditionViolation, Result};
pub use pipeline::ClusteringPipeline;
