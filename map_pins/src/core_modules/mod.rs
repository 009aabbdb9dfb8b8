pub mod aggregator;
pub mod cluster_summary;
pub mod coordinate;
pub mod display_object;
pub mod identity;
pub mod point;
pub mod reconciler;
pub mod spatial_index;
