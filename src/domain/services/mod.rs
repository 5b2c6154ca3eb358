//! Domain services - Pure operations over observation snapshots

mod cluster_aggregator;
mod grid_clusterer;

pub use cluster_aggregator::ClusterAggregator;
pub use grid_clusterer::{CellKey, GridClusterer, DEFAULT_BYPASS_ZOOM, DEFAULT_CELL_CONSTANT};
