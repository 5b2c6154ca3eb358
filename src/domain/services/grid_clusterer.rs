//! Grid clustering - Zoom-dependent bucketing of observations
//!
//! The map is cut into square cells of `K / 2^zoom` degrees. Events sharing a
//! cell become one cluster, events alone in their cell stay individuals. One
//! linear pass with hash-map bucketing, so partitioning is O(N) in time and
//! auxiliary space. Degree cells are not geodesically uniform; that is an
//! accepted approximation.

use std::collections::HashMap;

use crate::domain::entities::{EmotionEvent, PartitionResult};
use crate::domain::services::ClusterAggregator;
use crate::domain::value_objects::{GeoPoint, ZoomLevel};

/// Default cell constant `K` in degrees at zoom 0
pub const DEFAULT_CELL_CONSTANT: f64 = 80.0;

/// Zoom at and above which every event is returned as an individual
pub const DEFAULT_BYPASS_ZOOM: ZoomLevel = ZoomLevel::new(19);

/// Integer cell coordinates: floored longitude and latitude over the cell size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellKey {
    pub x: i64,
    pub y: i64,
}

/// Partitions snapshots into clusters and individuals
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridClusterer {
    cell_constant: f64,
    bypass_zoom: ZoomLevel,
}

impl Default for GridClusterer {
    fn default() -> Self {
        Self {
            cell_constant: DEFAULT_CELL_CONSTANT,
            bypass_zoom: DEFAULT_BYPASS_ZOOM,
        }
    }
}

impl GridClusterer {
    /// Create a clusterer; `cell_constant` must be positive and finite
    pub fn new(cell_constant: f64, bypass_zoom: ZoomLevel) -> Self {
        Self {
            cell_constant,
            bypass_zoom,
        }
    }

    /// Cell a point falls into at the given zoom
    ///
    /// `None` when the cell index does not fit in an `i64`, which happens
    /// only for vanishingly small cells. Such points are never clustered.
    pub fn cell_key(&self, point: &GeoPoint, zoom: ZoomLevel) -> Option<CellKey> {
        Self::key_for(point, zoom.cell_size_degrees(self.cell_constant))
    }

    fn key_for(point: &GeoPoint, cell_size: f64) -> Option<CellKey> {
        Some(CellKey {
            x: cell_index(point.longitude() / cell_size)?,
            y: cell_index(point.latitude() / cell_size)?,
        })
    }

    /// Split a snapshot into clusters and individuals at `zoom`
    ///
    /// Input events are cloned into the result, never modified. Buckets are
    /// emitted in order of first appearance, and members keep input order.
    /// Duplicate ids are tolerated; each occurrence is placed once.
    pub fn partition(&self, events: &[EmotionEvent], zoom: ZoomLevel) -> PartitionResult {
        if zoom >= self.bypass_zoom {
            return PartitionResult {
                clusters: Vec::new(),
                individuals: events.to_vec(),
            };
        }

        let cell_size = zoom.cell_size_degrees(self.cell_constant);
        let mut slots: HashMap<CellKey, usize> = HashMap::with_capacity(events.len());
        let mut buckets: Vec<Vec<EmotionEvent>> = Vec::new();

        for event in events {
            let index = match Self::key_for(&event.point, cell_size) {
                Some(key) => *slots.entry(key).or_insert_with(|| {
                    buckets.push(Vec::new());
                    buckets.len() - 1
                }),
                None => {
                    buckets.push(Vec::new());
                    buckets.len() - 1
                }
            };
            buckets[index].push(event.clone());
        }

        let mut result = PartitionResult::default();
        for mut bucket in buckets {
            if bucket.len() == 1 {
                result.individuals.extend(bucket.pop());
            } else if let Some(cluster) = ClusterAggregator::aggregate(bucket) {
                result.clusters.push(cluster);
            }
        }

        tracing::trace!(
            zoom = %zoom,
            events = events.len(),
            clusters = result.clusters.len(),
            individuals = result.individuals.len(),
            "Partitioned snapshot"
        );

        result
    }
}

/// Floor a cell quotient, rejecting values a saturating cast would collapse together
fn cell_index(quotient: f64) -> Option<i64> {
    let floored = quotient.floor();
    // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound
    (floored.is_finite() && floored >= i64::MIN as f64 && floored < i64::MAX as f64)
        .then_some(floored as i64)
}
