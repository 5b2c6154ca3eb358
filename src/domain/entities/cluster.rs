//! Cluster entity - Transient aggregate of nearby observations

use serde::Serialize;

use crate::domain::entities::EmotionEvent;
use crate::domain::value_objects::{ClusterId, EmotionCategory, GeoPoint, Intensity};

/// Two or more events rendered as a single marker for one cycle
///
/// Clusters are recomputed on every render and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cluster {
    pub id: ClusterId,
    pub centroid: GeoPoint,
    /// Members in input order; always at least two
    pub members: Vec<EmotionEvent>,
    pub dominant_category: EmotionCategory,
    pub mean_intensity: Intensity,
}

impl Cluster {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Output of partitioning a snapshot at one zoom level
///
/// Every input event lands in exactly one place: either one cluster's
/// members or the individuals list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PartitionResult {
    pub clusters: Vec<Cluster>,
    pub individuals: Vec<EmotionEvent>,
}

impl PartitionResult {
    /// Total number of events across clusters and individuals
    pub fn event_count(&self) -> usize {
        self.clusters.iter().map(Cluster::len).sum::<usize>() + self.individuals.len()
    }
}
