//! Marker Service - Turns a snapshot into the markers drawn for one cycle

use serde::Serialize;

use crate::domain::entities::{EmotionEvent, PartitionResult};
use crate::domain::services::GridClusterer;
use crate::domain::value_objects::{EmotionCategory, ZoomLevel};

/// A single drawable marker
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Marker {
    #[serde(rename_all = "camelCase")]
    Individual {
        id: String,
        lat: f64,
        lng: f64,
        emotion: EmotionCategory,
        intensity: u8,
        place_name: String,
    },
    #[serde(rename_all = "camelCase")]
    Cluster {
        id: String,
        lat: f64,
        lng: f64,
        emotion: EmotionCategory,
        intensity: u8,
        count: usize,
        member_ids: Vec<String>,
    },
}

/// Every marker for one snapshot at one zoom
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerSet {
    pub zoom: ZoomLevel,
    pub cluster_count: usize,
    pub individual_count: usize,
    pub markers: Vec<Marker>,
}

pub struct MarkerService {
    clusterer: GridClusterer,
}

impl MarkerService {
    pub fn new(clusterer: GridClusterer) -> Self {
        Self { clusterer }
    }

    pub fn partition(&self, snapshot: &[EmotionEvent], zoom: ZoomLevel) -> PartitionResult {
        self.clusterer.partition(snapshot, zoom)
    }

    /// Partition a snapshot and flatten it into markers, clusters first
    pub fn render(&self, snapshot: &[EmotionEvent], zoom: ZoomLevel) -> MarkerSet {
        let PartitionResult {
            clusters,
            individuals,
        } = self.partition(snapshot, zoom);

        let cluster_count = clusters.len();
        let individual_count = individuals.len();

        let markers = clusters
            .into_iter()
            .map(|cluster| Marker::Cluster {
                id: cluster.id.to_string(),
                lat: cluster.centroid.latitude(),
                lng: cluster.centroid.longitude(),
                emotion: cluster.dominant_category,
                intensity: cluster.mean_intensity.value(),
                count: cluster.members.len(),
                member_ids: cluster.members.iter().map(|m| m.id.to_string()).collect(),
            })
            .chain(individuals.into_iter().map(|event| Marker::Individual {
                id: event.id.to_string(),
                lat: event.point.latitude(),
                lng: event.point.longitude(),
                emotion: event.category,
                intensity: event.intensity.value(),
                place_name: event.place_name,
            }))
            .collect();

        MarkerSet {
            zoom,
            cluster_count,
            individual_count,
            markers,
        }
    }
}

impl Default for MarkerService {
    fn default() -> Self {
        Self::new(GridClusterer::default())
    }
}
