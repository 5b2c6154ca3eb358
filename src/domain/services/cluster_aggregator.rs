//! Cluster aggregation - centroid, dominant category and mean intensity
//!
//! Every statistic here depends only on the multiset of member values, never
//! on the order the members arrive in.

use crate::domain::entities::{Cluster, EmotionEvent};
use crate::domain::value_objects::{ClusterId, EmotionCategory, GeoPoint, Intensity};

/// Computes the representative values of a cluster
pub struct ClusterAggregator;

impl ClusterAggregator {
    /// Build a cluster from a bucket of members
    ///
    /// Returns `None` for fewer than two members; those are individuals.
    pub fn aggregate(members: Vec<EmotionEvent>) -> Option<Cluster> {
        if members.len() < 2 {
            return None;
        }

        let centroid = Self::centroid(&members)?;
        let dominant_category = Self::dominant_category(&members);
        let mean_intensity = Self::mean_intensity(&members);
        let id = ClusterId::derive(&members[0].id, members.len());

        Some(Cluster {
            id,
            centroid,
            members,
            dominant_category,
            mean_intensity,
        })
    }

    /// Arithmetic mean of member latitudes and longitudes (no geodesic correction)
    pub fn centroid(members: &[EmotionEvent]) -> Option<GeoPoint> {
        if members.is_empty() {
            return None;
        }
        let latitude = order_independent_mean(members.iter().map(|e| e.point.latitude()));
        let longitude = order_independent_mean(members.iter().map(|e| e.point.longitude()));
        Some(GeoPoint::clamped(latitude, longitude))
    }

    /// Mean of category ordinals, rounded and mapped back to a category
    ///
    /// An empty slice yields JOY.
    pub fn dominant_category(members: &[EmotionEvent]) -> EmotionCategory {
        if members.is_empty() {
            return EmotionCategory::Joy;
        }
        let sum: u64 = members.iter().map(|e| u64::from(e.category.ordinal())).sum();
        EmotionCategory::from_mean_ordinal(sum as f64 / members.len() as f64)
    }

    /// Mean member intensity rounded to the nearest integer; empty yields 0
    pub fn mean_intensity(members: &[EmotionEvent]) -> Intensity {
        if members.is_empty() {
            return Intensity::from_mean(0.0);
        }
        let sum: u64 = members.iter().map(|e| u64::from(e.intensity.value())).sum();
        Intensity::from_mean(sum as f64 / members.len() as f64)
    }
}

/// Sum in sorted order so float rounding does not depend on member order
fn order_independent_mean(values: impl Iterator<Item = f64>) -> f64 {
    let mut values: Vec<f64> = values.collect();
    values.sort_by(f64::total_cmp);
    let count = values.len() as f64;
    values.iter().sum::<f64>() / count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::EventId;

    fn event(id: &str, lat: f64, lng: f64, category: EmotionCategory, intensity: i64) -> EmotionEvent {
        EmotionEvent::new(
            GeoPoint::new(lat, lng).unwrap(),
            category,
            Intensity::new(intensity).unwrap(),
        )
        .with_id(EventId::parse(id).unwrap())
    }

    #[test]
    fn test_mean_intensity_of_two() {
        let members = vec![
            event("a", 35.0, 139.0, EmotionCategory::Joy, 50),
            event("b", 35.1, 139.1, EmotionCategory::Joy, 60),
        ];
        assert_eq!(ClusterAggregator::mean_intensity(&members).value(), 55);
    }

    #[test]
    fn test_mean_intensity_rounds_half_up() {
        let members = vec![
            event("a", 0.0, 0.0, EmotionCategory::Joy, 50),
            event("b", 0.0, 0.0, EmotionCategory::Joy, 51),
        ];
        assert_eq!(ClusterAggregator::mean_intensity(&members).value(), 51);
    }

    // Pinned: ordinals 1,2,3,4 average to 2.5, which rounds to 3 (SORROW).
    #[test]
    fn test_all_four_categories_resolve_to_sorrow() {
        let members = vec![
            event("a", 0.0, 0.0, EmotionCategory::Joy, 10),
            event("b", 0.0, 0.0, EmotionCategory::Anger, 20),
            event("c", 0.0, 0.0, EmotionCategory::Sorrow, 30),
            event("d", 0.0, 0.0, EmotionCategory::Pleasure, 40),
        ];
        assert_eq!(ClusterAggregator::dominant_category(&members), EmotionCategory::Sorrow);
    }

    #[test]
    fn test_centroid_is_arithmetic_mean() {
        let members = vec![
            event("a", 34.0, 135.0, EmotionCategory::Joy, 0),
            event("b", 36.0, 137.0, EmotionCategory::Joy, 0),
        ];
        let centroid = ClusterAggregator::centroid(&members).unwrap();
        assert!((centroid.latitude() - 35.0).abs() < 1e-12);
        assert!((centroid.longitude() - 136.0).abs() < 1e-12);
    }

    #[test]
    fn test_aggregate_is_order_independent() {
        let members = vec![
            event("a", 35.68, 139.65, EmotionCategory::Joy, 12),
            event("b", 35.61, 139.72, EmotionCategory::Pleasure, 99),
            event("c", 35.70, 139.60, EmotionCategory::Anger, 47),
        ];
        let mut reversed = members.clone();
        reversed.reverse();

        let forward = ClusterAggregator::aggregate(members).unwrap();
        let backward = ClusterAggregator::aggregate(reversed).unwrap();

        assert_eq!(forward.centroid, backward.centroid);
        assert_eq!(forward.dominant_category, backward.dominant_category);
        assert_eq!(forward.mean_intensity, backward.mean_intensity);
    }

    #[test]
    fn test_aggregate_requires_two_members() {
        assert!(ClusterAggregator::aggregate(vec![]).is_none());
        assert!(ClusterAggregator::aggregate(vec![event("a", 0.0, 0.0, EmotionCategory::Joy, 1)]).is_none());
    }

    #[test]
    fn test_cluster_id_uses_first_member_and_count() {
        let cluster = ClusterAggregator::aggregate(vec![
            event("first", 0.0, 0.0, EmotionCategory::Joy, 1),
            event("second", 0.0, 0.0, EmotionCategory::Joy, 1),
        ])
        .unwrap();
        assert_eq!(cluster.id.as_str(), "cluster-first-2");
    }
}
