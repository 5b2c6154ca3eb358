//! EmotionEvent entity - A single geo-tagged emotion report

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{EmotionCategory, EventId, GeoPoint, Intensity};

/// One emotion report at a place and time
///
/// Events are never mutated after creation. The canonical collection is
/// owned by the event store; everything downstream works on snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionEvent {
    pub id: EventId,
    pub point: GeoPoint,
    pub place_name: String,
    pub category: EmotionCategory,
    pub intensity: Intensity,
    pub observed_at: DateTime<Utc>,
    pub author: String,
}

impl EmotionEvent {
    /// Create a new report observed now, with a freshly generated id
    pub fn new(point: GeoPoint, category: EmotionCategory, intensity: Intensity) -> Self {
        Self {
            id: EventId::generate(),
            point,
            place_name: String::new(),
            category,
            intensity,
            observed_at: Utc::now(),
            author: String::new(),
        }
    }

    pub fn with_id(mut self, id: EventId) -> Self {
        self.id = id;
        self
    }

    pub fn with_place_name(mut self, place_name: impl Into<String>) -> Self {
        self.place_name = place_name.into();
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_observed_at(mut self, observed_at: DateTime<Utc>) -> Self {
        self.observed_at = observed_at;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_builder() {
        let point = GeoPoint::new(35.6762, 139.6503).unwrap();
        let event = EmotionEvent::new(point, EmotionCategory::Joy, Intensity::new(70).unwrap())
            .with_id(EventId::parse("emotion-1").unwrap())
            .with_place_name("Tokyo")
            .with_author("Hana");

        assert_eq!(event.id.as_str(), "emotion-1");
        assert_eq!(event.place_name, "Tokyo");
        assert_eq!(event.author, "Hana");
        assert_eq!(event.intensity.value(), 70);
    }
}
