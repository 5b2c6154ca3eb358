//! Wire format of an emotion report
//!
//! Clients, the remote store and the local slot all exchange reports as
//! camelCase JSON with ISO-8601 timestamps:
//!
//! ```json
//! { "id": "emotion-1", "location": { "lat": 35.68, "lng": 139.65, "name": "Tokyo" },
//!   "emotion": "joy", "intensity": 70, "timestamp": "2024-05-01T09:00:00Z", "userName": "Hana" }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::EmotionEvent;
use crate::domain::errors::DomainError;
use crate::domain::value_objects::{EmotionCategory, EventId, GeoPoint, Intensity};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationDto {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub name: String,
}

/// A complete report as stored and fetched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionEventDto {
    pub id: String,
    pub location: LocationDto,
    pub emotion: EmotionCategory,
    pub intensity: i64,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub user_name: String,
}

impl From<&EmotionEvent> for EmotionEventDto {
    fn from(event: &EmotionEvent) -> Self {
        Self {
            id: event.id.to_string(),
            location: LocationDto {
                lat: event.point.latitude(),
                lng: event.point.longitude(),
                name: event.place_name.clone(),
            },
            emotion: event.category,
            intensity: i64::from(event.intensity),
            timestamp: event.observed_at,
            user_name: event.author.clone(),
        }
    }
}

impl TryFrom<EmotionEventDto> for EmotionEvent {
    type Error = DomainError;

    fn try_from(dto: EmotionEventDto) -> Result<Self, Self::Error> {
        let point = GeoPoint::new(dto.location.lat, dto.location.lng)?;
        Ok(EmotionEvent::new(point, dto.emotion, Intensity::new(dto.intensity)?)
            .with_id(EventId::parse(dto.id)?)
            .with_place_name(dto.location.name)
            .with_observed_at(dto.timestamp)
            .with_author(dto.user_name))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PartialLocationDto {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub name: Option<String>,
}

/// Body of an append request, where only `id`, `location` and `emotion` are required
///
/// Missing optional fields default to intensity 50, the current time and an
/// empty author.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppendEventRequest {
    pub id: Option<String>,
    pub location: Option<PartialLocationDto>,
    pub emotion: Option<String>,
    pub intensity: Option<i64>,
    pub timestamp: Option<DateTime<Utc>>,
    pub user_name: Option<String>,
}

impl AppendEventRequest {
    /// Validate the request and build the event it describes
    pub fn into_event(self, now: DateTime<Utc>) -> Result<EmotionEvent, DomainError> {
        let mut missing = Vec::new();
        if self.id.is_none() {
            missing.push("id");
        }
        match &self.location {
            None => missing.push("location"),
            Some(location) => {
                if location.lat.is_none() {
                    missing.push("location.lat");
                }
                if location.lng.is_none() {
                    missing.push("location.lng");
                }
            }
        }
        if self.emotion.is_none() {
            missing.push("emotion");
        }

        let (Some(id), Some(location), Some(emotion)) = (self.id, self.location, self.emotion) else {
            return Err(DomainError::MissingFields(missing));
        };
        let (Some(lat), Some(lng)) = (location.lat, location.lng) else {
            return Err(DomainError::MissingFields(missing));
        };

        let intensity = match self.intensity {
            Some(value) => Intensity::new(value)?,
            None => Intensity::default(),
        };

        Ok(
            EmotionEvent::new(GeoPoint::new(lat, lng)?, emotion.parse()?, intensity)
                .with_id(EventId::parse(id)?)
                .with_place_name(location.name.unwrap_or_default())
                .with_observed_at(self.timestamp.unwrap_or(now))
                .with_author(self.user_name.unwrap_or_default()),
        )
    }
}
