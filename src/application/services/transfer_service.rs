//! Transfer Service - Whole-collection export and import
//!
//! Collections travel as JSON arrays of [`EmotionEventDto`]. Decoding is all
//! or nothing: one bad element rejects the entire collection.

use crate::application::dto::EmotionEventDto;
use crate::domain::entities::EmotionEvent;
use crate::domain::errors::DomainError;

#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("Malformed collection JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Invalid event at index {index}: {source}")]
    InvalidEvent { index: usize, source: DomainError },
}

/// Compact JSON array, as stored in a slot or sent to the remote store
pub fn encode_collection(events: &[EmotionEvent]) -> Result<String, TransferError> {
    let dtos: Vec<EmotionEventDto> = events.iter().map(EmotionEventDto::from).collect();
    Ok(serde_json::to_string(&dtos)?)
}

pub fn decode_collection(text: &str) -> Result<Vec<EmotionEvent>, TransferError> {
    let dtos: Vec<EmotionEventDto> = serde_json::from_str(text)?;
    dtos_to_events(dtos)
}

/// Validate a parsed array of DTOs, stopping at the first invalid element
pub fn dtos_to_events(dtos: Vec<EmotionEventDto>) -> Result<Vec<EmotionEvent>, TransferError> {
    dtos.into_iter()
        .enumerate()
        .map(|(index, dto)| {
            EmotionEvent::try_from(dto).map_err(|source| TransferError::InvalidEvent { index, source })
        })
        .collect()
}

/// Pretty-printed JSON array for saving to a file
pub fn export_json(events: &[EmotionEvent]) -> Result<String, TransferError> {
    let dtos: Vec<EmotionEventDto> = events.iter().map(EmotionEventDto::from).collect();
    Ok(serde_json::to_string_pretty(&dtos)?)
}

/// Parse an exported collection; nothing is returned unless every element is valid
pub fn import_json(text: &str) -> Result<Vec<EmotionEvent>, TransferError> {
    decode_collection(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{EmotionCategory, EventId, GeoPoint, Intensity};

    fn sample() -> Vec<EmotionEvent> {
        vec![
            EmotionEvent::new(
                GeoPoint::new(35.6762, 139.6503).unwrap(),
                EmotionCategory::Joy,
                Intensity::new(80).unwrap(),
            )
            .with_id(EventId::parse("emotion-1").unwrap())
            .with_place_name("東京都周辺")
            .with_author("佐藤 花子"),
            EmotionEvent::new(
                GeoPoint::new(-33.8688, 151.2093).unwrap(),
                EmotionCategory::Sorrow,
                Intensity::new(0).unwrap(),
            )
            .with_id(EventId::parse("emotion-2").unwrap()),
        ]
    }

    #[test]
    fn test_export_import_round_trip() {
        let events = sample();
        let exported = export_json(&events).unwrap();
        let imported = import_json(&exported).unwrap();
        assert_eq!(imported, events);
    }

    #[test]
    fn test_import_rejects_whole_collection_on_one_bad_element() {
        let text = r#"[
            { "id": "ok", "location": { "lat": 1.0, "lng": 1.0, "name": "" }, "emotion": "joy",
              "intensity": 10, "timestamp": "2024-01-01T00:00:00Z", "userName": "" },
            { "id": "bad", "location": { "lat": 1.0, "lng": 1.0, "name": "" }, "emotion": "joy",
              "intensity": 150, "timestamp": "2024-01-01T00:00:00Z", "userName": "" }
        ]"#;
        match import_json(text) {
            Err(TransferError::InvalidEvent { index, source }) => {
                assert_eq!(index, 1);
                assert_eq!(source, DomainError::Intensity(150));
            }
            other => panic!("expected invalid event error, got {:?}", other),
        }
    }

    #[test]
    fn test_import_rejects_non_array() {
        assert!(matches!(import_json(r#"{ "id": "x" }"#), Err(TransferError::Malformed(_))));
        assert!(matches!(import_json("not json"), Err(TransferError::Malformed(_))));
    }

    #[test]
    fn test_empty_collection() {
        assert_eq!(encode_collection(&[]).unwrap(), "[]");
        assert!(decode_collection("[]").unwrap().is_empty());
    }
}
