//! Data transfer objects - JSON shapes exchanged with clients and stores

mod emotion_event;

pub use emotion_event::{AppendEventRequest, EmotionEventDto, LocationDto, PartialLocationDto};
