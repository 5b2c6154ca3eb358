//! Value objects - Immutable objects defined by their attributes

mod emotion_category;
mod geo_point;
mod ids;
mod intensity;
mod zoom_level;

pub use emotion_category::EmotionCategory;
pub use geo_point::GeoPoint;
pub use ids::{ClusterId, ContextId, EventId};
pub use intensity::Intensity;
pub use zoom_level::ZoomLevel;
