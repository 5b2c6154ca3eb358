//! Domain layer - Core clustering logic with no external dependencies
//!
//! This layer contains:
//! - Entities: EmotionEvent observations and transient Clusters
//! - Value Objects: GeoPoint, EmotionCategory, Intensity, ZoomLevel, ids
//! - Domain Services: grid clustering and cluster aggregation

pub mod entities;
pub mod errors;
pub mod services;
pub mod value_objects;
