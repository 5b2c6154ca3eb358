//! Latitude/longitude pair in degrees

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// A validated position on the map
///
/// Coordinates are plain degrees. Distances are never computed geodesically;
/// clustering works directly in degree space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(DomainError::Latitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(DomainError::Longitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Build a point from coordinates already derived from valid points,
    /// clamping away floating-point drift at the bounds
    pub(crate) fn clamped(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: latitude.clamp(-90.0, 90.0),
            longitude: longitude.clamp(-180.0, 180.0),
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}
