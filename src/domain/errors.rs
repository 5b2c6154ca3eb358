//! Validation errors raised while constructing domain values

/// A value rejected by domain validation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    #[error("Latitude {0} is outside [-90, 90]")]
    Latitude(f64),
    #[error("Longitude {0} is outside [-180, 180]")]
    Longitude(f64),
    #[error("Intensity {0} is outside [0, 100]")]
    Intensity(i64),
    #[error("Event id cannot be empty")]
    EmptyId,
    #[error("Unknown emotion category: {0}")]
    UnknownCategory(String),
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}
