//! Emotion intensity on a 0-100 scale

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Intensity of an observation, always within [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Intensity(u8);

impl Intensity {
    pub const MAX: u8 = 100;

    pub fn new(value: i64) -> Result<Self, DomainError> {
        if !(0..=i64::from(Self::MAX)).contains(&value) {
            return Err(DomainError::Intensity(value));
        }
        Ok(Self(value as u8))
    }

    /// Round a mean of valid intensities to the nearest integer
    pub(crate) fn from_mean(mean: f64) -> Self {
        Self(mean.round().clamp(0.0, f64::from(Self::MAX)) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Intensity {
    /// The midpoint, used when a report omits its intensity
    fn default() -> Self {
        Self(50)
    }
}

impl TryFrom<i64> for Intensity {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Intensity> for i64 {
    fn from(intensity: Intensity) -> i64 {
        i64::from(intensity.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        assert_eq!(Intensity::new(0).unwrap().value(), 0);
        assert_eq!(Intensity::new(100).unwrap().value(), 100);
        assert_eq!(Intensity::new(101), Err(DomainError::Intensity(101)));
        assert_eq!(Intensity::new(-1), Err(DomainError::Intensity(-1)));
    }
}
