//! The four emotion categories a report can carry

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Emotion category of a single observation
///
/// Each category carries a fixed ordinal (JOY=1 .. PLEASURE=4). Cluster
/// aggregation averages these ordinals, which treats an unordered scale as
/// numeric. The ordering is part of the observable behavior and must not be
/// rearranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionCategory {
    Joy,
    Anger,
    Sorrow,
    Pleasure,
}

impl EmotionCategory {
    pub const ALL: [EmotionCategory; 4] = [Self::Joy, Self::Anger, Self::Sorrow, Self::Pleasure];

    pub fn ordinal(self) -> u8 {
        match self {
            Self::Joy => 1,
            Self::Anger => 2,
            Self::Sorrow => 3,
            Self::Pleasure => 4,
        }
    }

    /// Map a mean ordinal back to a category
    ///
    /// Rounds half away from zero (2.5 becomes 3, i.e. SORROW) and clamps to
    /// the valid ordinal range.
    pub fn from_mean_ordinal(mean: f64) -> Self {
        let rounded = mean.round().clamp(1.0, 4.0);
        match rounded as u8 {
            1 => Self::Joy,
            2 => Self::Anger,
            3 => Self::Sorrow,
            _ => Self::Pleasure,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Joy => "joy",
            Self::Anger => "anger",
            Self::Sorrow => "sorrow",
            Self::Pleasure => "pleasure",
        }
    }
}

impl FromStr for EmotionCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "joy" => Ok(Self::Joy),
            "anger" => Ok(Self::Anger),
            "sorrow" => Ok(Self::Sorrow),
            "pleasure" => Ok(Self::Pleasure),
            _ => Err(DomainError::UnknownCategory(s.to_string())),
        }
    }
}

impl std::fmt::Display for EmotionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals_are_fixed() {
        let ordinals: Vec<u8> = EmotionCategory::ALL.iter().map(|c| c.ordinal()).collect();
        assert_eq!(ordinals, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_mean_ordinal_rounding() {
        assert_eq!(EmotionCategory::from_mean_ordinal(2.5), EmotionCategory::Sorrow);
        assert_eq!(EmotionCategory::from_mean_ordinal(1.49), EmotionCategory::Joy);
        assert_eq!(EmotionCategory::from_mean_ordinal(3.5), EmotionCategory::Pleasure);
    }

    #[test]
    fn test_mean_ordinal_clamps() {
        assert_eq!(EmotionCategory::from_mean_ordinal(0.0), EmotionCategory::Joy);
        assert_eq!(EmotionCategory::from_mean_ordinal(9.0), EmotionCategory::Pleasure);
    }

    #[test]
    fn test_parse_and_serde_names() {
        assert_eq!("Sorrow".parse::<EmotionCategory>().unwrap(), EmotionCategory::Sorrow);
        assert!("fear".parse::<EmotionCategory>().is_err());
        assert_eq!(serde_json::to_string(&EmotionCategory::Pleasure).unwrap(), "\"pleasure\"");
    }
}
