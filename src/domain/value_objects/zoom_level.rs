//! Map zoom level supplied by the viewport

use serde::{Deserialize, Serialize};

/// Viewport zoom; larger values are closer to the ground
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoomLevel(u8);

impl ZoomLevel {
    pub const fn new(level: u8) -> Self {
        Self(level)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Side length of a clustering cell at this zoom: `k / 2^zoom` degrees
    ///
    /// Powers of two are exact in `f64`, so each cell at zoom `z + 1` nests
    /// exactly inside one cell at zoom `z`.
    pub fn cell_size_degrees(self, k: f64) -> f64 {
        k / 2f64.powi(i32::from(self.0))
    }
}

impl From<u8> for ZoomLevel {
    fn from(level: u8) -> Self {
        Self(level)
    }
}

impl std::fmt::Display for ZoomLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
