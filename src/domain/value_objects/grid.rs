//! Grid metrics and tile bounds

use serde::{Deserialize, Serialize};

/// How a scene's grid maps pixels to real-world distance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridMetrics {
    /// Pixels per grid cell
    pub size: f64,
    /// Real-world distance represented by one cell
    pub distance: f64,
    /// Unit label for `distance`, e.g. "ft" or "m"
    #[serde(default)]
    pub units: String,
}

impl GridMetrics {
    pub fn new(size: f64, distance: f64, units: impl Into<String>) -> Self {
        Self {
            size,
            distance,
            units: units.into(),
        }
    }
}

impl Default for GridMetrics {
    fn default() -> Self {
        Self::new(100.0, 5.0, "ft")
    }
}

/// Position and size of a scene tile in target scene pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}
