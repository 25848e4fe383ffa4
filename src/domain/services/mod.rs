//! Domain services - Pure geometry and scene measurements

pub mod geometry;
pub mod region_metrics;

pub use geometry::PlacementTransform;
pub use region_metrics::{GridSnapper, ScaleFactor};
