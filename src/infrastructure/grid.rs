//! Square grid adapter

use crate::domain::entities::Region;
use crate::domain::services::region_metrics::canvas_size;
use crate::domain::services::GridSnapper;

/// Snaps to the intersections of a square grid laid from the canvas origin
///
/// Padding is a whole number of cells, so the scene's own grid lines fall on
/// the same intersections.
#[derive(Debug, Clone, Copy)]
pub struct SquareGridSnapper {
    pub snap_enabled: bool,
}

impl Default for SquareGridSnapper {
    fn default() -> Self {
        Self { snap_enabled: true }
    }
}

impl GridSnapper for SquareGridSnapper {
    fn snapped_position(&self, region: &Region, x: f64, y: f64) -> (f64, f64) {
        let grid = region.grid.size;
        if !self.snap_enabled || grid <= 0.0 {
            return (x, y);
        }

        ((x / grid).round() * grid, (y / grid).round() * grid)
    }

    fn contains(&self, region: &Region, x: f64, y: f64) -> bool {
        let (width, height) = canvas_size(region);
        (0.0..width).contains(&x) && (0.0..height).contains(&y)
    }
}
