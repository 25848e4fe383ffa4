//! Region metrics - Scale, padding and tile placement derived from scenes

use crate::domain::entities::Region;
use crate::domain::services::geometry::calculate_scale_factor;
use crate::domain::value_objects::{GridMetrics, TileBounds};

/// Grid alignment of a target scene
///
/// The host owns the grid geometry; the engine only asks it to snap a point
/// and whether a point lies on the canvas.
pub trait GridSnapper: Send + Sync {
    /// Snap a canvas point to the scene's native grid alignment
    fn snapped_position(&self, region: &Region, x: f64, y: f64) -> (f64, f64);

    /// Whether the point lies within the scene's interactive area
    fn contains(&self, region: &Region, x: f64, y: f64) -> bool;
}

/// Source to target pixel ratio
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleFactor {
    pub factor: f64,
    /// `(source, target)` distance units when they differ
    pub unit_mismatch: Option<(String, String)>,
}

/// Ratio by which source pixel coordinates are multiplied to land on the target
///
/// Both the pixel size of a cell and the distance it stands for count: a
/// 100px/5ft grid copied onto a 100px/10ft grid shrinks by half. Differing
/// units are reported but not converted.
pub fn get_scale_factor(source: &GridMetrics, target: &GridMetrics) -> ScaleFactor {
    let factor = calculate_scale_factor(source.size, target.size)
        / calculate_scale_factor(source.distance, target.distance);

    let unit_mismatch = (source.units != target.units)
        .then(|| (source.units.clone(), target.units.clone()));

    ScaleFactor {
        factor,
        unit_mismatch,
    }
}

/// Padding border of a region in pixels, rounded up to whole grid cells
pub fn get_padding(region: &Region) -> (f64, f64) {
    let grid = region.grid.size;
    let px = (region.width / grid * region.padding).ceil() * grid;
    let py = (region.height / grid * region.padding).ceil() * grid;
    (px, py)
}

/// Size of a tile showing `region` at the given scale
pub fn get_scaled_tile_size(region: &Region, scale: f64) -> (f64, f64) {
    (region.width * scale, region.height * scale)
}

/// Full canvas size of a region, padding included on every side
pub fn canvas_size(region: &Region) -> (f64, f64) {
    let (px, py) = get_padding(region);
    (region.width + 2.0 * px, region.height + 2.0 * py)
}

/// Position and size of a new tile showing `source`, dropped on `target`
///
/// With `centered`, the drop point becomes the tile center instead of its
/// top-left corner. The corner is clamped onto the target canvas and snapped
/// to its grid; a snapped point that falls off the canvas goes to the origin.
pub fn get_tile_pos(
    source: &Region,
    target: &Region,
    drop_x: f64,
    drop_y: f64,
    centered: bool,
    snapper: &dyn GridSnapper,
) -> TileBounds {
    let scale = get_scale_factor(&source.grid, &target.grid).factor;
    let (width, height) = get_scaled_tile_size(source, scale);

    let (mut x, mut y) = (drop_x, drop_y);
    if centered {
        x -= width / 2.0;
        y -= height / 2.0;
    }

    let (canvas_width, canvas_height) = canvas_size(target);
    x = x.min(canvas_width - 1.0).max(0.0);
    y = y.min(canvas_height - 1.0).max(0.0);

    let (mut x, mut y) = snapper.snapped_position(target, x, y);
    if !snapper.contains(target, x, y) {
        (x, y) = (0.0, 0.0);
    }

    TileBounds {
        x,
        y,
        width,
        height,
    }
}
