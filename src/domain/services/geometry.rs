//! Coordinate translation, scaling and rotation
//!
//! Pure functions that move a point from source scene coordinates onto a scene
//! tile in the target scene. Nothing here reads scene state; everything a
//! transform needs arrives in a [`PlacementTransform`].

/// Translate `(x, y)` by the offset `(ox, oy)`
pub fn translate(ox: f64, oy: f64, x: f64, y: f64) -> (f64, f64) {
    (x + ox, y + oy)
}

/// Scale `(x, y)` about the origin
pub fn scale_xy(x: f64, y: f64, factor: f64) -> (f64, f64) {
    (x * factor, y * factor)
}

/// Rotate `(x, y)` about the pivot `(cx, cy)` by `angle` degrees
///
/// A zero angle returns the point untouched rather than going through
/// `cos(0)`/`sin(0)`.
pub fn rotate(cx: f64, cy: f64, x: f64, y: f64, angle: f64) -> (f64, f64) {
    if angle == 0.0 {
        return (x, y);
    }

    let radians = angle.to_radians();
    let (sin, cos) = radians.sin_cos();
    let nx = cos * (x - cx) - sin * (y - cy) + cx;
    let ny = cos * (y - cy) + sin * (x - cx) + cy;
    (nx, ny)
}

/// Ratio between a source and a destination measure
///
/// A zero `source` yields a non-finite ratio; callers decide what to do with it.
pub fn calculate_scale_factor(source: f64, destination: f64) -> f64 {
    destination / source
}

/// Everything needed to move one scene onto one tile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementTransform {
    /// Tile anchor (top-left corner) in the target scene
    pub ox: f64,
    pub oy: f64,
    /// Rotation pivot, the tile center
    pub cx: f64,
    pub cy: f64,
    /// Tile rotation in degrees
    pub angle: f64,
    /// Source to target pixel ratio
    pub scale: f64,
    /// Source scene padding, removed before scaling
    pub px: f64,
    pub py: f64,
}

impl Default for PlacementTransform {
    fn default() -> Self {
        Self {
            ox: 0.0,
            oy: 0.0,
            cx: 0.0,
            cy: 0.0,
            angle: 0.0,
            scale: 1.0,
            px: 0.0,
            py: 0.0,
        }
    }
}

impl PlacementTransform {
    /// Move a single point onto the tile
    ///
    /// Padding comes off before scaling, and the tile offset is applied before
    /// rotating since the pivot is the already-placed tile center.
    pub fn translate_point(&self, x: f64, y: f64) -> (f64, f64) {
        let (mut x, mut y) = (x, y);
        if self.px != 0.0 || self.py != 0.0 {
            (x, y) = translate(-self.px, -self.py, x, y);
        }
        if self.scale != 1.0 {
            (x, y) = scale_xy(x, y, self.scale);
        }
        (x, y) = translate(self.ox, self.oy, x, y);
        if self.angle != 0.0 {
            (x, y) = rotate(self.cx, self.cy, x, y, self.angle);
        }
        (x, y)
    }

    /// Move a box given by its top-left corner and pixel size
    ///
    /// The center is what gets transformed, so rotation works for any size.
    /// Returns the new top-left corner and the scaled size.
    pub fn translate_point_width(&self, x: f64, y: f64, w: f64, h: f64) -> (f64, f64, f64, f64) {
        let (mx, my) = (x + w / 2.0, y + h / 2.0);
        let (x, y) = self.translate_point(mx, my);

        let (w, h) = if self.scale != 1.0 {
            scale_xy(w, h, self.scale)
        } else {
            (w, h)
        };

        (x - w / 2.0, y - h / 2.0, w, h)
    }

    /// Move a box whose size is counted in grid cells
    ///
    /// `grid_size` is the target scene's pixels per cell. The returned size is
    /// in target pixels.
    pub fn translate_point_width_grids(
        &self,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        grid_size: f64,
    ) -> (f64, f64, f64, f64) {
        let grid = if self.scale != 1.0 {
            grid_size / self.scale
        } else {
            grid_size
        };
        let (w, h) = scale_xy(w, h, grid);

        self.translate_point_width(x, y, w, h)
    }

    /// Move every `(x, y)` pair of a flat wall coordinate list
    ///
    /// A trailing unpaired value is dropped.
    pub fn translate_wall(&self, c: &[f64]) -> Vec<f64> {
        c.chunks_exact(2)
            .flat_map(|pair| {
                let (x, y) = self.translate_point(pair[0], pair[1]);
                [x, y]
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn assert_close(actual: (f64, f64), expected: (f64, f64)) {
        assert!(
            (actual.0 - expected.0).abs() < EPSILON && (actual.1 - expected.1).abs() < EPSILON,
            "expected {:?}, got {:?}",
            expected,
            actual
        );
    }

    #[test]
    fn test_rotate_zero_angle_is_identity() {
        for &(cx, cy, x, y) in &[
            (0.0, 0.0, 0.1, 0.2),
            (500.0, -20.0, 1e9, -3.3),
            (0.3, 0.7, 123.456, 789.012),
        ] {
            assert_eq!(rotate(cx, cy, x, y, 0.0), (x, y));
        }
    }

    #[test]
    fn test_rotate_keeps_pivot_fixed() {
        for angle in [15.0, 90.0, 180.0, 271.5, -45.0] {
            assert_close(rotate(250.0, 75.0, 250.0, 75.0, angle), (250.0, 75.0));
        }
    }

    #[test]
    fn test_rotate_quarter_turn() {
        // Clockwise on screen, since y points down
        assert_close(rotate(0.0, 0.0, 10.0, 0.0, 90.0), (0.0, 10.0));
        assert_close(rotate(5.0, 5.0, 10.0, 5.0, 180.0), (0.0, 5.0));
    }

    #[test]
    fn test_translate_is_invertible() {
        for &(ox, oy, x, y) in &[(3.0, -4.0, 10.0, 20.0), (-0.5, 0.25, 1e6, -1e6)] {
            let (tx, ty) = translate(-ox, -oy, x, y);
            assert_eq!(translate(ox, oy, tx, ty), (x, y));
        }
    }

    #[test]
    fn test_scale_factor() {
        assert_eq!(calculate_scale_factor(100.0, 50.0), 0.5);
        assert!(!calculate_scale_factor(0.0, 50.0).is_finite());
    }

    #[test]
    fn test_translate_point_order() {
        // Padding removed, then scaled, then offset, then rotated about the pivot
        let transform = PlacementTransform {
            ox: 100.0,
            oy: 100.0,
            cx: 100.0,
            cy: 100.0,
            angle: 90.0,
            scale: 2.0,
            px: 10.0,
            py: 10.0,
        };

        // (20, 10) -> (10, 0) -> (20, 0) -> (120, 100) -> rotated to (100, 120)
        assert_close(transform.translate_point(20.0, 10.0), (100.0, 120.0));
    }

    #[test]
    fn test_translate_point_padding_on_one_axis() {
        let transform = PlacementTransform {
            py: 50.0,
            ..Default::default()
        };
        assert_eq!(transform.translate_point(10.0, 60.0), (10.0, 10.0));
    }

    #[test]
    fn test_translate_point_width_pure_offset() {
        let transform = PlacementTransform {
            ox: 10.0,
            oy: 20.0,
            ..Default::default()
        };
        assert_eq!(
            transform.translate_point_width(0.0, 0.0, 4.0, 2.0),
            (10.0, 20.0, 4.0, 2.0)
        );
    }

    #[test]
    fn test_translate_point_width_rotates_about_center() {
        // A tile-sized box rotated half a turn about its own center stays put
        let transform = PlacementTransform {
            ox: 0.0,
            oy: 0.0,
            cx: 50.0,
            cy: 25.0,
            angle: 180.0,
            ..Default::default()
        };
        let (x, y, w, h) = transform.translate_point_width(0.0, 0.0, 100.0, 50.0);
        assert_close((x, y), (0.0, 0.0));
        assert_eq!((w, h), (100.0, 50.0));
    }

    #[test]
    fn test_translate_point_width_scales_size() {
        let transform = PlacementTransform {
            scale: 0.5,
            ..Default::default()
        };
        assert_eq!(
            transform.translate_point_width(100.0, 100.0, 200.0, 100.0),
            (50.0, 50.0, 100.0, 50.0)
        );
    }

    #[test]
    fn test_translate_point_width_grids_sizes_from_target_grid() {
        let transform = PlacementTransform::default();
        let (_, _, w, h) = transform.translate_point_width_grids(0.0, 0.0, 2.0, 1.0, 100.0);
        assert_eq!((w, h), (200.0, 100.0));
    }

    #[test]
    fn test_translate_point_width_grids_under_scale() {
        // The target grid is divided by the scale first, so the token keeps
        // covering the same number of target cells after scaling
        let transform = PlacementTransform {
            scale: 0.5,
            ..Default::default()
        };
        let (_, _, w, h) = transform.translate_point_width_grids(0.0, 0.0, 1.0, 1.0, 50.0);
        assert_eq!((w, h), (50.0, 50.0));
    }

    #[test]
    fn test_translate_wall() {
        let transform = PlacementTransform {
            ox: 5.0,
            oy: 5.0,
            ..Default::default()
        };
        assert_eq!(
            transform.translate_wall(&[0.0, 0.0, 10.0, 0.0]),
            vec![5.0, 5.0, 15.0, 5.0]
        );
    }

    #[test]
    fn test_translate_wall_preserves_pairs_and_order() {
        let transform = PlacementTransform {
            ox: 1.0,
            oy: 2.0,
            scale: 3.0,
            ..Default::default()
        };
        let c: Vec<f64> = (0..12).map(f64::from).collect();
        let d = transform.translate_wall(&c);

        assert_eq!(d.len(), c.len());
        for (pair, moved) in c.chunks(2).zip(d.chunks(2)) {
            let expected = transform.translate_point(pair[0], pair[1]);
            assert_eq!((moved[0], moved[1]), expected);
        }
        assert!(transform.translate_wall(&[]).is_empty());
    }
}
