//! Region entity - A scene: a coordinate space holding positioned objects

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Placeable, PlaceableCollections};
use crate::domain::value_objects::{GridMetrics, PlaceableKind, RegionLocator};

/// A scene snapshot
///
/// Object coordinates are canvas coordinates, which include the padding border
/// around the scene's own `width` x `height` content area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub locator: RegionLocator,
    #[serde(default)]
    pub name: String,
    pub grid: GridMetrics,
    /// Content width in pixels, excluding padding
    pub width: f64,
    /// Content height in pixels, excluding padding
    pub height: f64,
    /// Fraction of the content size reserved as border on every side
    #[serde(default)]
    pub padding: f64,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub foreground: Option<String>,
    #[serde(flatten)]
    pub placeables: PlaceableCollections,
}

impl Region {
    pub fn new(
        locator: impl Into<RegionLocator>,
        name: impl Into<String>,
        grid: GridMetrics,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            locator: locator.into(),
            name: name.into(),
            grid,
            width,
            height,
            padding: 0.0,
            background: None,
            foreground: None,
            placeables: PlaceableCollections::default(),
        }
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_background(mut self, img: impl Into<String>) -> Self {
        self.background = Some(img.into());
        self
    }

    pub fn with_foreground(mut self, img: impl Into<String>) -> Self {
        self.foreground = Some(img.into());
        self
    }

    pub fn with_placeable(mut self, kind: PlaceableKind, placeable: impl Into<Placeable>) -> Self {
        if let Err(rejected) = self.placeables.insert(kind, placeable.into()) {
            tracing::warn!(%kind, ?rejected, "Placeable shape does not match its kind, skipped");
        }
        self
    }

    /// The foreground image, if it is set and differs from the background
    pub fn distinct_foreground(&self) -> Option<&str> {
        match (&self.foreground, &self.background) {
            (Some(fg), Some(bg)) if fg == bg => None,
            (Some(fg), _) if !fg.is_empty() => Some(fg.as_str()),
            _ => None,
        }
    }

    /// Center of the content area
    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }

    /// Lowest stacking index among the overhead tiles of this scene
    pub fn min_overhead_z(&self) -> Option<i64> {
        self.placeables
            .tiles
            .iter()
            .filter(|tile| tile.overhead)
            .map(|tile| tile.z)
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{BoxPlaceable, PointPlaceable};

    fn region() -> Region {
        Region::new("Scene.test", "Test", GridMetrics::default(), 1000.0, 500.0)
    }

    #[test]
    fn test_distinct_foreground() {
        assert_eq!(region().distinct_foreground(), None);

        let same = region().with_background("a.webp").with_foreground("a.webp");
        assert_eq!(same.distinct_foreground(), None);

        let layered = region().with_background("a.webp").with_foreground("b.webp");
        assert_eq!(layered.distinct_foreground(), Some("b.webp"));

        let foreground_only = region().with_foreground("b.webp");
        assert_eq!(foreground_only.distinct_foreground(), Some("b.webp"));
    }

    #[test]
    fn test_min_overhead_z_ignores_ground_tiles() {
        let region = region()
            .with_placeable(PlaceableKind::Tile, BoxPlaceable::new(0.0, 0.0, 1.0, 1.0).with_z(-5))
            .with_placeable(
                PlaceableKind::Tile,
                BoxPlaceable::new(0.0, 0.0, 1.0, 1.0).with_z(40).overhead(),
            )
            .with_placeable(
                PlaceableKind::Tile,
                BoxPlaceable::new(0.0, 0.0, 1.0, 1.0).with_z(20).overhead(),
            );

        assert_eq!(region.min_overhead_z(), Some(20));
        assert_eq!(self::region().min_overhead_z(), None);
    }

    #[test]
    fn test_with_placeable_skips_mismatched_shape() {
        let region = region().with_placeable(PlaceableKind::Wall, PointPlaceable::new(1.0, 1.0));
        assert_eq!(region.placeables.len(PlaceableKind::Wall), 0);
    }

    #[test]
    fn test_deserialize_scene_document() {
        let json = r#"{
            "locator": "Scene.cellar",
            "name": "Cellar",
            "grid": { "size": 100, "distance": 5, "units": "ft" },
            "width": 2000,
            "height": 1500,
            "padding": 0.25,
            "background": "maps/cellar.webp",
            "lights": [{ "x": 300, "y": 400, "config": { "dim": 20 } }],
            "walls": [{ "c": [0, 0, 100, 0], "move": 1 }]
        }"#;

        let region: Region = serde_json::from_str(json).unwrap();
        assert_eq!(region.locator.as_str(), "Scene.cellar");
        assert_eq!(region.grid.size, 100.0);
        assert_eq!(region.placeables.lights.len(), 1);
        assert_eq!(region.placeables.walls[0].c, vec![0.0, 0.0, 100.0, 0.0]);
        assert!(region.placeables.tiles.is_empty());
    }
}
