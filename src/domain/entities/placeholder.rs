//! Placeholder entity - The scene tile standing in for a copied scene

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{
    PlaceableId, PlaceableKind, PlaceholderId, RegionLocator, TileBounds,
};

/// Identifiers of the objects a populated placeholder spawned, per kind
pub type SpawnedPlaceables = BTreeMap<PlaceableKind, Vec<PlaceableId>>;

/// A scene tile in the target scene
///
/// `spawned` is present exactly while the tile is populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placeholder {
    pub id: PlaceholderId,
    pub img: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub z: i64,
    #[serde(default)]
    pub locked: bool,
    /// Scene this tile was made from; absent on ordinary tiles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<RegionLocator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spawned: Option<SpawnedPlaceables>,
}

impl Placeholder {
    pub fn from_draft(id: PlaceholderId, z: i64, draft: PlaceholderDraft) -> Self {
        Self {
            id,
            img: draft.img,
            x: draft.bounds.x,
            y: draft.bounds.y,
            width: draft.bounds.width,
            height: draft.bounds.height,
            rotation: draft.rotation,
            z,
            locked: false,
            source: draft.source,
            spawned: None,
        }
    }

    /// Whether this tile was created from a scene
    pub fn is_managed(&self) -> bool {
        self.source.is_some()
    }

    pub fn is_populated(&self) -> bool {
        self.spawned.is_some()
    }

    /// Rotation pivot of everything placed on this tile
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn bounds(&self) -> TileBounds {
        TileBounds {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }

    /// Apply a partial update in place
    pub fn apply(&mut self, update: PlaceholderUpdate) {
        if let Some(x) = update.x {
            self.x = x;
        }
        if let Some(y) = update.y {
            self.y = y;
        }
        if let Some(width) = update.width {
            self.width = width;
        }
        if let Some(height) = update.height {
            self.height = height;
        }
        if let Some(rotation) = update.rotation {
            self.rotation = rotation;
        }
        if let Some(z) = update.z {
            self.z = z;
        }
        if let Some(locked) = update.locked {
            self.locked = locked;
        }
        if let Some(spawned) = update.spawned {
            self.spawned = spawned;
        }
    }
}

/// Data for a placeholder that the store has not created yet
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderDraft {
    pub img: String,
    pub bounds: TileBounds,
    pub rotation: f64,
    pub source: Option<RegionLocator>,
}

/// Partial update of a placeholder; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceholderUpdate {
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub rotation: Option<f64>,
    #[serde(default)]
    pub z: Option<i64>,
    #[serde(default)]
    pub locked: Option<bool>,
    /// `Some(None)` clears the spawned record
    #[serde(skip)]
    pub spawned: Option<Option<SpawnedPlaceables>>,
}

impl PlaceholderUpdate {
    pub fn is_resize(&self) -> bool {
        self.width.is_some() || self.height.is_some()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Mark as populated with the given spawned identifiers
    pub fn populated(spawned: SpawnedPlaceables) -> Self {
        Self {
            locked: Some(true),
            spawned: Some(Some(spawned)),
            ..Default::default()
        }
    }

    /// Mark as cleared
    pub fn cleared() -> Self {
        Self {
            locked: Some(false),
            spawned: Some(None),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholder() -> Placeholder {
        Placeholder::from_draft(
            PlaceholderId::new(),
            3,
            PlaceholderDraft {
                img: "maps/cellar.webp".to_string(),
                bounds: TileBounds {
                    x: 200.0,
                    y: 100.0,
                    width: 400.0,
                    height: 300.0,
                },
                rotation: 0.0,
                source: Some(RegionLocator::new("Scene.cellar")),
            },
        )
    }

    #[test]
    fn test_new_placeholder_is_unpopulated() {
        let tile = placeholder();
        assert!(tile.is_managed());
        assert!(!tile.is_populated());
        assert!(!tile.locked);
        assert_eq!(tile.z, 3);
        assert_eq!(tile.center(), (400.0, 250.0));
    }

    #[test]
    fn test_populate_and_clear_updates() {
        let mut tile = placeholder();
        let mut spawned = SpawnedPlaceables::new();
        spawned.insert(PlaceableKind::Light, vec![PlaceableId::new()]);

        tile.apply(PlaceholderUpdate::populated(spawned.clone()));
        assert!(tile.locked);
        assert_eq!(tile.spawned.as_ref(), Some(&spawned));

        tile.apply(PlaceholderUpdate::cleared());
        assert!(!tile.locked);
        assert!(!tile.is_populated());
    }

    #[test]
    fn test_resize_detection() {
        let update = PlaceholderUpdate {
            width: Some(10.0),
            ..Default::default()
        };
        assert!(update.is_resize());
        assert!(!PlaceholderUpdate::default().is_resize());
        assert!(PlaceholderUpdate::default().is_empty());
    }
}
