//! Placeable entities - Positioned objects held by a scene
//!
//! Each shape keeps only the fields the engine transforms. Everything else a
//! document carries (light radius, wall movement restrictions, note text...)
//! rides along in `extra` and is copied untouched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::value_objects::{PlaceableId, PlaceableKind};

/// A single-point object: lights, sounds, notes, templates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointPlaceable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PlaceableId>,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    /// Facing in degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PointPlaceable {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            id: None,
            x,
            y,
            rotation: None,
            direction: None,
            extra: Map::new(),
        }
    }

    pub fn with_direction(mut self, direction: f64) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = Some(rotation);
        self
    }
}

/// Occlusion behaviour of an overhead tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcclusionMode {
    /// Always visible
    None,
    Fade,
    Roof,
    Radial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occlusion {
    pub mode: OcclusionMode,
}

/// A box object whose `x, y` is its top-left corner: tiles, drawings, tokens
///
/// Tokens measure `width` and `height` in grid cells, the others in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxPlaceable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PlaceableId>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation: f64,
    /// Stacking index
    #[serde(default)]
    pub z: i64,
    #[serde(default)]
    pub overhead: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occlusion: Option<Occlusion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BoxPlaceable {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: None,
            x,
            y,
            width,
            height,
            rotation: 0.0,
            z: 0,
            overhead: false,
            occlusion: None,
            img: None,
            extra: Map::new(),
        }
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_z(mut self, z: i64) -> Self {
        self.z = z;
        self
    }

    pub fn with_img(mut self, img: impl Into<String>) -> Self {
        self.img = Some(img.into());
        self
    }

    pub fn overhead(mut self) -> Self {
        self.overhead = true;
        self
    }
}

/// A wall: one or more connected segments as `[x0, y0, x1, y1, ...]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallPlaceable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PlaceableId>,
    pub c: Vec<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WallPlaceable {
    pub fn new(c: Vec<f64>) -> Self {
        Self {
            id: None,
            c,
            extra: Map::new(),
        }
    }
}

/// Any placeable, discriminated by shape
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Placeable {
    Point(PointPlaceable),
    Box(BoxPlaceable),
    Wall(WallPlaceable),
}

impl Placeable {
    pub fn id(&self) -> Option<PlaceableId> {
        match self {
            Placeable::Point(p) => p.id,
            Placeable::Box(b) => b.id,
            Placeable::Wall(w) => w.id,
        }
    }

    pub fn set_id(&mut self, id: PlaceableId) {
        match self {
            Placeable::Point(p) => p.id = Some(id),
            Placeable::Box(b) => b.id = Some(id),
            Placeable::Wall(w) => w.id = Some(id),
        }
    }
}

impl From<PointPlaceable> for Placeable {
    fn from(p: PointPlaceable) -> Self {
        Placeable::Point(p)
    }
}

impl From<BoxPlaceable> for Placeable {
    fn from(b: BoxPlaceable) -> Self {
        Placeable::Box(b)
    }
}

impl From<WallPlaceable> for Placeable {
    fn from(w: WallPlaceable) -> Self {
        Placeable::Wall(w)
    }
}

/// Objects grouped by kind, ready to be created or just created
pub type PlaceableBatch = BTreeMap<PlaceableKind, Vec<Placeable>>;

/// The per-kind object collections of a scene
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceableCollections {
    #[serde(default)]
    pub drawings: Vec<BoxPlaceable>,
    #[serde(default)]
    pub walls: Vec<WallPlaceable>,
    #[serde(default)]
    pub templates: Vec<PointPlaceable>,
    #[serde(default)]
    pub notes: Vec<PointPlaceable>,
    #[serde(default)]
    pub tokens: Vec<BoxPlaceable>,
    #[serde(default)]
    pub sounds: Vec<PointPlaceable>,
    #[serde(default)]
    pub lights: Vec<PointPlaceable>,
    #[serde(default)]
    pub tiles: Vec<BoxPlaceable>,
}

impl PlaceableCollections {
    /// Clone the objects of one kind
    pub fn of_kind(&self, kind: PlaceableKind) -> Vec<Placeable> {
        fn cloned<T: Clone + Into<Placeable>>(items: &[T]) -> Vec<Placeable> {
            items.iter().cloned().map(Into::into).collect()
        }

        match kind {
            PlaceableKind::Drawing => cloned(&self.drawings),
            PlaceableKind::Wall => cloned(&self.walls),
            PlaceableKind::Template => cloned(&self.templates),
            PlaceableKind::Note => cloned(&self.notes),
            PlaceableKind::Token => cloned(&self.tokens),
            PlaceableKind::Sound => cloned(&self.sounds),
            PlaceableKind::Light => cloned(&self.lights),
            PlaceableKind::Tile => cloned(&self.tiles),
        }
    }

    /// Add an object to the collection of `kind`
    ///
    /// Hands the object back if its shape does not belong to that kind.
    pub fn insert(&mut self, kind: PlaceableKind, placeable: Placeable) -> Result<(), Placeable> {
        match (kind, placeable) {
            (PlaceableKind::Drawing, Placeable::Box(b)) => self.drawings.push(b),
            (PlaceableKind::Token, Placeable::Box(b)) => self.tokens.push(b),
            (PlaceableKind::Tile, Placeable::Box(b)) => self.tiles.push(b),
            (PlaceableKind::Wall, Placeable::Wall(w)) => self.walls.push(w),
            (PlaceableKind::Template, Placeable::Point(p)) => self.templates.push(p),
            (PlaceableKind::Note, Placeable::Point(p)) => self.notes.push(p),
            (PlaceableKind::Sound, Placeable::Point(p)) => self.sounds.push(p),
            (PlaceableKind::Light, Placeable::Point(p)) => self.lights.push(p),
            (_, other) => return Err(other),
        }
        Ok(())
    }

    /// Remove every object of `kind` whose id is listed, returning how many went
    pub fn remove(&mut self, kind: PlaceableKind, ids: &[PlaceableId]) -> usize {
        fn retain_unlisted<T>(
            items: &mut Vec<T>,
            ids: &[PlaceableId],
            id_of: impl Fn(&T) -> Option<PlaceableId>,
        ) -> usize {
            let before = items.len();
            items.retain(|item| !id_of(item).is_some_and(|id| ids.contains(&id)));
            before - items.len()
        }

        match kind {
            PlaceableKind::Drawing => retain_unlisted(&mut self.drawings, ids, |b| b.id),
            PlaceableKind::Wall => retain_unlisted(&mut self.walls, ids, |w| w.id),
            PlaceableKind::Template => retain_unlisted(&mut self.templates, ids, |p| p.id),
            PlaceableKind::Note => retain_unlisted(&mut self.notes, ids, |p| p.id),
            PlaceableKind::Token => retain_unlisted(&mut self.tokens, ids, |b| b.id),
            PlaceableKind::Sound => retain_unlisted(&mut self.sounds, ids, |p| p.id),
            PlaceableKind::Light => retain_unlisted(&mut self.lights, ids, |p| p.id),
            PlaceableKind::Tile => retain_unlisted(&mut self.tiles, ids, |b| b.id),
        }
    }

    /// Identifiers of every stored object of `kind`
    pub fn ids(&self, kind: PlaceableKind) -> Vec<PlaceableId> {
        self.of_kind(kind).iter().filter_map(Placeable::id).collect()
    }

    /// Give every object without an identifier a fresh one, returning how many got one
    pub fn assign_missing_ids(&mut self) -> usize {
        fn fill(id: &mut Option<PlaceableId>) -> usize {
            if id.is_some() {
                return 0;
            }
            *id = Some(PlaceableId::new());
            1
        }

        let mut assigned = 0;
        for b in self
            .drawings
            .iter_mut()
            .chain(&mut self.tokens)
            .chain(&mut self.tiles)
        {
            assigned += fill(&mut b.id);
        }
        for w in &mut self.walls {
            assigned += fill(&mut w.id);
        }
        for p in self
            .templates
            .iter_mut()
            .chain(&mut self.notes)
            .chain(&mut self.sounds)
            .chain(&mut self.lights)
        {
            assigned += fill(&mut p.id);
        }
        assigned
    }

    pub fn len(&self, kind: PlaceableKind) -> usize {
        match kind {
            PlaceableKind::Drawing => self.drawings.len(),
            PlaceableKind::Wall => self.walls.len(),
            PlaceableKind::Template => self.templates.len(),
            PlaceableKind::Note => self.notes.len(),
            PlaceableKind::Token => self.tokens.len(),
            PlaceableKind::Sound => self.sounds.len(),
            PlaceableKind::Light => self.lights.len(),
            PlaceableKind::Tile => self.tiles.len(),
        }
    }
}
