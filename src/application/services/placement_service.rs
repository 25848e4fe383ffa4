//! Placement Service - Application service for scene tiles
//!
//! A scene tile is a placeholder in the target scene showing a whole source
//! scene. Populating the tile copies every object of the source scene onto it,
//! moved, scaled and rotated to match the tile; clearing it deletes exactly the
//! objects it created. The identifiers of those objects are recorded on the
//! tile while it is populated.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, error, info, instrument, warn};

use crate::application::ports::outbound::{
    NotifierPort, PlacementHooksPort, RegionReaderPort, SceneStoreError, TargetScenePort,
};
use crate::domain::entities::{
    BoxPlaceable, Occlusion, OcclusionMode, Placeable, PlaceableBatch, Placeholder,
    PlaceholderDraft, PlaceholderUpdate, Region, SpawnedPlaceables,
};
use crate::domain::services::region_metrics::{self, GridSnapper, ScaleFactor};
use crate::domain::services::PlacementTransform;
use crate::domain::value_objects::{PlaceableKind, PlaceholderId, RegionLocator, TransformKind};

/// Image used for tiles of scenes without a background
pub const BLANK_TILE_IMAGE: &str = "modules/scene-tiler/_Blank.png";

/// Drop type handled by [`PlacementService::handle_drop`]
pub const SCENE_DROP_TYPE: &str = "Scene";

const NOT_A_SCENE_TILE: &str = "This tile is not a scene tile.";
const NO_RESIZE: &str = "Scene tiles cannot be resized; their size follows the source scene.";

/// Errors from placement use cases
#[derive(Debug, thiserror::Error)]
pub enum PlacementError {
    #[error(transparent)]
    Store(#[from] SceneStoreError),

    /// A zero grid size or distance makes the scale meaningless
    #[error("Cannot scale {scene} onto {target}: scale factor is {factor}")]
    DegenerateScale {
        scene: RegionLocator,
        target: RegionLocator,
        factor: f64,
    },

    #[error("Placeholder not found: {0}")]
    PlaceholderNotFound(PlaceholderId),

    #[error("No layer stack exists in the target scene")]
    NoLayerStack,
}

/// Settings for the placement service
#[derive(Debug, Clone)]
pub struct PlacementSettings {
    /// Tile image for sources without a background
    pub blank_image: String,
    /// Actor reported to hooks
    pub actor_id: String,
}

impl Default for PlacementSettings {
    fn default() -> Self {
        Self {
            blank_image: BLANK_TILE_IMAGE.to_string(),
            actor_id: "engine".to_string(),
        }
    }
}

/// Options of a programmatic create; unset position means the scene center
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePlaceholderOptions {
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub rotation: Option<f64>,
    /// Populate the tile right after creating it
    #[serde(default)]
    pub populate: bool,
    /// Treat `x, y` as the tile center rather than its corner
    #[serde(default)]
    pub centered: bool,
}

/// Where and how to create one placeholder
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaceholderRequest {
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub centered: bool,
    pub populate: bool,
}

impl PlaceholderRequest {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            rotation: 0.0,
            centered: false,
            populate: false,
        }
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn centered(mut self) -> Self {
        self.centered = true;
        self
    }

    pub fn populated(mut self) -> Self {
        self.populate = true;
        self
    }
}

/// Data delivered when something is dropped onto the target scene
#[derive(Debug, Clone, Deserialize)]
pub struct DropData {
    #[serde(rename = "type")]
    pub drop_type: String,
    #[serde(default)]
    pub uuid: Option<RegionLocator>,
    pub x: f64,
    pub y: f64,
}

/// Placement use cases
#[async_trait]
pub trait PlacementService: Send + Sync {
    /// Create a scene tile from the scene at `locator`
    ///
    /// Returns `None` when the locator does not resolve.
    async fn create(
        &self,
        locator: &RegionLocator,
        options: CreatePlaceholderOptions,
    ) -> Result<Option<Placeholder>, PlacementError>;

    /// Create a scene tile showing `source` at the requested position
    async fn create_placeholder(
        &self,
        source: &Region,
        locator: &RegionLocator,
        request: PlaceholderRequest,
    ) -> Result<Placeholder, PlacementError>;

    /// Create a scene tile centered on a dropped scene
    async fn handle_drop(&self, drop: DropData) -> Result<Option<Placeholder>, PlacementError>;

    /// Copy the source scene's objects onto the tile
    async fn activate(&self, placeholder: &Placeholder) -> Result<Placeholder, PlacementError>;

    /// Delete every object the tile created
    async fn deactivate(&self, placeholder: &Placeholder) -> Result<Placeholder, PlacementError>;

    /// Populate or clear a tile; the single entry point for lock toggles
    async fn set_state(
        &self,
        placeholder: &Placeholder,
        populated: bool,
    ) -> Result<Placeholder, PlacementError>;

    async fn populate(&self, id: PlaceholderId) -> Result<Placeholder, PlacementError>;

    async fn clear(&self, id: PlaceholderId) -> Result<Placeholder, PlacementError>;

    /// Apply an edit to a tile, refusing resizes of scene tiles and routing
    /// lock changes to [`set_state`](Self::set_state)
    async fn intercept_update(
        &self,
        placeholder: &Placeholder,
        update: PlaceholderUpdate,
    ) -> Result<Placeholder, PlacementError>;

    /// Delete every placeable in the target scene, returning how many went
    async fn clear_scene(&self) -> Result<usize, PlacementError>;

    async fn get_placeholder(&self, id: PlaceholderId) -> Result<Placeholder, PlacementError>;

    async fn list_placeholders(&self) -> Result<Vec<Placeholder>, PlacementError>;
}

/// Default implementation of PlacementService over the store ports
///
/// Populating and clearing hold a per-tile lock and re-read the tile under it,
/// so concurrent requests for one tile never spawn two sets of objects.
#[derive(Clone)]
pub struct PlacementServiceImpl {
    regions: Arc<dyn RegionReaderPort>,
    target: Arc<dyn TargetScenePort>,
    snapper: Arc<dyn GridSnapper>,
    notifier: Arc<dyn NotifierPort>,
    hooks: Arc<dyn PlacementHooksPort>,
    settings: PlacementSettings,
    tile_locks: Arc<Mutex<HashMap<PlaceholderId, Arc<Mutex<()>>>>>,
}

impl PlacementServiceImpl {
    pub fn new(
        regions: Arc<dyn RegionReaderPort>,
        target: Arc<dyn TargetScenePort>,
        snapper: Arc<dyn GridSnapper>,
        notifier: Arc<dyn NotifierPort>,
        hooks: Arc<dyn PlacementHooksPort>,
        settings: PlacementSettings,
    ) -> Self {
        Self {
            regions,
            target,
            snapper,
            notifier,
            hooks,
            settings,
            tile_locks: Arc::default(),
        }
    }

    /// Wait for exclusive use of one tile's spawned objects
    async fn lock_tile(&self, id: PlaceholderId) -> OwnedMutexGuard<()> {
        let lock = self.tile_locks.lock().await.entry(id).or_default().clone();
        lock.lock_owned().await
    }

    /// The stored state of a tile, read while its lock is held
    async fn current(&self, placeholder: &Placeholder) -> Result<Placeholder, PlacementError> {
        self.get_placeholder(placeholder.id).await
    }

    /// Scale from `source` onto `target`, rejecting non-finite or zero ratios
    fn checked_scale(&self, source: &Region, target: &Region) -> Result<ScaleFactor, PlacementError> {
        let scale = region_metrics::get_scale_factor(&source.grid, &target.grid);
        if !scale.factor.is_finite() || scale.factor <= 0.0 {
            return Err(PlacementError::DegenerateScale {
                scene: source.locator.clone(),
                target: target.locator.clone(),
                factor: scale.factor,
            });
        }
        Ok(scale)
    }

    /// Build the translated objects of every kind for one tile
    fn prepare_objects(
        &self,
        source: &Region,
        target: &Region,
        tile: &Placeholder,
    ) -> Result<PlaceableBatch, PlacementError> {
        let scale = self.checked_scale(source, target)?;
        if let Some((from, to)) = &scale.unit_mismatch {
            self.notifier.warn(&format!(
                "Scene {} measures distance in \"{}\" but this scene uses \"{}\"; no unit conversion is applied.",
                source.locator, from, to
            ));
        }

        let (px, py) = region_metrics::get_padding(source);
        let (cx, cy) = tile.center();
        let transform = PlacementTransform {
            ox: tile.x,
            oy: tile.y,
            cx,
            cy,
            angle: tile.rotation,
            scale: scale.factor,
            px,
            py,
        };

        let mut batch = PlaceableBatch::new();
        for kind in PlaceableKind::ALL {
            let mut objects: Vec<Placeable> = source
                .placeables
                .of_kind(kind)
                .into_iter()
                .map(|object| translate_entity(object, kind, tile, &transform, target.grid.size))
                .collect();

            if kind == PlaceableKind::Tile {
                if let Some(foreground) = foreground_tile(source, target, tile, &objects) {
                    objects.push(foreground);
                }
            }

            if !objects.is_empty() {
                batch.insert(kind, objects);
            }
        }

        Ok(batch)
    }

    /// Create each kind in turn; a failed kind counts as nothing created
    async fn create_objects(&self, objects: PlaceableBatch) -> PlaceableBatch {
        let mut created = PlaceableBatch::new();
        for (kind, batch) in objects {
            let requested = batch.len();
            match self.target.create_many(kind, batch).await {
                Ok(objects) => {
                    debug!(%kind, label = kind.def().label, requested, created = objects.len(), "Created placeables");
                    if !objects.is_empty() {
                        created.insert(kind, objects);
                    }
                }
                Err(e) => {
                    error!(%kind, label = kind.def().label, requested, error = %e, "Failed to create placeables");
                }
            }
        }
        created
    }

    /// Populate a tile whose lock is held
    async fn activate_locked(&self, mut current: Placeholder) -> Result<Placeholder, PlacementError> {
        let Some(locator) = current.source.clone() else {
            self.warn_unmanaged(&current);
            return Ok(current);
        };

        if current.is_populated() {
            debug!("Scene tile already populated, clearing it first");
            current = self.deactivate_locked(current).await?;
        }

        let Some(source) = self.resolve_source(&locator).await? else {
            return Ok(current);
        };
        let target = self.target.scene().await?;
        let objects = self.prepare_objects(&source, &target, &current)?;

        let actor = self.settings.actor_id.as_str();
        if !self.hooks.before_create(&target.locator, &objects, actor).await {
            info!("Scene tile population cancelled by hook");
            return Ok(current);
        }

        let created = self.create_objects(objects).await;
        let spawned = spawned_ids(&created);
        let total: usize = spawned.values().map(Vec::len).sum();

        let updated = self
            .target
            .update_placeholder(current.id, PlaceholderUpdate::populated(spawned))
            .await?;

        self.hooks.after_create(&target.locator, &created, actor).await;

        info!(created = total, "Populated scene tile from {}", source.name);
        Ok(updated)
    }

    /// Clear a tile whose lock is held
    async fn deactivate_locked(&self, current: Placeholder) -> Result<Placeholder, PlacementError> {
        let Some(spawned) = current.spawned.as_ref() else {
            debug!("Scene tile has nothing to clear");
            return Ok(current);
        };

        for (kind, ids) in spawned {
            if ids.is_empty() {
                continue;
            }
            self.target.delete_many(*kind, ids).await?;
            debug!(%kind, label = kind.def().label, deleted = ids.len(), "Deleted placeables");
        }

        let updated = self
            .target
            .update_placeholder(current.id, PlaceholderUpdate::cleared())
            .await?;

        info!("Cleared scene tile");
        Ok(updated)
    }

    fn warn_unmanaged(&self, placeholder: &Placeholder) {
        warn!(placeholder_id = %placeholder.id, "Not a scene tile");
        self.notifier.warn(NOT_A_SCENE_TILE);
    }

    async fn resolve_source(&self, locator: &RegionLocator) -> Result<Option<Region>, PlacementError> {
        let source = self.regions.resolve(locator).await?;
        if source.is_none() {
            self.notifier
                .debug(&format!("Source scene {} could not be found", locator));
        }
        Ok(source)
    }
}

/// Move one object from source scene coordinates onto `tile`
///
/// The transform is picked from the kind's layer definition. Rotation and
/// facing are relative to the source scene, so the tile rotation is added to
/// them. Copied tiles are stacked relative to the tile's own z. The source
/// identifier is dropped; the target store assigns a new one.
pub fn translate_entity(
    object: Placeable,
    kind: PlaceableKind,
    tile: &Placeholder,
    transform: &PlacementTransform,
    grid_size: f64,
) -> Placeable {
    match (kind.transform(), object) {
        (TransformKind::Point, Placeable::Point(mut point)) => {
            point.id = None;
            (point.x, point.y) = transform.translate_point(point.x, point.y);
            if let Some(rotation) = point.rotation.as_mut() {
                *rotation += tile.rotation;
            }
            if let Some(direction) = point.direction.as_mut() {
                *direction += tile.rotation;
            }
            Placeable::Point(point)
        }
        (TransformKind::PointWidth, Placeable::Box(mut object)) => {
            object.id = None;
            let (x, y, width, height) =
                transform.translate_point_width(object.x, object.y, object.width, object.height);
            object.x = x;
            object.y = y;
            object.width = width;
            object.height = height;
            object.rotation += tile.rotation;
            if kind == PlaceableKind::Tile {
                object.z += tile.z;
            }
            Placeable::Box(object)
        }
        (TransformKind::PointWidthGrids, Placeable::Box(mut object)) => {
            // Size stays in grid cells; only the position moves
            object.id = None;
            let (x, y, _, _) = transform.translate_point_width_grids(
                object.x,
                object.y,
                object.width,
                object.height,
                grid_size,
            );
            object.x = x;
            object.y = y;
            object.rotation += tile.rotation;
            Placeable::Box(object)
        }
        (TransformKind::Wall, Placeable::Wall(mut wall)) => {
            wall.id = None;
            wall.c = transform.translate_wall(&wall.c);
            Placeable::Wall(wall)
        }
        (_, mut other) => {
            warn!(%kind, "Placeable shape does not match its kind, copied unmoved");
            match &mut other {
                Placeable::Point(p) => p.id = None,
                Placeable::Box(b) => b.id = None,
                Placeable::Wall(w) => w.id = None,
            }
            other
        }
    }
}

/// An always-visible overhead tile for the source scene's foreground image
///
/// It covers the scene tile exactly and sits one step below the lowest
/// overhead tile in the target scene or the batch, so other overhead art stays
/// on top of it.
pub fn foreground_tile(
    source: &Region,
    target: &Region,
    tile: &Placeholder,
    tiles: &[Placeable],
) -> Option<Placeable> {
    let img = source.distinct_foreground()?;

    let batch_min = tiles
        .iter()
        .filter_map(|object| match object {
            Placeable::Box(b) if b.overhead => Some(b.z),
            _ => None,
        })
        .min();
    let lowest = batch_min.into_iter().chain(target.min_overhead_z()).min();
    let z = lowest.map_or(tile.z + 1, |z| z - 1);

    let mut foreground = BoxPlaceable::new(tile.x, tile.y, tile.width, tile.height)
        .with_rotation(tile.rotation)
        .with_z(z)
        .with_img(img)
        .overhead();
    foreground.occlusion = Some(Occlusion {
        mode: OcclusionMode::None,
    });

    Some(foreground.into())
}

fn spawned_ids(created: &PlaceableBatch) -> SpawnedPlaceables {
    created
        .iter()
        .map(|(kind, objects)| (*kind, objects.iter().filter_map(Placeable::id).collect()))
        .collect()
}

#[async_trait]
impl PlacementService for PlacementServiceImpl {
    #[instrument(skip(self, options), fields(locator = %locator))]
    async fn create(
        &self,
        locator: &RegionLocator,
        options: CreatePlaceholderOptions,
    ) -> Result<Option<Placeholder>, PlacementError> {
        let Some(source) = self.resolve_source(locator).await? else {
            return Ok(None);
        };

        let (x, y) = match (options.x, options.y) {
            (Some(x), Some(y)) => (x, y),
            (x, y) => {
                let (cx, cy) = self.target.scene().await?.center();
                (x.unwrap_or(cx), y.unwrap_or(cy))
            }
        };

        let request = PlaceholderRequest {
            x,
            y,
            rotation: options.rotation.unwrap_or(0.0),
            centered: options.centered,
            populate: options.populate,
        };

        self.create_placeholder(&source, locator, request)
            .await
            .map(Some)
    }

    #[instrument(skip(self, source, request), fields(locator = %locator))]
    async fn create_placeholder(
        &self,
        source: &Region,
        locator: &RegionLocator,
        request: PlaceholderRequest,
    ) -> Result<Placeholder, PlacementError> {
        let target = self.target.scene().await?;
        self.checked_scale(source, &target)?;

        let bounds = region_metrics::get_tile_pos(
            source,
            &target,
            request.x,
            request.y,
            request.centered,
            self.snapper.as_ref(),
        );

        let img = source
            .background
            .clone()
            .filter(|img| !img.is_empty())
            .unwrap_or_else(|| self.settings.blank_image.clone());

        let placeholder = self
            .target
            .create_placeholder(PlaceholderDraft {
                img,
                bounds,
                rotation: request.rotation,
                source: Some(locator.clone()),
            })
            .await?;

        info!(
            placeholder_id = %placeholder.id,
            x = placeholder.x,
            y = placeholder.y,
            width = placeholder.width,
            height = placeholder.height,
            "Created scene tile for {}",
            source.name
        );

        if request.populate {
            return self.activate(&placeholder).await;
        }
        Ok(placeholder)
    }

    #[instrument(skip(self, drop), fields(drop_type = %drop.drop_type))]
    async fn handle_drop(&self, drop: DropData) -> Result<Option<Placeholder>, PlacementError> {
        if drop.drop_type != SCENE_DROP_TYPE {
            return Ok(None);
        }
        let Some(locator) = drop.uuid else {
            self.notifier.debug("Scene drop without a locator ignored");
            return Ok(None);
        };
        let Some(source) = self.resolve_source(&locator).await? else {
            return Ok(None);
        };

        let request = PlaceholderRequest::at(drop.x, drop.y).centered();
        self.create_placeholder(&source, &locator, request)
            .await
            .map(Some)
    }

    #[instrument(skip(self, placeholder), fields(placeholder_id = %placeholder.id))]
    async fn activate(&self, placeholder: &Placeholder) -> Result<Placeholder, PlacementError> {
        if !placeholder.is_managed() {
            self.warn_unmanaged(placeholder);
            return Ok(placeholder.clone());
        }

        let _guard = self.lock_tile(placeholder.id).await;
        let current = self.current(placeholder).await?;
        self.activate_locked(current).await
    }

    #[instrument(skip(self, placeholder), fields(placeholder_id = %placeholder.id))]
    async fn deactivate(&self, placeholder: &Placeholder) -> Result<Placeholder, PlacementError> {
        if !placeholder.is_managed() {
            self.warn_unmanaged(placeholder);
            return Ok(placeholder.clone());
        }

        let _guard = self.lock_tile(placeholder.id).await;
        let current = self.current(placeholder).await?;
        self.deactivate_locked(current).await
    }

    async fn set_state(
        &self,
        placeholder: &Placeholder,
        populated: bool,
    ) -> Result<Placeholder, PlacementError> {
        if !placeholder.is_managed() {
            self.warn_unmanaged(placeholder);
            return Ok(placeholder.clone());
        }

        if populated {
            self.activate(placeholder).await
        } else {
            self.deactivate(placeholder).await
        }
    }

    async fn populate(&self, id: PlaceholderId) -> Result<Placeholder, PlacementError> {
        let placeholder = self.get_placeholder(id).await?;
        self.set_state(&placeholder, true).await
    }

    async fn clear(&self, id: PlaceholderId) -> Result<Placeholder, PlacementError> {
        let placeholder = self.get_placeholder(id).await?;
        self.set_state(&placeholder, false).await
    }

    #[instrument(skip(self, placeholder, update), fields(placeholder_id = %placeholder.id))]
    async fn intercept_update(
        &self,
        placeholder: &Placeholder,
        mut update: PlaceholderUpdate,
    ) -> Result<Placeholder, PlacementError> {
        // Ordinary tiles take any edit, including their lock flag
        if !placeholder.is_managed() {
            if update.is_empty() {
                return Ok(placeholder.clone());
            }
            return Ok(self.target.update_placeholder(placeholder.id, update).await?);
        }

        if update.is_resize() {
            self.notifier.warn(NO_RESIZE);
            update.width = None;
            update.height = None;
        }
        update.spawned = None;
        let lock = update.locked.take();

        let mut current = placeholder.clone();
        if !update.is_empty() {
            current = self.target.update_placeholder(current.id, update).await?;
        }

        match lock {
            Some(populated) => self.set_state(&current, populated).await,
            None => Ok(current),
        }
    }

    #[instrument(skip(self))]
    async fn clear_scene(&self) -> Result<usize, PlacementError> {
        // Hold every tile so no population runs while the scene empties
        let mut ids: Vec<PlaceholderId> = self
            .target
            .list_placeholders()
            .await?
            .iter()
            .map(|p| p.id)
            .collect();
        ids.sort();
        let mut guards = Vec::with_capacity(ids.len());
        for id in ids {
            guards.push(self.lock_tile(id).await);
        }

        let scene = self.target.scene().await?;

        let mut deleted = 0;
        for kind in PlaceableKind::ALL {
            let ids = scene.placeables.ids(kind);
            if ids.is_empty() {
                continue;
            }
            self.target.delete_many(kind, &ids).await?;
            debug!(%kind, label = kind.def().label, deleted = ids.len(), "Deleted placeables");
            deleted += ids.len();
        }

        // Nothing they spawned exists any more
        for placeholder in self.target.list_placeholders().await? {
            if placeholder.is_populated() {
                self.target
                    .update_placeholder(placeholder.id, PlaceholderUpdate::cleared())
                    .await?;
            }
        }

        drop(guards);

        info!(deleted, "Cleared all placeables from the scene");
        Ok(deleted)
    }

    async fn get_placeholder(&self, id: PlaceholderId) -> Result<Placeholder, PlacementError> {
        self.target
            .get_placeholder(id)
            .await?
            .ok_or(PlacementError::PlaceholderNotFound(id))
    }

    async fn list_placeholders(&self) -> Result<Vec<Placeholder>, PlacementError> {
        Ok(self.target.list_placeholders().await?)
    }
}
