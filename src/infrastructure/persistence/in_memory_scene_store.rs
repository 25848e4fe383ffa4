//! In-memory scene store
//!
//! Holds the target scene and the source scenes for the lifetime of the
//! process. Reads hand out cloned snapshots so an activation never sees a
//! scene change underneath it.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::application::ports::outbound::{RegionReaderPort, SceneStoreError, TargetScenePort};
use crate::domain::entities::{
    LayerStack, Placeable, Placeholder, PlaceholderDraft, PlaceholderUpdate, Region,
};
use crate::domain::value_objects::{PlaceableId, PlaceableKind, PlaceholderId, RegionLocator};

/// Layout of the scenes file
#[derive(Debug, Deserialize)]
pub struct ScenesDocument {
    /// The scene tiles are placed in
    pub target: Region,
    /// Scenes available as tile sources
    #[serde(default)]
    pub regions: Vec<Region>,
    /// Scene tiles that already exist in the target
    #[serde(default)]
    pub placeholders: Vec<Placeholder>,
}

struct TargetState {
    scene: Region,
    placeholders: BTreeMap<PlaceholderId, Placeholder>,
    layers: Option<LayerStack>,
}

impl TargetState {
    /// z one above every tile and placeholder in the scene
    fn top_z(&self) -> i64 {
        let tiles = self.scene.placeables.tiles.iter().map(|tile| tile.z);
        let placeholders = self.placeholders.values().map(|p| p.z);
        tiles.chain(placeholders).max().map_or(0, |z| z + 1)
    }
}

pub struct InMemorySceneStore {
    regions: RwLock<HashMap<RegionLocator, Region>>,
    target: RwLock<TargetState>,
}

impl InMemorySceneStore {
    pub fn new(target: Region, regions: Vec<Region>) -> Self {
        Self::from_document(ScenesDocument {
            target,
            regions,
            placeholders: Vec::new(),
        })
    }

    /// Build the store from a scenes document
    ///
    /// Target objects without an identifier get one, so every object in the
    /// scene can be deleted. A scene tile is locked exactly while it records
    /// spawned objects.
    pub fn from_document(document: ScenesDocument) -> Self {
        let regions = document
            .regions
            .into_iter()
            .map(|region| (region.locator.clone(), region))
            .collect();

        let mut scene = document.target;
        let assigned = scene.placeables.assign_missing_ids();
        if assigned > 0 {
            tracing::debug!(assigned, "Assigned ids to target placeables");
        }

        let placeholders = document
            .placeholders
            .into_iter()
            .map(|mut placeholder| {
                let populated = placeholder.is_populated();
                if placeholder.is_managed() && placeholder.locked != populated {
                    tracing::warn!(
                        placeholder_id = %placeholder.id,
                        locked = placeholder.locked,
                        populated,
                        "Scene tile lock does not match its spawned objects, using the spawned state"
                    );
                    placeholder.locked = populated;
                }
                (placeholder.id, placeholder)
            })
            .collect();

        Self {
            regions: RwLock::new(regions),
            target: RwLock::new(TargetState {
                scene,
                placeholders,
                layers: None,
            }),
        }
    }

    /// Load the target and source scenes from a JSON scenes file
    pub async fn from_file(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read scenes file {}", path.display()))?;
        let document: ScenesDocument = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse scenes file {}", path.display()))?;

        tracing::info!(
            target_scene = %document.target.locator,
            regions = document.regions.len(),
            placeholders = document.placeholders.len(),
            "Loaded scenes file"
        );
        Ok(Self::from_document(document))
    }
}

fn shape_name(placeable: &Placeable) -> &'static str {
    match placeable {
        Placeable::Point(_) => "point",
        Placeable::Box(_) => "box",
        Placeable::Wall(_) => "wall",
    }
}

#[async_trait]
impl RegionReaderPort for InMemorySceneStore {
    async fn resolve(&self, locator: &RegionLocator) -> Result<Option<Region>, SceneStoreError> {
        Ok(self.regions.read().await.get(locator).cloned())
    }

    async fn list(&self) -> Result<Vec<Region>, SceneStoreError> {
        let mut regions: Vec<Region> = self.regions.read().await.values().cloned().collect();
        regions.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(regions)
    }
}

#[async_trait]
impl TargetScenePort for InMemorySceneStore {
    async fn scene(&self) -> Result<Region, SceneStoreError> {
        Ok(self.target.read().await.scene.clone())
    }

    async fn create_many(
        &self,
        kind: PlaceableKind,
        objects: Vec<Placeable>,
    ) -> Result<Vec<Placeable>, SceneStoreError> {
        let mut state = self.target.write().await;

        // All or nothing: build into a copy and swap it in
        let mut placeables = state.scene.placeables.clone();
        let mut created = Vec::with_capacity(objects.len());
        for mut object in objects {
            object.set_id(PlaceableId::new());
            if let Err(rejected) = placeables.insert(kind, object.clone()) {
                return Err(SceneStoreError::ShapeMismatch {
                    kind,
                    shape: shape_name(&rejected),
                });
            }
            created.push(object);
        }
        state.scene.placeables = placeables;

        Ok(created)
    }

    async fn delete_many(
        &self,
        kind: PlaceableKind,
        ids: &[PlaceableId],
    ) -> Result<(), SceneStoreError> {
        let removed = self.target.write().await.scene.placeables.remove(kind, ids);
        if removed < ids.len() {
            tracing::debug!(%kind, requested = ids.len(), removed, "Some placeables were already gone");
        }
        Ok(())
    }

    async fn create_placeholder(
        &self,
        draft: PlaceholderDraft,
    ) -> Result<Placeholder, SceneStoreError> {
        let mut state = self.target.write().await;
        let placeholder = Placeholder::from_draft(PlaceholderId::new(), state.top_z(), draft);
        state.placeholders.insert(placeholder.id, placeholder.clone());
        Ok(placeholder)
    }

    async fn get_placeholder(
        &self,
        id: PlaceholderId,
    ) -> Result<Option<Placeholder>, SceneStoreError> {
        Ok(self.target.read().await.placeholders.get(&id).cloned())
    }

    async fn list_placeholders(&self) -> Result<Vec<Placeholder>, SceneStoreError> {
        let state = self.target.read().await;
        let mut placeholders: Vec<Placeholder> = state.placeholders.values().cloned().collect();
        placeholders.sort_by_key(|p| p.z);
        Ok(placeholders)
    }

    async fn update_placeholder(
        &self,
        id: PlaceholderId,
        update: PlaceholderUpdate,
    ) -> Result<Placeholder, SceneStoreError> {
        let mut state = self.target.write().await;
        let placeholder = state
            .placeholders
            .get_mut(&id)
            .ok_or(SceneStoreError::PlaceholderNotFound(id))?;
        placeholder.apply(update);
        Ok(placeholder.clone())
    }

    async fn layer_stack(&self) -> Result<Option<LayerStack>, SceneStoreError> {
        Ok(self.target.read().await.layers.clone())
    }

    async fn set_layer_stack(&self, stack: LayerStack) -> Result<(), SceneStoreError> {
        self.target.write().await.layers = Some(stack);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{BoxPlaceable, PointPlaceable, WallPlaceable};
    use crate::domain::value_objects::{GridMetrics, TileBounds};

    fn store() -> InMemorySceneStore {
        let target = Region::new("Scene.town", "Town", GridMetrics::default(), 4000.0, 3000.0)
            .with_placeable(PlaceableKind::Tile, BoxPlaceable::new(0.0, 0.0, 10.0, 10.0).with_z(7));
        let cellar = Region::new("Scene.cellar", "Cellar", GridMetrics::default(), 1000.0, 500.0);
        let attic = Region::new("Scene.attic", "Attic", GridMetrics::default(), 1000.0, 500.0);
        InMemorySceneStore::new(target, vec![cellar, attic])
    }

    fn draft() -> PlaceholderDraft {
        PlaceholderDraft {
            img: "maps/cellar.webp".to_string(),
            bounds: TileBounds {
                x: 0.0,
                y: 0.0,
                width: 1000.0,
                height: 500.0,
            },
            rotation: 0.0,
            source: Some(RegionLocator::new("Scene.cellar")),
        }
    }

    #[tokio::test]
    async fn test_resolve_and_list_regions() {
        let store = store();

        let cellar = store.resolve(&RegionLocator::new("Scene.cellar")).await.unwrap();
        assert_eq!(cellar.map(|r| r.name), Some("Cellar".to_string()));
        assert!(store.resolve(&RegionLocator::new("Scene.none")).await.unwrap().is_none());

        let names: Vec<String> = store.list().await.unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Attic", "Cellar"]);
    }

    #[tokio::test]
    async fn test_create_many_assigns_ids() {
        let store = store();
        let lights = vec![
            PointPlaceable::new(1.0, 1.0).into(),
            PointPlaceable::new(2.0, 2.0).into(),
        ];

        let created = store.create_many(PlaceableKind::Light, lights).await.unwrap();

        assert_eq!(created.len(), 2);
        assert!(created.iter().all(|p| p.id().is_some()));
        let scene = store.scene().await.unwrap();
        assert_eq!(scene.placeables.ids(PlaceableKind::Light).len(), 2);
    }

    #[tokio::test]
    async fn test_create_many_rejects_mismatched_batch_whole() {
        let store = store();
        let batch = vec![
            PointPlaceable::new(1.0, 1.0).into(),
            WallPlaceable::new(vec![0.0, 0.0, 1.0, 1.0]).into(),
        ];

        let err = store.create_many(PlaceableKind::Light, batch).await.unwrap_err();

        assert!(matches!(err, SceneStoreError::ShapeMismatch { shape: "wall", .. }));
        assert!(store.scene().await.unwrap().placeables.lights.is_empty());
    }

    #[tokio::test]
    async fn test_delete_many_ignores_missing_ids() {
        let store = store();
        let created = store
            .create_many(PlaceableKind::Sound, vec![PointPlaceable::new(1.0, 1.0).into()])
            .await
            .unwrap();
        let id = created[0].id().unwrap();

        store
            .delete_many(PlaceableKind::Sound, &[id, PlaceableId::new()])
            .await
            .unwrap();
        assert!(store.scene().await.unwrap().placeables.sounds.is_empty());
    }

    #[tokio::test]
    async fn test_placeholders_stack_on_top() {
        let store = store();

        let first = store.create_placeholder(draft()).await.unwrap();
        let second = store.create_placeholder(draft()).await.unwrap();
        assert_eq!(first.z, 8);
        assert_eq!(second.z, 9);

        let listed: Vec<PlaceholderId> = store
            .list_placeholders()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(listed, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn test_update_placeholder() {
        let store = store();
        let placeholder = store.create_placeholder(draft()).await.unwrap();

        let update = PlaceholderUpdate {
            x: Some(300.0),
            ..Default::default()
        };
        let updated = store.update_placeholder(placeholder.id, update).await.unwrap();
        assert_eq!(updated.x, 300.0);
        assert_eq!(store.get_placeholder(placeholder.id).await.unwrap(), Some(updated));

        let err = store
            .update_placeholder(PlaceholderId::new(), PlaceholderUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SceneStoreError::PlaceholderNotFound(_)));
    }

    #[tokio::test]
    async fn test_from_file() {
        let path = std::env::temp_dir().join(format!("scenes-{}.json", uuid::Uuid::new_v4()));
        let json = r#"{
            "target": {
                "locator": "Scene.town",
                "name": "Town",
                "grid": { "size": 100, "distance": 5 },
                "width": 4000,
                "height": 3000
            },
            "regions": [{
                "locator": "Scene.cellar",
                "name": "Cellar",
                "grid": { "size": 100, "distance": 5, "units": "ft" },
                "width": 1000,
                "height": 500,
                "lights": [{ "x": 50, "y": 50 }]
            }]
        }"#;
        tokio::fs::write(&path, json).await.unwrap();

        let store = InMemorySceneStore::from_file(&path).await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        let cellar = store
            .resolve(&RegionLocator::new("Scene.cellar"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cellar.placeables.lights.len(), 1);
        assert_eq!(store.scene().await.unwrap().grid.units, "");
        assert!(store.list_placeholders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_loaded_target_objects_get_ids() {
        let json = r#"{
            "target": {
                "locator": "Scene.town",
                "name": "Town",
                "grid": { "size": 100, "distance": 5 },
                "width": 4000,
                "height": 3000,
                "walls": [{ "c": [0, 0, 100, 0] }],
                "lights": [{ "x": 50, "y": 50 }]
            }
        }"#;
        let document: ScenesDocument = serde_json::from_str(json).unwrap();
        let store = InMemorySceneStore::from_document(document);

        let scene = store.scene().await.unwrap();
        let walls = scene.placeables.ids(PlaceableKind::Wall);
        assert_eq!(walls.len(), 1);
        assert_eq!(scene.placeables.ids(PlaceableKind::Light).len(), 1);

        store.delete_many(PlaceableKind::Wall, &walls).await.unwrap();
        assert!(store.scene().await.unwrap().placeables.walls.is_empty());
    }

    #[tokio::test]
    async fn test_loaded_tile_lock_follows_spawned() {
        let locked_empty = PlaceholderId::new();
        let unlocked_spawned = PlaceholderId::new();
        let ordinary = PlaceholderId::new();
        let json = format!(
            r#"{{
                "target": {{
                    "locator": "Scene.town",
                    "name": "Town",
                    "grid": {{ "size": 100, "distance": 5 }},
                    "width": 4000,
                    "height": 3000
                }},
                "placeholders": [
                    {{ "id": "{}", "img": "a.webp", "x": 0, "y": 0, "width": 10, "height": 10,
                       "locked": true, "source": "Scene.cellar" }},
                    {{ "id": "{}", "img": "b.webp", "x": 0, "y": 0, "width": 10, "height": 10,
                       "locked": false, "source": "Scene.cellar", "spawned": {{}} }},
                    {{ "id": "{}", "img": "c.webp", "x": 0, "y": 0, "width": 10, "height": 10,
                       "locked": true }}
                ]
            }}"#,
            locked_empty, unlocked_spawned, ordinary
        );
        let document: ScenesDocument = serde_json::from_str(&json).unwrap();
        let store = InMemorySceneStore::from_document(document);

        let locked = |placeholder: Option<Placeholder>| placeholder.unwrap().locked;
        assert!(!locked(store.get_placeholder(locked_empty).await.unwrap()));
        assert!(locked(store.get_placeholder(unlocked_spawned).await.unwrap()));
        // Ordinary tiles keep whatever lock they had
        assert!(locked(store.get_placeholder(ordinary).await.unwrap()));
    }

    #[tokio::test]
    async fn test_from_file_missing() {
        let path = std::env::temp_dir().join("no-such-scenes-file.json");
        assert!(InMemorySceneStore::from_file(&path).await.is_err());
    }
}
