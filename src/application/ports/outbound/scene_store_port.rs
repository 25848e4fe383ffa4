//! Scene store ports - Interfaces to the host document store
//!
//! The engine never owns scene data. It reads source scenes through
//! [`RegionReaderPort`] and writes into the scene being edited through
//! [`TargetScenePort`]; the infrastructure layer provides both.

use async_trait::async_trait;

use crate::domain::entities::{
    LayerStack, Placeable, Placeholder, PlaceholderDraft, PlaceholderUpdate, Region,
};
use crate::domain::value_objects::{PlaceableId, PlaceableKind, PlaceholderId, RegionLocator};

#[derive(Debug, thiserror::Error)]
pub enum SceneStoreError {
    #[error("Placeholder not found: {0}")]
    PlaceholderNotFound(PlaceholderId),
    #[error("Cannot store a {shape} shaped object as {kind}")]
    ShapeMismatch { kind: PlaceableKind, shape: &'static str },
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Read access to scenes by locator
#[async_trait]
pub trait RegionReaderPort: Send + Sync {
    /// Resolve a locator to a snapshot of the scene, if it exists
    ///
    /// The snapshot must not change while an activation works on it.
    async fn resolve(&self, locator: &RegionLocator) -> Result<Option<Region>, SceneStoreError>;

    /// List every scene that can be used as a source
    async fn list(&self) -> Result<Vec<Region>, SceneStoreError>;
}

/// Write access to the scene scene tiles are placed in
#[async_trait]
pub trait TargetScenePort: Send + Sync {
    /// Snapshot of the target scene, its metadata and current objects
    async fn scene(&self) -> Result<Region, SceneStoreError>;

    /// Create a batch of objects of one kind, returning them with identifiers
    async fn create_many(
        &self,
        kind: PlaceableKind,
        objects: Vec<Placeable>,
    ) -> Result<Vec<Placeable>, SceneStoreError>;

    /// Delete objects of one kind by identifier
    async fn delete_many(
        &self,
        kind: PlaceableKind,
        ids: &[PlaceableId],
    ) -> Result<(), SceneStoreError>;

    /// Create a scene tile on top of the current stacking order
    async fn create_placeholder(
        &self,
        draft: PlaceholderDraft,
    ) -> Result<Placeholder, SceneStoreError>;

    async fn get_placeholder(
        &self,
        id: PlaceholderId,
    ) -> Result<Option<Placeholder>, SceneStoreError>;

    async fn list_placeholders(&self) -> Result<Vec<Placeholder>, SceneStoreError>;

    /// Apply a partial update, returning the stored result
    async fn update_placeholder(
        &self,
        id: PlaceholderId,
        update: PlaceholderUpdate,
    ) -> Result<Placeholder, SceneStoreError>;

    async fn layer_stack(&self) -> Result<Option<LayerStack>, SceneStoreError>;

    async fn set_layer_stack(&self, stack: LayerStack) -> Result<(), SceneStoreError>;
}
