//! Placement hooks port - Extension points around object creation

use async_trait::async_trait;

use crate::domain::entities::PlaceableBatch;
use crate::domain::value_objects::RegionLocator;

/// Hooks invoked around the creation of a scene tile's objects
#[async_trait]
pub trait PlacementHooksPort: Send + Sync {
    /// Called with the full batch before anything is created
    ///
    /// Returning `false` cancels the whole activation.
    async fn before_create(
        &self,
        scene: &RegionLocator,
        objects: &PlaceableBatch,
        actor: &str,
    ) -> bool;

    /// Called with the objects that were actually created
    async fn after_create(&self, scene: &RegionLocator, created: &PlaceableBatch, actor: &str);
}
