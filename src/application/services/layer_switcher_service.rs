//! Layer Switcher Service - Steps through a stack of scene tiles
//!
//! A stack is a set of scene tiles laid over each other, such as the floors of
//! a building. Exactly one layer is shown at a time: stepping clears the shown
//! layer and returns it to its own z, then raises the next one above every
//! other layer and populates it.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument};

use crate::application::ports::outbound::TargetScenePort;
use crate::application::services::placement_service::{PlacementError, PlacementService};
use crate::domain::entities::{LayerEntry, LayerStack, PlaceholderUpdate};
use crate::domain::value_objects::PlaceholderId;

#[async_trait]
pub trait LayerSwitcherService: Send + Sync {
    /// Record the given scene tiles as the stack, bottom to top by z
    async fn create(&self, ids: &[PlaceholderId]) -> Result<LayerStack, PlacementError>;

    /// Show the layer above (`forward`) or below the shown one, wrapping
    async fn next(&self, forward: bool) -> Result<LayerStack, PlacementError>;

    async fn up(&self) -> Result<LayerStack, PlacementError> {
        self.next(true).await
    }

    async fn down(&self) -> Result<LayerStack, PlacementError> {
        self.next(false).await
    }
}

pub struct LayerSwitcherServiceImpl {
    target: Arc<dyn TargetScenePort>,
    placement: Arc<dyn PlacementService>,
}

impl LayerSwitcherServiceImpl {
    pub fn new(target: Arc<dyn TargetScenePort>, placement: Arc<dyn PlacementService>) -> Self {
        Self { target, placement }
    }
}

#[async_trait]
impl LayerSwitcherService for LayerSwitcherServiceImpl {
    #[instrument(skip(self, ids), fields(layers = ids.len()))]
    async fn create(&self, ids: &[PlaceholderId]) -> Result<LayerStack, PlacementError> {
        let mut layers = Vec::with_capacity(ids.len());
        for id in ids {
            let placeholder = self.placement.get_placeholder(*id).await?;
            layers.push(LayerEntry {
                placeholder_id: placeholder.id,
                z: placeholder.z,
                active: false,
            });
        }

        let stack = LayerStack::new(layers);
        self.target.set_layer_stack(stack.clone()).await?;
        info!("Created layer stack");
        Ok(stack)
    }

    #[instrument(skip(self))]
    async fn next(&self, forward: bool) -> Result<LayerStack, PlacementError> {
        let mut stack = self
            .target
            .layer_stack()
            .await?
            .ok_or(PlacementError::NoLayerStack)?;
        let current = stack
            .current_index(forward)
            .ok_or(PlacementError::NoLayerStack)?;
        let next = stack.next_index(current, forward);
        let top = stack.max_z() + 1;

        let shown = stack.layers[current];
        let placeholder = self.placement.get_placeholder(shown.placeholder_id).await?;
        let lowered = PlaceholderUpdate {
            z: Some(shown.z),
            locked: Some(false),
            ..Default::default()
        };
        self.placement.intercept_update(&placeholder, lowered).await?;

        let raised_id = stack.layers[next].placeholder_id;
        let placeholder = self.placement.get_placeholder(raised_id).await?;
        let raised = PlaceholderUpdate {
            z: Some(top),
            locked: Some(true),
            ..Default::default()
        };
        self.placement.intercept_update(&placeholder, raised).await?;

        stack.set_active(next);
        self.target.set_layer_stack(stack.clone()).await?;

        info!(layer = next, placeholder_id = %raised_id, "Switched layer");
        Ok(stack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::placement_service::tests::{
        cellar, harness_with, placeholder_at, target_scene, Harness,
    };
    use crate::domain::entities::{PointPlaceable, Region};
    use crate::domain::value_objects::{GridMetrics, PlaceableKind};

    fn attic() -> Region {
        Region::new(
            "Scene.attic",
            "Attic",
            GridMetrics::new(100.0, 5.0, "ft"),
            1000.0,
            500.0,
        )
        .with_placeable(PlaceableKind::Light, PointPlaceable::new(10.0, 10.0))
        .with_placeable(PlaceableKind::Light, PointPlaceable::new(20.0, 20.0))
    }

    fn switcher(h: &Harness) -> LayerSwitcherServiceImpl {
        LayerSwitcherServiceImpl::new(h.store.clone(), Arc::new(h.service.clone()))
    }

    #[tokio::test]
    async fn test_stepping_shows_one_layer_at_a_time() {
        let h = harness_with(target_scene(), true);
        let ground = cellar().with_placeable(PlaceableKind::Light, PointPlaceable::new(5.0, 5.0));
        h.store.add_source(ground.clone());
        h.store.add_source(attic());

        let lower = placeholder_at(&h, &ground, 0.0, 0.0).await;
        let upper = placeholder_at(&h, &attic(), 0.0, 0.0).await;
        let switcher = switcher(&h);

        let stack = switcher.create(&[upper.id, lower.id]).await.unwrap();
        assert_eq!(stack.layers[0].placeholder_id, lower.id);
        assert_eq!(stack.layers[1].placeholder_id, upper.id);

        // From nothing shown, up wraps to the bottom layer
        let stack = switcher.up().await.unwrap();
        assert!(stack.layers[0].active);
        let shown = h.service.get_placeholder(lower.id).await.unwrap();
        assert!(shown.is_populated());
        assert_eq!(shown.z, 2);
        assert_eq!(h.store.target().placeables.lights.len(), 1);

        let stack = switcher.up().await.unwrap();
        assert!(stack.layers[1].active);
        let hidden = h.service.get_placeholder(lower.id).await.unwrap();
        assert!(!hidden.is_populated());
        assert_eq!(hidden.z, lower.z);
        let shown = h.service.get_placeholder(upper.id).await.unwrap();
        assert!(shown.is_populated());
        assert_eq!(shown.z, 2);
        assert_eq!(h.store.target().placeables.lights.len(), 2);

        let stack = switcher.down().await.unwrap();
        assert!(stack.layers[0].active);
        assert_eq!(h.store.target().placeables.lights.len(), 1);
    }

    #[tokio::test]
    async fn test_next_without_stack() {
        let h = harness_with(target_scene(), true);
        let err = switcher(&h).up().await.unwrap_err();
        assert!(matches!(err, PlacementError::NoLayerStack));

        let err = switcher(&h).create(&[PlaceholderId::new()]).await.unwrap_err();
        assert!(matches!(err, PlacementError::PlaceholderNotFound(_)));
    }
}
