//! Shared application state

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc::Receiver;

use crate::application::ports::outbound::RegionReaderPort;
use crate::application::services::{
    LayerSwitcherService, LayerSwitcherServiceImpl, PlacementService, PlacementServiceImpl,
    PlacementSettings,
};
use crate::domain::entities::Region;
use crate::domain::value_objects::GridMetrics;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::grid::SquareGridSnapper;
use crate::infrastructure::hooks::{EventBusHooks, PlacementEvent};
use crate::infrastructure::notifications::TracingNotifier;
use crate::infrastructure::persistence::InMemorySceneStore;

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    pub regions: Arc<dyn RegionReaderPort>,
    // Application services
    pub placement_service: Arc<dyn PlacementService>,
    pub layer_switcher_service: Arc<dyn LayerSwitcherService>,
}

impl AppState {
    /// Load the scene store and wire the services
    ///
    /// Also returns the placement event stream, which the caller should drain.
    pub async fn new(config: AppConfig) -> Result<(Self, Receiver<PlacementEvent>)> {
        let store = match &config.scenes_file {
            Some(path) => InMemorySceneStore::from_file(path).await?,
            None => {
                tracing::warn!("SCENE_TILER_SCENES_FILE not set, starting with an empty scene");
                let target = Region::new(
                    "Scene.default",
                    "Default",
                    GridMetrics::default(),
                    4000.0,
                    3000.0,
                );
                InMemorySceneStore::new(target, Vec::new())
            }
        };

        Ok(Self::with_store(config, Arc::new(store)))
    }

    pub fn with_store(
        config: AppConfig,
        store: Arc<InMemorySceneStore>,
    ) -> (Self, Receiver<PlacementEvent>) {
        let (hooks, events) = EventBusHooks::new(config.event_buffer, config.max_batch);

        let settings = PlacementSettings {
            blank_image: config.blank_image.clone(),
            actor_id: config.actor_id.clone(),
        };
        let placement_service: Arc<dyn PlacementService> = Arc::new(PlacementServiceImpl::new(
            store.clone(),
            store.clone(),
            Arc::new(SquareGridSnapper::default()),
            Arc::new(TracingNotifier),
            Arc::new(hooks),
            settings,
        ));
        let layer_switcher_service = Arc::new(LayerSwitcherServiceImpl::new(
            store.clone(),
            placement_service.clone(),
        ));

        let state = Self {
            config,
            regions: store,
            placement_service,
            layer_switcher_service,
        };
        (state, events)
    }
}
