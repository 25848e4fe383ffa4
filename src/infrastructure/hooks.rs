//! Placement hooks adapter - Publishes placement events on a channel
//!
//! Every activation reports what it is about to create and what it created.
//! Batches above the configured limit are refused before anything is written.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc::{self, Receiver, Sender};

use crate::application::ports::outbound::PlacementHooksPort;
use crate::domain::entities::PlaceableBatch;
use crate::domain::value_objects::{PlaceableKind, RegionLocator};

/// Something that happened while populating a scene tile
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlacementEvent {
    Creating {
        scene: RegionLocator,
        counts: BTreeMap<PlaceableKind, usize>,
        actor: String,
        at: DateTime<Utc>,
    },
    Created {
        scene: RegionLocator,
        counts: BTreeMap<PlaceableKind, usize>,
        actor: String,
        at: DateTime<Utc>,
    },
    Vetoed {
        scene: RegionLocator,
        requested: usize,
        limit: usize,
        actor: String,
        at: DateTime<Utc>,
    },
}

fn counts(batch: &PlaceableBatch) -> BTreeMap<PlaceableKind, usize> {
    batch.iter().map(|(kind, objects)| (*kind, objects.len())).collect()
}

pub struct EventBusHooks {
    sender: Sender<PlacementEvent>,
    max_batch: Option<usize>,
}

impl EventBusHooks {
    /// Create the hooks and the receiving end of their event channel
    pub fn new(buffer: usize, max_batch: Option<usize>) -> (Self, Receiver<PlacementEvent>) {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        (Self { sender, max_batch }, receiver)
    }

    fn publish(&self, event: PlacementEvent) {
        if let Err(e) = self.sender.try_send(event) {
            tracing::warn!("Dropped placement event: {}", e);
        }
    }
}

#[async_trait]
impl PlacementHooksPort for EventBusHooks {
    async fn before_create(
        &self,
        scene: &RegionLocator,
        objects: &PlaceableBatch,
        actor: &str,
    ) -> bool {
        let requested: usize = objects.values().map(Vec::len).sum();

        if let Some(limit) = self.max_batch.filter(|limit| requested > *limit) {
            tracing::warn!(requested, limit, "Refusing oversized scene tile batch");
            self.publish(PlacementEvent::Vetoed {
                scene: scene.clone(),
                requested,
                limit,
                actor: actor.to_string(),
                at: Utc::now(),
            });
            return false;
        }

        self.publish(PlacementEvent::Creating {
            scene: scene.clone(),
            counts: counts(objects),
            actor: actor.to_string(),
            at: Utc::now(),
        });
        true
    }

    async fn after_create(&self, scene: &RegionLocator, created: &PlaceableBatch, actor: &str) {
        self.publish(PlacementEvent::Created {
            scene: scene.clone(),
            counts: counts(created),
            actor: actor.to_string(),
            at: Utc::now(),
        });
    }
}

/// Log placement events until every sender is gone
///
/// This should be spawned as a background task
pub async fn log_placement_events(mut events: Receiver<PlacementEvent>) {
    while let Some(event) = events.recv().await {
        match &event {
            PlacementEvent::Creating { scene, counts, actor, .. } => {
                tracing::debug!(%scene, ?counts, %actor, "Creating scene tile objects");
            }
            PlacementEvent::Created { scene, counts, actor, .. } => {
                tracing::info!(%scene, ?counts, %actor, "Created scene tile objects");
            }
            PlacementEvent::Vetoed { scene, requested, limit, actor, .. } => {
                tracing::info!(%scene, requested, limit, %actor, "Scene tile population vetoed");
            }
        }
    }
    tracing::info!("Placement event log shutting down");
}
