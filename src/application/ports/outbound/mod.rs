//! Outbound ports - Interfaces that the application requires from external systems

mod notifier_port;
mod placement_hooks_port;
mod scene_store_port;

pub use notifier_port::NotifierPort;
pub use placement_hooks_port::PlacementHooksPort;
pub use scene_store_port::{RegionReaderPort, SceneStoreError, TargetScenePort};
