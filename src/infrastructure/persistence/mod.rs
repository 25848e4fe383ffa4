//! Persistence adapters
//!
//! Scene data lives in the host document store; this module provides the
//! in-process store the engine runs against.

mod in_memory_scene_store;

pub use in_memory_scene_store::{InMemorySceneStore, ScenesDocument};
