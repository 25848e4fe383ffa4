//! Application services - Use case implementations
//!
//! Each service follows hexagonal architecture principles, accepting port
//! dependencies and returning domain entities.

pub mod layer_switcher_service;
pub mod placement_service;

pub use layer_switcher_service::{LayerSwitcherService, LayerSwitcherServiceImpl};
pub use placement_service::{
    CreatePlaceholderOptions, DropData, PlacementError, PlacementService, PlacementServiceImpl,
    PlacementSettings, PlaceholderRequest,
};
