//! Domain entities - Core objects with identity

mod layer_stack;
mod placeable;
mod placeholder;
mod region;

pub use layer_stack::{LayerEntry, LayerStack};
pub use placeable::{
    BoxPlaceable, Occlusion, OcclusionMode, Placeable, PlaceableBatch, PlaceableCollections,
    PointPlaceable, WallPlaceable,
};
pub use placeholder::{Placeholder, PlaceholderDraft, PlaceholderUpdate, SpawnedPlaceables};
pub use region::Region;
