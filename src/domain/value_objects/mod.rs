//! Value objects - Immutable objects defined by their attributes

mod grid;
mod ids;
mod placeable_kind;

pub use grid::{GridMetrics, TileBounds};
pub use ids::*;
pub use placeable_kind::{LayerDef, PlaceableKind, TransformKind, LAYER_DEFS};
