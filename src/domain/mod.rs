//! Domain layer - Core placement logic with no external dependencies
//!
//! This layer contains:
//! - Entities: Region, Placeable, Placeholder, LayerStack
//! - Value Objects: identifiers, placeable kinds, grid metrics
//! - Domain Services: coordinate geometry and region metrics

pub mod entities;
pub mod services;
pub mod value_objects;
