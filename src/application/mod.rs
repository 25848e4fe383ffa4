//! Application layer - Use cases orchestrating the domain
//!
//! This layer contains:
//! - Ports: interfaces to the scene store, notifications and hooks
//! - Services: scene tile placement and layer switching

pub mod ports;
pub mod services;
