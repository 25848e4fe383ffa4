//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - Persistence: In-memory scene store loaded from a scenes file
//! - HTTP: REST API routes
//! - Grid: Square grid snapping
//! - Hooks: Placement events and batch limits
//! - Notifications: User notices written to the log
//! - Config: Application configuration
//! - State: Shared application state

pub mod config;
pub mod grid;
pub mod hooks;
pub mod http;
pub mod notifications;
pub mod persistence;
pub mod state;
