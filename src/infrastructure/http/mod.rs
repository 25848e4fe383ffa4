//! HTTP REST API routes

mod layer_routes;
mod placeholder_routes;
mod region_routes;

use axum::{
    http::StatusCode,
    routing::{delete, get, patch, post},
    Router,
};
use std::sync::Arc;

use crate::application::ports::outbound::SceneStoreError;
use crate::application::services::PlacementError;
use crate::infrastructure::state::AppState;

/// Create all API routes
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Region routes
        .route("/api/regions", get(region_routes::list_regions))
        // Scene tile routes
        .route("/api/drop", post(placeholder_routes::drop_on_canvas))
        .route(
            "/api/placeholders",
            get(placeholder_routes::list_placeholders),
        )
        .route(
            "/api/placeholders",
            post(placeholder_routes::create_placeholder),
        )
        .route(
            "/api/placeholders/{id}",
            patch(placeholder_routes::update_placeholder),
        )
        .route(
            "/api/placeholders/{id}/populate",
            post(placeholder_routes::populate_placeholder),
        )
        .route(
            "/api/placeholders/{id}/clear",
            post(placeholder_routes::clear_placeholder),
        )
        .route(
            "/api/scene/placeables",
            delete(placeholder_routes::clear_scene),
        )
        // Layer switcher routes
        .route("/api/layers", post(layer_routes::create_layer_stack))
        .route("/api/layers/up", post(layer_routes::layer_up))
        .route("/api/layers/down", post(layer_routes::layer_down))
}

/// Map a placement failure to a status code and message
pub(crate) fn placement_error(e: PlacementError) -> (StatusCode, String) {
    let status = match &e {
        PlacementError::PlaceholderNotFound(_)
        | PlacementError::Store(SceneStoreError::PlaceholderNotFound(_)) => StatusCode::NOT_FOUND,
        PlacementError::DegenerateScale { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        PlacementError::NoLayerStack => StatusCode::CONFLICT,
        PlacementError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}
