//! Layer switcher API routes

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::placeholder_routes::parse_placeholder_id;
use super::placement_error;
use crate::domain::entities::LayerStack;
use crate::infrastructure::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateLayerStackRequest {
    pub placeholder_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct LayerResponse {
    pub placeholder_id: String,
    pub z: i64,
    pub active: bool,
}

fn layers_response(stack: LayerStack) -> Vec<LayerResponse> {
    stack
        .layers
        .into_iter()
        .map(|layer| LayerResponse {
            placeholder_id: layer.placeholder_id.to_string(),
            z: layer.z,
            active: layer.active,
        })
        .collect()
}

/// Record scene tiles as a layer stack
pub async fn create_layer_stack(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateLayerStackRequest>,
) -> Result<(StatusCode, Json<Vec<LayerResponse>>), (StatusCode, String)> {
    let ids = req
        .placeholder_ids
        .iter()
        .map(|id| parse_placeholder_id(id))
        .collect::<Result<Vec<_>, _>>()?;

    let stack = state
        .layer_switcher_service
        .create(&ids)
        .await
        .map_err(placement_error)?;

    Ok((StatusCode::CREATED, Json(layers_response(stack))))
}

/// Show the next layer up
pub async fn layer_up(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<LayerResponse>>, (StatusCode, String)> {
    let stack = state
        .layer_switcher_service
        .up()
        .await
        .map_err(placement_error)?;

    Ok(Json(layers_response(stack)))
}

/// Show the next layer down
pub async fn layer_down(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<LayerResponse>>, (StatusCode, String)> {
    let stack = state
        .layer_switcher_service
        .down()
        .await
        .map_err(placement_error)?;

    Ok(Json(layers_response(stack)))
}
