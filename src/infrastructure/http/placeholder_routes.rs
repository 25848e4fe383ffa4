//! Scene tile API routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

use super::placement_error;
use crate::application::services::{CreatePlaceholderOptions, DropData};
use crate::domain::entities::{Placeholder, PlaceholderUpdate};
use crate::domain::value_objects::{PlaceableKind, PlaceholderId, RegionLocator};
use crate::infrastructure::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreatePlaceholderRequest {
    pub locator: String,
    #[serde(flatten)]
    pub options: CreatePlaceholderOptions,
}

#[derive(Debug, Serialize)]
pub struct PlaceholderResponse {
    pub id: String,
    pub img: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    pub z: i64,
    pub locked: bool,
    pub source: Option<String>,
    pub populated: bool,
    /// Objects created by this tile, per kind
    pub spawned: BTreeMap<PlaceableKind, usize>,
}

impl From<Placeholder> for PlaceholderResponse {
    fn from(p: Placeholder) -> Self {
        let populated = p.is_populated();
        let spawned = p
            .spawned
            .unwrap_or_default()
            .into_iter()
            .map(|(kind, ids)| (kind, ids.len()))
            .collect();

        Self {
            id: p.id.to_string(),
            img: p.img,
            x: p.x,
            y: p.y,
            width: p.width,
            height: p.height,
            rotation: p.rotation,
            z: p.z,
            locked: p.locked,
            source: p.source.map(|s| s.to_string()),
            populated,
            spawned,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClearSceneResponse {
    pub deleted: usize,
}

pub(super) fn parse_placeholder_id(id: &str) -> Result<PlaceholderId, (StatusCode, String)> {
    Uuid::parse_str(id)
        .map(PlaceholderId::from_uuid)
        .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid placeholder ID".to_string()))
}

/// List scene tiles in the target scene
pub async fn list_placeholders(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PlaceholderResponse>>, (StatusCode, String)> {
    let placeholders = state
        .placement_service
        .list_placeholders()
        .await
        .map_err(placement_error)?;

    Ok(Json(
        placeholders.into_iter().map(PlaceholderResponse::from).collect(),
    ))
}

/// Create a scene tile from a scene locator
pub async fn create_placeholder(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreatePlaceholderRequest>,
) -> Result<(StatusCode, Json<PlaceholderResponse>), (StatusCode, String)> {
    let locator = RegionLocator::new(req.locator);
    let placeholder = state
        .placement_service
        .create(&locator, req.options)
        .await
        .map_err(placement_error)?
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                format!("Scene not found: {}", locator),
            )
        })?;

    Ok((StatusCode::CREATED, Json(PlaceholderResponse::from(placeholder))))
}

/// Create a scene tile where a scene was dropped
///
/// Drops of anything other than a scene are accepted and ignored.
pub async fn drop_on_canvas(
    State(state): State<Arc<AppState>>,
    Json(drop): Json<DropData>,
) -> Result<(StatusCode, Json<Option<PlaceholderResponse>>), (StatusCode, String)> {
    let placeholder = state
        .placement_service
        .handle_drop(drop)
        .await
        .map_err(placement_error)?;

    match placeholder {
        Some(p) => Ok((StatusCode::CREATED, Json(Some(PlaceholderResponse::from(p))))),
        None => Ok((StatusCode::OK, Json(None))),
    }
}

/// Edit a scene tile
pub async fn update_placeholder(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(update): Json<PlaceholderUpdate>,
) -> Result<Json<PlaceholderResponse>, (StatusCode, String)> {
    let id = parse_placeholder_id(&id)?;

    let placeholder = state
        .placement_service
        .get_placeholder(id)
        .await
        .map_err(placement_error)?;
    let updated = state
        .placement_service
        .intercept_update(&placeholder, update)
        .await
        .map_err(placement_error)?;

    Ok(Json(PlaceholderResponse::from(updated)))
}

/// Copy the source scene onto a scene tile
pub async fn populate_placeholder(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PlaceholderResponse>, (StatusCode, String)> {
    let id = parse_placeholder_id(&id)?;

    let placeholder = state
        .placement_service
        .populate(id)
        .await
        .map_err(placement_error)?;

    Ok(Json(PlaceholderResponse::from(placeholder)))
}

/// Remove everything a scene tile created
pub async fn clear_placeholder(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PlaceholderResponse>, (StatusCode, String)> {
    let id = parse_placeholder_id(&id)?;

    let placeholder = state
        .placement_service
        .clear(id)
        .await
        .map_err(placement_error)?;

    Ok(Json(PlaceholderResponse::from(placeholder)))
}

/// Delete every object in the target scene
pub async fn clear_scene(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ClearSceneResponse>, (StatusCode, String)> {
    let deleted = state
        .placement_service
        .clear_scene()
        .await
        .map_err(placement_error)?;

    Ok(Json(ClearSceneResponse { deleted }))
}
