//! Region API routes

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::entities::Region;
use crate::domain::value_objects::{GridMetrics, PlaceableKind};
use crate::infrastructure::state::AppState;

#[derive(Debug, Serialize)]
pub struct RegionResponse {
    pub locator: String,
    pub name: String,
    pub grid: GridMetrics,
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub background: Option<String>,
    pub foreground: Option<String>,
    /// Number of objects of each kind that a tile of this scene would copy
    pub objects: BTreeMap<PlaceableKind, usize>,
}

impl From<Region> for RegionResponse {
    fn from(r: Region) -> Self {
        let objects = PlaceableKind::ALL
            .into_iter()
            .map(|kind| (kind, r.placeables.len(kind)))
            .filter(|(_, count)| *count > 0)
            .collect();

        Self {
            locator: r.locator.to_string(),
            name: r.name,
            grid: r.grid,
            width: r.width,
            height: r.height,
            padding: r.padding,
            background: r.background,
            foreground: r.foreground,
            objects,
        }
    }
}

/// List scenes that can be placed as tiles
pub async fn list_regions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RegionResponse>>, (StatusCode, String)> {
    let regions = state
        .regions
        .list()
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(regions.into_iter().map(RegionResponse::from).collect()))
}
