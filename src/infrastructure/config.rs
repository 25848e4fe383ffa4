//! Application configuration

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::services::placement_service::BLANK_TILE_IMAGE;

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP server port
    pub server_port: u16,

    /// JSON file holding the target scene and the source scenes
    pub scenes_file: Option<PathBuf>,

    /// Tile image for sources without a background
    pub blank_image: String,
    /// Actor reported to placement hooks
    pub actor_id: String,

    /// Activations creating more objects than this are vetoed
    pub max_batch: Option<usize>,
    /// Capacity of the placement event channel
    pub event_buffer: usize,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            server_port: var("SERVER_PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .context("SERVER_PORT must be a valid port number")?,

            scenes_file: var("SCENE_TILER_SCENES_FILE").map(PathBuf::from),

            blank_image: var("SCENE_TILER_BLANK_IMAGE")
                .unwrap_or_else(|| BLANK_TILE_IMAGE.to_string()),
            actor_id: var("SCENE_TILER_ACTOR_ID").unwrap_or_else(|| "engine".to_string()),

            max_batch: var("SCENE_TILER_MAX_BATCH")
                .map(|value| value.parse::<usize>())
                .transpose()
                .context("SCENE_TILER_MAX_BATCH must be a positive integer")?,
            event_buffer: var("SCENE_TILER_EVENT_BUFFER")
                .unwrap_or_else(|| "64".to_string())
                .parse()
                .context("SCENE_TILER_EVENT_BUFFER must be a positive integer")?,
        })
    }
}
