//! API Handlers
//!
//! HTTP request handlers for each exploration endpoint.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{extract::State, Json};

use crate::error::{MapError, Result};
use crate::map::ParametricMap;
use crate::models::{
    DimensionsResponse, EntryView, GetRequest, GetResponse, HealthResponse, KeysResponse,
    SampleRequest, SampleResponse, SelectRequest, SelectResponse, SnapshotResponse,
    StatsResponse, MAX_SELECTION_KEYS,
};
use crate::shapes::shape_map;

/// Map served over HTTP; artifacts are JSON documents.
pub type JsonMap = ParametricMap<serde_json::Value>;

/// Application state shared across all handlers.
///
/// Contains the map wrapped in Arc<RwLock<>> for thread-safe access.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe parametric map
    pub map: Arc<RwLock<JsonMap>>,
}

impl AppState {
    /// Creates a new AppState serving the given map.
    pub fn new(map: JsonMap) -> Self {
        Self {
            map: Arc::new(RwLock::new(map)),
        }
    }

    /// Creates the demonstration shapes map sized from configuration.
    pub fn from_config(config: &crate::config::Config) -> Result<Self> {
        Ok(Self::new(shape_map(config.max_entries)?))
    }
}

/// Handler for POST /get
///
/// Resolves a key, computing its artifact on first access.
pub async fn get_handler(
    State(state): State<AppState>,
    Json(req): Json<GetRequest>,
) -> Result<Json<GetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(MapError::InvalidRequest(error_msg));
    }

    // Write lock: a lookup may insert, evict and update recency
    let mut map = state.map.write().await;
    let artifact = map.get(&req.key)?.clone();

    Ok(Json(EntryView::new(req.key, artifact)))
}

/// Handler for GET /keys
///
/// Lists cached keys in insertion order.
pub async fn keys_handler(State(state): State<AppState>) -> Json<KeysResponse> {
    let map = state.map.read().await;
    Json(KeysResponse::new(map.keys()))
}

/// Handler for POST /select
///
/// Builds a narrowed map and returns its contents. The served map is unchanged.
/// Selections larger than `MAX_SELECTION_KEYS` are refused before anything
/// is resolved.
pub async fn select_handler(
    State(state): State<AppState>,
    Json(req): Json<SelectRequest>,
) -> Result<Json<SelectResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(MapError::InvalidRequest(error_msg));
    }
    let selection = req.to_selection()?;

    let map = state.map.read().await;
    let size = map.selection_size(&selection)?;
    if size > MAX_SELECTION_KEYS {
        return Err(MapError::InvalidRequest(format!(
            "Selection would produce {} keys, maximum is {}",
            size, MAX_SELECTION_KEYS
        )));
    }
    let derived = map.select(&selection)?;

    Ok(Json(SelectResponse::from_map(&derived)))
}

/// Handler for POST /sample
///
/// Resolves an evenly spaced grid over the bounded space.
pub async fn sample_handler(
    State(state): State<AppState>,
    Json(req): Json<SampleRequest>,
) -> Result<Json<SampleResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(MapError::InvalidRequest(error_msg));
    }

    let mut map = state.map.write().await;
    let keys = map.sample(req.samples)?;

    Ok(Json(SampleResponse::new(keys)))
}

/// Handler for GET /snapshot
///
/// Returns every cached key and artifact, ordered by key.
pub async fn snapshot_handler(State(state): State<AppState>) -> Json<SnapshotResponse> {
    let map = state.map.read().await;
    Json(SnapshotResponse::new(map.as_materialized()))
}

/// Handler for GET /dimensions
pub async fn dimensions_handler(State(state): State<AppState>) -> Json<DimensionsResponse> {
    let map = state.map.read().await;
    Json(DimensionsResponse::from_map(&*map))
}

/// Handler for GET /stats
///
/// Returns current cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let map = state.map.read().await;
    Json(StatsResponse::new(&map.stats(), map.capacity()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
