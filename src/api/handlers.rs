//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::{CacheManager, CacheOptions};
use crate::config::Config;
use crate::error::Result;
use crate::models::{
    DeleteResponse, GetResponse, HealthResponse, SetRequest, SetResponse, StatsResponse,
};

/// Application state shared across all handlers.
///
/// The cache manager synchronizes internally, so handlers never hold a
/// lock across an await point.
#[derive(Clone)]
pub struct AppState {
    /// Shared bucketed cache
    pub cache: Arc<CacheManager>,
    /// Options used when a request carries none
    pub defaults: CacheOptions,
}

impl AppState {
    /// Creates a new AppState around an existing cache.
    pub fn new(cache: Arc<CacheManager>, defaults: CacheOptions) -> Self {
        Self { cache, defaults }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(Arc::new(CacheManager::new()), config.cache_options())
    }
}

/// Handler for PUT /set
///
/// Stores a value in a bucket with optional TTL and eviction policy.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    let (bucket, key, value, opts) = req.into_parts(&state.defaults)?;
    state.cache.set(&bucket, &key, value, &opts)?;

    Ok(Json(SetResponse::new(bucket, key)))
}

/// Handler for GET /get/:bucket/:key
///
/// Missing and expired keys produce a successful response with `found: false`.
pub async fn get_handler(
    State(state): State<AppState>,
    Path((bucket, key)): Path<(String, String)>,
) -> Result<Json<GetResponse>> {
    let value = state.cache.get(&bucket, &key, &state.defaults)?;

    Ok(Json(GetResponse::new(bucket, key, value)))
}

/// Handler for DELETE /del/:bucket/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path((bucket, key)): Path<(String, String)>,
) -> Result<Json<DeleteResponse>> {
    state.cache.delete(&bucket, &key)?;

    Ok(Json(DeleteResponse::new(bucket, key)))
}

/// Handler for GET /stats
///
/// Returns counters summed over all buckets.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::new(
        state.cache.stats(),
        state.cache.bucket_count(),
    ))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
