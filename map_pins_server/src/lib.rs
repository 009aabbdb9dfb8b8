//! HTTP glue around the `map_pins` clustering core.
//!
//! Serves `GET /api/locations-clustered?zoom=N` over an in-memory location set
//! loaded at startup, plus `GET /healthz`.

pub mod error;

use crate::error::ApiError;
use anyhow::Context;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use map_pins::{ClusteringConfig, ClusteringPipeline, DisplayObject, Point};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

const DEFAULT_BIND: &str = "127.0.0.1:3001";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// JSON array of locations (`uuid`, `position`, anything else passes through).
    pub data_path: Option<PathBuf>,
    pub clustering: ClusteringConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND.to_string(),
            data_path: None,
            clustering: ClusteringConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Reads `PINS_BIND` and `PINS_DATA`, falling back to defaults.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(bind) = std::env::var("PINS_BIND") {
            if !bind.is_empty() {
                cfg.bind_addr = bind;
            }
        }
        if let Ok(path) = std::env::var("PINS_DATA") {
            if !path.is_empty() {
                cfg.data_path = Some(PathBuf::from(path));
            }
        }
        cfg
    }
}

/// Shared, read-only state handed to every request.
pub struct AppState {
    pipeline: ClusteringPipeline,
    locations: Arc<Vec<Point>>,
}

impl AppState {
    pub fn new(clustering: ClusteringConfig, locations: Vec<Point>) -> anyhow::Result<Self> {
        let pipeline = ClusteringPipeline::new(clustering).context("invalid clustering configuration")?;
        Ok(Self {
            pipeline,
            locations: Arc::new(locations),
        })
    }

    pub fn locations(&self) -> &[Point] {
        &self.locations
    }
}

/// Loads a JSON array of locations, rejecting duplicate identities.
pub fn load_locations(path: &Path) -> anyhow::Result<Vec<Point>> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let locations: Vec<Point> =
        serde_json::from_str(&raw).with_context(|| format!("parsing locations from {}", path.display()))?;

    let mut seen = HashSet::with_capacity(locations.len());
    for location in &locations {
        if !seen.insert(location.identity.as_str()) {
            anyhow::bail!("duplicate location uuid {:?} in {}", location.identity, path.display());
        }
    }
    Ok(locations)
}

#[derive(Debug, Deserialize)]
struct ClusteringParams {
    zoom: Option<String>,
}

async fn locations_clustered(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ClusteringParams>,
) -> Result<Json<Vec<DisplayObject>>, ApiError> {
    let config = state.pipeline.config();
    let zoom = match params.zoom.as_deref() {
        None => i64::from(config.default_zoom),
        Some(raw) => raw.trim().parse::<i64>().map_err(|e| {
            warn!(zoom = raw, error = %e, "Invalid parameter in clustering request");
            ApiError::InvalidParameters(format!("zoom: {e}"))
        })?,
    };
    let zoom = config.check_zoom(zoom).map_err(|_| ApiError::ZoomOutOfRange {
        min: config.min_zoom,
        max: config.max_zoom,
    })?;

    let worker_state = Arc::clone(&state);
    let result = tokio::task::spawn_blocking(move || {
        worker_state.pipeline.cluster(&worker_state.locations, zoom)
    })
    .await
    .map_err(|e| ApiError::Clustering(e.to_string()))?
    .map_err(|e| ApiError::Clustering(e.to_string()))?;

    Ok(Json(result.objects))
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route("/api/locations-clustered", get(locations_clustered))
        .with_state(state)
}

pub async fn start_server(cfg: ServerConfig, state: Arc<AppState>) -> anyhow::Result<tokio::task::JoinHandle<()>> {
    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr)
        .await
        .with_context(|| format!("binding {}", cfg.bind_addr))?;
    info!(
        bind_addr = %cfg.bind_addr,
        locations = state.locations().len(),
        "Map pins server listening"
    );

    let app = build_router(state);
    let server = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "Server stopped");
        }
    });
    Ok(server)
}
