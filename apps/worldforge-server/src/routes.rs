//! REST API routes for the web server.

use std::path::Path;
use std::sync::Arc;

use axum::{
    Router,
    extract::{Path as UrlPath, State, rejection::JsonRejection},
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::services::ServeDir;
use worldforge_common::Position;
use worldforge_kernel::{World, sample};

use crate::error::ApiError;
use crate::state::AppState;

/// Create the API router
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        // World
        .route("/api/world", get(get_world))
        .route("/api/add_structure", post(add_structure))
        .route("/api/remove_structure", post(remove_structure))
        // Templates
        .route("/api/structures", get(list_structures))
        .route("/api/structure/:name", get(get_structure))
        // Sample geometry
        .route("/api/points", get(get_points))
        .route("/api/edges", get(get_edges))
}

/// The full application: API routes with the static viewer as fallback.
pub fn app(state: Arc<AppState>, static_dir: &Path) -> Router {
    Router::new()
        .merge(api_router())
        .fallback_service(ServeDir::new(static_dir).append_index_html_on_directories(true))
        .with_state(state)
}

/// Run store or template work on the blocking pool; both lock and touch the filesystem.
async fn blocking<T, E>(work: impl FnOnce() -> Result<T, E> + Send + 'static) -> Result<T, ApiError>
where
    T: Send + 'static,
    E: Into<ApiError> + Send + 'static,
{
    tokio::task::spawn_blocking(work).await?.map_err(Into::into)
}

// --- World ---

async fn get_world(State(state): State<Arc<AppState>>) -> Result<Json<World>, ApiError> {
    let store = Arc::clone(&state.world);
    Ok(Json(blocking(move || store.get_world()).await?))
}

#[derive(Deserialize)]
struct AddStructureRequest {
    position: Vec<i64>,
    structure: String,
}

#[derive(Serialize)]
struct AddStructureResponse {
    success: bool,
    position: [i64; 3],
    structure: String,
}

async fn add_structure(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AddStructureRequest>, JsonRejection>,
) -> Result<Json<AddStructureResponse>, ApiError> {
    let Json(request) = payload?;
    let position = Position::try_from(request.position.as_slice())?;

    let store = Arc::clone(&state.world);
    let placed = blocking(move || store.add_structure(position, request.structure)).await?;
    tracing::info!(position = %placed.position, structure = %placed.structure, "structure added");
    Ok(Json(AddStructureResponse {
        success: true,
        position: placed.position.to_array(),
        structure: placed.structure,
    }))
}

#[derive(Deserialize)]
struct RemoveStructureRequest {
    position: Vec<i64>,
}

#[derive(Serialize)]
struct RemoveStructureResponse {
    success: bool,
    position: [i64; 3],
    removed_structure: String,
}

async fn remove_structure(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RemoveStructureRequest>, JsonRejection>,
) -> Result<Json<RemoveStructureResponse>, ApiError> {
    let Json(request) = payload?;
    let position = Position::try_from(request.position.as_slice())?;

    let store = Arc::clone(&state.world);
    let removed = blocking(move || store.remove_structure(position)).await?;
    tracing::info!(
        position = %removed.position,
        structure = %removed.removed_structure,
        "structure removed"
    );
    Ok(Json(RemoveStructureResponse {
        success: true,
        position: removed.position.to_array(),
        removed_structure: removed.removed_structure,
    }))
}

// --- Templates ---

async fn get_structure(
    State(state): State<Arc<AppState>>,
    UrlPath(name): UrlPath<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let templates = state.templates.clone();
    Ok(Json(blocking(move || templates.load(&name)).await?))
}

async fn list_structures(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let templates = state.templates.clone();
    let names = blocking(move || templates.list()).await?;
    Ok(Json(json!({ "structures": names })))
}

// --- Sample geometry ---

async fn get_points() -> Json<serde_json::Value> {
    Json(json!({ "points": sample::cube_points() }))
}

async fn get_edges() -> Json<serde_json::Value> {
    Json(json!({ "edges": sample::cube_edges() }))
}
