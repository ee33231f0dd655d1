//! API route handlers.
//!
//! Thin translation between the HTTP surface and the store/observability
//! subsystems. Handlers do the input validation the store does not, wrap
//! results in the response envelope, and push notable events into the
//! durable application log.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::http::response::{ApiError, ItemResponse, ListResponse};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::store::{KvEntry, NewProject, Project, Skill};

const LOG_TAIL_DEFAULT: usize = 50;
const LOG_TAIL_MAX: usize = 1000;

/// GET /api/projects
pub async fn list_projects(State(state): State<AppState>) -> Json<ListResponse<Project>> {
    Json(ListResponse::new(state.store.projects().await))
}

/// GET /api/projects/{id}
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ItemResponse<Project>>, ApiError> {
    state
        .store
        .project(id)
        .await
        .map(|project| Json(ItemResponse::new(project)))
        .ok_or_else(|| ApiError::NotFound(format!("project {id} not found")))
}

/// POST /api/projects
pub async fn create_project(
    State(state): State<AppState>,
    Json(new): Json<NewProject>,
) -> Result<(StatusCode, Json<ItemResponse<Project>>), ApiError> {
    if new.title.trim().is_empty() {
        return Err(ApiError::Validation("title must not be empty".to_string()));
    }

    let project = state.store.add_project(new).await?;
    state
        .applog
        .append(
            "info",
            "project created",
            Some(json!({ "id": project.id, "title": project.title.clone() })),
        )
        .await;

    Ok((StatusCode::CREATED, Json(ItemResponse::new(project))))
}

/// GET /api/skills
pub async fn list_skills(State(state): State<AppState>) -> Json<ListResponse<Skill>> {
    Json(ListResponse::new(state.store.skills().await))
}

/// GET /api/stats
pub async fn get_stats(State(state): State<AppState>) -> Json<Value> {
    let stats = state.store.stats().await;

    Json(json!({
        "success": true,
        "data": {
            "projects": stats.project_count,
            "featured_projects": stats.featured_count,
            "skills": stats.skill_count,
            "document_state": stats.document_state,
        },
        "runtime": {
            "uptime_secs": state.started.elapsed().as_secs(),
            "started_at": state.started_at,
            "environment": state.config.environment(),
            "instance": state.instance,
            "pid": std::process::id(),
            "version": env!("CARGO_PKG_VERSION"),
        },
    }))
}

#[derive(Debug, Deserialize)]
pub struct SaveDataRequest {
    pub key: String,
    pub value: Value,
}

/// POST /api/data/save
pub async fn save_data(
    State(state): State<AppState>,
    Json(request): Json<SaveDataRequest>,
) -> Result<Json<Value>, ApiError> {
    let entry = state.kv.put(&request.key, request.value).await?;
    state
        .applog
        .append("info", "data saved", Some(json!({ "key": entry.key.clone() })))
        .await;

    Ok(Json(json!({
        "success": true,
        "key": entry.key,
        "saved_at": entry.saved_at,
    })))
}

/// GET /api/data/{key}
pub async fn get_data(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ItemResponse<KvEntry>>, ApiError> {
    state
        .kv
        .get(&key)
        .await?
        .map(|entry| Json(ItemResponse::new(entry)))
        .ok_or_else(|| ApiError::NotFound(format!("no data stored under key '{key}'")))
}

/// GET /api/storage
pub async fn storage_info(
    State(state): State<AppState>,
) -> Result<Json<ItemResponse<crate::store::StorageReport>>, ApiError> {
    let report = crate::store::storage_report(
        &state.config.storage.data_dir,
        &state.config.storage.log_dir,
    )
    .await?;
    Ok(Json(ItemResponse::new(report)))
}

#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    pub lines: Option<usize>,
}

/// GET /api/logs?lines=N
pub async fn tail_logs(
    State(state): State<AppState>,
    Query(query): Query<LogsQuery>,
) -> Result<Json<ListResponse<crate::observability::LogEntry>>, ApiError> {
    let lines = query.lines.unwrap_or(LOG_TAIL_DEFAULT).min(LOG_TAIL_MAX);
    let entries = state.applog.tail(lines).await?;
    Ok(Json(ListResponse::new(entries)))
}

/// GET /metrics
pub async fn render_metrics(State(state): State<AppState>) -> Result<Response, ApiError> {
    let handle = state
        .metrics
        .as_ref()
        .ok_or_else(|| ApiError::Internal("metrics recorder unavailable".to_string()))?;

    let body = metrics::render(handle, state.started, state.started_unix_secs);
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
        .into_response())
}

/// Fallback for anything the router does not match. Records under the
/// bounded `unmatched` metrics label via the tracking middleware.
pub async fn not_found() -> ApiError {
    ApiError::NotFound("no matching route".to_string())
}
