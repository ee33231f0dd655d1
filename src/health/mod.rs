//! Health checking subsystem.
//!
//! Liveness ("the process is alive") and readiness ("the process can serve
//! traffic") are deliberately separate: an orchestrator restarts on failed
//! liveness but only withholds traffic on failed readiness.
//!
//! The database dependency is simulated: the service declares coordinates
//! but never opens a connection, so readiness reports the configured
//! target with `simulated: true` rather than pretending to probe it.
//! Storage readiness is real: the data directory must be present.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use crate::http::server::AppState;

/// GET /health liveness payload.
pub async fn liveness(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "success": true,
        "status": "ok",
        "uptime_secs": state.started.elapsed().as_secs(),
        "timestamp": Utc::now(),
        "environment": state.config.environment(),
        "instance": state.instance,
    }))
}

/// GET /ready readiness payload including dependency status.
pub async fn readiness(State(state): State<AppState>) -> Json<Value> {
    let storage_ok = tokio::fs::metadata(&state.config.storage.data_dir)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);

    Json(json!({
        "success": storage_ok,
        "status": if storage_ok { "ready" } else { "degraded" },
        "timestamp": Utc::now(),
        "instance": state.instance,
        "dependencies": {
            "storage": {
                "status": if storage_ok { "ok" } else { "unavailable" },
                "data_dir": state.config.storage.data_dir.clone(),
            },
            "database": {
                "status": "connected",
                "simulated": true,
                "host": state.config.database.host.clone(),
                "name": state.config.database.name.clone(),
            },
        },
    }))
}
