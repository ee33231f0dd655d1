//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (tracing, limits, request ID, metrics)
//! - Initialize the storage and observability subsystems in order
//! - Serve with graceful shutdown

use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use axum::http::{HeaderName, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use axum::extract::DefaultBodyLimit;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::config::ServiceConfig;
use crate::health;
use crate::http::handlers;
use crate::http::response;
use crate::observability::{metrics, AppLog};
use crate::store::{DocumentStore, KvStore, StoreError};

const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");
const X_INSTANCE_ID: HeaderName = HeaderName::from_static("x-instance-id");

/// Error type for server startup.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("store initialization failed: {0}")]
    Store(#[from] StoreError),

    #[error("metrics recorder installation failed: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub store: Arc<DocumentStore>,
    pub kv: Arc<KvStore>,
    pub applog: Arc<AppLog>,
    pub metrics: Option<PrometheusHandle>,
    pub instance: String,
    pub started: Instant,
    pub started_at: DateTime<Utc>,
    pub started_unix_secs: f64,
}

/// HTTP server for the portfolio API.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Initialize subsystems in dependency order and build the router.
    /// Fail fast: any startup error is fatal.
    pub async fn init(config: ServiceConfig) -> Result<Self, ServerError> {
        let instance = resolve_instance();
        response::set_instance(&instance);

        let store = Arc::new(DocumentStore::open(&config.storage.data_dir).await?);
        let kv = Arc::new(KvStore::new(&config.storage.data_dir));
        let applog = Arc::new(AppLog::new(&config.storage.log_dir, &instance));

        let metrics_handle = if config.observability.metrics_enabled {
            Some(metrics::install()?)
        } else {
            None
        };

        applog
            .append(
                "info",
                "service starting",
                Some(json!({
                    "environment": config.environment(),
                    "document_state": store.state(),
                })),
            )
            .await;

        let started_unix_secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);

        let state = AppState {
            config: Arc::new(config.clone()),
            store,
            kv,
            applog,
            metrics: metrics_handle,
            instance,
            started: Instant::now(),
            started_at: Utc::now(),
            started_unix_secs,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        let instance_header = HeaderValue::from_str(&state.instance)
            .unwrap_or_else(|_| HeaderValue::from_static("unknown"));

        Router::new()
            .route("/health", get(health::liveness))
            .route("/ready", get(health::readiness))
            .route("/metrics", get(handlers::render_metrics))
            .route(
                "/api/projects",
                get(handlers::list_projects).post(handlers::create_project),
            )
            .route("/api/projects/{id}", get(handlers::get_project))
            .route("/api/skills", get(handlers::list_skills))
            .route("/api/stats", get(handlers::get_stats))
            .route("/api/data/save", post(handlers::save_data))
            .route("/api/data/{key}", get(handlers::get_data))
            .route("/api/storage", get(handlers::storage_info))
            .route("/api/logs", get(handlers::tail_logs))
            .fallback(handlers::not_found)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
                    .layer(SetResponseHeaderLayer::if_not_present(
                        X_INSTANCE_ID,
                        instance_header,
                    ))
                    .layer(TraceLayer::new_for_http())
                    .layer(axum::middleware::from_fn(metrics::track_requests))
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.server.request_timeout_secs,
                    )))
                    .layer(DefaultBodyLimit::max(config.server.max_body_size)),
            )
    }

    /// Run the server, accepting connections on the given listener until
    /// the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

/// Instance identity surfaced in responses: the pod hostname when the
/// platform provides one, otherwise a generated id.
fn resolve_instance() -> String {
    std::env::var("HOSTNAME")
        .ok()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| format!("portfolio-{}", Uuid::new_v4()))
}
