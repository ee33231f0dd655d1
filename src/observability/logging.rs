//! Structured logging.
//!
//! # Design Decisions
//! - Uses the tracing crate for structured logging
//! - `RUST_LOG` wins over the configured level when set
//! - Safe to call more than once (tests share a process)

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// The configured level applies to this crate and tower-http; everything
/// else stays at warn to keep scrape-interval noise down.
pub fn init(log_level: &str) {
    let default_filter = format!("portfolio_api={log_level},tower_http={log_level},warn");

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
