//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured tracing events to stdout)
//!     → metrics.rs (counters, gauges, histograms → /metrics)
//!     → applog.rs (durable JSON-lines entries → /api/logs)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//!     → The service's own /api/logs tail endpoint
//! ```
//!
//! # Design Decisions
//! - Metric updates are cheap atomic operations on the hot path
//! - The durable app log is for the API's own introspection endpoints;
//!   tracing output is for operators

pub mod applog;
pub mod logging;
pub mod metrics;

pub use applog::{AppLog, LogEntry};
