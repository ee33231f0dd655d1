//! Portfolio API service library.
//!
//! A single-binary HTTP service exposing a small JSON REST surface backed
//! by a flat-file document store, instrumented with Prometheus metrics.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌─────────────────────────────────────────────┐
//!                        │                PORTFOLIO API                │
//!                        │                                             │
//!     Client Request     │  ┌─────────┐   ┌──────────┐   ┌─────────┐  │
//!     ───────────────────┼─▶│  http   │──▶│ handlers │──▶│  store  │  │
//!                        │  │ server  │   │          │   │         │  │
//!                        │  └─────────┘   └──────────┘   └────┬────┘  │
//!                        │                                    │       │
//!     Client Response    │  ┌──────────┐                      ▼       │
//!     ◀──────────────────┼──│ response │               data_dir/      │
//!                        │  │ envelope │               portfolio.json │
//!                        │  └──────────┘                              │
//!                        │                                             │
//!                        │  ┌───────────────────────────────────────┐ │
//!                        │  │          Cross-Cutting Concerns       │ │
//!                        │  │  ┌────────┐ ┌────────┐ ┌────────────┐ │ │
//!                        │  │  │ config │ │ health │ │observability│ │ │
//!                        │  │  └────────┘ └────────┘ └────────────┘ │ │
//!                        │  │  ┌─────────────────────────────────┐  │ │
//!                        │  │  │            lifecycle            │  │ │
//!                        │  │  └─────────────────────────────────┘  │ │
//!                        │  └───────────────────────────────────────┘ │
//!                        └─────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod http;
pub mod store;

// Cross-cutting concerns
pub mod health;
pub mod lifecycle;
pub mod observability;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
