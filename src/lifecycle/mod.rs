//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Init tracing → Resolve config → Open store → Install recorder → Serve
//!
//! Shutdown (shutdown.rs):
//!     SIGINT/SIGTERM → broadcast trigger → stop accepting → drain → exit
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, listeners last (traffic only when ready)
//! - Shutdown drain is bounded by a deadline; forced exit afterwards

pub mod shutdown;

pub use shutdown::{listen_for_signals, Shutdown};
