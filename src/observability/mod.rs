//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Pipeline steps and the transaction lifecycle produce:
//!     → logging.rs (structured log events, one span per run)
//!     → metrics.rs (submission counters, outcome counters, step latency)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → optional Prometheus scrape endpoint for the duration of the run
//! ```

pub mod logging;
pub mod metrics;
