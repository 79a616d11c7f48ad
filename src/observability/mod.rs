//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Every request produces:
//!     → logging.rs (structured log events, request ID as a field)
//!     → metrics.rs (decision counters, resolve latency)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log line of a request
//! - Metrics are cheap (atomic increments) and no-ops until an exporter is installed

pub mod logging;
pub mod metrics;
