//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatcher produces:
//!     → logging.rs (structured log events, request ID correlated)
//!     → metrics.rs (request counter + latency histogram)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;
