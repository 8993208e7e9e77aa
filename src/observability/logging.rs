//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once at startup
//! - Default level comes from config, RUST_LOG overrides it
//!
//! # Design Decisions
//! - Uses the tracing crate for structured logging
//! - Request ID is a field on every per-request event

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Initialize the global tracing subscriber.
pub fn init(config: &ObservabilityConfig) {
    let default_filter = format!(
        "mesh_console_gateway={},tower_http=info",
        config.log_level
    );

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
