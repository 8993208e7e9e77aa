//! Mesh Console Gateway
//!
//! Administrative gateway for a service-mesh control console: matches each
//! browser request against a static route table, validates the addressed
//! resource, gates mutation endpoints behind identity verification, and
//! relays the request to the mesh control plane, HR directory, log store,
//! or monitoring backend.

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;
pub mod routing;

pub use config::{load_config, GatewayConfig};
pub use error::GatewayError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
