//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the console gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Console-facing path prefixes and web assets.
    pub web: WebConfig,

    /// Backend targets the gateway forwards to.
    pub backends: BackendsConfig,

    /// Identity assertion verification policy.
    pub auth: AuthConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Console-facing web surface configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WebConfig {
    /// Path prefix for mesh-server routes (the `{base}` in the contract).
    pub request_url: String,

    /// Path prefix for monitoring routes.
    pub monitor_url: String,

    /// Directory holding the console index page.
    pub web_path: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            request_url: "/naming/v1".to_string(),
            monitor_url: "/monitor/v1".to_string(),
            web_path: "./web/".to_string(),
        }
    }
}

/// One backend target.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL, scheme + authority only (e.g., "http://127.0.0.1:8090").
    pub base_url: String,

    /// Deadline for the backend to produce a response head, in seconds.
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8090".to_string(),
            timeout_secs: 30,
        }
    }
}

/// The four backend systems behind the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BackendsConfig {
    /// Mesh control plane.
    pub mesh_server: BackendConfig,

    /// HR directory.
    pub directory: BackendConfig,

    /// Log search store.
    pub log_store: BackendConfig,

    /// Monitoring store.
    pub monitor: BackendConfig,
}

/// Identity assertion verification policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared secret the identity provider signs tokens with.
    pub secret: String,

    /// Principals permitted to perform gated operations.
    /// Empty list = any authenticated principal is permitted.
    pub operators: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            operators: Vec::new(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
