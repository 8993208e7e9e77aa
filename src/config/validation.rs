//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check backend base URLs parse and carry no path/query baggage
//! - Validate path prefixes and timeout ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use url::Url;

use crate::config::schema::{BackendConfig, GatewayConfig};

/// One semantic problem found in the configuration.
#[derive(Debug, PartialEq, Eq)]
pub enum ValidationError {
    InvalidBindAddress(String),
    InvalidBackendUrl { backend: &'static str, reason: String },
    ZeroTimeout { backend: &'static str },
    InvalidPrefix { field: &'static str, value: String },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidBindAddress(addr) => {
                write!(f, "invalid bind address: {}", addr)
            }
            ValidationError::InvalidBackendUrl { backend, reason } => {
                write!(f, "invalid base_url for backend '{}': {}", backend, reason)
            }
            ValidationError::ZeroTimeout { backend } => {
                write!(f, "timeout_secs for backend '{}' must be > 0", backend)
            }
            ValidationError::InvalidPrefix { field, value } => {
                write!(f, "{} must start with '/' (got '{}')", field, value)
            }
        }
    }
}

/// Validate a configuration, collecting every problem.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<std::net::SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    for (name, backend) in [
        ("mesh_server", &config.backends.mesh_server),
        ("directory", &config.backends.directory),
        ("log_store", &config.backends.log_store),
        ("monitor", &config.backends.monitor),
    ] {
        validate_backend(name, backend, &mut errors);
    }

    for (field, value) in [
        ("web.request_url", &config.web.request_url),
        ("web.monitor_url", &config.web.monitor_url),
    ] {
        if !value.starts_with('/') {
            errors.push(ValidationError::InvalidPrefix {
                field,
                value: value.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_backend(name: &'static str, backend: &BackendConfig, errors: &mut Vec<ValidationError>) {
    match Url::parse(&backend.base_url) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                errors.push(ValidationError::InvalidBackendUrl {
                    backend: name,
                    reason: format!("unsupported scheme '{}'", url.scheme()),
                });
            }
            if url.query().is_some() || url.fragment().is_some() {
                errors.push(ValidationError::InvalidBackendUrl {
                    backend: name,
                    reason: "query or fragment not allowed".to_string(),
                });
            }
        }
        Err(e) => errors.push(ValidationError::InvalidBackendUrl {
            backend: name,
            reason: e.to_string(),
        }),
    }

    if backend.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout { backend: name });
    }
}
