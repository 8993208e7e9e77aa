//! Configuration loading from disk.
//!
//! # Responsibilities
//! - Read and parse the gateway's TOML config file
//! - Run semantic validation before the config reaches any subsystem
//! - Report failures with enough context to fix the file (path, every
//!   validation problem, not just the first)

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    Read { path: PathBuf, source: std::io::Error },
    /// The file is not valid TOML for the gateway schema.
    Parse { path: PathBuf, source: toml::de::Error },
    /// The file parsed but fails semantic validation.
    Invalid(Vec<ValidationError>),
}

impl ConfigError {
    /// The individual validation problems, when that is what failed.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            ConfigError::Invalid(errors) => errors,
            _ => &[],
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "failed to read config {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "failed to parse config {}: {}", path.display(), source)
            }
            ConfigError::Invalid(errors) => {
                write!(f, "config invalid ({} problem(s))", errors.len())?;
                for err in errors {
                    write!(f, "; {}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::Invalid(_) => None,
        }
    }
}

/// Load and validate the gateway configuration from a TOML file.
///
/// Every backend target, path prefix, and the listener address are checked
/// here; subsystems may assume a returned config is internally consistent.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let config: GatewayConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_config(&config).map_err(ConfigError::Invalid)?;

    Ok(config)
}
