//! Error types for Artemis Arrow
//!
//! Uses `thiserror` for library errors; the binary wraps these in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Artemis Arrow operations
pub type ArrowResult<T> = Result<T, ArrowError>;

/// Main error type for Artemis Arrow operations
#[derive(Error, Debug)]
pub enum ArrowError {
    /// Configuration file missing
    #[error("configuration file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    /// A configuration field failed validation
    #[error("invalid configuration field '{field}': {message}")]
    InvalidConfig { field: String, message: String },

    /// Collector endpoint did not resolve to an address
    #[error("cannot resolve collector endpoint '{endpoint}'")]
    UnresolvableCollector { endpoint: String },

    /// Every enumerated interface was skipped
    #[error("no capturable interfaces (all skipped as loopback or control-network)")]
    NoUsableInterfaces,

    /// Datalink channel could not be opened on an interface
    #[error("failed to open capture channel on '{interface}': {message}")]
    Channel { interface: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}
