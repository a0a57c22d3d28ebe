use metrics_exporter_prometheus::BuildError;
use thiserror::Error;

/// Errors that can occur while building a metrics registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No histogram buckets were supplied.
    #[error("histogram buckets must not be empty")]
    EmptyBuckets,

    /// The Prometheus recorder rejected its configuration.
    #[error("Prometheus recorder error: {0}")]
    Recorder(#[from] BuildError),
}

/// Result type for registry construction.
pub type Result<T> = std::result::Result<T, RegistryError>;
