//! Facade error types.

use std::path::PathBuf;

use nextport_types::NetworkError;
use thiserror::Error;

/// Errors from loading a network seed file.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse seed file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Top-level error for simulation operations.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Seed(#[from] SeedError),
}

/// Convenience alias for facade results.
pub type Result<T> = std::result::Result<T, SimulationError>;
