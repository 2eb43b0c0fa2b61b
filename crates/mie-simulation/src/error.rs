//! Errors raised while setting up a run

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("grand-canonical runs need an acceptance bias, the system provides none")]
    MissingAcceptanceBias,

    #[error("`{0}` must be at least 1")]
    ZeroInterval(&'static str),

    #[error("failed to read simulation config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}
