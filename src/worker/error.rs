//! Background worker error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from the worker's asset cache.
#[derive(Debug, Error)]
pub enum CacheError {
    /// A precached asset does not exist in the deployment.
    #[error("asset not found: {url}")]
    MissingAsset { url: String },

    /// The asset URL does not map into the deployment directory.
    #[error("asset outside the deployment: {0}")]
    OutsideDeployment(String),

    /// Invalid cache name.
    #[error("invalid cache name: '{0}'")]
    InvalidName(String),

    /// Filesystem failure.
    #[error("cache I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CacheError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true if the deployment is missing something.
    #[must_use]
    pub fn is_missing_asset(&self) -> bool {
        matches!(self, Self::MissingAsset { .. } | Self::OutsideDeployment(_))
    }
}

/// Errors from the window-client registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClientError {
    /// No client with this id.
    #[error("client not found: {0}")]
    NotFound(String),

    /// The platform cannot open new windows.
    #[error("opening windows is not supported")]
    Unsupported,

    /// The foreground went away.
    #[error("client disconnected")]
    Disconnected,
}
