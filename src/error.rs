//! Error types for the Grafana provider.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reconciling a resource.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// An HTTP transport error occurred (connection refused, timeout, ...).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The invocation parameters were invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A dashboard JSON document could not be read.
    #[error("Failed to read dashboard {path}: {source}")]
    DashboardFile {
        /// Path of the dashboard document that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The server answered with a status the reconciler does not tolerate.
    #[error("Server returned {status}: {body}")]
    Api {
        /// The HTTP status code of the failed call.
        status: u16,
        /// The raw response body, passed through verbatim.
        body: String,
    },
}

impl ProviderError {
    /// The HTTP status code carried by this error, if any.
    ///
    /// Only [`ProviderError::Api`] carries a status; the orchestration host
    /// receives it in the failure report.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
