//! Error types for backend API calls

use thiserror::Error;

/// Errors from the backend API boundary. Cancellation is not represented
/// here: a superseded fetch is aborted and its outcome discarded before any
/// error could surface.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {endpoint} failed")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned HTTP {status}")]
    Status {
        endpoint: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("failed to decode {endpoint} response")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
}
