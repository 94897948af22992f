use ptagcore::error::BackendError;
use std::time::Duration;
use thiserror::Error;

use crate::transport::TransportError;

/// Failures as seen from the client, before they are collapsed into the
/// taxonomy the resolver works with.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("rate limit exhausted for GET {path} (retry after {}s)", retry_after.as_secs())]
    RateLimited {
        path: String,
        retry_after: Duration,
    },
    #[error("abuse detection triggered for GET {path}")]
    AbusePrevented {
        path: String,
    },
    #[error("comparison too expensive: {0}")]
    ComparisonTooExpensive(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unexpected response {status}: {message}")]
    Status {
        status: u16,
        message: String,
    },
    #[error("unexpected payload: {0}")]
    Payload(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl From<RemoteError> for BackendError {
    fn from(error: RemoteError) -> Self {
        match error {
            RemoteError::NotFound(_) => {
                BackendError::ReferenceNotFound(error.to_string())
            }
            RemoteError::Payload(_) | RemoteError::Json(_) => {
                BackendError::ProtocolViolation(error.to_string())
            }
            RemoteError::RateLimited { .. }
            | RemoteError::AbusePrevented { .. }
            | RemoteError::ComparisonTooExpensive(_)
            | RemoteError::Status { .. }
            | RemoteError::Transport(_) => {
                BackendError::RemoteUnavailable(error.to_string())
            }
        }
    }
}
