use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, PartialEq, Error)]
pub enum BackendError {
    /// Transport or service failure with no further interpretable status.
    #[error("remote unavailable: {0}")]
    RemoteUnavailable(String),
    /// The target reference or a tag's commit id does not resolve.
    #[error("reference not found: {0}")]
    ReferenceNotFound(String),
    /// The remote service returned a value violating its documented
    /// contract, e.g. a negative magnitude or an unknown status.
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),
}
