use thiserror::Error;

use crate::webauthn::CeremonyError;

/// Errors from flow submissions.
///
/// Every variant is recoverable and already mirrored on the flow's error
/// board when it is returned; callers may retry with a fresh submit.
#[derive(Debug, Error)]
pub enum FlowError {
    /// Client-side validation failed; field errors are on the board and no
    /// network call was made
    #[error("Validation failed")]
    Validation,

    /// The backend rejected the submission
    #[error("Server rejection: {0}")]
    Server(String),

    /// A WebAuthn ceremony aborted
    #[error("Ceremony failed: {0}")]
    Ceremony(#[from] CeremonyError),

    /// The submission arrived in a state the flow cannot act on
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl FlowError {
    /// Log the error and return self, allowing method chaining at the
    /// return site.
    pub fn log(self) -> Self {
        match &self {
            Self::Validation => tracing::debug!("Submission blocked by field validation"),
            Self::Server(msg) => tracing::warn!("Server rejection: {}", msg),
            Self::Ceremony(err) => tracing::warn!("Ceremony failed: {}", err),
            Self::InvalidState(msg) => tracing::error!("Invalid state: {}", msg),
        }
        self
    }
}
