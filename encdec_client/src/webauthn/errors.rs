use thiserror::Error;

use crate::api::ApiError;
use crate::utils::UtilError;

/// Errors from the platform credential manager.
#[derive(Debug, Error)]
pub enum AuthenticatorError {
    /// The user dismissed the platform prompt
    #[error("Ceremony cancelled by the user")]
    Cancelled,

    /// No usable authenticator is available on this platform
    #[error("No platform authenticator available: {0}")]
    Unavailable(String),

    /// The authenticator failed to produce a credential
    #[error("Authenticator failure: {0}")]
    Failed(String),
}

/// Errors aborting a WebAuthn ceremony.
///
/// Every variant maps to the same user-facing message; the variants exist so
/// logs can tell a rejected verification from a dismissed prompt.
#[derive(Debug, Error)]
pub enum CeremonyError {
    /// The backend's encoded options could not be transcoded
    #[error("Invalid challenge encoding: {0}")]
    Encoding(#[from] UtilError),

    /// An options or verification call failed
    #[error("Ceremony rejected: {0}")]
    Api(#[from] ApiError),

    /// The platform credential manager failed or was dismissed
    #[error("Authenticator error: {0}")]
    Authenticator(#[from] AuthenticatorError),
}

impl CeremonyError {
    /// The single message surfaced to the user for any aborted ceremony.
    pub fn user_message(&self) -> &'static str {
        "Authentication failed"
    }
}
