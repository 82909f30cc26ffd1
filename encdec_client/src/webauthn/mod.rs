//! WebAuthn ceremony adapter.
//!
//! Both ceremonies are strict four-step exchanges with the backend: fetch
//! encoded options, decode them into the binary structures the platform
//! credential manager expects, hand the result back as encoded text, and POST
//! it for verification with the original challenge echoed for server-side
//! matching. Any failing step aborts the ceremony with a single error; prior
//! state is left untouched.

mod auth;
mod errors;
mod register;
pub(crate) mod types;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

use async_trait::async_trait;

pub use auth::authenticate_ceremony;
pub use errors::{AuthenticatorError, CeremonyError};
pub use register::register_ceremony;
pub use types::{AssertionCredential, CreatedCredential, CreationOptions, RequestOptions};

/// Capability interface over the platform credential manager.
///
/// Mirrors `navigator.credentials.{create,get}` so the ceremonies can be
/// exercised against a test double. User dismissal of the platform prompt
/// must surface as `AuthenticatorError::Cancelled`, never a hung future.
#[async_trait]
pub trait PlatformAuthenticator: Send + Sync {
    async fn create(
        &self,
        options: CreationOptions,
    ) -> Result<CreatedCredential, AuthenticatorError>;

    async fn get(&self, options: RequestOptions)
    -> Result<AssertionCredential, AuthenticatorError>;
}
