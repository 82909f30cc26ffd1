//! Scriptable authenticator double for tests and demos.

use async_trait::async_trait;

use crate::utils::base64url_encode;

use super::errors::AuthenticatorError;
use super::types::{AssertionCredential, CreatedCredential, CreationOptions, RequestOptions};
use super::PlatformAuthenticator;

/// A platform-authenticator stand-in.
///
/// The approving variant produces structurally plausible credentials: the
/// client data JSON embeds the base64url challenge the way a browser would,
/// so ceremony code that round-trips it stays honest. The dismissing variant
/// models the user closing the platform prompt.
#[derive(Debug, Clone)]
pub struct FakeAuthenticator {
    dismiss: bool,
}

impl FakeAuthenticator {
    /// An authenticator that completes every prompt.
    pub fn approving() -> Self {
        Self { dismiss: false }
    }

    /// An authenticator whose prompts the user always dismisses.
    pub fn dismissing() -> Self {
        Self { dismiss: true }
    }

    fn client_data(type_: &str, challenge: &[u8]) -> Vec<u8> {
        serde_json::json!({
            "type": type_,
            "challenge": base64url_encode(challenge),
            "origin": "http://localhost:3000",
        })
        .to_string()
        .into_bytes()
    }
}

#[async_trait]
impl PlatformAuthenticator for FakeAuthenticator {
    async fn create(
        &self,
        options: CreationOptions,
    ) -> Result<CreatedCredential, AuthenticatorError> {
        if self.dismiss {
            return Err(AuthenticatorError::Cancelled);
        }
        Ok(CreatedCredential {
            raw_id: b"fake-credential-id".to_vec(),
            attestation_object: b"fake-attestation-object".to_vec(),
            client_data_json: Self::client_data("webauthn.create", &options.challenge),
        })
    }

    async fn get(
        &self,
        options: RequestOptions,
    ) -> Result<AssertionCredential, AuthenticatorError> {
        if self.dismiss {
            return Err(AuthenticatorError::Cancelled);
        }
        Ok(AssertionCredential {
            raw_id: options.allowed_credential_id.clone(),
            authenticator_data: b"fake-authenticator-data".to_vec(),
            client_data_json: Self::client_data("webauthn.get", &options.challenge),
            signature: b"fake-signature".to_vec(),
            user_handle: None,
        })
    }
}
