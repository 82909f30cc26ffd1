use crate::api::ApiClient;
use crate::utils::{base64url_decode, base64url_encode};

use super::PlatformAuthenticator;
use super::errors::CeremonyError;
use super::types::{
    AssertionCredentialPayload, AssertionResponsePayload, AssertionVerifyRequest, RequestOptions,
};

/// Runs the authentication ceremony for `email`.
///
/// Mirrors the registration ceremony with assertion fields instead of
/// attestation: the single allowed credential id and the challenge are
/// decoded before the platform prompt, and the resulting authenticator data,
/// client data, signature, and optional user handle are re-encoded for the
/// verification call.
pub async fn authenticate_ceremony<A: PlatformAuthenticator + ?Sized>(
    api: &ApiClient,
    authenticator: &A,
    email: &str,
) -> Result<(), CeremonyError> {
    let options = api.webauthn_authenticate_options(email).await?;
    tracing::debug!("Received authentication options for {}", email);

    let request_options = RequestOptions {
        challenge: base64url_decode(&options.challenge)?,
        allowed_credential_id: base64url_decode(&options.credential_id)?,
        rp_id: options.rp_id.clone(),
        timeout: options.timeout,
    };

    let assertion = authenticator.get(request_options).await?;

    let encoded_id = base64url_encode(&assertion.raw_id);
    let request = AssertionVerifyRequest {
        credential: AssertionCredentialPayload {
            id: encoded_id.clone(),
            raw_id: encoded_id,
            type_: "public-key".to_string(),
            response: AssertionResponsePayload {
                authenticator_data: base64url_encode(&assertion.authenticator_data),
                client_data_json: base64url_encode(&assertion.client_data_json),
                signature: base64url_encode(&assertion.signature),
                user_handle: assertion.user_handle.as_deref().map(base64url_encode),
            },
        },
        email: email.to_string(),
        challenge: options.challenge,
    };

    api.webauthn_authenticate_verify(&request).await?;
    tracing::debug!("Authentication ceremony verified for {}", email);

    Ok(())
}
