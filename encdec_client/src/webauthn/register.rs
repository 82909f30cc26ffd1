use crate::api::ApiClient;
use crate::utils::{base64url_decode, base64url_encode};

use super::PlatformAuthenticator;
use super::errors::CeremonyError;
use super::types::{
    AttestationCredentialPayload, AttestationResponsePayload, AttestationVerifyRequest,
    CreationOptions,
};

/// Runs the registration ceremony for `email`.
///
/// 1. Fetch creation options (encoded challenge + user handle)
/// 2. Decode them and request credential creation from the platform
/// 3. Re-encode the attestation object and client data to text
/// 4. POST for verification with the original challenge echoed back
///
/// Any step failing aborts the ceremony; an already-created backend user
/// record is left as-is for the caller to surface.
pub async fn register_ceremony<A: PlatformAuthenticator + ?Sized>(
    api: &ApiClient,
    authenticator: &A,
    email: &str,
) -> Result<(), CeremonyError> {
    let options = api.webauthn_register_options(email).await?;
    tracing::debug!("Received registration options for {}", email);

    let creation = CreationOptions {
        challenge: base64url_decode(&options.challenge)?,
        user_handle: base64url_decode(&options.user_id)?,
        user_name: options.user_name.clone(),
        rp_id: options.rp_id.clone(),
        timeout: options.timeout,
    };

    let credential = authenticator.create(creation).await?;

    let encoded_id = base64url_encode(&credential.raw_id);
    let request = AttestationVerifyRequest {
        credential: AttestationCredentialPayload {
            id: encoded_id.clone(),
            raw_id: encoded_id,
            type_: "public-key".to_string(),
            response: AttestationResponsePayload {
                attestation_object: base64url_encode(&credential.attestation_object),
                client_data_json: base64url_encode(&credential.client_data_json),
            },
        },
        email: email.to_string(),
        challenge: options.challenge,
    };

    api.webauthn_register_verify(&request).await?;
    tracing::debug!("Registration ceremony verified for {}", email);

    Ok(())
}
