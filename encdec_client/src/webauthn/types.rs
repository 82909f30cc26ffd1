use serde::{Deserialize, Serialize};

/// Creation options as issued by `/webauthn/register/options`: challenge and
/// user handle travel as base64url text.
#[derive(Deserialize, Debug, Clone)]
pub(crate) struct RegistrationChallenge {
    pub(crate) challenge: String,
    pub(crate) user_id: String,
    pub(crate) user_name: String,
    pub(crate) rp_id: Option<String>,
    pub(crate) timeout: Option<u32>,
}

/// Assertion options as issued by `/webauthn/authenticate/options`: the
/// challenge plus the single allowed credential id, both base64url text.
#[derive(Deserialize, Debug, Clone)]
pub(crate) struct AuthenticationChallenge {
    pub(crate) challenge: String,
    pub(crate) credential_id: String,
    pub(crate) rp_id: Option<String>,
    pub(crate) timeout: Option<u32>,
}

/// Binary creation options handed to the platform credential manager.
#[derive(Debug, Clone)]
pub struct CreationOptions {
    pub challenge: Vec<u8>,
    pub user_handle: Vec<u8>,
    pub user_name: String,
    pub rp_id: Option<String>,
    pub timeout: Option<u32>,
}

/// Binary request options handed to the platform credential manager.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub challenge: Vec<u8>,
    pub allowed_credential_id: Vec<u8>,
    pub rp_id: Option<String>,
    pub timeout: Option<u32>,
}

/// A newly created credential: attestation object and client data as the
/// authenticator produced them.
#[derive(Debug, Clone)]
pub struct CreatedCredential {
    pub raw_id: Vec<u8>,
    pub attestation_object: Vec<u8>,
    pub client_data_json: Vec<u8>,
}

/// A signed assertion proving possession of a registered credential.
#[derive(Debug, Clone)]
pub struct AssertionCredential {
    pub raw_id: Vec<u8>,
    pub authenticator_data: Vec<u8>,
    pub client_data_json: Vec<u8>,
    pub signature: Vec<u8>,
    pub user_handle: Option<Vec<u8>>,
}

#[derive(Serialize, Debug)]
pub(crate) struct AttestationVerifyRequest {
    pub(crate) credential: AttestationCredentialPayload,
    pub(crate) email: String,
    /// The original encoded challenge, echoed back for server-side matching.
    pub(crate) challenge: String,
}

#[derive(Serialize, Debug)]
pub(crate) struct AttestationCredentialPayload {
    pub(crate) id: String,
    pub(crate) raw_id: String,
    #[serde(rename = "type")]
    pub(crate) type_: String,
    pub(crate) response: AttestationResponsePayload,
}

#[derive(Serialize, Debug)]
pub(crate) struct AttestationResponsePayload {
    pub(crate) attestation_object: String,
    pub(crate) client_data_json: String,
}

#[derive(Serialize, Debug)]
pub(crate) struct AssertionVerifyRequest {
    pub(crate) credential: AssertionCredentialPayload,
    pub(crate) email: String,
    pub(crate) challenge: String,
}

#[derive(Serialize, Debug)]
pub(crate) struct AssertionCredentialPayload {
    pub(crate) id: String,
    pub(crate) raw_id: String,
    #[serde(rename = "type")]
    pub(crate) type_: String,
    pub(crate) response: AssertionResponsePayload,
}

#[derive(Serialize, Debug)]
pub(crate) struct AssertionResponsePayload {
    pub(crate) authenticator_data: String,
    pub(crate) client_data_json: String,
    pub(crate) signature: String,
    pub(crate) user_handle: Option<String>,
}
