use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::{ENCDEC_API_BASE, HTTP_TIMEOUT_SECS};
use crate::webauthn::types::{
    AssertionVerifyRequest, AttestationVerifyRequest, AuthenticationChallenge,
    RegistrationChallenge,
};

use super::errors::{ApiError, detail_message};
use super::types::{
    AddUserRequest, CurrentUser, DecryptTextRequest, DecryptedText, EmailRequest,
    EncryptTextRequest, EncryptedText, FullName, LoginRequest, OtpIssued, QrIssued, SessionStatus,
    UpdatePasswordRequest, VerifyOtpRequest,
};

/// HTTP client for the encrypt/decrypt backend.
///
/// One method per backend endpoint. The underlying reqwest client keeps a
/// cookie store so the server session set by `/login` rides along on every
/// subsequent call.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let parsed = url::Url::parse(base_url)
            .map_err(|_| ApiError::BaseUrl(base_url.to_string()))?;
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(*HTTP_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// Builds a client for the base URL configured via `ENCDEC_API_BASE`.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::new(&ENCDEC_API_BASE)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<T, ApiError> {
        let response = self.http.post(self.endpoint(path)).json(body).send().await?;
        Self::decode(response, path, fallback).await
    }

    async fn post_no_content<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<(), ApiError> {
        let response = self.http.post(self.endpoint(path)).json(body).send().await?;
        Self::check_status(response, path, fallback).await?;
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        fallback: &str,
    ) -> Result<T, ApiError> {
        let response = self.http.get(self.endpoint(path)).send().await?;
        Self::decode(response, path, fallback).await
    }

    async fn check_status(
        response: reqwest::Response,
        path: &str,
        fallback: &str,
    ) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body: serde_json::Value = response.json().await.unwrap_or(serde_json::Value::Null);
        let message = detail_message(&body).unwrap_or_else(|| fallback.to_string());
        tracing::debug!("{} rejected with status {}: {}", path, status, message);
        Err(ApiError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
        path: &str,
        fallback: &str,
    ) -> Result<T, ApiError> {
        let response = Self::check_status(response, path, fallback).await?;
        Ok(response.json().await?)
    }

    // --- authentication ---

    pub async fn login(&self, email: &str, password: &str, otp: &str) -> Result<(), ApiError> {
        let body = LoginRequest {
            email,
            password,
            otp,
        };
        self.post_no_content("/login", &body, "Login failed").await
    }

    pub async fn add_user(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
    ) -> Result<(), ApiError> {
        let body = AddUserRequest {
            first_name,
            last_name,
            email,
            password,
        };
        self.post_no_content("/add_user", &body, "Registration failed")
            .await
    }

    /// Requests a TOTP enrollment QR for the given account.
    pub async fn generate_qr(&self, email: &str) -> Result<String, ApiError> {
        let issued: QrIssued = self
            .post_json("/generate_qr", &EmailRequest { email }, "Failed to generate QR")
            .await?;
        Ok(issued.qr_url)
    }

    /// Requests an OTP and returns the server's reference key for it.
    pub async fn generate_otp(&self, email: &str) -> Result<String, ApiError> {
        let issued: OtpIssued = self
            .post_json("/generate_otp", &EmailRequest { email }, "Failed to send OTP")
            .await?;
        Ok(issued.reference_key)
    }

    pub async fn verify_otp_fp(
        &self,
        email: &str,
        otp: &str,
        reference_key: &str,
    ) -> Result<(), ApiError> {
        let body = VerifyOtpRequest {
            email,
            otp,
            reference_key,
        };
        self.post_no_content("/verify_otp_fp", &body, "OTP verification failed")
            .await
    }

    /// Verifies a recovery OTP and returns the replacement enrollment QR.
    pub async fn verify_otp_qr(
        &self,
        email: &str,
        otp: &str,
        reference_key: &str,
    ) -> Result<String, ApiError> {
        let body = VerifyOtpRequest {
            email,
            otp,
            reference_key,
        };
        let issued: QrIssued = self
            .post_json("/verify_otp_qr", &body, "OTP verification failed")
            .await?;
        Ok(issued.qr_url)
    }

    pub async fn update_password(&self, email: &str, new_password: &str) -> Result<(), ApiError> {
        let body = UpdatePasswordRequest {
            email,
            new_password,
        };
        self.post_no_content("/update_password", &body, "Failed to update password")
            .await
    }

    // --- webauthn ceremonies ---

    pub(crate) async fn webauthn_register_options(
        &self,
        email: &str,
    ) -> Result<RegistrationChallenge, ApiError> {
        self.post_json(
            "/webauthn/register/options",
            &EmailRequest { email },
            "Authentication failed",
        )
        .await
    }

    pub(crate) async fn webauthn_register_verify(
        &self,
        body: &AttestationVerifyRequest,
    ) -> Result<(), ApiError> {
        self.post_no_content("/webauthn/register/verify", body, "Authentication failed")
            .await
    }

    pub(crate) async fn webauthn_authenticate_options(
        &self,
        email: &str,
    ) -> Result<AuthenticationChallenge, ApiError> {
        self.post_json(
            "/webauthn/authenticate/options",
            &EmailRequest { email },
            "Authentication failed",
        )
        .await
    }

    pub(crate) async fn webauthn_authenticate_verify(
        &self,
        body: &AssertionVerifyRequest,
    ) -> Result<(), ApiError> {
        self.post_no_content("/webauthn/authenticate/verify", body, "Authentication failed")
            .await
    }

    // --- session ---

    pub async fn validate_session(&self) -> Result<bool, ApiError> {
        let status: SessionStatus = self
            .get_json("/validate_session", "Session validation failed")
            .await?;
        Ok(status.authenticated)
    }

    pub async fn current_user(&self) -> Result<String, ApiError> {
        let user: CurrentUser = self.get_json("/current_user", "Not signed in").await?;
        Ok(user.email)
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.post_no_content("/logout", &serde_json::json!({}), "Logout failed")
            .await
    }

    // --- workspace ---

    pub async fn encrypt_text(&self, email: &str, text: &str) -> Result<String, ApiError> {
        let body = EncryptTextRequest { email, text };
        let encrypted: EncryptedText = self
            .post_json("/encrypt_text", &body, "Text encryption failed.")
            .await?;
        Ok(encrypted.encrypted_text)
    }

    pub async fn decrypt_text(&self, encrypted_text: &str) -> Result<String, ApiError> {
        let body = DecryptTextRequest { encrypted_text };
        let decrypted: DecryptedText = self
            .post_json("/decrypt_text", &body, "Text decryption failed.")
            .await?;
        Ok(decrypted.decrypted_text)
    }

    pub async fn encrypt_file(
        &self,
        email: &str,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<Vec<u8>, ApiError> {
        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(contents).file_name(file_name.to_string()),
            )
            .text("email", email.to_string());
        let response = self
            .http
            .post(self.endpoint("/encrypt"))
            .multipart(form)
            .send()
            .await?;
        let response = Self::check_status(response, "/encrypt", "File encryption failed.").await?;
        Ok(response.bytes().await?.to_vec())
    }

    pub async fn decrypt_file(&self, file_name: &str, contents: Vec<u8>) -> Result<Vec<u8>, ApiError> {
        let form = reqwest::multipart::Form::new().part(
            "file",
            reqwest::multipart::Part::bytes(contents).file_name(file_name.to_string()),
        );
        let response = self
            .http
            .post(self.endpoint("/decrypt"))
            .multipart(form)
            .send()
            .await?;
        let response = Self::check_status(response, "/decrypt", "File decryption failed.").await?;
        Ok(response.bytes().await?.to_vec())
    }

    pub async fn get_user_full_name(&self, email: &str) -> Result<String, ApiError> {
        let name: FullName = self
            .post_json(
                "/get_user_full_name",
                &EmailRequest { email },
                "Failed to fetch user name",
            )
            .await?;
        Ok(name.full_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test that a successful OTP request returns the reference key
    #[tokio::test]
    async fn test_generate_otp_returns_reference_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/generate_otp")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"reference_key": "abc123"}"#)
            .create_async()
            .await;

        let api = ApiClient::new(&server.url()).unwrap();
        let key = api.generate_otp("x@y.z").await.unwrap();
        assert_eq!(key, "abc123");
        mock.assert_async().await;
    }

    /// Test that a rejection with a string detail surfaces that message
    #[tokio::test]
    async fn test_login_rejection_surfaces_detail() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/login")
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"detail": "Invalid credentials"}"#)
            .create_async()
            .await;

        let api = ApiClient::new(&server.url()).unwrap();
        let err = api.login("x@y.z", "pw", "123456").await.unwrap_err();
        match err {
            ApiError::Rejected { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid credentials");
            }
            other => panic!("Expected Rejected, got {other:?}"),
        }
    }

    /// Test that array-shaped validation details are joined into one message
    #[tokio::test]
    async fn test_rejection_joins_array_detail() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/add_user")
            .with_status(422)
            .with_header("content-type", "application/json")
            .with_body(r#"{"detail": [{"msg": "field required"}, {"msg": "invalid email"}]}"#)
            .create_async()
            .await;

        let api = ApiClient::new(&server.url()).unwrap();
        let err = api.add_user("A", "B", "x@y.z", "pw").await.unwrap_err();
        assert_eq!(err.message(), "field required, invalid email");
    }

    /// Test that a bodyless rejection falls back to the operation default
    #[tokio::test]
    async fn test_rejection_without_body_uses_fallback() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/update_password")
            .with_status(500)
            .create_async()
            .await;

        let api = ApiClient::new(&server.url()).unwrap();
        let err = api.update_password("x@y.z", "NewPass1!").await.unwrap_err();
        assert_eq!(err.message(), "Failed to update password");
    }

    /// Test session validation decoding
    #[tokio::test]
    async fn test_validate_session() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/validate_session")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"authenticated": true}"#)
            .create_async()
            .await;

        let api = ApiClient::new(&server.url()).unwrap();
        assert!(api.validate_session().await.unwrap());
    }

    /// Test that an unparseable base URL is rejected up front
    #[test]
    fn test_invalid_base_url() {
        let result = ApiClient::new("not a url");
        assert!(matches!(result, Err(ApiError::BaseUrl(_))));
    }
}
