use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug)]
pub(crate) struct LoginRequest<'a> {
    pub(crate) email: &'a str,
    pub(crate) password: &'a str,
    pub(crate) otp: &'a str,
}

#[derive(Serialize, Debug)]
pub(crate) struct AddUserRequest<'a> {
    pub(crate) first_name: &'a str,
    pub(crate) last_name: &'a str,
    pub(crate) email: &'a str,
    pub(crate) password: &'a str,
}

#[derive(Serialize, Debug)]
pub(crate) struct EmailRequest<'a> {
    pub(crate) email: &'a str,
}

#[derive(Serialize, Debug)]
pub(crate) struct VerifyOtpRequest<'a> {
    pub(crate) email: &'a str,
    pub(crate) otp: &'a str,
    pub(crate) reference_key: &'a str,
}

#[derive(Serialize, Debug)]
pub(crate) struct UpdatePasswordRequest<'a> {
    pub(crate) email: &'a str,
    pub(crate) new_password: &'a str,
}

#[derive(Serialize, Debug)]
pub(crate) struct EncryptTextRequest<'a> {
    pub(crate) email: &'a str,
    pub(crate) text: &'a str,
}

#[derive(Serialize, Debug)]
pub(crate) struct DecryptTextRequest<'a> {
    pub(crate) encrypted_text: &'a str,
}

/// Reference key correlating an OTP request with its later verification.
#[derive(Deserialize, Debug)]
pub(crate) struct OtpIssued {
    pub(crate) reference_key: String,
}

/// A TOTP enrollment secret delivered as a scannable URL.
#[derive(Deserialize, Debug)]
pub(crate) struct QrIssued {
    pub(crate) qr_url: String,
}

#[derive(Deserialize, Debug)]
pub(crate) struct SessionStatus {
    pub(crate) authenticated: bool,
}

#[derive(Deserialize, Debug)]
pub(crate) struct CurrentUser {
    pub(crate) email: String,
}

#[derive(Deserialize, Debug)]
pub(crate) struct EncryptedText {
    pub(crate) encrypted_text: String,
}

#[derive(Deserialize, Debug)]
pub(crate) struct DecryptedText {
    pub(crate) decrypted_text: String,
}

#[derive(Deserialize, Debug)]
pub(crate) struct FullName {
    pub(crate) full_name: String,
}
