//! encdec-client - Client-side flow library for the encrypt/decrypt web application
//!
//! This crate drives the application's authentication and enrollment flows
//! against the backend HTTP API: password + OTP login, user registration with
//! passkey creation and TOTP QR enrollment, forgot-password and
//! lost-authenticator recovery, session guarding, and the authenticated
//! workspace operations (text and file encryption/decryption).
//!
//! All state lives in plain Rust values; rendering is the caller's concern.

mod api;
mod config;
mod flow;
mod otp;
mod session;
mod utils;
mod validation;
mod webauthn;
mod workspace;

pub use api::{ApiClient, ApiError};

pub use flow::{
    AuthFlow, ErrorBoard, FlowError, LostAuthDraft, Panel, ResetDraft, Route, SERVER_ERROR_FIELD,
};

pub use otp::{OtpPhase, OtpSession};

pub use session::{
    AUTHENTICATED_KEY, ClientStore, EMAIL_KEY, GuardDecision, GuardState, MemoryStore,
    SessionGuard, logout,
};

pub use validation::{
    FieldErrors, LoginDraft, PasswordPolicy, RegistrationDraft, validate_email_only,
    validate_login, validate_new_password, validate_otp_code, validate_registration,
};

pub use webauthn::{
    AssertionCredential, AuthenticatorError, CeremonyError, CreatedCredential, CreationOptions,
    PlatformAuthenticator, RequestOptions, authenticate_ceremony, register_ceremony,
};

#[cfg(any(test, feature = "testing"))]
pub use webauthn::testing::FakeAuthenticator;

pub use workspace::{FileResult, Workspace, WorkspaceError};

pub use config::OTP_WINDOW_SECS;

pub use utils::{UtilError, base64url_decode, base64url_encode};
