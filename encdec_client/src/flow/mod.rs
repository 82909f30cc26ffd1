//! Auth flow controller.
//!
//! Owns the panel state machine, all form drafts, the error board, and the
//! OTP session, and sequences backend calls and WebAuthn ceremonies for each
//! submit. Exactly one panel is active at a time; transitions are user- or
//! response-driven, never concurrent.

mod board;
mod errors;

pub use board::{ErrorBoard, SERVER_ERROR_FIELD};
pub use errors::FlowError;

use crate::api::ApiClient;
use crate::otp::{OtpPhase, OtpSession};
use crate::session::{AUTHENTICATED_KEY, ClientStore, EMAIL_KEY};
use crate::validation::{
    LoginDraft, PasswordPolicy, RegistrationDraft, validate_email_only, validate_login,
    validate_new_password, validate_otp_code, validate_registration,
};
use crate::webauthn::{PlatformAuthenticator, authenticate_ceremony, register_ceremony};

/// The five entry panels. Exactly one is visible at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Login,
    Register,
    Forgot,
    LostAuth,
    QrScan,
}

/// Where the application routes after the flow resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The entry panels (unauthenticated)
    Entry,
    /// The protected workspace
    Workspace,
}

/// Forgot-password form values across its three phases.
#[derive(Debug, Clone, Default)]
pub struct ResetDraft {
    pub email: String,
    pub otp: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Lost-authenticator form values across its two phases.
#[derive(Debug, Clone, Default)]
pub struct LostAuthDraft {
    pub email: String,
    pub otp: String,
}

/// Message raised by the countdown when an OTP window elapses.
const OTP_EXPIRED_MESSAGE: &str = "OTP expired, please request a new code";

/// The authentication and enrollment flow controller.
///
/// Side effects are confined to one network call per submit, local panel
/// state, and the client store writes on login. Dropping the controller
/// cancels its countdown and auto-clear timers.
pub struct AuthFlow<A: PlatformAuthenticator, S: ClientStore> {
    api: ApiClient,
    authenticator: A,
    store: S,
    policy: PasswordPolicy,
    panel: Panel,
    route: Route,
    errors: ErrorBoard,
    otp: OtpSession,
    qr_url: Option<String>,
    pub login_draft: LoginDraft,
    pub register_draft: RegistrationDraft,
    pub reset_draft: ResetDraft,
    pub lost_auth_draft: LostAuthDraft,
}

impl<A: PlatformAuthenticator, S: ClientStore> AuthFlow<A, S> {
    pub fn new(api: ApiClient, authenticator: A, store: S) -> Self {
        Self {
            api,
            authenticator,
            store,
            policy: PasswordPolicy::from_env(),
            panel: Panel::Login,
            route: Route::Entry,
            errors: ErrorBoard::new(),
            otp: OtpSession::new(),
            qr_url: None,
            login_draft: LoginDraft::default(),
            register_draft: RegistrationDraft::default(),
            reset_draft: ResetDraft::default(),
            lost_auth_draft: LostAuthDraft::default(),
        }
    }

    pub fn panel(&self) -> Panel {
        self.panel
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn errors(&self) -> &ErrorBoard {
        &self.errors
    }

    pub fn otp(&self) -> &OtpSession {
        &self.otp
    }

    pub fn qr_url(&self) -> Option<&str> {
        self.qr_url.as_deref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// The user edited a field: drop its stale error.
    pub fn edited(&self, field: &str) {
        self.errors.clear_field(field);
    }

    /// Pure panel transition: clears field errors, stops the countdown, and
    /// discards the OTP session and drafts of the panel being left.
    pub fn switch_panel(&mut self, panel: Panel) {
        self.errors.clear_all();
        self.otp.reset();
        self.login_draft = LoginDraft::default();
        self.register_draft = RegistrationDraft::default();
        self.reset_draft = ResetDraft::default();
        self.lost_auth_draft = LostAuthDraft::default();
        self.panel = panel;
        tracing::debug!("Switched to panel {:?}", panel);
    }

    pub fn go_to_forgot(&mut self) {
        self.switch_panel(Panel::Forgot);
    }

    pub fn go_to_lost_auth(&mut self) {
        self.switch_panel(Panel::LostAuth);
    }

    pub fn go_back_to_login(&mut self) {
        self.switch_panel(Panel::Login);
    }

    /// Login: password + OTP check, then the WebAuthn authentication
    /// ceremony, then the workspace.
    pub async fn submit_login(&mut self) -> Result<(), FlowError> {
        let validation = validate_login(&self.login_draft);
        if !validation.is_empty() {
            self.errors.set_all(validation);
            return Err(FlowError::Validation.log());
        }

        let email = self.login_draft.email.clone();
        if let Err(err) = self
            .api
            .login(&email, &self.login_draft.password, &self.login_draft.otp)
            .await
        {
            let message = err.message();
            self.errors.set_server(&message);
            return Err(FlowError::Server(message).log());
        }

        self.store.set(AUTHENTICATED_KEY, "true");
        self.store.set(EMAIL_KEY, &email);

        if let Err(err) = authenticate_ceremony(&self.api, &self.authenticator, &email).await {
            self.errors.set_server(err.user_message());
            return Err(FlowError::from(err).log());
        }

        self.login_draft = LoginDraft::default();
        self.errors.clear_all();
        self.route = Route::Workspace;
        tracing::debug!("Login complete for {}", email);
        Ok(())
    }

    /// Registration: create the user, prove passkey possession, then fetch
    /// the TOTP enrollment QR. The draft is cleared once the backend user
    /// exists and the ceremony verified, whatever the QR call does.
    pub async fn submit_register(&mut self) -> Result<(), FlowError> {
        let validation = validate_registration(&self.register_draft, &self.policy);
        if !validation.is_empty() {
            self.errors.set_all(validation);
            return Err(FlowError::Validation.log());
        }

        let email = self.register_draft.email.clone();
        if let Err(err) = self
            .api
            .add_user(
                &self.register_draft.first_name,
                &self.register_draft.last_name,
                &email,
                &self.register_draft.password,
            )
            .await
        {
            let message = err.message();
            self.errors.set_server(&message);
            return Err(FlowError::Server(message).log());
        }

        if let Err(err) = register_ceremony(&self.api, &self.authenticator, &email).await {
            self.errors.set_server(err.user_message());
            return Err(FlowError::from(err).log());
        }

        self.register_draft = RegistrationDraft::default();

        match self.api.generate_qr(&email).await {
            Ok(qr_url) => {
                self.qr_url = Some(qr_url);
                self.errors.clear_all();
                self.panel = Panel::QrScan;
                tracing::debug!("Registration complete for {}, showing QR", email);
                Ok(())
            }
            Err(err) => {
                let message = err.message();
                self.errors.set_server(&message);
                Err(FlowError::Server(message).log())
            }
        }
    }

    /// Forgot password, three submits on one button: request the OTP, verify
    /// it, then set the new password. The phase comes from the OTP session,
    /// not a separate step field.
    pub async fn submit_forgot_password(&mut self) -> Result<(), FlowError> {
        match self.otp.phase() {
            OtpPhase::Idle => {
                let email = self.reset_draft.email.clone();
                self.request_otp(&email).await
            }
            OtpPhase::AwaitingCode => {
                let validation = validate_otp_code(&self.reset_draft.otp);
                if !validation.is_empty() {
                    self.errors.set_all(validation);
                    return Err(FlowError::Validation.log());
                }
                let Some(reference_key) = self.otp.reference_key() else {
                    return Err(FlowError::InvalidState(
                        "OTP awaited without a reference key".to_string(),
                    )
                    .log());
                };
                match self
                    .api
                    .verify_otp_fp(&self.reset_draft.email, &self.reset_draft.otp, &reference_key)
                    .await
                {
                    Ok(()) => {
                        self.otp.mark_verified();
                        self.errors.clear_all();
                        Ok(())
                    }
                    Err(err) => {
                        // The window keeps running; the user may retry.
                        let message = err.message();
                        self.errors.set_server(&message);
                        Err(FlowError::Server(message).log())
                    }
                }
            }
            OtpPhase::Verified => {
                let validation = validate_new_password(
                    &self.reset_draft.new_password,
                    &self.reset_draft.confirm_password,
                    &self.policy,
                );
                if !validation.is_empty() {
                    self.errors.set_all(validation);
                    return Err(FlowError::Validation.log());
                }
                match self
                    .api
                    .update_password(&self.reset_draft.email, &self.reset_draft.new_password)
                    .await
                {
                    Ok(()) => {
                        tracing::debug!("Password updated for {}", self.reset_draft.email);
                        self.switch_panel(Panel::Login);
                        Ok(())
                    }
                    Err(err) => {
                        let message = err.message();
                        self.errors.set_server(&message);
                        Err(FlowError::Server(message).log())
                    }
                }
            }
        }
    }

    /// Lost authenticator, two submits: request the OTP, then verify it for
    /// a replacement enrollment QR.
    pub async fn submit_lost_authenticator(&mut self) -> Result<(), FlowError> {
        match self.otp.phase() {
            OtpPhase::Idle | OtpPhase::Verified => {
                let email = self.lost_auth_draft.email.clone();
                self.request_otp(&email).await
            }
            OtpPhase::AwaitingCode => {
                let validation = validate_otp_code(&self.lost_auth_draft.otp);
                if !validation.is_empty() {
                    self.errors.set_all(validation);
                    return Err(FlowError::Validation.log());
                }
                let Some(reference_key) = self.otp.reference_key() else {
                    return Err(FlowError::InvalidState(
                        "OTP awaited without a reference key".to_string(),
                    )
                    .log());
                };
                match self
                    .api
                    .verify_otp_qr(
                        &self.lost_auth_draft.email,
                        &self.lost_auth_draft.otp,
                        &reference_key,
                    )
                    .await
                {
                    Ok(qr_url) => {
                        self.qr_url = Some(qr_url);
                        self.otp.reset();
                        self.lost_auth_draft = LostAuthDraft::default();
                        self.errors.clear_all();
                        self.panel = Panel::QrScan;
                        Ok(())
                    }
                    Err(err) => {
                        let message = err.message();
                        self.errors.set_server(&message);
                        Err(FlowError::Server(message).log())
                    }
                }
            }
        }
    }

    /// Phase one of both recovery flows: validate the email, request an OTP,
    /// and arm the countdown.
    async fn request_otp(&mut self, email: &str) -> Result<(), FlowError> {
        let validation = validate_email_only(email);
        if !validation.is_empty() {
            self.errors.set_all(validation);
            return Err(FlowError::Validation.log());
        }
        match self.api.generate_otp(email).await {
            Ok(reference_key) => {
                self.otp.mark_sent(reference_key);
                let board = self.errors.clone();
                self.otp.start_countdown(move || {
                    board.set("otp", OTP_EXPIRED_MESSAGE);
                });
                self.errors.clear_all();
                tracing::debug!("OTP requested for {}", email);
                Ok(())
            }
            Err(err) => {
                let message = err.message();
                self.errors.set_server(&message);
                Err(FlowError::Server(message).log())
            }
        }
    }
}

impl<A: PlatformAuthenticator, S: ClientStore> Drop for AuthFlow<A, S> {
    fn drop(&mut self) {
        self.otp.reset();
        self.errors.clear_all();
    }
}
