//! Client-side session state and the guard for the protected workspace.
//!
//! The backend owns the real session (a cookie carried by `ApiClient`); what
//! lives here is the explicit client-side store for the authenticated flag
//! and email, plus the guard that confirms the server session before any
//! protected content is shown.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::api::ApiClient;

/// Store key for the "true"/"false" authenticated flag.
pub const AUTHENTICATED_KEY: &str = "authenticated";
/// Store key for the signed-in user's email.
pub const EMAIL_KEY: &str = "email";

/// Single-writer key-value store for client-persisted state.
///
/// Login writes, logout clears; everything else only reads.
pub trait ClientStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory `ClientStore`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClientStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values.lock().unwrap().remove(key);
    }
}

/// Outcome of a session check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// The server confirmed the session; the workspace may render.
    Granted { email: String },
    /// No valid session; send the user back to the entry panel.
    Redirect,
}

/// Current guard state, `Pending` while the check is in flight (the caller's
/// loading indicator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState {
    Pending,
    Decided(GuardDecision),
}

/// Gate in front of the protected workspace.
///
/// Runs on every workspace entry rather than once: a stale client-side flag
/// after logout never exposes cached protected content.
#[derive(Debug)]
pub struct SessionGuard {
    state: GuardState,
}

impl SessionGuard {
    pub fn new() -> Self {
        Self {
            state: GuardState::Pending,
        }
    }

    pub fn state(&self) -> &GuardState {
        &self.state
    }

    /// Validates the server-side session and resolves the guard. Any failure
    /// or error resolves to `Redirect`.
    pub async fn resolve(&mut self, api: &ApiClient) -> &GuardDecision {
        let decision = Self::check(api).await;
        self.state = GuardState::Decided(decision);
        match &self.state {
            GuardState::Decided(decision) => decision,
            GuardState::Pending => unreachable!("guard state was just decided"),
        }
    }

    /// One-shot session check without guard state.
    pub async fn check(api: &ApiClient) -> GuardDecision {
        match api.validate_session().await {
            Ok(true) => match api.current_user().await {
                Ok(email) => GuardDecision::Granted { email },
                Err(err) => {
                    tracing::debug!("current_user failed after valid session: {}", err);
                    GuardDecision::Redirect
                }
            },
            Ok(false) => GuardDecision::Redirect,
            Err(err) => {
                tracing::warn!("Session validation error: {}", err);
                GuardDecision::Redirect
            }
        }
    }
}

impl Default for SessionGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// Ends the session: tells the backend, then flips the client-side flag.
/// The flag is cleared even when the backend call fails.
pub async fn logout<S: ClientStore + ?Sized>(
    api: &ApiClient,
    store: &S,
) -> Result<(), crate::api::ApiError> {
    let result = api.logout().await;
    store.set(AUTHENTICATED_KEY, "false");
    if let Err(err) = &result {
        tracing::warn!("Logout request failed: {}", err);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test basic store semantics
    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.get(AUTHENTICATED_KEY).is_none());
        store.set(AUTHENTICATED_KEY, "true");
        store.set(EMAIL_KEY, "x@y.z");
        assert_eq!(store.get(AUTHENTICATED_KEY).unwrap(), "true");
        assert_eq!(store.get(EMAIL_KEY).unwrap(), "x@y.z");
        store.remove(EMAIL_KEY);
        assert!(store.get(EMAIL_KEY).is_none());
    }

    /// Test that a confirmed session grants access with the user's email
    #[tokio::test]
    async fn test_guard_grants_valid_session() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/validate_session")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"authenticated": true}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/current_user")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"email": "x@y.z"}"#)
            .create_async()
            .await;

        let api = ApiClient::new(&server.url()).unwrap();
        let mut guard = SessionGuard::new();
        assert_eq!(guard.state(), &GuardState::Pending);
        let decision = guard.resolve(&api).await;
        assert_eq!(
            decision,
            &GuardDecision::Granted {
                email: "x@y.z".to_string()
            }
        );
    }

    /// Test that an unauthenticated session redirects
    #[tokio::test]
    async fn test_guard_redirects_invalid_session() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/validate_session")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"authenticated": false}"#)
            .create_async()
            .await;

        let api = ApiClient::new(&server.url()).unwrap();
        assert_eq!(SessionGuard::check(&api).await, GuardDecision::Redirect);
    }

    /// Test that a server error also redirects rather than rendering
    #[tokio::test]
    async fn test_guard_redirects_on_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/validate_session")
            .with_status(500)
            .create_async()
            .await;

        let api = ApiClient::new(&server.url()).unwrap();
        assert_eq!(SessionGuard::check(&api).await, GuardDecision::Redirect);
    }

    /// Test that logout clears the client flag even when the call fails
    #[tokio::test]
    async fn test_logout_clears_flag_on_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/logout")
            .with_status(500)
            .create_async()
            .await;

        let api = ApiClient::new(&server.url()).unwrap();
        let store = MemoryStore::new();
        store.set(AUTHENTICATED_KEY, "true");
        let result = logout(&api, &store).await;
        assert!(result.is_err());
        assert_eq!(store.get(AUTHENTICATED_KEY).unwrap(), "false");
    }
}
