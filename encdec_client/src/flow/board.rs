use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::AbortHandle;

use crate::config::FIELD_ERROR_CLEAR_SECS;
use crate::validation::FieldErrors;

/// Field name under which server rejection messages are surfaced.
pub const SERVER_ERROR_FIELD: &str = "server";

#[derive(Debug, Default)]
struct BoardInner {
    errors: FieldErrors,
    auto_clear: Option<AbortHandle>,
}

/// Per-flow error display state.
///
/// Holds field-scoped validation messages and the single `server` message.
/// Entries are cleared when the user edits the field, when the panel
/// switches, and by an auto-clear task a fixed delay after being set. Each
/// set replaces the previous auto-clear task so the timer restarts; teardown
/// aborts it so no timer mutates a disposed board.
#[derive(Debug, Clone, Default)]
pub struct ErrorBoard {
    inner: Arc<Mutex<BoardInner>>,
}

impl ErrorBoard {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BoardInner> {
        self.inner.lock().unwrap()
    }

    /// Replaces the board contents with a validation result.
    pub fn set_all(&self, errors: FieldErrors) {
        {
            let mut inner = self.lock();
            inner.errors = errors;
        }
        self.arm_auto_clear();
    }

    pub fn set(&self, field: &str, message: &str) {
        self.lock()
            .errors
            .insert(field.to_string(), message.to_string());
        self.arm_auto_clear();
    }

    /// Records a server rejection under the `server` field.
    pub fn set_server(&self, message: &str) {
        self.set(SERVER_ERROR_FIELD, message);
    }

    /// Clears one field's message (the user edited that field).
    pub fn clear_field(&self, field: &str) {
        self.lock().errors.remove(field);
    }

    /// Clears everything and cancels the pending auto-clear task.
    pub fn clear_all(&self) {
        let mut inner = self.lock();
        inner.errors.clear();
        if let Some(handle) = inner.auto_clear.take() {
            handle.abort();
        }
    }

    pub fn get(&self, field: &str) -> Option<String> {
        self.lock().errors.get(field).cloned()
    }

    pub fn server(&self) -> Option<String> {
        self.get(SERVER_ERROR_FIELD)
    }

    pub fn is_empty(&self) -> bool {
        self.lock().errors.is_empty()
    }

    pub fn snapshot(&self) -> FieldErrors {
        self.lock().errors.clone()
    }

    fn arm_auto_clear(&self) {
        let delay = *FIELD_ERROR_CLEAR_SECS;
        if delay == 0 {
            return;
        }
        // Outside a runtime (pure validation tests) there is no timer to arm.
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let board = self.clone();
        let task = handle.spawn(async move {
            tokio::time::sleep(Duration::from_secs(u64::from(delay))).await;
            board.lock().errors.clear();
        });
        let mut inner = self.lock();
        if let Some(previous) = inner.auto_clear.take() {
            previous.abort();
        }
        inner.auto_clear = Some(task.abort_handle());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test set, field clear, and full clear
    #[test]
    fn test_board_set_and_clear() {
        let board = ErrorBoard::new();
        board.set("email", "Email is required");
        board.set_server("Login failed");
        assert_eq!(board.get("email").unwrap(), "Email is required");
        assert_eq!(board.server().unwrap(), "Login failed");

        board.clear_field("email");
        assert!(board.get("email").is_none());
        assert!(board.server().is_some());

        board.clear_all();
        assert!(board.is_empty());
    }

    /// Test that the auto-clear task empties the board after the delay
    #[tokio::test(start_paused = true)]
    async fn test_board_auto_clear() {
        let board = ErrorBoard::new();
        board.set("email", "Email is invalid");
        assert!(!board.is_empty());

        tokio::time::advance(Duration::from_secs(u64::from(*FIELD_ERROR_CLEAR_SECS) + 1)).await;
        tokio::task::yield_now().await;

        assert!(board.is_empty());
    }

    /// Test that clear_all cancels a pending auto-clear
    #[tokio::test(start_paused = true)]
    async fn test_board_clear_cancels_auto_clear() {
        let board = ErrorBoard::new();
        board.set("email", "Email is invalid");
        board.clear_all();
        board.lock().errors.insert("otp".to_string(), "kept".to_string());

        tokio::time::advance(Duration::from_secs(u64::from(*FIELD_ERROR_CLEAR_SECS) + 1)).await;
        tokio::task::yield_now().await;

        // The aborted task never wiped the later entry.
        assert_eq!(board.get("otp").unwrap(), "kept");
    }
}
