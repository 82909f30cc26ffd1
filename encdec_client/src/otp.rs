//! OTP lifecycle: request, countdown, verification, expiry.
//!
//! `OtpSession` is a cloneable handle around shared state so the 1 Hz
//! countdown task and the flow controller observe the same session. The
//! countdown must be cancelled whenever the owning panel is exited; `reset`
//! and `cancel_countdown` guarantee no orphaned timer keeps mutating state.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::AbortHandle;

use crate::config::OTP_WINDOW_SECS;

/// Where a flow stands in its OTP exchange. Drives the multi-phase submits
/// of the forgot-password and lost-authenticator flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpPhase {
    /// No OTP requested yet (or the previous one expired)
    Idle,
    /// An OTP was sent and the countdown is running
    AwaitingCode,
    /// The code was verified within its window
    Verified,
}

#[derive(Debug, Default)]
struct OtpInner {
    reference_key: Option<String>,
    remaining: u32,
    sent: bool,
    verified: bool,
    expired: bool,
    countdown: Option<AbortHandle>,
}

#[derive(Debug, Clone, Default)]
pub struct OtpSession {
    inner: Arc<Mutex<OtpInner>>,
}

impl OtpSession {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, OtpInner> {
        self.inner.lock().unwrap()
    }

    /// Records a freshly issued OTP: stores the server's reference key and
    /// resets the countdown window.
    pub fn mark_sent(&self, reference_key: String) {
        let mut inner = self.lock();
        inner.reference_key = Some(reference_key);
        inner.remaining = *OTP_WINDOW_SECS;
        inner.sent = true;
        inner.verified = false;
        inner.expired = false;
    }

    /// Advances the countdown by one second. Returns true when this tick
    /// expired the session: `sent` drops back to false and a fresh request
    /// is required.
    pub fn tick(&self) -> bool {
        let mut inner = self.lock();
        if !inner.sent || inner.verified {
            return false;
        }
        if inner.remaining > 0 {
            inner.remaining -= 1;
        }
        if inner.remaining == 0 {
            inner.sent = false;
            inner.expired = true;
            inner.reference_key = None;
            tracing::debug!("OTP window elapsed without verification");
            return true;
        }
        false
    }

    /// Marks the code verified and stops the countdown. A session that was
    /// never sent cannot become verified.
    pub fn mark_verified(&self) {
        let mut inner = self.lock();
        if !inner.sent {
            return;
        }
        inner.verified = true;
        if let Some(handle) = inner.countdown.take() {
            handle.abort();
        }
    }

    /// Spawns the 1 Hz countdown task, replacing any previous one.
    /// `on_expire` runs once if the window elapses without verification.
    pub fn start_countdown(&self, on_expire: impl FnOnce() + Send + 'static) {
        let session = self.clone();
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            // The first interval tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                if session.tick() {
                    on_expire();
                    break;
                }
                if session.phase() != OtpPhase::AwaitingCode {
                    break;
                }
            }
        });
        let mut inner = self.lock();
        if let Some(previous) = inner.countdown.take() {
            previous.abort();
        }
        inner.countdown = Some(task.abort_handle());
    }

    /// Aborts the countdown task without touching the session flags.
    pub fn cancel_countdown(&self) {
        if let Some(handle) = self.lock().countdown.take() {
            handle.abort();
        }
    }

    /// Cancels the countdown and discards every trace of the session,
    /// reference key included. Called on panel exit.
    pub fn reset(&self) {
        let mut inner = self.lock();
        if let Some(handle) = inner.countdown.take() {
            handle.abort();
        }
        *inner = OtpInner::default();
    }

    pub fn phase(&self) -> OtpPhase {
        let inner = self.lock();
        if inner.verified {
            OtpPhase::Verified
        } else if inner.sent {
            OtpPhase::AwaitingCode
        } else {
            OtpPhase::Idle
        }
    }

    pub fn reference_key(&self) -> Option<String> {
        self.lock().reference_key.clone()
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.lock().remaining
    }

    pub fn sent(&self) -> bool {
        self.lock().sent
    }

    pub fn verified(&self) -> bool {
        self.lock().verified
    }

    pub fn expired(&self) -> bool {
        self.lock().expired
    }
}
