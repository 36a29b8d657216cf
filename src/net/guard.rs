//! Session guard: the single path for credentialed requests.
//!
//! ARCHITECTURE
//! ============
//! Every session-aware call goes through [`SessionGuard::send`]. When the
//! server answers `401` with `X-Session-Expired: true`, the guard runs the
//! [`SessionExpiryHandler`] (clear identity, expire cookies, tell the user,
//! full navigation to login) and still hands the original response back.
//! Callers never need to catch expiry themselves; the handler is the
//! escape from normal control flow.
//!
//! TRADE-OFFS
//! ==========
//! Two requests that detect expiry concurrently both run the handler. Every
//! step of it is idempotent, so the user may see the notice twice but the
//! end state is the same single logged-out baseline.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::transport::{ApiRequest, ApiResponse, Transport};
use crate::error::ClientError;
use crate::identity::IdentityStore;
use crate::platform::{CookieJar, Navigator, Notifier, expire_session_cookies};

/// Response header carrying the session-expiry signal.
pub const SESSION_EXPIRED_HEADER: &str = "x-session-expired";

pub const DEFAULT_EXPIRY_MESSAGE: &str = "Your session has expired. Please log in again.";

/// `401` plus the expiry header with the literal value `true`.
#[must_use]
pub fn is_session_expired(response: &ApiResponse) -> bool {
    response.status == 401 && response.header(SESSION_EXPIRED_HEADER) == Some("true")
}

fn expiry_message(response: &ApiResponse) -> String {
    response.error_message(DEFAULT_EXPIRY_MESSAGE)
}

// =============================================================================
// EXPIRY HANDLER
// =============================================================================

/// Global "session lost" side effect.
pub struct SessionExpiryHandler {
    identity: Arc<IdentityStore>,
    cookies: Arc<dyn CookieJar>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    login_path: String,
    invocations: AtomicU64,
}

impl SessionExpiryHandler {
    #[must_use]
    pub fn new(
        identity: Arc<IdentityStore>,
        cookies: Arc<dyn CookieJar>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        login_path: impl Into<String>,
    ) -> Self {
        Self { identity, cookies, notifier, navigator, login_path: login_path.into(), invocations: AtomicU64::new(0) }
    }

    /// Clear identity, expire session cookies, show `message`, navigate to login.
    pub fn handle(&self, message: &str) {
        let count = self.invocations.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::warn!(invocation = count, %message, "session expired; forcing logout");

        if let Err(e) = self.identity.clear() {
            tracing::warn!(error = %e, "identity storage not scrubbed after expiry");
        }
        expire_session_cookies(self.cookies.as_ref());
        self.notifier.notify_blocking(message);
        self.navigator.navigate_full(&self.login_path);
    }

    /// How many times the handler has run since construction.
    #[must_use]
    pub fn invocations(&self) -> u64 {
        self.invocations.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn login_path(&self) -> &str {
        &self.login_path
    }
}

// =============================================================================
// GUARD
// =============================================================================

#[derive(Clone)]
pub struct SessionGuard {
    transport: Arc<dyn Transport>,
    expiry: Arc<SessionExpiryHandler>,
}

impl SessionGuard {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, expiry: Arc<SessionExpiryHandler>) -> Self {
        Self { transport, expiry }
    }

    /// Send `request`, running the expiry handler if the response signals it.
    ///
    /// Returns the response unchanged in every case, expired included. No
    /// retry is attempted.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] when no response arrived; that is
    /// never treated as expiry.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        let method = request.method.clone();
        let path = request.path.clone();
        tracing::debug!(%method, %path, "session request");

        let response = self.transport.send(request).await.inspect_err(|e| {
            tracing::warn!(%method, %path, error = %e, "session request failed");
        })?;
        tracing::debug!(%method, %path, status = response.status, "session response");

        if is_session_expired(&response) {
            self.expiry.handle(&expiry_message(&response));
        }
        Ok(response)
    }

    #[must_use]
    pub fn expiry_handler(&self) -> &Arc<SessionExpiryHandler> {
        &self.expiry
    }
}
