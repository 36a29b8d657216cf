//! Authentication protocol and the client-side auth state machine.
//!
//! STATES
//! ======
//! `LoggedOut --login--> LoggedIn --(logout | expiry | failed revalidation)--> LoggedOut`
//!
//! The state is never stored separately: it is whatever the identity store
//! holds. `current_user` is the only call that refreshes the stored role
//! from the server, so the staleness window is the time since it last ran.

#[cfg(test)]
#[path = "service_test.rs"]
mod service_test;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::identity::{IdentityRecord, IdentityStore, Role, UserId};
use crate::net::{ApiRequest, SessionGuard, Transport, is_session_expired};
use crate::platform::{CookieJar, expire_session_cookies};

pub const LOGIN_PATH: &str = "/api/users/login";
pub const REGISTER_PATH: &str = "/api/users/register";
pub const LOGOUT_PATH: &str = "/api/users/logout";
pub const ME_PATH: &str = "/api/users/me";
pub const REFRESH_PATH: &str = "/api/users/refresh";

const LOGIN_FAILED: &str = "Failed to login";
const REGISTER_FAILED: &str = "Failed to register";
const REFRESH_FAILED: &str = "Failed to refresh session";

/// Client view of the authentication state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    LoggedOut,
    LoggedIn(IdentityRecord),
}

impl AuthState {
    #[must_use]
    pub fn identity(&self) -> Option<&IdentityRecord> {
        match self {
            Self::LoggedOut => None,
            Self::LoggedIn(record) => Some(record),
        }
    }
}

/// The server's `/api/users/me` view of the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: Role,
}

impl CurrentUser {
    fn identity(&self) -> Result<IdentityRecord, ClientError> {
        IdentityRecord::new(self.id, self.username.clone(), self.role).map_err(ClientError::MalformedResponse)
    }
}

/// Success body of `POST /api/users/register`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Registration {
    #[serde(default)]
    pub message: Option<String>,
}

// =============================================================================
// SERVICE
// =============================================================================

pub struct AuthService {
    transport: Arc<dyn Transport>,
    guard: SessionGuard,
    identity: Arc<IdentityStore>,
    cookies: Arc<dyn CookieJar>,
}

impl AuthService {
    #[must_use]
    pub fn new(
        transport: Arc<dyn Transport>,
        guard: SessionGuard,
        identity: Arc<IdentityStore>,
        cookies: Arc<dyn CookieJar>,
    ) -> Self {
        Self { transport, guard, identity, cookies }
    }

    #[must_use]
    pub fn state(&self) -> AuthState {
        self.identity.read().map_or(AuthState::LoggedOut, AuthState::LoggedIn)
    }

    /// Authenticate and commit the returned identity.
    ///
    /// The identity store is only written after the payload is validated;
    /// every failure leaves it exactly as it was.
    ///
    /// If the record cannot be persisted this returns [`ClientError::Storage`]
    /// while the server session cookie is already set. The client stays
    /// logged out locally; a retried login or [`AuthService::logout`]
    /// reconciles the two.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Authentication`] on a non-2xx answer, carrying the
    ///   server's `error` text or `"Failed to login"`.
    /// - [`ClientError::MalformedResponse`] if the 2xx body lacks the identity fields.
    /// - [`ClientError::Transport`] / [`ClientError::Storage`] as they occur.
    pub async fn login(&self, username: &str, password: &str) -> Result<IdentityRecord, ClientError> {
        let request = ApiRequest::post(LOGIN_PATH).json(serde_json::json!({
            "username": username,
            "password": password,
        }));
        let response = self.transport.send(request).await?;

        if !response.is_success() {
            tracing::info!(%username, status = response.status, "login rejected");
            return Err(ClientError::Authentication(response.error_message(LOGIN_FAILED)));
        }

        let record: IdentityRecord = response.json()?;
        self.identity.write(record.clone())?;
        tracing::info!(user_id = %record.user_id, role = %record.role, "login succeeded");
        Ok(record)
    }

    /// Create an account. Does not log in and never touches the identity store.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Registration`] on a non-2xx answer, carrying the
    ///   server's `error` text or `"Failed to register"`.
    /// - [`ClientError::Transport`] when no response arrived.
    pub async fn register(&self, username: &str, password: &str, email: &str) -> Result<Registration, ClientError> {
        let request = ApiRequest::post(REGISTER_PATH).json(serde_json::json!({
            "username": username,
            "password": password,
            "email": email,
        }));
        let response = self.transport.send(request).await?;

        if !response.is_success() {
            tracing::info!(%username, status = response.status, "registration rejected");
            return Err(ClientError::Registration(response.error_message(REGISTER_FAILED)));
        }

        tracing::info!(%username, "registration succeeded");
        Ok(response.json().unwrap_or_default())
    }

    /// Tell the server (best effort), then forget the identity locally.
    ///
    /// Local cleanup runs even if the server call fails or this future is
    /// dropped before the server answers.
    pub async fn logout(&self) {
        let _cleanup = LocalLogout { identity: &self.identity, cookies: self.cookies.as_ref() };

        match self.transport.send(ApiRequest::post(LOGOUT_PATH)).await {
            Ok(response) if response.is_success() => tracing::debug!("server session invalidated"),
            Ok(response) => tracing::warn!(status = response.status, "server logout rejected; clearing locally"),
            Err(e) => tracing::warn!(error = %e, "server logout failed; clearing locally"),
        }
    }

    /// Revalidate the stored identity against the server.
    ///
    /// Returns `None` without any request when nobody is logged in. On
    /// success the stored record is replaced with the server's view (role
    /// changes take effect here). Any failure other than detected expiry,
    /// which the guard already handled, clears the store. That includes a
    /// refreshed record that could not be persisted, so the returned user
    /// never disagrees with the store.
    pub async fn current_user(&self) -> Option<CurrentUser> {
        if !self.identity.is_present() {
            tracing::debug!("no stored identity; skipping revalidation");
            return None;
        }
        let epoch = self.identity.epoch();

        let response = match self.guard.send(ApiRequest::get(ME_PATH)).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "revalidation request failed");
                self.discard_identity(epoch);
                return None;
            }
        };

        if is_session_expired(&response) {
            return None;
        }
        if !response.is_success() {
            tracing::info!(status = response.status, "revalidation rejected");
            self.discard_identity(epoch);
            return None;
        }

        let user = match response.json::<CurrentUser>() {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "revalidation payload unreadable");
                self.discard_identity(epoch);
                return None;
            }
        };
        let record = match user.identity() {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, "revalidation payload incomplete");
                self.discard_identity(epoch);
                return None;
            }
        };

        match self.identity.write_if_current(epoch, record) {
            Ok(true) => Some(user),
            Ok(false) => {
                tracing::debug!("identity changed during revalidation; discarding result");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "refreshed identity not persisted; treating revalidation as failed");
                self.discard_identity(epoch);
                None
            }
        }
    }

    /// Ask the server to mint a new access token from the refresh cookie.
    ///
    /// Never retried automatically and never touches the identity store.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Authentication`] on a non-2xx answer.
    /// - [`ClientError::Transport`] when no response arrived.
    pub async fn refresh_session(&self) -> Result<(), ClientError> {
        let response = self.transport.send(ApiRequest::post(REFRESH_PATH)).await?;
        if !response.is_success() {
            tracing::info!(status = response.status, "session refresh rejected");
            return Err(ClientError::Authentication(response.error_message(REFRESH_FAILED)));
        }
        tracing::debug!("session refreshed");
        Ok(())
    }

    fn discard_identity(&self, epoch: u64) {
        match self.identity.clear_if_current(epoch) {
            Ok(true) => tracing::info!("stored identity cleared after failed revalidation"),
            Ok(false) => tracing::debug!("identity changed during revalidation; leaving it"),
            Err(e) => tracing::warn!(error = %e, "identity storage not scrubbed"),
        }
    }
}

/// Drop guard for the local half of logout.
struct LocalLogout<'a> {
    identity: &'a IdentityStore,
    cookies: &'a dyn CookieJar,
}

impl Drop for LocalLogout<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.identity.clear() {
            tracing::warn!(error = %e, "identity storage not scrubbed on logout");
        }
        expire_session_cookies(self.cookies);
        tracing::info!("logged out");
    }
}
