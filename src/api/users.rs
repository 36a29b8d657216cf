//! User lookup and admin account management.
//!
//! `all`, `update_role` and `delete` are admin endpoints. They are sent
//! regardless of the caller's stored role; the server decides.

#[cfg(test)]
#[path = "users_test.rs"]
mod users_test;

use serde::Deserialize;

use super::fetch_json;
use crate::error::ClientError;
use crate::identity::{Role, UserId};
use crate::net::{ApiRequest, SessionGuard};

/// A user as listed by lookup endpoints. Which fields are present depends
/// on the endpoint: search omits `email`, lookup by id omits `role`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RoleChange {
    #[serde(default)]
    pub message: Option<String>,
    pub id: UserId,
    pub username: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedUser {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub reviews_deleted: u64,
}

#[derive(Clone)]
pub struct UsersApi {
    guard: SessionGuard,
}

impl UsersApi {
    #[must_use]
    pub fn new(guard: SessionGuard) -> Self {
        Self { guard }
    }

    /// # Errors
    ///
    /// [`ClientError::Api`] on a non-2xx answer, [`ClientError::SessionExpired`] after forced logout.
    pub async fn get(&self, user_id: UserId) -> Result<UserSummary, ClientError> {
        fetch_json(&self.guard, ApiRequest::get(format!("/api/users/{user_id}")), "Failed to fetch user details").await
    }

    /// # Errors
    ///
    /// [`ClientError::Invalid`] before sending if `term` is blank; otherwise
    /// as for [`UsersApi::get`].
    pub async fn search(&self, term: &str) -> Result<Vec<UserSummary>, ClientError> {
        let term = term.trim();
        if term.is_empty() {
            return Err(ClientError::Invalid("Search term must not be empty".to_owned()));
        }
        let request = ApiRequest::get("/api/users/search").query("username", term);
        fetch_json(&self.guard, request, "Failed to search users").await
    }

    /// # Errors
    ///
    /// [`ClientError::Api`] on a non-2xx answer, [`ClientError::SessionExpired`] after forced logout.
    pub async fn all(&self) -> Result<Vec<UserSummary>, ClientError> {
        fetch_json(&self.guard, ApiRequest::get("/api/users/all"), "Failed to fetch users").await
    }

    /// # Errors
    ///
    /// [`ClientError::Api`] on a non-2xx answer, [`ClientError::SessionExpired`] after forced logout.
    pub async fn update_role(&self, user_id: UserId, role: Role) -> Result<RoleChange, ClientError> {
        let request =
            ApiRequest::put(format!("/api/users/{user_id}/role")).json(serde_json::json!({ "role": role.as_str() }));
        let change: RoleChange = fetch_json(&self.guard, request, "Failed to update role").await?;
        tracing::info!(%user_id, role = %change.role, "role updated");
        Ok(change)
    }

    /// Delete a user and all of their reviews. The server refuses admins.
    ///
    /// # Errors
    ///
    /// [`ClientError::Api`] on a non-2xx answer, [`ClientError::SessionExpired`] after forced logout.
    pub async fn delete(&self, user_id: UserId) -> Result<DeletedUser, ClientError> {
        let request = ApiRequest::delete(format!("/api/users/{user_id}"));
        let deleted: DeletedUser = fetch_json(&self.guard, request, "Failed to delete user").await?;
        tracing::info!(%user_id, reviews_deleted = deleted.reviews_deleted, "user deleted");
        Ok(deleted)
    }
}
