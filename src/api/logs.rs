//! Admin activity logs.
//!
//! Log dates are kept as the server sent them. The server may serialize
//! them as an ISO string or as an epoch-seconds number; both become text.

#[cfg(test)]
#[path = "logs_test.rs"]
mod logs_test;

use serde::{Deserialize, Deserializer};

use super::fetch_json;
use crate::error::ClientError;
use crate::identity::UserId;
use crate::net::{ApiRequest, SessionGuard};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserLog {
    #[serde(rename = "logID")]
    pub log_id: i64,
    #[serde(rename = "userID")]
    pub user_id: UserId,
    pub operation: String,
    #[serde(deserialize_with = "date_text")]
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReviewLog {
    #[serde(rename = "logID")]
    pub log_id: i64,
    #[serde(rename = "reviewID")]
    pub review_id: i64,
    pub operation: String,
    #[serde(deserialize_with = "date_text")]
    pub date: String,
}

/// A privileged action, attributed to the acting admin.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdminLog {
    #[serde(rename = "logID")]
    pub log_id: i64,
    #[serde(rename = "userID")]
    pub user_id: UserId,
    pub operation: String,
    #[serde(deserialize_with = "date_text")]
    pub date: String,
}

fn date_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDate {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawDate::deserialize(deserializer)? {
        RawDate::Text(text) => text,
        RawDate::Number(number) => number.to_string(),
    })
}

#[derive(Clone)]
pub struct LogsApi {
    guard: SessionGuard,
}

impl LogsApi {
    #[must_use]
    pub fn new(guard: SessionGuard) -> Self {
        Self { guard }
    }

    /// # Errors
    ///
    /// [`ClientError::Api`] on a non-2xx answer (non-admins get `403`),
    /// [`ClientError::SessionExpired`] after forced logout.
    pub async fn user_logs(&self) -> Result<Vec<UserLog>, ClientError> {
        fetch_json(&self.guard, ApiRequest::get("/api/logs/users"), "Failed to fetch user logs").await
    }

    /// # Errors
    ///
    /// As for [`LogsApi::user_logs`].
    pub async fn review_logs(&self) -> Result<Vec<ReviewLog>, ClientError> {
        fetch_json(&self.guard, ApiRequest::get("/api/logs/reviews"), "Failed to fetch review logs").await
    }

    /// # Errors
    ///
    /// As for [`LogsApi::user_logs`].
    pub async fn admin_logs(&self) -> Result<Vec<AdminLog>, ClientError> {
        fetch_json(&self.guard, ApiRequest::get("/api/logs/admin"), "Failed to fetch admin logs").await
    }
}
