//! Per-user favorite reviews.

#[cfg(test)]
#[path = "favorites_test.rs"]
mod favorites_test;

use serde::Deserialize;

use super::fetch_json;
use super::reviews::Review;
use crate::error::ClientError;
use crate::net::{ApiRequest, SessionGuard};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteToggle {
    pub is_favorited: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub review_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteStatus {
    pub is_favorited: bool,
    pub review_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteCount {
    pub review_id: i64,
    pub favorite_count: u64,
}

#[derive(Clone)]
pub struct FavoritesApi {
    guard: SessionGuard,
}

impl FavoritesApi {
    #[must_use]
    pub fn new(guard: SessionGuard) -> Self {
        Self { guard }
    }

    /// Flip the caller's favorite flag for `review_id`.
    ///
    /// # Errors
    ///
    /// [`ClientError::Api`] on a non-2xx answer, [`ClientError::SessionExpired`] after forced logout.
    pub async fn toggle(&self, review_id: i64) -> Result<FavoriteToggle, ClientError> {
        let request = ApiRequest::post(format!("/api/favorites/toggle/{review_id}"));
        let toggle: FavoriteToggle = fetch_json(&self.guard, request, "Failed to toggle favorite").await?;
        tracing::debug!(review_id, favorited = toggle.is_favorited, "favorite toggled");
        Ok(toggle)
    }

    /// # Errors
    ///
    /// [`ClientError::Api`] on a non-2xx answer, [`ClientError::SessionExpired`] after forced logout.
    pub async fn check(&self, review_id: i64) -> Result<FavoriteStatus, ClientError> {
        let request = ApiRequest::get(format!("/api/favorites/check/{review_id}"));
        fetch_json(&self.guard, request, "Failed to check favorite status").await
    }

    /// # Errors
    ///
    /// [`ClientError::Api`] on a non-2xx answer, [`ClientError::SessionExpired`] after forced logout.
    pub async fn mine(&self) -> Result<Vec<Review>, ClientError> {
        fetch_json(&self.guard, ApiRequest::get("/api/favorites/my-favorites"), "Failed to get user favorites").await
    }

    /// # Errors
    ///
    /// [`ClientError::Api`] on a non-2xx answer, [`ClientError::SessionExpired`] after forced logout.
    pub async fn count(&self, review_id: i64) -> Result<FavoriteCount, ClientError> {
        let request = ApiRequest::get(format!("/api/favorites/count/{review_id}"));
        fetch_json(&self.guard, request, "Failed to get favorite count").await
    }
}
