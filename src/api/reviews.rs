//! Reviews: reads, authoring, and client-side content filtering.
//!
//! Cover uploads are not sent from here. Updates always ask the server to
//! keep the existing cover.

#[cfg(test)]
#[path = "reviews_test.rs"]
mod reviews_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{fetch_json, send_checked};
use crate::error::ClientError;
use crate::identity::UserId;
use crate::net::{ApiRequest, SessionGuard};

const FETCH_REVIEWS_FAILED: &str = "Failed to fetch reviews";
const FETCH_REVIEW_FAILED: &str = "Failed to fetch review";
const CREATE_FAILED: &str = "Failed to create review";
const UPDATE_FAILED: &str = "Failed to update review";
const DELETE_FAILED: &str = "Failed to delete review";
const REQUIRED_FIELDS: &str = "Required fields must not be empty";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "reviewID")]
    pub review_id: i64,
    #[serde(rename = "userID")]
    pub user_id: UserId,
    #[serde(rename = "contentType")]
    pub content_type: String,
    #[serde(rename = "contentTitle")]
    pub content_title: String,
    #[serde(rename = "reviewTitle", default)]
    pub review_title: Option<String>,
    #[serde(rename = "reviewDescription")]
    pub review_description: String,
    #[serde(rename = "coverFile", default)]
    pub cover_file: Option<String>,
}

impl Review {
    /// The content kind, if `content_type` names one.
    #[must_use]
    pub fn kind(&self) -> Option<ContentKind> {
        self.content_type.parse().ok()
    }
}

// =============================================================================
// CONTENT KINDS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Movie,
    TvSeries,
    Game,
    Book,
}

impl ContentKind {
    pub const ALL: [Self; 4] = [Self::Movie, Self::TvSeries, Self::Game, Self::Book];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::TvSeries => "tvseries",
            Self::Game => "game",
            Self::Book => "book",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(raw))
            .ok_or_else(|| format!("unknown content type: {raw:?}"))
    }
}

/// Which reviews a listing shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentFilter {
    #[default]
    All,
    Kind(ContentKind),
}

impl ContentFilter {
    #[must_use]
    pub fn matches(self, review: &Review) -> bool {
        match self {
            Self::All => true,
            Self::Kind(kind) => review.content_type.eq_ignore_ascii_case(kind.as_str()),
        }
    }

    /// Matching reviews, in their original order.
    #[must_use]
    pub fn apply(self, reviews: &[Review]) -> Vec<Review> {
        reviews.iter().filter(|review| self.matches(review)).cloned().collect()
    }
}

impl FromStr for ContentFilter {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        raw.parse().map(Self::Kind)
    }
}

// =============================================================================
// DRAFTS
// =============================================================================

/// Fields a user submits when writing or editing a review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDraft {
    pub content_type: ContentKind,
    pub content_title: String,
    pub review_title: Option<String>,
    pub review_description: String,
}

impl ReviewDraft {
    /// # Errors
    ///
    /// Returns [`ClientError::Invalid`] if the title or description is blank.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.content_title.trim().is_empty() || self.review_description.trim().is_empty() {
            return Err(ClientError::Invalid(REQUIRED_FIELDS.to_owned()));
        }
        Ok(())
    }

    fn form_fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![
            ("contentType".to_owned(), self.content_type.as_str().to_owned()),
            ("contentTitle".to_owned(), self.content_title.trim().to_owned()),
        ];
        if let Some(title) = self.review_title.as_deref().map(str::trim)
            && !title.is_empty()
        {
            fields.push(("reviewTitle".to_owned(), title.to_owned()));
        }
        fields.push(("reviewDescription".to_owned(), self.review_description.trim().to_owned()));
        fields
    }
}

// =============================================================================
// CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ReviewsApi {
    guard: SessionGuard,
}

impl ReviewsApi {
    #[must_use]
    pub fn new(guard: SessionGuard) -> Self {
        Self { guard }
    }

    /// # Errors
    ///
    /// [`ClientError::Api`] on a non-2xx answer, [`ClientError::SessionExpired`] after forced logout.
    pub async fn latest(&self) -> Result<Vec<Review>, ClientError> {
        fetch_json(&self.guard, ApiRequest::get("/api/reviews/latest"), FETCH_REVIEWS_FAILED).await
    }

    /// The server answers `404` when the user has no reviews.
    ///
    /// # Errors
    ///
    /// [`ClientError::Api`] on a non-2xx answer, [`ClientError::SessionExpired`] after forced logout.
    pub async fn by_user(&self, user_id: UserId) -> Result<Vec<Review>, ClientError> {
        fetch_json(&self.guard, ApiRequest::get(format!("/api/reviews/user/{user_id}")), FETCH_REVIEWS_FAILED).await
    }

    /// # Errors
    ///
    /// [`ClientError::Api`] on a non-2xx answer, [`ClientError::SessionExpired`] after forced logout.
    pub async fn by_content(&self, title: &str) -> Result<Vec<Review>, ClientError> {
        let request = ApiRequest::get("/api/reviews/content").query("title", title);
        fetch_json(&self.guard, request, FETCH_REVIEWS_FAILED).await
    }

    /// # Errors
    ///
    /// [`ClientError::Api`] on a non-2xx answer, [`ClientError::SessionExpired`] after forced logout.
    pub async fn get(&self, review_id: i64) -> Result<Review, ClientError> {
        fetch_json(&self.guard, ApiRequest::get(format!("/api/reviews/{review_id}")), FETCH_REVIEW_FAILED).await
    }

    /// # Errors
    ///
    /// [`ClientError::Invalid`] before sending if the draft is incomplete;
    /// otherwise as for [`ReviewsApi::get`].
    pub async fn create(&self, draft: &ReviewDraft) -> Result<Review, ClientError> {
        draft.validate()?;
        let request = ApiRequest::post("/api/reviews").form(draft.form_fields());
        let review: Review = fetch_json(&self.guard, request, CREATE_FAILED).await?;
        tracing::info!(review_id = review.review_id, kind = %draft.content_type, "review created");
        Ok(review)
    }

    /// Only the author may update; others get the server's `403`.
    ///
    /// # Errors
    ///
    /// [`ClientError::Invalid`] before sending if the draft is incomplete;
    /// otherwise as for [`ReviewsApi::get`].
    pub async fn update(&self, review_id: i64, draft: &ReviewDraft) -> Result<Review, ClientError> {
        draft.validate()?;
        let mut fields = draft.form_fields();
        fields.push(("keepExistingCover".to_owned(), "true".to_owned()));
        let request = ApiRequest::put(format!("/api/reviews/{review_id}")).form(fields);
        let review = fetch_json(&self.guard, request, UPDATE_FAILED).await?;
        tracing::info!(review_id, "review updated");
        Ok(review)
    }

    /// # Errors
    ///
    /// [`ClientError::Api`] on a non-2xx answer, [`ClientError::SessionExpired`] after forced logout.
    pub async fn delete(&self, review_id: i64) -> Result<(), ClientError> {
        send_checked(&self.guard, ApiRequest::delete(format!("/api/reviews/{review_id}")), DELETE_FAILED).await?;
        tracing::info!(review_id, "review deleted");
        Ok(())
    }
}
