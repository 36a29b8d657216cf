//! Session-aware resource clients.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every call here goes through the [`SessionGuard`]. The guard has already
//! run the expiry handler by the time a wrapper sees an expired response, so
//! wrappers only translate it into [`ClientError::SessionExpired`] for
//! callers that want to stop early.
//!
//! No wrapper consults the local role before sending. A non-admin calling an
//! admin endpoint gets the server's refusal back as [`ClientError::Api`].

pub mod favorites;
pub mod logs;
pub mod reviews;
pub mod users;

pub use favorites::{FavoriteCount, FavoriteStatus, FavoriteToggle, FavoritesApi};
pub use logs::{AdminLog, LogsApi, ReviewLog, UserLog};
pub use reviews::{ContentFilter, ContentKind, Review, ReviewDraft, ReviewsApi};
pub use users::{DeletedUser, RoleChange, UserSummary, UsersApi};

use serde::de::DeserializeOwned;

use crate::error::ClientError;
use crate::net::{ApiRequest, ApiResponse, SessionGuard, is_session_expired};

/// Send through the guard and reject anything that is not a 2xx.
async fn send_checked(
    guard: &SessionGuard,
    request: ApiRequest,
    default_error: &str,
) -> Result<ApiResponse, ClientError> {
    let response = guard.send(request).await?;
    if is_session_expired(&response) {
        return Err(ClientError::SessionExpired);
    }
    if !response.is_success() {
        return Err(ClientError::Api { status: response.status, message: response.error_message(default_error) });
    }
    Ok(response)
}

async fn fetch_json<T: DeserializeOwned>(
    guard: &SessionGuard,
    request: ApiRequest,
    default_error: &str,
) -> Result<T, ClientError> {
    send_checked(guard, request, default_error).await?.json()
}
