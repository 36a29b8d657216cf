//! Client error taxonomy.
//!
//! DESIGN
//! ======
//! Session expiry is handled centrally by the session guard before any caller
//! sees it. `SessionExpired` only exists so resource wrappers can return
//! *something* after the handler already ran; UI code checks
//! [`ClientError::is_handled`] and stays silent for it.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

const TRANSPORT_USER_MESSAGE: &str = "Could not reach the server. Check your connection and try again.";

/// Errors produced by the review client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a response (connect, DNS, timeout).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server rejected a login or session refresh.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The server rejected a registration.
    #[error("registration failed: {0}")]
    Registration(String),

    /// A success response carried a body that could not be trusted.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// A session-aware call was answered with a non-success status.
    #[error("request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    /// The server signaled session expiry; logout and redirect already happened.
    #[error("session expired")]
    SessionExpired,

    /// A configuration value was rejected.
    #[error("invalid config: {0}")]
    Config(String),

    /// Input was rejected locally; no request was sent.
    #[error("invalid input: {0}")]
    Invalid(String),

    /// Durable client storage could not be written.
    #[error("storage failed: {0}")]
    Storage(String),
}

impl ClientError {
    /// True when the error was already surfaced to the user by the expiry handler.
    #[must_use]
    pub fn is_handled(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }

    /// Text suitable for an inline message near the form that triggered the call.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Authentication(message) | Self::Registration(message) | Self::Api { message, .. } => message.clone(),
            Self::Transport(_) => TRANSPORT_USER_MESSAGE.to_owned(),
            Self::MalformedResponse(_) => "The server sent an unexpected response.".to_owned(),
            Self::SessionExpired => "Your session has expired. Please log in again.".to_owned(),
            Self::Invalid(message) | Self::Config(message) | Self::Storage(message) => message.clone(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport(error.to_string())
    }
}
