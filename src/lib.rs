//! Session-aware access layer for the review-sharing API.
//!
//! SYSTEM CONTEXT
//! ==============
//! The client holds a possibly stale belief about who is logged in (the
//! identity store) while the server holds the real session in HTTP-only
//! cookies. Every credentialed call passes through one session guard that
//! watches for the server's expiry signal and forces a clean logout when it
//! appears.
//!
//! MODULES
//! =======
//! - [`identity`]: identity record, durable storage, and the store.
//! - [`net`]: transport seam and the session guard.
//! - [`auth`]: login / logout / revalidation and client-side gating.
//! - [`api`]: reviews, favorites, users and logs over the guard.
//! - [`platform`]: cookie, navigation and notification seams.
//! - [`client`]: [`ReviewClient`], wiring all of the above.

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod identity;
pub mod net;
pub mod platform;

#[cfg(test)]
mod test_support;

pub use auth::{AppRoute, AuthService, AuthState, CurrentUser, RouteDecision};
pub use client::{ReviewClient, ReviewClientBuilder};
pub use config::ClientConfig;
pub use error::ClientError;
pub use identity::{IdentityRecord, IdentityStore, Role, UserId};

/// Install a `tracing` fmt subscriber for hosts that have none.
///
/// # Errors
///
/// Returns [`ClientError::Config`] if a global subscriber is already set.
pub fn init_logging() -> Result<(), ClientError> {
    tracing_subscriber::fmt().try_init().map_err(|e| ClientError::Config(format!("logging init failed: {e}")))
}
