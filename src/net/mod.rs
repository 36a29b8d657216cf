//! Networking: the transport seam and the session guard on top of it.
//!
//! SYSTEM CONTEXT
//! ==============
//! `transport` moves bytes, `guard` owns the session-expiry contract. Auth
//! calls that must not trigger forced logout (login, register, logout) use
//! the transport directly; everything credentialed goes through the guard.

pub mod guard;
pub mod transport;

pub use guard::{DEFAULT_EXPIRY_MESSAGE, SESSION_EXPIRED_HEADER, SessionExpiryHandler, SessionGuard, is_session_expired};
pub use transport::{ApiRequest, ApiResponse, Body, Credentials, HttpTransport, Transport};
