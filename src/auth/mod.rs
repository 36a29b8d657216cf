//! Authentication and client-side authorization.
//!
//! SYSTEM CONTEXT
//! ==============
//! `service` drives the login/logout/revalidate protocol and is the only
//! writer of the identity store apart from the expiry handler. `gate` is a
//! set of pure reads over whatever the store currently holds.

pub mod gate;
pub mod service;

pub use gate::{
    AppRoute, Requirement, RouteDecision, can_manage_user, can_modify_review, check_route, is_admin, is_authenticated,
    is_owner,
};
pub use service::{AuthService, AuthState, CurrentUser, Registration};
