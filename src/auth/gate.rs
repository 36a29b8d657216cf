//! Client-side authorization gate.
//!
//! These checks only decide what the UI offers. They read the possibly
//! stale identity store, so the server remains the authority: a call the
//! gate allows may still be refused, and that refusal is returned as-is.

#[cfg(test)]
#[path = "gate_test.rs"]
mod gate_test;

use crate::identity::{IdentityRecord, Role, UserId};

#[must_use]
pub fn is_authenticated(identity: Option<&IdentityRecord>) -> bool {
    identity.is_some()
}

#[must_use]
pub fn is_admin(identity: Option<&IdentityRecord>) -> bool {
    identity.is_some_and(|record| record.role == Role::Admin)
}

#[must_use]
pub fn is_owner(identity: Option<&IdentityRecord>, owner: UserId) -> bool {
    identity.is_some_and(|record| record.user_id == owner)
}

/// Only the author may edit or delete a review; admins included.
#[must_use]
pub fn can_modify_review(identity: Option<&IdentityRecord>, author: UserId) -> bool {
    is_owner(identity, author)
}

/// Admins manage other accounts but never other admins or themselves.
#[must_use]
pub fn can_manage_user(identity: Option<&IdentityRecord>, target: UserId, target_role: Role) -> bool {
    is_admin(identity) && target_role != Role::Admin && !is_owner(identity, target)
}

// =============================================================================
// ROUTES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Public,
    Authenticated,
    Admin,
}

/// Screens of the review app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppRoute {
    Home,
    Login,
    Register,
    LatestReviews,
    ReviewDetail,
    ContentReviews,
    UserReviews,
    AddReview,
    EditReview,
    MyReviews,
    Favorites,
    Profile,
    UserSearch,
    AdminDashboard,
    ManageUsers,
    ActivityLogs,
}

impl AppRoute {
    #[must_use]
    pub fn requirement(self) -> Requirement {
        match self {
            Self::Home
            | Self::Login
            | Self::Register
            | Self::LatestReviews
            | Self::ReviewDetail
            | Self::ContentReviews
            | Self::UserReviews => Requirement::Public,
            Self::AddReview
            | Self::EditReview
            | Self::MyReviews
            | Self::Favorites
            | Self::Profile
            | Self::UserSearch => Requirement::Authenticated,
            Self::AdminDashboard | Self::ManageUsers | Self::ActivityLogs => Requirement::Admin,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    RedirectToLogin,
    Forbidden,
}

/// Decide whether `route` may render for `identity`.
#[must_use]
pub fn check_route(route: AppRoute, identity: Option<&IdentityRecord>) -> RouteDecision {
    match (route.requirement(), identity) {
        (Requirement::Public, _) => RouteDecision::Allow,
        (_, None) => RouteDecision::RedirectToLogin,
        (Requirement::Authenticated, Some(_)) => RouteDecision::Allow,
        (Requirement::Admin, Some(record)) if record.role == Role::Admin => RouteDecision::Allow,
        (Requirement::Admin, Some(_)) => RouteDecision::Forbidden,
    }
}
