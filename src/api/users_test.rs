use super::*;
use crate::net::{ApiResponse, Body};
use crate::test_support::{Harness, admin, alice};
use reqwest::Method;
use serde_json::json;

#[tokio::test]
async fn get_decodes_profile_without_role() {
    let h = Harness::new();
    h.transport.reply(ApiResponse::with_json(200, &json!({ "id": 8, "username": "bob", "email": "bob@example.com" })));

    let user = UsersApi::new(h.guard.clone()).get(UserId(8)).await.unwrap();

    assert_eq!(user.username, "bob");
    assert_eq!(user.role, None);
    assert_eq!(h.transport.last_request().path, "/api/users/8");
}

#[tokio::test]
async fn search_sends_trimmed_term() {
    let h = Harness::logged_in(alice());
    h.transport.reply(ApiResponse::with_json(200, &json!([{ "id": 8, "username": "bob" }])));

    let users = UsersApi::new(h.guard.clone()).search("  bo ").await.unwrap();

    assert_eq!(users.len(), 1);
    let request = h.transport.last_request();
    assert_eq!(request.path, "/api/users/search");
    assert_eq!(request.query, vec![("username".to_owned(), "bo".to_owned())]);
}

#[tokio::test]
async fn blank_search_sends_nothing() {
    let h = Harness::logged_in(alice());

    let err = UsersApi::new(h.guard.clone()).search("   ").await.unwrap_err();

    assert!(matches!(err, ClientError::Invalid(_)));
    assert_eq!(h.transport.request_count(), 0);
}

#[tokio::test]
async fn all_lists_roles() {
    let h = Harness::logged_in(admin());
    h.transport.reply(ApiResponse::with_json(
        200,
        &json!([
            { "id": 1, "username": "root", "email": "root@example.com", "role": "ROLE_ADMIN" },
            { "id": 7, "username": "alice", "email": "alice@example.com", "role": "ROLE_USER" }
        ]),
    ));

    let users = UsersApi::new(h.guard.clone()).all().await.unwrap();
    assert_eq!(users.iter().map(|u| u.role).collect::<Vec<_>>(), vec![Some(Role::Admin), Some(Role::User)]);
}

#[tokio::test]
async fn non_admin_is_not_blocked_locally() {
    let h = Harness::logged_in(alice());
    h.transport.reply(ApiResponse::with_json(403, &json!({ "error": "Access denied" })));

    let err = UsersApi::new(h.guard.clone()).all().await.unwrap_err();

    assert_eq!(h.transport.request_count(), 1);
    assert_eq!(err, ClientError::Api { status: 403, message: "Access denied".into() });
    assert_eq!(h.identity.read(), Some(alice()));
}

#[tokio::test]
async fn update_role_sends_wire_role() {
    let h = Harness::logged_in(admin());
    h.transport.reply(ApiResponse::with_json(
        200,
        &json!({ "message": "Role updated successfully", "id": 7, "username": "alice", "role": "ROLE_ADMIN" }),
    ));

    let change = UsersApi::new(h.guard.clone()).update_role(UserId(7), Role::Admin).await.unwrap();

    assert_eq!(change.role, Role::Admin);
    let request = h.transport.last_request();
    assert_eq!(request.method, Method::PUT);
    assert_eq!(request.path, "/api/users/7/role");
    assert_eq!(request.body, Body::Json(json!({ "role": "ROLE_ADMIN" })));
}

#[tokio::test]
async fn delete_reports_removed_reviews() {
    let h = Harness::logged_in(admin());
    h.transport.reply(ApiResponse::with_json(
        200,
        &json!({ "message": "User and all their reviews deleted successfully", "reviewsDeleted": 3 }),
    ));

    let deleted = UsersApi::new(h.guard.clone()).delete(UserId(7)).await.unwrap();

    assert_eq!(deleted.reviews_deleted, 3);
    assert_eq!(h.transport.last_request().method, Method::DELETE);
}

#[tokio::test]
async fn deleting_admin_is_refused_by_server() {
    let h = Harness::logged_in(admin());
    h.transport.reply(ApiResponse::with_json(400, &json!({ "error": "Cannot delete admin users" })));

    let err = UsersApi::new(h.guard.clone()).delete(UserId(2)).await.unwrap_err();
    assert_eq!(err.user_message(), "Cannot delete admin users");
}
