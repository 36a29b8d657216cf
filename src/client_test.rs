use super::*;
use crate::identity::{Role, UserId};
use crate::net::ApiResponse;
use crate::platform::{RecordingNavigator, RecordingNotifier};
use crate::test_support::{ScriptedTransport, expired_response};
use serde_json::json;
use std::path::PathBuf;

struct Wired {
    client: ReviewClient,
    transport: Arc<ScriptedTransport>,
    navigator: Arc<RecordingNavigator>,
    notifier: Arc<RecordingNotifier>,
}

fn wired(config: ClientConfig, storage: Arc<dyn Storage>) -> Wired {
    let transport = Arc::new(ScriptedTransport::new());
    let navigator = Arc::new(RecordingNavigator::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let client = ReviewClient::builder(config)
        .transport(transport.clone())
        .storage(storage)
        .navigator(navigator.clone())
        .notifier(notifier.clone())
        .build()
        .unwrap();
    Wired { client, transport, navigator, notifier }
}

fn scratch_file(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("review-client-facade-{}-{name}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir.join("identity.json")
}

#[tokio::test]
async fn login_flows_into_gate_accessors() {
    let w = wired(ClientConfig::new("http://api.test").unwrap(), Arc::new(MemoryStorage::new()));
    w.transport.reply(ApiResponse::with_json(200, &json!({ "userId": 1, "username": "root", "role": "ROLE_ADMIN" })));

    assert!(!w.client.is_authenticated());
    assert_eq!(w.client.check_route(AppRoute::ManageUsers), RouteDecision::RedirectToLogin);

    w.client.auth().login("root", "pw").await.unwrap();

    assert!(w.client.is_authenticated());
    assert!(w.client.is_admin());
    assert_eq!(w.client.check_route(AppRoute::ManageUsers), RouteDecision::Allow);
}

#[tokio::test]
async fn logout_drops_admin_rights() {
    let w = wired(ClientConfig::new("http://api.test").unwrap(), Arc::new(MemoryStorage::new()));
    w.transport.reply(ApiResponse::with_json(200, &json!({ "userId": 1, "username": "root", "role": "ROLE_ADMIN" })));
    w.transport.reply(ApiResponse::empty(200));

    w.client.auth().login("root", "pw").await.unwrap();
    assert!(w.client.is_admin());
    w.client.auth().logout().await;

    assert!(!w.client.is_admin());
    assert_eq!(w.client.identity(), None);
}

#[tokio::test]
async fn expiry_navigates_to_configured_login_path() {
    let mut config = ClientConfig::new("http://api.test").unwrap();
    config.login_path = "/signin".into();
    let w = wired(config, Arc::new(MemoryStorage::new()));
    w.client.identity_store().write(IdentityRecord::new(UserId(7), "alice", Role::User).unwrap()).unwrap();
    w.transport.reply(expired_response("Session expired - refresh token revoked"));

    let err = w.client.reviews().latest().await.unwrap_err();

    assert!(err.is_handled());
    assert_eq!(w.navigator.targets(), vec!["/signin".to_owned()]);
    assert_eq!(w.notifier.messages().len(), 1);
    assert!(!w.client.is_authenticated());
}

#[tokio::test]
async fn every_resource_client_shares_the_guard() {
    let w = wired(ClientConfig::new("http://api.test").unwrap(), Arc::new(MemoryStorage::new()));
    w.client.identity_store().write(IdentityRecord::new(UserId(7), "alice", Role::User).unwrap()).unwrap();
    w.transport.reply(expired_response("expired"));

    let _ = w.client.favorites().mine().await;

    assert_eq!(w.client.session().expiry_handler().invocations(), 1);
    assert!(w.client.users().get(UserId(7)).await.is_err());
    assert!(w.client.logs().admin_logs().await.is_err());
    assert_eq!(w.transport.request_count(), 3);
}

#[test]
fn identity_file_survives_new_client() {
    let path = scratch_file("restart");
    let mut config = ClientConfig::new("http://api.test").unwrap();
    config.identity_file = Some(path.clone());

    let first = ReviewClient::builder(config.clone()).transport(Arc::new(ScriptedTransport::new())).build().unwrap();
    first.identity_store().write(IdentityRecord::new(UserId(7), "alice", Role::User).unwrap()).unwrap();
    drop(first);

    let second = ReviewClient::builder(config).transport(Arc::new(ScriptedTransport::new())).build().unwrap();
    assert_eq!(second.identity().map(|r| r.username), Some("alice".to_owned()));

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn from_config_builds_http_stack() {
    let client = ReviewClient::from_config(&ClientConfig::new("http://127.0.0.1:9").unwrap()).unwrap();
    assert!(!client.is_authenticated());
    assert_eq!(client.session().expiry_handler().login_path(), "/login");
}
