use super::*;
use std::sync::{Mutex, MutexGuard, PoisonError};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Serializes tests that touch process environment.
fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// # Safety
/// Callers must hold [`env_lock`].
unsafe fn clear_review_env() {
    unsafe {
        std::env::remove_var("REVIEW_API_BASE_URL");
        std::env::remove_var("REVIEW_LOGIN_PATH");
        std::env::remove_var("REVIEW_REQUEST_TIMEOUT_SECS");
        std::env::remove_var("REVIEW_CONNECT_TIMEOUT_SECS");
        std::env::remove_var("REVIEW_IDENTITY_FILE");
    }
}

#[test]
fn from_env_uses_defaults() {
    let _env = env_lock();
    unsafe { clear_review_env() };

    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    assert_eq!(cfg.login_path, "/login");
    assert_eq!(cfg.timeouts, Timeouts::default());
    assert!(cfg.identity_file.is_none());
}

#[test]
fn from_env_parses_overrides() {
    let _env = env_lock();
    unsafe {
        clear_review_env();
        std::env::set_var("REVIEW_API_BASE_URL", "https://reviews.example.test/");
        std::env::set_var("REVIEW_LOGIN_PATH", "/signin");
        std::env::set_var("REVIEW_REQUEST_TIMEOUT_SECS", "5");
        std::env::set_var("REVIEW_CONNECT_TIMEOUT_SECS", "2");
        std::env::set_var("REVIEW_IDENTITY_FILE", "/tmp/identity.json");
    }

    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg.base_url, "https://reviews.example.test");
    assert_eq!(cfg.login_path, "/signin");
    assert_eq!(cfg.timeouts, Timeouts { request_secs: 5, connect_secs: 2 });
    assert_eq!(cfg.identity_file, Some(PathBuf::from("/tmp/identity.json")));

    unsafe { clear_review_env() };
}

#[test]
fn from_env_bad_timeout_falls_back() {
    let _env = env_lock();
    unsafe {
        clear_review_env();
        std::env::set_var("REVIEW_REQUEST_TIMEOUT_SECS", "soon");
        std::env::set_var("REVIEW_CONNECT_TIMEOUT_SECS", "0");
    }

    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg.timeouts, Timeouts::default());

    unsafe { clear_review_env() };
}

#[test]
fn from_env_rejects_relative_login_path() {
    let _env = env_lock();
    unsafe {
        clear_review_env();
        std::env::set_var("REVIEW_LOGIN_PATH", "login");
    }

    let err = ClientConfig::from_env().unwrap_err().to_string();
    assert!(err.contains("login path"));

    unsafe { clear_review_env() };
}

#[test]
fn new_rejects_non_http_url() {
    assert!(matches!(ClientConfig::new("ftp://example.test"), Err(ClientError::Config(_))));
    assert!(matches!(ClientConfig::new("not a url"), Err(ClientError::Config(_))));
}

#[test]
fn endpoint_joins_paths() {
    let cfg = ClientConfig::new("http://localhost:8080/").unwrap();
    assert_eq!(cfg.endpoint("/api/users/me"), "http://localhost:8080/api/users/me");
    assert_eq!(cfg.endpoint("api/reviews"), "http://localhost:8080/api/reviews");
}
