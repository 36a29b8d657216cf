//! Client-visible cookies.
//!
//! The real session credential is HttpOnly and server-managed; the client
//! only ever force-expires the cookie names it knows about.

#[cfg(test)]
#[path = "cookies_test.rs"]
mod cookies_test;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use reqwest::Url;
use reqwest::cookie::Jar;
use time::OffsetDateTime;

/// Cookies cleared on logout and on detected session expiry.
pub const SESSION_COOKIES: [&str; 2] = ["jwt", "refreshToken"];

pub const ROOT_PATH: &str = "/";

/// Write-only view of the cookies the client holds. Values are never read
/// back; the session credential stays opaque to client code.
pub trait CookieJar: Send + Sync {
    /// Overwrite `name` at `path` with an already-past expiry.
    fn expire(&self, name: &str, path: &str);
}

/// Expire every name in [`SESSION_COOKIES`] at the root path.
pub fn expire_session_cookies(jar: &dyn CookieJar) {
    for name in SESSION_COOKIES {
        jar.expire(name, ROOT_PATH);
    }
}

// =============================================================================
// MEMORY
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
struct StoredCookie {
    value: String,
    path: String,
    expires: Option<OffsetDateTime>,
}

impl StoredCookie {
    fn is_live(&self, now: OffsetDateTime) -> bool {
        self.expires.is_none_or(|at| at > now)
    }
}

/// In-process cookie jar.
#[derive(Debug, Default)]
pub struct MemoryCookieJar {
    cookies: Mutex<HashMap<String, StoredCookie>>,
}

impl MemoryCookieJar {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, name: &str, value: &str, path: &str) {
        let cookie = StoredCookie { value: value.to_owned(), path: path.to_owned(), expires: None };
        self.cookies.lock().unwrap_or_else(PoisonError::into_inner).insert(name.to_owned(), cookie);
    }

    /// Current value of a live cookie.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<String> {
        let now = OffsetDateTime::now_utc();
        self.cookies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .filter(|cookie| cookie.is_live(now))
            .map(|cookie| cookie.value.clone())
    }

    /// True when `name` exists and carries a past expiry.
    #[must_use]
    pub fn is_expired(&self, name: &str) -> bool {
        let now = OffsetDateTime::now_utc();
        self.cookies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .is_some_and(|cookie| !cookie.is_live(now))
    }

    #[must_use]
    pub fn path_of(&self, name: &str) -> Option<String> {
        self.cookies.lock().unwrap_or_else(PoisonError::into_inner).get(name).map(|c| c.path.clone())
    }
}

impl CookieJar for MemoryCookieJar {
    fn expire(&self, name: &str, path: &str) {
        let cookie =
            StoredCookie { value: String::new(), path: path.to_owned(), expires: Some(OffsetDateTime::UNIX_EPOCH) };
        self.cookies.lock().unwrap_or_else(PoisonError::into_inner).insert(name.to_owned(), cookie);
    }
}

// =============================================================================
// HTTP
// =============================================================================

/// The cookie store the HTTP transport sends with, scoped to the API origin.
#[derive(Debug, Clone)]
pub struct HttpCookieJar {
    jar: Arc<Jar>,
    origin: Url,
}

impl HttpCookieJar {
    #[must_use]
    pub fn new(jar: Arc<Jar>, origin: Url) -> Self {
        Self { jar, origin }
    }

    #[must_use]
    pub fn inner(&self) -> Arc<Jar> {
        Arc::clone(&self.jar)
    }
}

impl CookieJar for HttpCookieJar {
    fn expire(&self, name: &str, path: &str) {
        let cookie = format!("{name}=; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Path={path}; SameSite=Strict");
        self.jar.add_cookie_str(&cookie, &self.origin);
    }
}
