//! Shared fakes for unit tests: a scripted transport and a fully wired harness.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use reqwest::header::{HeaderMap, HeaderValue};

use crate::auth::AuthService;
use crate::error::ClientError;
use crate::identity::{IdentityRecord, IdentityStore, MemoryStorage, Role, UserId};
use crate::net::guard::{SessionExpiryHandler, SessionGuard};
use crate::net::transport::{ApiRequest, ApiResponse, Transport};
use crate::platform::{MemoryCookieJar, RecordingNavigator, RecordingNotifier};

// =============================================================================
// SCRIPTED TRANSPORT
// =============================================================================

/// Returns queued replies in order and records every request it sees.
/// An exhausted script answers `500`.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<ApiResponse, ClientError>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, response: ApiResponse) {
        self.replies.lock().unwrap().push_back(Ok(response));
    }

    pub fn fail(&self, error: ClientError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> ApiRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        self.requests.lock().unwrap().push(request);
        self.replies.lock().unwrap().pop_front().unwrap_or_else(|| Ok(ApiResponse::empty(500)))
    }
}

/// `401` with the expiry header and an `{error}` body.
pub fn expired_response(message: &str) -> ApiResponse {
    let mut headers = HeaderMap::new();
    headers.insert("X-Session-Expired", HeaderValue::from_static("true"));
    let body = serde_json::json!({ "error": message, "sessionExpired": true });
    ApiResponse::new(401, headers, body.to_string().into_bytes())
}

pub fn alice() -> IdentityRecord {
    IdentityRecord::new(UserId(7), "alice", Role::User).unwrap()
}

pub fn admin() -> IdentityRecord {
    IdentityRecord::new(UserId(1), "root", Role::Admin).unwrap()
}

// =============================================================================
// HARNESS
// =============================================================================

pub const LOGIN_PATH: &str = "/login";

pub struct Harness {
    pub transport: Arc<ScriptedTransport>,
    pub storage: Arc<MemoryStorage>,
    pub identity: Arc<IdentityStore>,
    pub cookies: Arc<MemoryCookieJar>,
    pub notifier: Arc<RecordingNotifier>,
    pub navigator: Arc<RecordingNavigator>,
    pub guard: SessionGuard,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_transport(Arc::new(ScriptedTransport::new()))
    }

    pub fn logged_in(record: IdentityRecord) -> Self {
        let harness = Self::new();
        harness.identity.write(record).unwrap();
        harness
    }

    pub fn with_transport(transport: Arc<ScriptedTransport>) -> Self {
        let storage = Arc::new(MemoryStorage::new());
        let identity = Arc::new(IdentityStore::load(storage.clone()));
        let cookies = Arc::new(MemoryCookieJar::new());
        cookies.set("jwt", "client-visible", "/");
        cookies.set("refreshToken", "client-visible", "/");
        let notifier = Arc::new(RecordingNotifier::new());
        let navigator = Arc::new(RecordingNavigator::new());
        let expiry = Arc::new(SessionExpiryHandler::new(
            identity.clone(),
            cookies.clone(),
            notifier.clone(),
            navigator.clone(),
            LOGIN_PATH,
        ));
        let guard = SessionGuard::new(transport.clone(), expiry);
        Self { transport, storage, identity, cookies, notifier, navigator, guard }
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.transport.clone(), self.guard.clone(), self.identity.clone(), self.cookies.clone())
    }

    pub fn expiry_invocations(&self) -> u64 {
        self.guard.expiry_handler().invocations()
    }
}
