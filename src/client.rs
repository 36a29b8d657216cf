//! `ReviewClient`: every component wired around one identity store.
//!
//! ARCHITECTURE
//! ============
//! ```text
//! AuthService ──┬── Transport (login / register / logout / refresh)
//!               └── SessionGuard ──► Transport
//! ReviewsApi, FavoritesApi, UsersApi, LogsApi ──► SessionGuard
//! SessionGuard ──► SessionExpiryHandler ──► IdentityStore, CookieJar, Notifier, Navigator
//! ```
//! The store is shared by reference; nothing else holds identity state.

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;

use std::sync::Arc;

use crate::api::{FavoritesApi, LogsApi, ReviewsApi, UsersApi};
use crate::auth::{self, AppRoute, AuthService, RouteDecision};
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::identity::{IdentityRecord, IdentityStore, JsonFileStorage, MemoryStorage, Storage};
use crate::net::{HttpTransport, SessionExpiryHandler, SessionGuard, Transport};
use crate::platform::{CookieJar, LogNavigator, LogNotifier, MemoryCookieJar, Navigator, Notifier};

pub struct ReviewClient {
    identity: Arc<IdentityStore>,
    guard: SessionGuard,
    auth: AuthService,
    reviews: ReviewsApi,
    favorites: FavoritesApi,
    users: UsersApi,
    logs: LogsApi,
}

impl ReviewClient {
    /// HTTP transport, its cookie jar, logging host seams, and storage per
    /// `config.identity_file`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::builder(config.clone()).build()
    }

    #[must_use]
    pub fn builder(config: ClientConfig) -> ReviewClientBuilder {
        ReviewClientBuilder::new(config)
    }

    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    #[must_use]
    pub fn reviews(&self) -> &ReviewsApi {
        &self.reviews
    }

    #[must_use]
    pub fn favorites(&self) -> &FavoritesApi {
        &self.favorites
    }

    #[must_use]
    pub fn users(&self) -> &UsersApi {
        &self.users
    }

    #[must_use]
    pub fn logs(&self) -> &LogsApi {
        &self.logs
    }

    #[must_use]
    pub fn identity(&self) -> Option<IdentityRecord> {
        self.identity.read()
    }

    #[must_use]
    pub fn identity_store(&self) -> &Arc<IdentityStore> {
        &self.identity
    }

    /// The guard, for session-aware calls this crate does not wrap.
    #[must_use]
    pub fn session(&self) -> &SessionGuard {
        &self.guard
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        auth::is_authenticated(self.identity().as_ref())
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        auth::is_admin(self.identity().as_ref())
    }

    #[must_use]
    pub fn check_route(&self, route: AppRoute) -> RouteDecision {
        auth::check_route(route, self.identity().as_ref())
    }
}

// =============================================================================
// BUILDER
// =============================================================================

/// Injects host seams; anything left unset gets the `from_config` default.
pub struct ReviewClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
    storage: Option<Arc<dyn Storage>>,
    cookies: Option<Arc<dyn CookieJar>>,
    navigator: Option<Arc<dyn Navigator>>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl ReviewClientBuilder {
    fn new(config: ClientConfig) -> Self {
        Self { config, transport: None, storage: None, cookies: None, navigator: None, notifier: None }
    }

    /// Without an explicit cookie jar, a custom transport gets an in-memory one.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    #[must_use]
    pub fn storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.storage = Some(storage);
        self
    }

    #[must_use]
    pub fn cookies(mut self, cookies: Arc<dyn CookieJar>) -> Self {
        self.cookies = Some(cookies);
        self
    }

    #[must_use]
    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    #[must_use]
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if the default HTTP transport cannot be built.
    pub fn build(self) -> Result<ReviewClient, ClientError> {
        let (transport, default_cookies): (Arc<dyn Transport>, Arc<dyn CookieJar>) = match self.transport {
            Some(transport) => (transport, Arc::new(MemoryCookieJar::new())),
            None => {
                let http = HttpTransport::new(&self.config)?;
                let jar = Arc::new(http.cookie_jar());
                (Arc::new(http), jar)
            }
        };
        let cookies = self.cookies.unwrap_or(default_cookies);

        let storage: Arc<dyn Storage> = match (self.storage, &self.config.identity_file) {
            (Some(storage), _) => storage,
            (None, Some(path)) => Arc::new(JsonFileStorage::open(path.clone())),
            (None, None) => Arc::new(MemoryStorage::new()),
        };
        let identity = Arc::new(IdentityStore::load(storage));

        let expiry = Arc::new(SessionExpiryHandler::new(
            Arc::clone(&identity),
            Arc::clone(&cookies),
            self.notifier.unwrap_or_else(|| Arc::new(LogNotifier)),
            self.navigator.unwrap_or_else(|| Arc::new(LogNavigator)),
            self.config.login_path.clone(),
        ));
        let guard = SessionGuard::new(Arc::clone(&transport), expiry);

        tracing::info!(
            base_url = %self.config.base_url,
            logged_in = identity.is_present(),
            "review client ready"
        );

        Ok(ReviewClient {
            auth: AuthService::new(transport, guard.clone(), Arc::clone(&identity), cookies),
            reviews: ReviewsApi::new(guard.clone()),
            favorites: FavoritesApi::new(guard.clone()),
            users: UsersApi::new(guard.clone()),
            logs: LogsApi::new(guard.clone()),
            identity,
            guard,
        })
    }
}
