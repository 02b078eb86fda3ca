use std::fmt;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::RwLock;
use reqwest::Client;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

use crate::api::endpoints::CatalogEndpoints;
use crate::api::schema::{TokenSchema, validate};
use crate::error::{AuthFetchError, Result};

/// How long an issued token is trusted when the catalog does not say.
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(55 * 60);
/// A cached token is replaced once it is this close to expiring.
pub const DEFAULT_EXPIRY_BUFFER: Duration = Duration::from_secs(5 * 60);

/// Token lifetime rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPolicy {
    pub lifetime: Duration,
    pub expiry_buffer: Duration,
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self {
            lifetime: DEFAULT_TOKEN_LIFETIME,
            expiry_buffer: DEFAULT_EXPIRY_BUFFER,
        }
    }
}

impl TokenPolicy {
    fn expiry_from(&self, issued_at: DateTime<Utc>) -> DateTime<Utc> {
        issued_at
            .checked_add_signed(delta(self.lifetime))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

fn delta(duration: Duration) -> TimeDelta {
    TimeDelta::from_std(duration).unwrap_or(TimeDelta::MAX)
}

/// A bearer token and the instant it stops being trusted.
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct CachedCredential {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl fmt::Debug for CachedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedCredential")
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl CachedCredential {
    /// Usable while expiry lies strictly beyond `now + buffer`.
    pub fn is_usable(&self, now: DateTime<Utc>, buffer: Duration) -> bool {
        now.checked_add_signed(delta(buffer))
            .is_some_and(|deadline| self.expires_at > deadline)
    }
}

/// Holds at most one credential.
#[derive(Debug, Default)]
pub struct CredentialStore {
    slot: RwLock<Option<CachedCredential>>,
}

impl CredentialStore {
    pub fn empty() -> Self {
        Self::default()
    }

    /// A store that starts out holding `token`.
    pub fn seeded(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            slot: RwLock::new(Some(CachedCredential {
                value: token.into(),
                expires_at,
            })),
        }
    }

    pub(crate) fn current(&self) -> Option<CachedCredential> {
        self.slot.read().clone()
    }

    pub(crate) fn replace(&self, credential: CachedCredential) {
        *self.slot.write() = Some(credential);
    }

    pub(crate) fn clear(&self) {
        self.slot.write().take();
    }
}

/// Fetches, caches and invalidates the catalog bearer token.
///
/// Concurrent callers that find the cache stale share a single request to
/// the token endpoint.
pub struct TokenManager {
    http: Client,
    auth_url: Url,
    policy: TokenPolicy,
    store: CredentialStore,
    refresh_lock: Mutex<()>,
}

impl fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenManager")
            .field("auth_url", &self.auth_url.as_str())
            .field("policy", &self.policy)
            .field("has_token", &self.store.current().is_some())
            .finish()
    }
}

impl TokenManager {
    pub fn new(
        http: Client,
        endpoints: &CatalogEndpoints,
        policy: TokenPolicy,
    ) -> Self {
        Self {
            http,
            auth_url: endpoints.auth_token(),
            policy,
            store: CredentialStore::empty(),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Replaces the credential store, e.g. with a seeded one.
    pub fn with_store(mut self, store: CredentialStore) -> Self {
        self.store = store;
        self
    }

    /// Expiry of the cached credential, whether or not it is still usable.
    /// The token itself is only handed out by [`Self::get_token`].
    pub fn cached_expiry(&self) -> Option<DateTime<Utc>> {
        self.store.current().map(|credential| credential.expires_at)
    }

    /// A token valid for at least the expiry buffer.
    pub async fn get_token(&self) -> Result<String> {
        if let Some(token) = self.usable_token() {
            return Ok(token);
        }

        let _refresh = self.refresh_lock.lock().await;
        // Another caller may have refreshed while this one waited.
        if let Some(token) = self.usable_token() {
            debug!("reusing token refreshed by a concurrent caller");
            return Ok(token);
        }

        self.fetch_token().await
    }

    /// Drops the cached token so the next [`Self::get_token`] fetches anew.
    pub fn invalidate_token(&self) {
        debug!("invalidating cached catalog token");
        self.store.clear();
    }

    fn usable_token(&self) -> Option<String> {
        self.store
            .current()
            .filter(|credential| {
                credential.is_usable(Utc::now(), self.policy.expiry_buffer)
            })
            .map(|credential| credential.value)
    }

    async fn fetch_token(&self) -> Result<String> {
        debug!(url = %self.auth_url, "requesting catalog token");

        let response = self
            .http
            .get(self.auth_url.clone())
            .send()
            .await
            .map_err(AuthFetchError::Unreachable)?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "token endpoint refused to issue a token");
            return Err(AuthFetchError::Status { status }.into());
        }

        let bytes = response
            .bytes()
            .await
            .map_err(AuthFetchError::Unreachable)?;
        let body: serde_json::Value =
            serde_json::from_slice(&bytes).map_err(AuthFetchError::Decode)?;
        let issued = validate::<TokenSchema>(&body)
            .map_err(AuthFetchError::InvalidBody)?;

        let expires_at = self.policy.expiry_from(Utc::now());
        self.store.replace(CachedCredential {
            value: issued.token.clone(),
            expires_at,
        });
        info!(%expires_at, "catalog token refreshed");

        Ok(issued.token)
    }
}
