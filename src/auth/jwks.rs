use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::DecodingKey;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;

/// At most this many JWKS fetches per [`FETCH_WINDOW`], process-wide.
pub const MAX_FETCHES_PER_WINDOW: usize = 5;
pub const FETCH_WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum JwksError {
    #[error("JWKS fetch failed: {0}")]
    Fetch(String),

    #[error("JWKS fetch rate limit exceeded")]
    RateLimited,
}

/// Source of the remote key set. A trait seam so the cache can be driven by a
/// fake fetch function in tests.
#[async_trait]
pub trait JwksFetcher: Send + Sync {
    async fn fetch(&self) -> Result<JwkSet, JwksError>;
}

/// Fetches the key set from the identity provider's well-known endpoint.
pub struct HttpJwksFetcher {
    client: reqwest::Client,
    jwks_url: String,
}

impl HttpJwksFetcher {
    pub fn new(jwks_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            client,
            jwks_url: jwks_url.into(),
        }
    }
}

#[async_trait]
impl JwksFetcher for HttpJwksFetcher {
    async fn fetch(&self) -> Result<JwkSet, JwksError> {
        let response = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| JwksError::Fetch(e.to_string()))?;

        response
            .json::<JwkSet>()
            .await
            .map_err(|e| JwksError::Fetch(e.to_string()))
    }
}

/// Process-wide cache of signing keys by key id.
///
/// Populated lazily on the first verification needing an unseen kid. Entries
/// live for the process lifetime; between refreshes they may be served stale.
pub struct JwksCache {
    fetcher: Box<dyn JwksFetcher>,
    keys: RwLock<HashMap<String, DecodingKey>>,
    refresh: Mutex<FetchWindow>,
}

/// Sliding-window accounting for refresh calls.
struct FetchWindow {
    recent: VecDeque<Instant>,
}

impl FetchWindow {
    fn try_admit(&mut self) -> Result<(), JwksError> {
        let now = Instant::now();
        while let Some(&oldest) = self.recent.front() {
            if now.duration_since(oldest) >= FETCH_WINDOW {
                self.recent.pop_front();
            } else {
                break;
            }
        }
        if self.recent.len() >= MAX_FETCHES_PER_WINDOW {
            return Err(JwksError::RateLimited);
        }
        self.recent.push_back(now);
        Ok(())
    }
}

impl JwksCache {
    pub fn new(fetcher: Box<dyn JwksFetcher>) -> Self {
        Self {
            fetcher,
            keys: RwLock::new(HashMap::new()),
            refresh: Mutex::new(FetchWindow {
                recent: VecDeque::new(),
            }),
        }
    }

    /// Resolve a key id, refreshing from the remote endpoint on a miss.
    ///
    /// `Ok(None)` means the key set was refreshed and still carries no such
    /// kid. Refreshes are serialized so concurrent misses don't stack
    /// duplicate fetches, and admitted through the rate limiter.
    pub async fn decoding_key(&self, kid: &str) -> Result<Option<DecodingKey>, JwksError> {
        // Fast path: read lock only.
        if let Some(key) = self.keys.read().await.get(kid) {
            return Ok(Some(key.clone()));
        }

        let mut window = self.refresh.lock().await;

        // Another task may have refreshed while we waited for the lock.
        if let Some(key) = self.keys.read().await.get(kid) {
            return Ok(Some(key.clone()));
        }

        window.try_admit()?;
        let jwk_set = self.fetcher.fetch().await?;
        drop(window);

        let mut keys = self.keys.write().await;
        for jwk in &jwk_set.keys {
            let Some(id) = jwk.common.key_id.clone() else {
                continue;
            };
            match DecodingKey::from_jwk(jwk) {
                Ok(key) => {
                    keys.insert(id, key);
                }
                Err(e) => tracing::warn!("skipping unusable JWK {}: {}", id, e),
            }
        }

        Ok(keys.get(kid).cloned())
    }
}
