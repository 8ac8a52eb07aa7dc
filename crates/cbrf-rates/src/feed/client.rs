//! Cache-aware feed fetching.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::provider::{CacheStore, Transport};
use crate::query::FeedRequest;

/// Whether fetched bytes are cached, and for how long.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CachePolicy {
    pub enabled: bool,
    pub ttl: Duration,
}

impl CachePolicy {
    pub fn enabled(ttl: Duration) -> Self {
        Self { enabled: true, ttl }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ttl: Duration::ZERO,
        }
    }
}

/// Resolves feed requests to raw bytes, consulting the cache first.
///
/// With caching disabled the store is bypassed entirely. Cache failures are
/// logged and treated as a miss; only transport failures reach the caller.
#[derive(Clone)]
pub struct FeedClient {
    transport: Arc<dyn Transport>,
    cache: Arc<dyn CacheStore>,
    policy: CachePolicy,
}

impl FeedClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        cache: Arc<dyn CacheStore>,
        policy: CachePolicy,
    ) -> Self {
        Self {
            transport,
            cache,
            policy,
        }
    }

    /// A client sharing this one's transport and store under another policy.
    pub fn with_policy(&self, policy: CachePolicy) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            cache: Arc::clone(&self.cache),
            policy,
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Raw feed bytes for `request`.
    pub async fn fetch(&self, request: &FeedRequest) -> Result<Vec<u8>> {
        self.fetch_with(request, |bytes| Ok(bytes.to_vec())).await
    }

    /// Fetch `request` and run `parse` over the bytes.
    ///
    /// Fresh bytes are stored only once `parse` accepts them, so an error page
    /// or a truncated body is never served from the cache. A cached entry that
    /// `parse` rejects is treated as a miss.
    pub async fn fetch_with<T>(
        &self,
        request: &FeedRequest,
        parse: impl Fn(&[u8]) -> Result<T>,
    ) -> Result<T> {
        if !self.policy.enabled {
            let bytes = self.transport.fetch(request.url()).await?;
            return parse(&bytes);
        }

        match self.cache.get(request.cache_key()).await {
            Ok(Some(bytes)) => match parse(&bytes) {
                Ok(value) => {
                    debug!("Cache hit for {} ({})", request.url(), request.cache_key());
                    return Ok(value);
                }
                Err(e) => warn!("Discarding cached entry for {}: {}", request.url(), e),
            },
            Ok(None) => debug!("Cache miss for {}", request.url()),
            Err(e) => warn!("Cache read failed for {}, fetching directly: {}", request.url(), e),
        }

        info!("Fetching {}", request.url());
        let bytes = self.transport.fetch(request.url()).await?;
        let value = parse(&bytes)?;

        if let Err(e) = self
            .cache
            .set(request.cache_key(), bytes, self.policy.ttl)
            .await
        {
            warn!("Cache write failed for {}: {}", request.url(), e);
        }

        Ok(value)
    }
}
