//! Capability traits consumed by the feed client.

use std::time::Duration;

use async_trait::async_trait;

use crate::errors::Result;

/// Fetches a URL and returns the raw response body.
///
/// Implementations fail with [`RatesError::Transport`](crate::RatesError::Transport)
/// on a non-success status, a network error or a timeout. They must not retry.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Key-value blob store with per-entry expiry.
///
/// Must tolerate concurrent `get`/`set` on the same key: a reader sees
/// either no entry or a whole one. Errors returned here are treated by the
/// feed client as a cache miss and never reach the caller.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()>;
}
