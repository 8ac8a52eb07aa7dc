//! The rates client: configuration, feed access and the public entry points.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::debug;

use crate::config::RatesConfig;
use crate::converter::Converter;
use crate::errors::Result;
use crate::feed::{CachePolicy, FeedClient};
use crate::models::{DateInput, DynamicRange, QuerySpec};
use crate::provider::{CacheStore, HttpTransport, MemoryCache, Transport};
use crate::query::{QueryBuilder, RateQuery};

/// Entry point for rate queries and conversions.
///
/// Cloning is cheap: clones share the transport and the cache store.
#[derive(Clone)]
pub struct CbrfRates {
    config: Arc<RatesConfig>,
    feed: FeedClient,
    builder: QueryBuilder,
    converter: Converter,
}

impl CbrfRates {
    /// Client over HTTP with an in-process cache, configured by `config`.
    pub fn new(config: RatesConfig) -> Result<Self> {
        let transport = Arc::new(HttpTransport::with_timeout(config.request_timeout())?);
        Ok(Self::with_capabilities(
            config,
            transport,
            Arc::new(MemoryCache::new()),
        ))
    }

    /// Client over caller-supplied transport and cache store.
    pub fn with_capabilities(
        config: RatesConfig,
        transport: Arc<dyn Transport>,
        cache: Arc<dyn CacheStore>,
    ) -> Self {
        let feed = FeedClient::new(transport, cache, config.cache_policy());
        let builder = QueryBuilder::from_config(&config);
        let converter = Converter::new(config.home_currencies.clone());
        Self {
            config: Arc::new(config),
            feed,
            builder,
            converter,
        }
    }

    /// Cache fetched feeds for `ttl`.
    pub fn enable_cache(mut self, ttl: Duration) -> Self {
        self.feed = self.feed.with_policy(CachePolicy::enabled(ttl));
        self
    }

    /// Fetch every feed directly, bypassing the cache store.
    pub fn disable_cache(mut self) -> Self {
        self.feed = self.feed.with_policy(CachePolicy::disabled());
        self
    }

    pub fn config(&self) -> &RatesConfig {
        &self.config
    }

    pub fn cache_policy(&self) -> CachePolicy {
        self.feed.policy()
    }

    /// Start a new query for the latest published rates.
    pub fn query(&self) -> RateQuery<'_> {
        RateQuery::new(self, QuerySpec::new())
    }

    /// Convert `amount` from one currency to another at the rates published
    /// for `date`.
    pub async fn convert(
        &self,
        date: impl Into<DateInput>,
        from: &str,
        to: &str,
        amount: Decimal,
        precision: u32,
    ) -> Result<Decimal> {
        let query = self.query().with_date(date)?;
        self.convert_with(query, from, to, amount, precision).await
    }

    /// Convert at the latest published rates.
    pub async fn convert_latest(
        &self,
        from: &str,
        to: &str,
        amount: Decimal,
        precision: u32,
    ) -> Result<Decimal> {
        self.convert_with(self.query(), from, to, amount, precision)
            .await
    }

    async fn convert_with(
        &self,
        query: RateQuery<'_>,
        from: &str,
        to: &str,
        amount: Decimal,
        precision: u32,
    ) -> Result<Decimal> {
        let table = query
            .with_currencies([from, to])?
            .with_short_mode()
            .all()
            .await?;
        let result = self.converter.convert(&table, from, to, amount, precision)?;
        debug!("Converted {} {} -> {} {}", amount, from, result, to);
        Ok(result)
    }

    pub(crate) fn feed(&self) -> &FeedClient {
        &self.feed
    }

    pub(crate) fn builder(&self) -> &QueryBuilder {
        &self.builder
    }

    /// The configured number of days ending today (UTC).
    pub(crate) fn default_dynamic_range(&self) -> DynamicRange {
        DynamicRange::ending(Utc::now().date_naive(), self.config.dynamic_days)
    }
}
