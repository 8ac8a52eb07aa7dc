//! CBRF Rates
//!
//! Official exchange rates of the Central Bank of the Russian Federation,
//! read from its public XML feeds.
//!
//! # Overview
//!
//! The crate supports:
//! - The daily rate table for any date, in full or value-only form
//! - Single-currency lookups with a configurable default currency
//! - Historical series per currency over a date range
//! - Point-in-time conversion between any two published currencies
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |    RateQuery     | --> |    QuerySpec     |  (immutable query shape)
//! +------------------+     +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |   QueryBuilder   |  (canonical URL + cache key)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |    FeedClient    |  (CacheStore, then Transport)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |    FeedParser    |  (XML -> Snapshot / series)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |    RateTable     |  (filtered, projected)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |    Converter     |
//!                          +------------------+
//! ```
//!
//! # Example
//!
//! ```ignore
//! use cbrf_rates::{CbrfRates, RatesConfig};
//! use rust_decimal_macros::dec;
//!
//! let rates = CbrfRates::new(RatesConfig::default())?;
//! let usd = rates.query().with_date("2021-01-01")?.one("USD").await?;
//! let rub = rates.convert("2021-01-01", "USD", "RUB", dec!(100), 2).await?;
//! ```

pub mod client;
pub mod config;
pub mod converter;
pub mod errors;
pub mod feed;
pub mod models;
pub mod provider;
pub mod query;

pub use client::CbrfRates;
pub use config::RatesConfig;
pub use converter::{Converter, DEFAULT_PRECISION};
pub use errors::{RatesError, Result};
pub use feed::{CachePolicy, FeedClient, Snapshot};
pub use models::{
    CurrencyCode, DateInput, DynamicRange, HistoricalSeries, QuerySpec, Rate, RateEntry,
    RateRecord, RateTable, SeriesPoint,
};
pub use provider::{CacheStore, HttpTransport, MemoryCache, NoCache, Transport};
pub use query::{FeedRequest, QueryBuilder, RateQuery};
