//! Rate models
//!
//! This module contains the core data types of the rate pipeline:
//! - `types` - Type aliases and well-known codes
//! - `rate` - Per-currency rate data (RateRecord, Rate, RateEntry)
//! - `series` - Historical time series (HistoricalSeries, SeriesPoint)
//! - `table` - The filtered result of a snapshot query (RateTable)
//! - `query` - Query specification (QuerySpec, DateInput, DynamicRange)

mod query;
mod rate;
mod series;
mod table;
mod types;

pub use query::{normalize_codes, CurrencyCodes, DateInput, DynamicRange, QuerySpec};
pub use rate::{Rate, RateEntry, RateRecord};
pub use series::{HistoricalSeries, SeriesPoint};
pub use table::RateTable;
pub use types::{CurrencyCode, ProviderId, DEFAULT_CURRENCY_KEY};
