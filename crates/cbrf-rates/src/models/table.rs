use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;

use super::rate::Rate;
use super::series::HistoricalSeries;
use super::types::{CurrencyCode, DEFAULT_CURRENCY_KEY};
use crate::errors::{RatesError, Result};

/// The result of a snapshot query: rates keyed by upper-case currency code,
/// in feed order.
///
/// A table is built once per query and handed to the caller; it is never
/// cached or shared. Only the raw feed bytes go through the cache.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateTable {
    /// Publication date stated by the feed itself
    #[serde(skip_serializing_if = "Option::is_none")]
    published_on: Option<NaiveDate>,

    rates: IndexMap<CurrencyCode, Rate>,

    /// Historical series per currency (dynamic mode only)
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    dynamics: IndexMap<CurrencyCode, HistoricalSeries>,

    #[serde(skip)]
    default_currency: CurrencyCode,
}

impl RateTable {
    pub fn new(rates: IndexMap<CurrencyCode, Rate>, default_currency: impl Into<String>) -> Self {
        Self {
            published_on: None,
            rates,
            dynamics: IndexMap::new(),
            default_currency: default_currency.into().trim().to_uppercase(),
        }
    }

    pub(crate) fn with_published_on(mut self, published_on: Option<NaiveDate>) -> Self {
        self.published_on = published_on;
        self
    }

    pub(crate) fn with_dynamics(mut self, dynamics: IndexMap<CurrencyCode, HistoricalSeries>) -> Self {
        self.dynamics = dynamics;
        self
    }

    /// The full (possibly filtered) mapping.
    pub fn all(&self) -> &IndexMap<CurrencyCode, Rate> {
        &self.rates
    }

    /// Look up one currency.
    ///
    /// `"default"` resolves to the configured default currency. When that
    /// currency is not in the table, the first entry is returned instead;
    /// this matches the behavior callers of the legacy API relied on.
    pub fn one(&self, code: &str) -> Result<&Rate> {
        self.lookup(code).map(|(_, rate)| rate)
    }

    /// Like [`RateTable::one`], also returning the code the lookup resolved to.
    pub fn lookup(&self, code: &str) -> Result<(&str, &Rate)> {
        let (key, rate) = if code == DEFAULT_CURRENCY_KEY {
            self.rates
                .get_key_value(&self.default_currency)
                .or_else(|| self.rates.get_index(0))
                .ok_or_else(|| RatesError::NotFound(self.default_currency.clone()))?
        } else {
            let key = code.trim().to_uppercase();
            self.rates
                .get_key_value(&key)
                .ok_or(RatesError::NotFound(key))?
        };
        Ok((key.as_str(), rate))
    }

    /// Case-insensitive lookup without the default fallback.
    pub fn get(&self, code: &str) -> Option<&Rate> {
        self.rates.get(&code.trim().to_uppercase())
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Historical series attached to `code` in dynamic mode.
    pub fn dynamic(&self, code: &str) -> Option<&HistoricalSeries> {
        self.dynamics.get(&code.trim().to_uppercase())
    }

    pub fn dynamics(&self) -> &IndexMap<CurrencyCode, HistoricalSeries> {
        &self.dynamics
    }

    pub fn published_on(&self) -> Option<NaiveDate> {
        self.published_on
    }

    pub fn default_currency(&self) -> &str {
        &self.default_currency
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.rates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn into_rates(self) -> IndexMap<CurrencyCode, Rate> {
        self.rates
    }
}
