use std::collections::BTreeSet;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use super::types::CurrencyCode;
use crate::errors::{RatesError, Result};

/// Date formats accepted for textual dates, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y"];

/// An as-of date in any of the accepted input shapes.
#[derive(Clone, Debug, PartialEq)]
pub enum DateInput {
    Date(NaiveDate),
    /// Unix timestamp in seconds, read as a UTC date
    Timestamp(i64),
    Text(String),
}

impl DateInput {
    /// Resolve to a calendar date, failing with `InvalidQuery` when the input
    /// does not describe one.
    pub fn resolve(&self) -> Result<NaiveDate> {
        match self {
            DateInput::Date(date) => Ok(*date),
            DateInput::Timestamp(seconds) => timestamp_to_date(*seconds),
            DateInput::Text(text) => parse_date_text(text),
        }
    }
}

impl From<NaiveDate> for DateInput {
    fn from(date: NaiveDate) -> Self {
        DateInput::Date(date)
    }
}

impl From<i64> for DateInput {
    fn from(seconds: i64) -> Self {
        DateInput::Timestamp(seconds)
    }
}

impl From<&str> for DateInput {
    fn from(text: &str) -> Self {
        DateInput::Text(text.to_string())
    }
}

impl From<String> for DateInput {
    fn from(text: String) -> Self {
        DateInput::Text(text)
    }
}

fn timestamp_to_date(seconds: i64) -> Result<NaiveDate> {
    DateTime::<Utc>::from_timestamp(seconds, 0)
        .map(|dt| dt.date_naive())
        .ok_or_else(|| RatesError::InvalidQuery(format!("Timestamp out of range: {}", seconds)))
}

fn parse_date_text(text: &str) -> Result<NaiveDate> {
    let text = text.trim();

    // Numeric strings are timestamps
    if let Ok(seconds) = text.parse::<i64>() {
        return timestamp_to_date(seconds);
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Ok(date);
        }
    }

    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.date_naive())
        .map_err(|_| RatesError::InvalidQuery(format!("Unparseable date: '{}'", text)))
}

/// Inputs accepted as a currency list: a comma-separated string or a
/// collection of strings (each of which may itself hold several codes).
pub trait CurrencyCodes {
    fn into_raw_codes(self) -> Vec<String>;
}

impl CurrencyCodes for &str {
    fn into_raw_codes(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl CurrencyCodes for String {
    fn into_raw_codes(self) -> Vec<String> {
        vec![self]
    }
}

impl CurrencyCodes for &String {
    fn into_raw_codes(self) -> Vec<String> {
        vec![self.clone()]
    }
}

impl CurrencyCodes for Vec<String> {
    fn into_raw_codes(self) -> Vec<String> {
        self
    }
}

impl CurrencyCodes for Vec<&str> {
    fn into_raw_codes(self) -> Vec<String> {
        self.into_iter().map(str::to_string).collect()
    }
}

impl CurrencyCodes for &[&str] {
    fn into_raw_codes(self) -> Vec<String> {
        self.iter().map(|code| code.to_string()).collect()
    }
}

impl CurrencyCodes for &[String] {
    fn into_raw_codes(self) -> Vec<String> {
        self.to_vec()
    }
}

impl<const N: usize> CurrencyCodes for [&str; N] {
    fn into_raw_codes(self) -> Vec<String> {
        self.iter().map(|code| code.to_string()).collect()
    }
}

/// Split, trim, upper-case and de-duplicate currency codes.
///
/// Blank entries are dropped. Any code with characters other than ASCII
/// letters and digits is rejected.
pub fn normalize_codes(raw: Vec<String>) -> Result<BTreeSet<CurrencyCode>> {
    let mut codes = BTreeSet::new();
    for part in raw.iter().flat_map(|entry| entry.split(',')) {
        let code = part.trim();
        if code.is_empty() {
            continue;
        }
        if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(RatesError::InvalidQuery(format!(
                "Invalid currency code: '{}'",
                code
            )));
        }
        codes.insert(code.to_ascii_uppercase());
    }
    Ok(codes)
}

/// Inclusive date range for historical series.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DynamicRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl DynamicRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self> {
        if from > to {
            return Err(RatesError::InvalidQuery(format!(
                "Range start {} is after range end {}",
                from, to
            )));
        }
        Ok(Self { from, to })
    }

    /// The `days` calendar days ending on (and including) `end`.
    pub fn ending(end: NaiveDate, days: u32) -> Self {
        let span = i64::from(days.max(1)) - 1;
        Self {
            from: end - Duration::days(span),
            to: end,
        }
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }
}

/// What a query asks for. Each `with_*` call returns an updated copy, so a
/// spec can be reused as a base for unrelated queries without leaking state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuerySpec {
    date: Option<NaiveDate>,
    currency_filter: Option<BTreeSet<CurrencyCode>>,
    short_mode: bool,
    include_dynamic: bool,
    dynamic_range: Option<DynamicRange>,
}

impl QuerySpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Restrict results to `codes`. An empty set clears the filter.
    pub fn with_currency_filter(mut self, codes: BTreeSet<CurrencyCode>) -> Self {
        self.currency_filter = if codes.is_empty() { None } else { Some(codes) };
        self
    }

    pub fn with_short_mode(mut self) -> Self {
        self.short_mode = true;
        self
    }

    /// Request per-currency series; `None` uses the default range.
    pub fn with_dynamic(mut self, range: Option<DynamicRange>) -> Self {
        self.include_dynamic = true;
        self.dynamic_range = range;
        self
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn currency_filter(&self) -> Option<&BTreeSet<CurrencyCode>> {
        self.currency_filter.as_ref()
    }

    pub fn short_mode(&self) -> bool {
        self.short_mode
    }

    pub fn include_dynamic(&self) -> bool {
        self.include_dynamic
    }

    pub fn dynamic_range(&self) -> Option<DynamicRange> {
        self.dynamic_range
    }
}
