use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::series::HistoricalSeries;
use super::types::{CurrencyCode, ProviderId};

/// One currency entry of a daily feed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateRecord {
    /// Character code (e.g. "USD")
    pub code: CurrencyCode,

    /// Display name as published by the provider
    pub name: String,

    /// ISO 4217 numeric code, kept as published (e.g. "036")
    pub numeric_code: String,

    /// Unit size the raw feed value was quoted for
    pub nominal: u32,

    /// Rate per single unit (raw value / nominal)
    pub value: Decimal,

    /// Provider identifier used for historical queries
    pub id: ProviderId,
}

/// A rate table entry: the full record, or the bare unit value in short mode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rate {
    Full(RateRecord),
    Short(Decimal),
}

impl Rate {
    /// Unit value regardless of mode.
    pub fn value(&self) -> Decimal {
        match self {
            Rate::Full(record) => record.value,
            Rate::Short(value) => *value,
        }
    }

    /// The full record, if this entry was built in full mode.
    pub fn record(&self) -> Option<&RateRecord> {
        match self {
            Rate::Full(record) => Some(record),
            Rate::Short(_) => None,
        }
    }

    /// Project a record into the requested output mode.
    pub(crate) fn from_record(record: RateRecord, short_mode: bool) -> Self {
        if short_mode {
            Rate::Short(record.value)
        } else {
            Rate::Full(record)
        }
    }
}

/// The answer to a single-currency lookup.
///
/// `code` is the code the lookup resolved to, which differs from the
/// requested one when `"default"` falls back. `dynamic` is set only when the
/// query asked for historical series.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateEntry {
    code: CurrencyCode,
    rate: Rate,
    #[serde(skip_serializing_if = "Option::is_none")]
    dynamic: Option<HistoricalSeries>,
}

impl RateEntry {
    pub fn new(code: impl Into<CurrencyCode>, rate: Rate, dynamic: Option<HistoricalSeries>) -> Self {
        Self {
            code: code.into(),
            rate,
            dynamic,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn rate(&self) -> &Rate {
        &self.rate
    }

    pub fn value(&self) -> Decimal {
        self.rate.value()
    }

    pub fn dynamic(&self) -> Option<&HistoricalSeries> {
        self.dynamic.as_ref()
    }

    pub fn into_rate(self) -> Rate {
        self.rate
    }
}
