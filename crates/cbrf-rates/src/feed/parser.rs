//! XML feed parsing.
//!
//! Both feeds quote decimals with a comma separator and, in the daily feed,
//! per `Nominal` units. Parsed values are always unit rates:
//! `parse_decimal(Value) / Nominal`.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::NaiveDate;
use encoding_rs::{Encoding, UTF_8};
use indexmap::IndexMap;
use quick_xml::events::Event;
use quick_xml::Reader;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::wire::{DailyDocument, DynamicDocument, ValuteEntry, ROOT_ELEMENT};
use crate::errors::{RatesError, Result};
use crate::models::{CurrencyCode, HistoricalSeries, Rate, RateRecord, RateTable, SeriesPoint};

/// Date format used by the provider in attributes.
const FEED_DATE_FORMAT: &str = "%d.%m.%Y";

/// A parsed daily feed, before filtering and output projection.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    published_on: Option<NaiveDate>,
    records: IndexMap<CurrencyCode, RateRecord>,
}

impl Snapshot {
    pub fn published_on(&self) -> Option<NaiveDate> {
        self.published_on
    }

    pub fn records(&self) -> &IndexMap<CurrencyCode, RateRecord> {
        &self.records
    }

    /// Keep only the codes in `codes`, preserving feed order. Requested codes
    /// absent from the feed are simply not present afterwards.
    pub fn filter(mut self, codes: &BTreeSet<CurrencyCode>) -> Self {
        self.records.retain(|code, _| codes.contains(code));
        self
    }

    /// Project into a rate table in full or short mode.
    pub fn into_table(self, default_currency: &str, short_mode: bool) -> RateTable {
        let rates = self
            .records
            .into_iter()
            .map(|(code, record)| (code, Rate::from_record(record, short_mode)))
            .collect();
        RateTable::new(rates, default_currency).with_published_on(self.published_on)
    }
}

/// Parse a provider decimal such as `"75,50"`.
///
/// The comma separator is replaced by a dot exactly once per separator; a
/// value that still does not parse (for example one with two separators) is
/// rejected.
pub fn parse_decimal(raw: &str) -> Result<Decimal> {
    let normalized = raw.trim().replace(',', ".");
    Decimal::from_str(&normalized)
        .map_err(|e| RatesError::MalformedFeed(format!("Invalid decimal '{}': {}", raw.trim(), e)))
}

fn parse_nominal(raw: &str) -> Result<u32> {
    match raw.trim().parse::<u32>() {
        Ok(nominal) if nominal > 0 => Ok(nominal),
        _ => Err(RatesError::MalformedFeed(format!(
            "Invalid nominal '{}'",
            raw.trim()
        ))),
    }
}

fn unit_value(raw_value: &str, nominal: u32) -> Result<Decimal> {
    let value = parse_decimal(raw_value)?;
    if value <= Decimal::ZERO {
        return Err(RatesError::MalformedFeed(format!(
            "Non-positive value '{}'",
            raw_value.trim()
        )));
    }
    Ok(value / Decimal::from(nominal))
}

/// Encoding named in the XML declaration, if any.
fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(256)]);
    let head = head.trim_start_matches('\u{feff}').trim_start();
    if !head.starts_with("<?xml") {
        return None;
    }
    let declaration = &head[..head.find("?>")?];
    let after = &declaration[declaration.find("encoding")? + "encoding".len()..];
    let after = after.trim_start().strip_prefix('=')?.trim_start();
    let quote = after.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let label = &after[1..];
    let label = &label[..label.find(quote)?];
    Encoding::for_label(label.as_bytes())
}

/// Decode feed bytes to text. The provider publishes `windows-1251`.
fn decode_document(bytes: &[u8]) -> Result<Cow<'_, str>> {
    let encoding = declared_encoding(bytes).unwrap_or(UTF_8);
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(RatesError::MalformedFeed(format!(
            "Invalid {} byte sequence",
            used.name()
        )));
    }
    Ok(text)
}

/// Fail unless the first element of the document is the expected root.
fn ensure_root(text: &str) -> Result<()> {
    let mut reader = Reader::from_str(text);
    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) | Ok(Event::Empty(element)) => {
                return if element.name().as_ref() == ROOT_ELEMENT {
                    Ok(())
                } else {
                    Err(RatesError::MalformedFeed(format!(
                        "Unexpected root element <{}>",
                        String::from_utf8_lossy(element.name().as_ref())
                    )))
                };
            }
            Ok(Event::Eof) => {
                return Err(RatesError::MalformedFeed(
                    "Document has no root element".to_string(),
                ))
            }
            Ok(_) => continue,
            Err(e) => return Err(RatesError::MalformedFeed(e.to_string())),
        }
    }
}

fn record_from_entry(entry: ValuteEntry) -> Result<RateRecord> {
    let code = entry.char_code.trim().to_uppercase();
    if code.is_empty() {
        return Err(RatesError::MalformedFeed(
            "Entry without CharCode".to_string(),
        ));
    }
    let nominal = parse_nominal(&entry.nominal)?;
    let value = unit_value(&entry.value, nominal)?;

    Ok(RateRecord {
        code,
        name: entry.name.trim().to_string(),
        numeric_code: entry.num_code.trim().to_string(),
        nominal,
        value,
        id: entry.id.trim().to_string(),
    })
}

/// Parse a daily feed into a snapshot.
///
/// Fails with `MalformedFeed` when the bytes are not a `ValCurs` document or
/// any entry is invalid, and with `EmptyResult` when it lists no currencies.
/// No partial snapshot is ever returned.
pub fn parse_snapshot(bytes: &[u8]) -> Result<Snapshot> {
    let text = decode_document(bytes)?;
    ensure_root(&text)?;

    let document: DailyDocument =
        quick_xml::de::from_str(&text).map_err(|e| RatesError::MalformedFeed(e.to_string()))?;

    let published_on = document.date.as_deref().and_then(|raw| {
        NaiveDate::parse_from_str(raw.trim(), FEED_DATE_FORMAT)
            .map_err(|_| warn!("Ignoring unparseable feed date '{}'", raw))
            .ok()
    });

    let mut records = IndexMap::with_capacity(document.entries.len());
    for entry in document.entries {
        let record = record_from_entry(entry)?;
        // First occurrence wins
        if records.contains_key(&record.code) {
            debug!("Skipping duplicate entry for {}", record.code);
            continue;
        }
        records.insert(record.code.clone(), record);
    }

    if records.is_empty() {
        return Err(RatesError::EmptyResult);
    }

    debug!("Parsed {} rates (published {:?})", records.len(), published_on);
    Ok(Snapshot {
        published_on,
        records,
    })
}

/// Parse a historical feed into a series, in document order.
///
/// A `ValCurs` root with no records yields an empty series.
pub fn parse_series(bytes: &[u8]) -> Result<HistoricalSeries> {
    let text = decode_document(bytes)?;
    ensure_root(&text)?;

    let document: DynamicDocument =
        quick_xml::de::from_str(&text).map_err(|e| RatesError::MalformedFeed(e.to_string()))?;

    let points = document
        .records
        .into_iter()
        .map(|record| {
            let date = NaiveDate::parse_from_str(record.date.trim(), FEED_DATE_FORMAT).map_err(
                |_| RatesError::MalformedFeed(format!("Invalid record date '{}'", record.date)),
            )?;
            let nominal = match record.nominal.as_deref() {
                Some(raw) => parse_nominal(raw)?,
                None => 1,
            };
            let value = unit_value(&record.value, nominal)?;
            Ok(SeriesPoint { date, value })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(HistoricalSeries::new(points))
}
