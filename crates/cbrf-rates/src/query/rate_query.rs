use futures::future::try_join_all;
use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::client::CbrfRates;
use crate::errors::{RatesError, Result};
use crate::feed::{parse_series, parse_snapshot, Snapshot};
use crate::models::{
    normalize_codes, CurrencyCode, CurrencyCodes, DateInput, DynamicRange, HistoricalSeries,
    QuerySpec, RateEntry, RateRecord, RateTable,
};

/// A chainable query against the rates client.
///
/// Setters consume and return the query; terminal reads (`all`, `one`,
/// `dynamic`) borrow it and may be repeated. Every read goes through the
/// feed client, so repeats within the cache TTL reuse the stored bytes.
///
/// ```ignore
/// let table = rates
///     .query()
///     .with_date("2021-01-01")?
///     .with_currencies("USD,EUR")?
///     .with_short_mode()
///     .all()
///     .await?;
/// ```
#[derive(Clone)]
pub struct RateQuery<'a> {
    rates: &'a CbrfRates,
    spec: QuerySpec,
}

impl<'a> RateQuery<'a> {
    pub(crate) fn new(rates: &'a CbrfRates, spec: QuerySpec) -> Self {
        Self { rates, spec }
    }

    /// Set the as-of date. Accepts a `NaiveDate`, a Unix timestamp or a
    /// date string.
    pub fn with_date(mut self, date: impl Into<DateInput>) -> Result<Self> {
        let date = date.into().resolve()?;
        self.spec = self.spec.with_date(date);
        Ok(self)
    }

    /// Restrict the result to the given codes: `"USD,EUR"`, `["USD", "EUR"]`
    /// or a `Vec` of either.
    pub fn with_currencies(mut self, codes: impl CurrencyCodes) -> Result<Self> {
        let codes = normalize_codes(codes.into_raw_codes())?;
        self.spec = self.spec.with_currency_filter(codes);
        Ok(self)
    }

    /// Return bare unit values instead of full records.
    pub fn with_short_mode(mut self) -> Self {
        self.spec = self.spec.with_short_mode();
        self
    }

    /// Attach a historical series for each matched currency, over the
    /// default range (the configured number of days ending today).
    pub fn with_dynamic(mut self) -> Self {
        self.spec = self.spec.with_dynamic(None);
        self
    }

    /// Attach historical series over an explicit inclusive range.
    pub fn with_dynamic_range(
        mut self,
        from: impl Into<DateInput>,
        to: impl Into<DateInput>,
    ) -> Result<Self> {
        let range = DynamicRange::new(from.into().resolve()?, to.into().resolve()?)?;
        self.spec = self.spec.with_dynamic(Some(range));
        Ok(self)
    }

    pub fn spec(&self) -> &QuerySpec {
        &self.spec
    }

    /// The full (possibly filtered) rate table.
    pub async fn all(&self) -> Result<RateTable> {
        let snapshot = self.filtered_snapshot().await?;

        let dynamics = if self.spec.include_dynamic() {
            self.resolve_series(&snapshot).await?
        } else {
            IndexMap::new()
        };

        Ok(snapshot
            .into_table(&self.rates.config().default_currency, self.spec.short_mode())
            .with_dynamics(dynamics))
    }

    /// One currency; `"default"` resolves to the configured default currency
    /// (see [`RateTable::one`] for the fallback when it is absent).
    ///
    /// In dynamic mode only the resolved currency's series is fetched.
    pub async fn one(&self, code: &str) -> Result<RateEntry> {
        let snapshot = self.filtered_snapshot().await?;
        let table = snapshot
            .clone()
            .into_table(&self.rates.config().default_currency, self.spec.short_mode());
        let (resolved, rate) = table.lookup(code)?;

        let dynamic = match snapshot.records().get(resolved) {
            Some(record) if self.spec.include_dynamic() => {
                self.fetch_series(record, self.series_range()).await?
            }
            _ => None,
        };

        Ok(RateEntry::new(resolved, rate.clone(), dynamic))
    }

    /// Historical series for every currency the query matches, whether or
    /// not `with_dynamic` was called.
    pub async fn dynamic(&self) -> Result<IndexMap<CurrencyCode, HistoricalSeries>> {
        let snapshot = self.filtered_snapshot().await?;
        self.resolve_series(&snapshot).await
    }

    async fn filtered_snapshot(&self) -> Result<Snapshot> {
        let request = self.rates.builder().snapshot_request(&self.spec);
        let snapshot = self.rates.feed().fetch_with(&request, parse_snapshot).await?;

        Ok(match self.spec.currency_filter() {
            Some(codes) => snapshot.filter(codes),
            None => snapshot,
        })
    }

    fn series_range(&self) -> DynamicRange {
        self.spec
            .dynamic_range()
            .unwrap_or_else(|| self.rates.default_dynamic_range())
    }

    /// `None` when the record carries no provider id to query by.
    async fn fetch_series(
        &self,
        record: &RateRecord,
        range: DynamicRange,
    ) -> Result<Option<HistoricalSeries>> {
        if record.id.is_empty() {
            warn!("No provider id for {}, skipping its series", record.code);
            return Ok(None);
        }
        let request = self.rates.builder().series_request(&record.id, range);
        let series = self.rates.feed().fetch_with(&request, parse_series).await?;
        Ok(Some(series))
    }

    /// Second phase: one series fetch per remaining currency. Fetches run
    /// concurrently; results keep table order.
    async fn resolve_series(
        &self,
        snapshot: &Snapshot,
    ) -> Result<IndexMap<CurrencyCode, HistoricalSeries>> {
        let range = self.series_range();
        debug!(
            "Resolving {} series from {} to {}",
            snapshot.records().len(),
            range.from(),
            range.to()
        );

        let pending = snapshot.records().values().map(|record| async move {
            let series = self.fetch_series(record, range).await?;
            Ok::<_, RatesError>(series.map(|series| (record.code.clone(), series)))
        });

        Ok(try_join_all(pending).await?.into_iter().flatten().collect())
    }
}
