use chrono::NaiveDate;

use crate::config::RatesConfig;
use crate::models::{DynamicRange, QuerySpec};

/// Prefix of every cache key written by this crate.
pub const CACHE_KEY_PREFIX: &str = "CBRF_CACHE_";

/// Date format of the provider's query parameters.
const REQUEST_DATE_FORMAT: &str = "%d/%m/%Y";

/// Stable cache key for a canonical request URL.
pub fn cache_key(url: &str) -> String {
    format!("{}{:x}", CACHE_KEY_PREFIX, md5::compute(url.as_bytes()))
}

/// A fully-resolved feed request and the key its bytes are cached under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedRequest {
    url: String,
    cache_key: String,
}

impl FeedRequest {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let cache_key = cache_key(&url);
        Self { url, cache_key }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn cache_key(&self) -> &str {
        &self.cache_key
    }
}

fn format_request_date(date: NaiveDate) -> String {
    date.format(REQUEST_DATE_FORMAT).to_string()
}

/// Builds canonical URLs for the daily and historical endpoints.
///
/// Only parameters that change the fetched bytes go into a URL. The
/// currency filter and short mode are applied after parsing, so two queries
/// differing only in those share one cache entry.
#[derive(Clone, Debug)]
pub struct QueryBuilder {
    daily_url: String,
    dynamic_url: String,
}

impl QueryBuilder {
    pub fn new(daily_url: impl Into<String>, dynamic_url: impl Into<String>) -> Self {
        Self {
            daily_url: daily_url.into(),
            dynamic_url: dynamic_url.into(),
        }
    }

    pub fn from_config(config: &RatesConfig) -> Self {
        Self::new(config.daily_url.clone(), config.dynamic_url.clone())
    }

    /// Request for the daily snapshot. Without a date the provider returns
    /// its latest published table.
    pub fn snapshot_request(&self, spec: &QuerySpec) -> FeedRequest {
        match spec.date() {
            Some(date) => FeedRequest::new(format!(
                "{}?date_req={}",
                self.daily_url,
                format_request_date(date)
            )),
            None => FeedRequest::new(self.daily_url.clone()),
        }
    }

    /// Request for one currency's series over `range`.
    pub fn series_request(&self, provider_id: &str, range: DynamicRange) -> FeedRequest {
        FeedRequest::new(format!(
            "{}?date_req1={}&date_req2={}&VAL_NM_RQ={}",
            self.dynamic_url,
            format_request_date(range.from()),
            format_request_date(range.to()),
            provider_id
        ))
    }
}
