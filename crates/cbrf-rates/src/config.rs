//! Runtime configuration.

use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::feed::CachePolicy;

pub const DEFAULT_DAILY_URL: &str = "http://www.cbr.ru/scripts/XML_daily.asp";
pub const DEFAULT_DYNAMIC_URL: &str = "http://www.cbr.ru/scripts/XML_dynamic.asp";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RatesConfig {
    /// Daily snapshot endpoint
    pub daily_url: String,
    /// Historical range endpoint
    pub dynamic_url: String,
    /// Currency returned by `one("default")`
    pub default_currency: String,
    /// Codes treated as the provider's own currency (rate 1, not listed in feeds)
    pub home_currencies: Vec<String>,
    pub cache_enabled: bool,
    pub cache_ttl_secs: u64,
    pub request_timeout_secs: u64,
    /// Length of the default historical range, ending today
    pub dynamic_days: u32,
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            daily_url: DEFAULT_DAILY_URL.to_string(),
            dynamic_url: DEFAULT_DYNAMIC_URL.to_string(),
            default_currency: "USD".to_string(),
            home_currencies: vec!["RUB".to_string(), "RUR".to_string()],
            cache_enabled: true,
            cache_ttl_secs: 86_400,
            request_timeout_secs: 30,
            dynamic_days: 7,
        }
    }
}

impl RatesConfig {
    /// Read `CBRF_*` environment variables over the defaults.
    ///
    /// Values that fail to parse are logged and the default is kept.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let parsed = |key: &str, default: u64| -> u64 {
            match lookup(key) {
                Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                    warn!("Invalid {}='{}', using {}", key, raw, default);
                    default
                }),
                None => default,
            }
        };

        let cache_enabled = match lookup("CBRF_CACHE_ENABLED") {
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    warn!("Invalid CBRF_CACHE_ENABLED='{}', using {}", raw, defaults.cache_enabled);
                    defaults.cache_enabled
                }
            },
            None => defaults.cache_enabled,
        };

        let home_currencies = lookup("CBRF_HOME_CURRENCIES")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_uppercase())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|codes| !codes.is_empty())
            .unwrap_or(defaults.home_currencies);

        let dynamic_days = u32::try_from(parsed("CBRF_DYNAMIC_DAYS", u64::from(defaults.dynamic_days)))
            .ok()
            .filter(|days| *days > 0)
            .unwrap_or(defaults.dynamic_days);

        Self {
            daily_url: lookup("CBRF_DAILY_URL").unwrap_or(defaults.daily_url),
            dynamic_url: lookup("CBRF_DYNAMIC_URL").unwrap_or(defaults.dynamic_url),
            default_currency: lookup("CBRF_DEFAULT_CURRENCY")
                .map(|code| code.trim().to_uppercase())
                .unwrap_or(defaults.default_currency),
            home_currencies,
            cache_enabled,
            cache_ttl_secs: parsed("CBRF_CACHE_TTL_SECS", defaults.cache_ttl_secs),
            request_timeout_secs: parsed("CBRF_REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs),
            dynamic_days,
        }
    }

    pub fn cache_policy(&self) -> CachePolicy {
        if self.cache_enabled {
            CachePolicy::enabled(Duration::from_secs(self.cache_ttl_secs))
        } else {
            CachePolicy::disabled()
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
