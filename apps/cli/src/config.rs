use cbrf_rates::RatesConfig;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::Cli;

/// Load `.env` into the process environment. Must run before
/// [`init_tracing`] so `RUST_LOG` and `CBRF_LOG_FORMAT` from the file apply.
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

pub fn init_tracing() {
    let log_format = std::env::var("CBRF_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so stdout stays valid JSON
    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

/// Environment first, then command line overrides.
pub fn load_config(cli: &Cli) -> RatesConfig {
    let mut config = RatesConfig::from_env();

    if cli.no_cache {
        config.cache_enabled = false;
    }
    if let Some(ttl) = cli.cache_ttl {
        config.cache_enabled = true;
        config.cache_ttl_secs = ttl;
    }
    if let Some(timeout) = cli.timeout {
        config.request_timeout_secs = timeout;
    }
    if let Some(currency) = &cli.default_currency {
        config.default_currency = currency.trim().to_uppercase();
    }
    config
}
