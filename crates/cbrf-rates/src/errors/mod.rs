//! Error types for the rates crate.
//!
//! [`RatesError`] covers every failure a query or conversion can surface.
//! Cache store failures use [`RatesError::Cache`] but are swallowed by the
//! feed client and never reach a caller.

use thiserror::Error;

/// Errors that can occur while fetching, parsing or reading exchange rates.
#[derive(Error, Debug)]
pub enum RatesError {
    /// The query could not be built from the supplied input
    /// (unparseable date, bad currency code, inverted range).
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// The feed could not be fetched and nothing was cached for it.
    #[error("Transport error for {url}: {message}")]
    Transport {
        /// The request URL
        url: String,
        /// What went wrong (status code, network or timeout error)
        message: String,
    },

    /// The feed bytes did not parse as the expected XML structure.
    #[error("Malformed feed: {0}")]
    MalformedFeed(String),

    /// The feed parsed but contained no currency entries.
    #[error("Feed contained no rates")]
    EmptyResult,

    /// The requested currency is absent from the (filtered) rate table.
    #[error("Currency not found: {0}")]
    NotFound(String),

    /// A conversion operand could not be resolved or its rate is zero.
    #[error("Missing rate: {0}")]
    MissingRate(String),

    /// The cache store failed.
    #[error("Cache error: {0}")]
    Cache(String),

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

impl RatesError {
    /// Process exit code for command line front ends.
    ///
    /// | Code | Errors |
    /// |------|--------|
    /// | 1 | `InvalidQuery` |
    /// | 2 | `Transport`, `Cache`, `HttpClient` |
    /// | 3 | `MalformedFeed`, `EmptyResult` |
    /// | 4 | `NotFound`, `MissingRate` |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidQuery(_) => 1,
            Self::Transport { .. } | Self::Cache(_) | Self::HttpClient(_) => 2,
            Self::MalformedFeed(_) | Self::EmptyResult => 3,
            Self::NotFound(_) | Self::MissingRate(_) => 4,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RatesError>;
