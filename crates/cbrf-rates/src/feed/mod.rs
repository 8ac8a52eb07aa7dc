//! Feed retrieval and parsing.
//!
//! - `client` - cache-aware fetching of raw feed bytes (`FeedClient`)
//! - `parser` - XML feed bytes to snapshots and historical series
//! - `wire` - serde mirror of the provider's XML documents

pub mod client;
pub mod parser;
mod wire;

pub use client::{CachePolicy, FeedClient};
pub use parser::{parse_decimal, parse_series, parse_snapshot, Snapshot};
