//! Injected capabilities: the HTTP transport and the cache store.
//!
//! This module contains:
//! - The `Transport` and `CacheStore` traits the feed client depends on
//! - `HttpTransport`, the `reqwest` implementation used in production
//! - `MemoryCache` (in-process, TTL-bounded) and `NoCache` stores
//!
//! The pipeline only ever talks to the traits, so tests and embedding
//! applications can substitute their own transport or shared cache.

mod cache;
mod http;
mod traits;

pub use cache::{MemoryCache, NoCache};
pub use http::HttpTransport;
pub use traits::{CacheStore, Transport};
