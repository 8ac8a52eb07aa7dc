//! Query shaping: from a [`QuerySpec`](crate::models::QuerySpec) to canonical
//! feed requests, and the chainable [`RateQuery`] front end.

mod builder;
mod rate_query;

pub use builder::{cache_key, FeedRequest, QueryBuilder, CACHE_KEY_PREFIX};
pub use rate_query::RateQuery;
