//! Feed fetching and parsing for RSS/Atom sources.
//!
//! - [`parser`] converts raw RSS/Atom bytes into [`ParsedFeed`] using `feed-rs`
//! - [`fetcher`] retrieves a source over HTTP with timeout, size limit and
//!   bounded retry, behind the [`FeedFetcher`] trait
//!
//! # Example
//!
//! ```ignore
//! use tagwatch::feed::{FeedFetcher, HttpFetcher};
//!
//! let fetcher = HttpFetcher::from_config(&config)?;
//! let feed = fetcher.fetch("https://krebsonsecurity.com/feed/").await?;
//! ```

mod fetcher;
mod parser;

pub use fetcher::{FeedFetcher, FetchError, HttpFetcher};
pub use parser::{parse_feed, ParsedEntry, ParsedFeed};
