//! Async client for a ranked, read-only story API.
//!
//! # Overview
//! Fetches a category's ranked identifier list, then each identified item,
//! and streams the items to the caller in rank order through a bounded queue.
//! The first failure ends a run; items delivered before it are kept.
//!
//! # Design
//! - `FeedClient` holds only a base URL and a shared `Transport`. The caller
//!   chooses the transport: `HttpTransport` (reqwest) or its own.
//! - Locator building and body decoding are pure methods, separate from the
//!   fetches that wrap them, so they can be checked against test vectors.
//! - `stream_stories` returns a `StoryStream` fed by one producer task;
//!   `fetch_stories` drains it into a `StoryBatch`.
//! - Runs are cancellable and stop when their `StoryStream` is dropped.
//!
//! ```no_run
//! use hnfeed_core::{filter_by_score, sort_by_score, Category, ClientConfig, FeedClient, FetchOptions};
//!
//! # async fn run() -> hnfeed_core::Result<()> {
//! let client = FeedClient::from_config(&ClientConfig::default())?;
//! let batch = client.fetch_stories(Category::Top, FetchOptions::new(30)).await;
//! if let Some(err) = &batch.error {
//!     eprintln!("partial result ({} items): {err}", batch.count());
//! }
//! let mut stories = filter_by_score(batch.items, 100);
//! sort_by_score(&mut stories);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod feed;
pub mod http;
pub mod ranking;
pub mod types;

pub use client::{FeedClient, ItemCells};
pub use config::ClientConfig;
pub use error::{FeedError, Result, TransportError};
pub use feed::{FetchOptions, StoryBatch, StoryStream};
pub use http::{HttpTransport, Transport};
pub use ranking::{filter_by_score, sort_by_score};
pub use types::{Category, Item, ItemId};
