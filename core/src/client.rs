//! Story list and item fetching.
//!
//! # Design
//! `FeedClient` holds the base URL and a shared `Transport`, nothing else, and
//! is cheap to clone into background tasks. Each resource has a locator
//! builder (`list_url` / `item_url`), a pure decoder (`parse_story_ids` /
//! `parse_item`) and an async fetch that joins the two around one
//! `Transport::get`. Keeping the decoders free of I/O lets the test vectors
//! drive them directly.
//!
//! The upstream answers a missing or deleted item with HTTP 200 and the
//! literal body `null`. That body is checked before any JSON decoding and
//! reported as `FeedError::NotFound`.

use std::fmt;
use std::sync::Arc;

use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::config::ClientConfig;
use crate::error::{FeedError, Result};
use crate::http::{HttpTransport, Transport};
use crate::types::{Category, Item, ItemId};

const NOT_FOUND_SENTINEL: &[u8] = b"null";

/// Async client for the story feed.
#[derive(Clone)]
pub struct FeedClient {
    base_url: Arc<str>,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for FeedClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl FeedClient {
    pub fn new(base_url: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').into(),
            transport,
        }
    }

    /// Build a client that talks HTTP through reqwest using `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::new(&config.base_url, Arc::new(transport)))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn list_url(&self, category: Category) -> String {
        format!("{}/{}", self.base_url, category.resource())
    }

    pub fn item_url(&self, id: ItemId) -> String {
        format!("{}/item/{id}.json", self.base_url)
    }

    /// Decode a list body into identifiers, keeping their rank order.
    pub fn parse_story_ids(&self, category: Category, body: &[u8]) -> Result<Vec<ItemId>> {
        serde_json::from_slice(body).map_err(|source| FeedError::Decode {
            resource: category.resource().to_string(),
            source,
        })
    }

    /// Decode an item body, mapping the `null` sentinel to `NotFound`.
    pub fn parse_item(&self, id: ItemId, body: &[u8]) -> Result<Item> {
        if body == NOT_FOUND_SENTINEL {
            return Err(FeedError::NotFound(id));
        }
        serde_json::from_slice(body).map_err(|source| FeedError::Decode {
            resource: format!("item/{id}.json"),
            source,
        })
    }

    /// Fetch the ranked identifier list for `category`. One request, no retries.
    pub async fn fetch_story_ids(&self, category: Category) -> Result<Vec<ItemId>> {
        let body = self.transport.get(&self.list_url(category)).await?;
        let ids = self.parse_story_ids(category, &body)?;
        tracing::debug!(%category, count = ids.len(), "fetched story list");
        Ok(ids)
    }

    /// Fetch and decode a single item, resolving when the item is available.
    pub async fn fetch_item(&self, id: ItemId) -> Result<Item> {
        let body = self.transport.get(&self.item_url(id)).await?;
        self.parse_item(id, &body)
    }

    /// Start fetching `id` on a background task and return immediately.
    ///
    /// The task resolves exactly one of the two cells and drops the sender of
    /// the other, so both receivers complete: one with a value, the other as
    /// closed. Cancelling `cancel` stops the fetch and resolves the error cell
    /// with `FeedError::Cancelled`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn_fetch_item(&self, id: ItemId, cancel: CancellationToken) -> ItemCells {
        let (item_tx, item_rx) = oneshot::channel();
        let (error_tx, error_rx) = oneshot::channel();
        let client = self.clone();

        tokio::spawn(async move {
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(FeedError::Cancelled),
                result = client.fetch_item(id) => result,
            };
            // The receiver may already be gone; there is nobody left to tell.
            match result {
                Ok(item) => {
                    let _ = item_tx.send(item);
                }
                Err(e) => {
                    let _ = error_tx.send(e);
                }
            }
        });

        ItemCells {
            item: item_rx,
            error: error_rx,
        }
    }
}

/// One-shot result cells of a background item fetch.
///
/// Exactly one cell receives a value. Both cells close when the task ends, so
/// `tokio::select!` over them never waits forever.
#[derive(Debug)]
pub struct ItemCells {
    pub item: oneshot::Receiver<Item>,
    pub error: oneshot::Receiver<FeedError>,
}

impl ItemCells {
    /// Wait for whichever cell resolves and fold it into a `Result`.
    pub async fn wait(self) -> Result<Item> {
        if let Ok(item) = self.item.await {
            return Ok(item);
        }
        match self.error.await {
            Ok(err) => Err(err),
            Err(_) => Err(FeedError::TaskFailed(
                "item fetch task ended without a result".to_string(),
            )),
        }
    }
}
