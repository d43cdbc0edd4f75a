//! Ranked story delivery: list fetch, item fetches, bounded streaming.
//!
//! # Design
//! A run spawns one producer task. The producer fetches the identifier list
//! once, truncates it to `max_items`, fetches the items in rank order and
//! publishes each one into a bounded `mpsc` queue of `queue_capacity` slots. A
//! full queue suspends the producer until the consumer drains it. When the
//! producer stops, it drops the queue sender (closing the queue) and reports
//! its outcome on a `oneshot`: `Ok(())`, or the first error in rank order.
//!
//! With `concurrency == 1` exactly one item request is in flight at a time;
//! the only overlap is between the producer fetching and the consumer
//! draining. With `concurrency > 1` up to that many item requests run at
//! once through `StreamExt::buffered`, which yields results in input order,
//! so delivery order never changes. Either way an identifier is requested at
//! most once, and a failure stops the run with every earlier-ranked item
//! already delivered.
//!
//! Every run owns a `CancellationToken`. `StoryStream::cancel` and dropping
//! the `StoryStream` fire it; the producer watches it around the list fetch,
//! each item fetch and each publish, and ends with `FeedError::Cancelled`.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::stream::{self, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use crate::client::FeedClient;
use crate::error::{FeedError, Result};
use crate::types::{Category, Item};

/// Parameters of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchOptions {
    /// Upper bound on delivered items; the list length may lower it further.
    pub max_items: usize,
    /// Slots in the output queue. Zero is treated as one.
    pub queue_capacity: usize,
    /// Item requests allowed in flight at once. Zero is treated as one.
    pub concurrency: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            max_items: 30,
            queue_capacity: 10,
            concurrency: 1,
        }
    }
}

impl FetchOptions {
    pub fn new(max_items: usize) -> Self {
        Self {
            max_items,
            ..Self::default()
        }
    }

    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }
}

/// Consumer side of a streaming run.
///
/// Receive items with [`next`](Self::next) (or through the `Stream` impl) until
/// it yields `None`, then call [`finish`](Self::finish) for the terminal
/// outcome. Dropping the stream cancels the run.
#[derive(Debug)]
pub struct StoryStream {
    items: mpsc::Receiver<Item>,
    outcome: oneshot::Receiver<Result<()>>,
    cancel: CancellationToken,
}

impl StoryStream {
    /// Next item in rank order, or `None` once the queue is closed.
    pub async fn next(&mut self) -> Option<Item> {
        self.items.recv().await
    }

    /// Ask the producer to stop. Items already queued stay receivable.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Stop receiving and wait for the terminal outcome.
    ///
    /// Items still queued are discarded. A producer that was still running
    /// is cancelled, including any fetch in flight, and the outcome is
    /// `FeedError::Cancelled`. A run that already published everything
    /// reports its own outcome.
    pub async fn finish(mut self) -> Result<()> {
        self.cancel.cancel();
        self.items.close();
        // Unblock a producer parked on a full queue.
        while self.items.try_recv().is_ok() {}
        match (&mut self.outcome).await {
            Ok(outcome) => outcome,
            Err(_) => Err(FeedError::TaskFailed(
                "feed task ended without reporting an outcome".to_string(),
            )),
        }
    }
}

impl Stream for StoryStream {
    type Item = Item;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Item>> {
        self.items.poll_recv(cx)
    }
}

impl Drop for StoryStream {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Everything a collecting run obtained.
///
/// `items` holds exactly the items delivered before the run ended; on failure
/// these are the items ranked ahead of the failing identifier.
#[derive(Debug)]
pub struct StoryBatch {
    pub items: Vec<Item>,
    pub error: Option<FeedError>,
}

impl StoryBatch {
    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// Items, their count and the terminal error, in one tuple.
    pub fn into_parts(self) -> (Vec<Item>, usize, Option<FeedError>) {
        let count = self.items.len();
        (self.items, count, self.error)
    }

    /// Items on success; on failure the error, discarding partial items.
    pub fn into_result(self) -> Result<Vec<Item>> {
        match self.error {
            None => Ok(self.items),
            Some(err) => Err(err),
        }
    }
}

impl FeedClient {
    /// Start a run and return its consumer side immediately.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn stream_stories(&self, category: Category, options: FetchOptions) -> StoryStream {
        let (item_tx, item_rx) = mpsc::channel(options.queue_capacity.max(1));
        let (outcome_tx, outcome_rx) = oneshot::channel();
        let cancel = CancellationToken::new();

        let client = self.clone();
        let token = cancel.clone();
        tokio::spawn(async move {
            let outcome = produce(&client, category, options, item_tx, &token).await;
            match &outcome {
                Ok(()) => {}
                Err(FeedError::Cancelled) => tracing::debug!(%category, "feed run cancelled"),
                Err(e) => tracing::warn!(%category, error = %e, "feed run stopped early"),
            }
            let _ = outcome_tx.send(outcome);
        });

        StoryStream {
            items: item_rx,
            outcome: outcome_rx,
            cancel,
        }
    }

    /// Run to completion and collect every delivered item.
    ///
    /// A failure does not discard what was already delivered: the batch
    /// carries those items next to the error.
    pub async fn fetch_stories(&self, category: Category, options: FetchOptions) -> StoryBatch {
        let mut stream = self.stream_stories(category, options);
        let mut items = Vec::new();
        while let Some(item) = stream.next().await {
            items.push(item);
        }
        let error = stream.finish().await.err();
        StoryBatch { items, error }
    }
}

async fn produce(
    client: &FeedClient,
    category: Category,
    options: FetchOptions,
    item_tx: mpsc::Sender<Item>,
    cancel: &CancellationToken,
) -> Result<()> {
    let ids = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(FeedError::Cancelled),
        ids = client.fetch_story_ids(category) => ids?,
    };

    let wanted = ids.len().min(options.max_items);
    tracing::debug!(
        %category,
        listed = ids.len(),
        wanted,
        concurrency = options.concurrency.max(1),
        "fetching stories"
    );

    let fetches = stream::iter(ids.into_iter().take(wanted))
        .map(|id| {
            let client = client.clone();
            async move { client.fetch_item(id).await }
        })
        .buffered(options.concurrency.max(1));
    tokio::pin!(fetches);

    let mut delivered = 0usize;
    while delivered < wanted {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FeedError::Cancelled),
            next = fetches.next() => next,
        };
        let Some(result) = next else { break };
        let item = result?;
        let id = item.id;

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FeedError::Cancelled),
            sent = item_tx.send(item) => {
                if sent.is_err() {
                    // Consumer closed the queue.
                    return Err(FeedError::Cancelled);
                }
            }
        }
        delivered += 1;
        tracing::debug!(%category, id, rank = delivered, "published story");
    }

    tracing::info!(%category, delivered, "feed run complete");
    Ok(())
}
