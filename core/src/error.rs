//! Error types for the feed client.
//!
//! # Design
//! `TransportError` belongs to the transport seam: whatever executes the GET
//! reports through it, and the client passes it through untouched inside
//! `FeedError::Transport`. `NotFound` is kept apart from `Decode` because the
//! upstream encodes a missing or deleted item as a literal `null` body, and
//! callers treat "gone" differently from "garbled".

use thiserror::Error;

use crate::types::ItemId;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, FeedError>;

/// Failure reported by a `Transport` implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The request could not be completed (connect, timeout, body read).
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// The server answered with a non-2xx status.
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },
}

/// Errors returned by `FeedClient` operations.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The body was not JSON of the expected shape.
    #[error("failed to decode {resource}: {source}")]
    Decode {
        resource: String,
        #[source]
        source: serde_json::Error,
    },

    /// The upstream answered `null` for this identifier.
    #[error("item {0} does not exist")]
    NotFound(ItemId),

    /// A category name that does not map to any list.
    #[error("unknown story category: {0:?}")]
    InvalidCategory(String),

    /// The run was cancelled before it completed.
    #[error("fetch cancelled")]
    Cancelled,

    /// A background fetch task panicked or was aborted.
    #[error("background fetch task failed: {0}")]
    TaskFailed(String),
}

impl FeedError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FeedError::NotFound(_))
    }
}
