//! Client configuration.
//!
//! All fields have defaults, so an empty TOML/JSON document or
//! `ClientConfig::default()` targets the public API with sane limits.

use serde::{Deserialize, Serialize};

/// Public endpoint of the upstream API.
pub const DEFAULT_BASE_URL: &str = "https://hacker-news.firebaseio.com/v0";

/// Settings shared by the HTTP transport and the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL that list and item resources are resolved against.
    pub base_url: String,
    /// Per-request timeout applied by `HttpTransport`.
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            user_agent: concat!("hnfeed/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
