//! Transport seam for the host-does-IO pattern.
//!
//! # Design
//! The client never opens sockets itself. It resolves a locator, hands it to a
//! `Transport`, and decodes whatever bytes come back. `HttpTransport` is the
//! reqwest-backed implementation for real use; hosts with their own HTTP stack
//! implement the trait directly, and tests plug in canned replies.
//!
//! A transport instance is shared by every fetch of a run (and by concurrent
//! runs), so implementations must be `Send + Sync`.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::config::ClientConfig;
use crate::error::TransportError;

/// Performs a GET against a locator and returns the raw response body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<Bytes, TransportError>;
}

/// `Transport` backed by a pooled `reqwest::Client`.
///
/// Non-2xx statuses are reported as `TransportError::Status`; the body of such
/// a response is discarded.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| TransportError::Request {
                url: config.base_url.clone(),
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }

    /// Wrap an already configured client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<Bytes, TransportError> {
        tracing::debug!(url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| request_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response.bytes().await.map_err(|e| request_error(url, e))
    }
}

fn request_error(url: &str, err: reqwest::Error) -> TransportError {
    TransportError::Request {
        url: url.to_string(),
        message: err.to_string(),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport() -> HttpTransport {
        HttpTransport::new(&ClientConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn get_returns_body_bytes_unchanged() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v0/item/8863.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"id":8863}"#))
            .mount(&server)
            .await;

        let url = format!("{}/v0/item/8863.json", server.uri());
        let body = transport().get(&url).await.unwrap();
        assert_eq!(&body[..], br#"{"id":8863}"#);
    }

    #[tokio::test]
    async fn get_passes_null_sentinel_through() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v0/item/0.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .mount(&server)
            .await;

        let url = format!("{}/v0/item/0.json", server.uri());
        let body = transport().get(&url).await.unwrap();
        assert_eq!(&body[..], b"null");
    }

    #[tokio::test]
    async fn get_maps_error_status_to_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let url = format!("{}/v0/topstories.json", server.uri());
        let err = transport().get(&url).await.unwrap_err();
        assert_eq!(err, TransportError::Status { url, status: 503 });
    }

    #[tokio::test]
    async fn with_client_uses_supplied_client() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v0/beststories.json"))
            .and(header("user-agent", "custom-client/2.0"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[3,1,2]"))
            .expect(1)
            .mount(&server)
            .await;

        let client = reqwest::Client::builder()
            .user_agent("custom-client/2.0")
            .build()
            .unwrap();
        let transport = HttpTransport::with_client(client);
        let body = transport
            .get(&format!("{}/v0/beststories.json", server.uri()))
            .await
            .unwrap();
        assert_eq!(&body[..], b"[3,1,2]");
    }

    #[tokio::test]
    async fn get_sends_configured_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("user-agent", "feed-test/1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .expect(1)
            .mount(&server)
            .await;

        let config = ClientConfig {
            user_agent: "feed-test/1.0".to_string(),
            ..ClientConfig::default()
        };
        let transport = HttpTransport::new(&config).unwrap();
        let body = transport
            .get(&format!("{}/v0/newstories.json", server.uri()))
            .await
            .unwrap();
        assert_eq!(&body[..], b"[]");
    }

    #[tokio::test]
    async fn get_reports_unreachable_host_as_request_error() {
        // Port 9 (discard) on localhost is not expected to accept HTTP.
        let url = "http://127.0.0.1:9/v0/topstories.json";
        let err = transport().get(url).await.unwrap_err();
        assert!(matches!(err, TransportError::Request { url: ref u, .. } if u == url));
    }
}
