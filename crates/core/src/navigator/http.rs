//! HTTP navigator backed by reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::SiteConfig;

use super::{NavigateError, Navigator};

/// Fetches pages over HTTP with a browser-like user agent.
pub struct HttpNavigator {
    client: Client,
}

impl HttpNavigator {
    /// Create a new HttpNavigator with the given site configuration.
    pub fn new(config: &SiteConfig) -> Result<Self, NavigateError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .cookie_store(true)
            .build()
            .map_err(|e| NavigateError::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Navigator for HttpNavigator {
    async fn goto(&self, url: &str) -> Result<String, NavigateError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                NavigateError::Timeout(url.to_string())
            } else if e.is_connect() {
                NavigateError::ConnectionFailed(e.to_string())
            } else {
                NavigateError::Request(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NavigateError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| NavigateError::Request(format!("Failed to read body: {}", e)))?;

        debug!(url = url, bytes = body.len(), "Page loaded");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_with_default_config() {
        assert!(HttpNavigator::new(&SiteConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_goto_connection_refused() {
        let navigator = HttpNavigator::new(&SiteConfig {
            request_timeout_secs: 2,
            ..Default::default()
        })
        .unwrap();

        // Port 9 (discard) is essentially never listening on localhost.
        let err = navigator.goto("http://127.0.0.1:9/seats").await.unwrap_err();
        assert!(matches!(
            err,
            NavigateError::ConnectionFailed(_) | NavigateError::Request(_) | NavigateError::Timeout(_)
        ));
    }
}
