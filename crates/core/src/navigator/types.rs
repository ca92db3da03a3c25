//! Types for page navigation.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while navigating to a page.
#[derive(Debug, Clone, Error)]
pub enum NavigateError {
    /// Request timed out.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Failed to connect to the site.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The site answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// Any other request failure.
    #[error("request failed: {0}")]
    Request(String),

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    /// The crawl was cancelled while navigating.
    #[error("navigation cancelled")]
    Cancelled,
}

impl NavigateError {
    /// Whether this error came from cancellation rather than the site.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, NavigateError::Cancelled)
    }
}

/// Fetches pages by URL.
///
/// Implementations must be thread-safe (Send + Sync) for use across async tasks.
#[async_trait]
pub trait Navigator: Send + Sync {
    /// Navigate to `url` and return the page markup.
    async fn goto(&self, url: &str) -> Result<String, NavigateError>;
}

#[async_trait]
impl<N: Navigator + ?Sized> Navigator for std::sync::Arc<N> {
    async fn goto(&self, url: &str) -> Result<String, NavigateError> {
        (**self).goto(url).await
    }
}
