//! Mock navigator for testing.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::navigator::{NavigateError, Navigator};

type Response = Result<String, NavigateError>;

/// Mock implementation of the Navigator trait.
///
/// Serves canned pages keyed by URL:
/// - A URL with one scripted response returns it on every visit
/// - A URL with several scripted responses returns them in order, repeating the last one
/// - An unknown URL fails with a 404
///
/// # Example
///
/// ```rust,ignore
/// use seatscout_core::testing::{MockNavigator, fixtures};
///
/// let navigator = MockNavigator::new();
/// navigator.set_page("https://site/seats/1", fixtures::seat_page(&fixtures::OPEN_THEATER)).await;
///
/// let html = navigator.goto("https://site/seats/1").await?;
/// assert_eq!(navigator.recorded_visits().await, vec!["https://site/seats/1"]);
/// ```
pub struct MockNavigator {
    /// Scripted responses per URL.
    responses: Arc<RwLock<HashMap<String, VecDeque<Response>>>>,
    /// Every URL passed to `goto`, in order.
    visits: Arc<RwLock<Vec<String>>>,
    /// If set, the next visit fails with this error regardless of URL.
    next_error: Arc<RwLock<Option<NavigateError>>>,
}

impl std::fmt::Debug for MockNavigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockNavigator")
            .field("responses", &"<responses>")
            .field("visits", &"<visits>")
            .field("next_error", &"<next_error>")
            .finish()
    }
}

impl Default for MockNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNavigator {
    /// Create a new mock navigator that knows no pages.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(RwLock::new(HashMap::new())),
            visits: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Serve `html` for every visit to `url`.
    pub async fn set_page(&self, url: &str, html: impl Into<String>) {
        self.set_responses(url, vec![Ok(html.into())]).await;
    }

    /// Serve `pages` for successive visits to `url`. The last page repeats.
    pub async fn set_pages(&self, url: &str, pages: Vec<String>) {
        self.set_responses(url, pages.into_iter().map(Ok).collect())
            .await;
    }

    /// Fail every visit to `url` with `error`.
    pub async fn fail_url(&self, url: &str, error: NavigateError) {
        self.set_responses(url, vec![Err(error)]).await;
    }

    /// Script successive responses for `url`. The last response repeats.
    pub async fn set_responses(&self, url: &str, responses: Vec<Response>) {
        self.responses
            .write()
            .await
            .insert(url.to_string(), responses.into());
    }

    /// Configure the next visit to fail with the given error.
    pub async fn fail_next(&self, error: NavigateError) {
        *self.next_error.write().await = Some(error);
    }

    /// Get every URL visited so far.
    pub async fn recorded_visits(&self) -> Vec<String> {
        self.visits.read().await.clone()
    }

    /// Get the number of visits made.
    pub async fn visit_count(&self) -> usize {
        self.visits.read().await.len()
    }

    /// Get the number of visits made to `url`.
    pub async fn visit_count_for(&self, url: &str) -> usize {
        self.visits
            .read()
            .await
            .iter()
            .filter(|visited| *visited == url)
            .count()
    }
}

#[async_trait]
impl Navigator for MockNavigator {
    async fn goto(&self, url: &str) -> Result<String, NavigateError> {
        self.visits.write().await.push(url.to_string());

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        let mut responses = self.responses.write().await;
        let Some(queue) = responses.get_mut(url) else {
            return Err(NavigateError::Status {
                status: 404,
                url: url.to_string(),
            });
        };

        let response = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        response.unwrap_or_else(|| {
            Err(NavigateError::Status {
                status: 404,
                url: url.to_string(),
            })
        })
    }
}
