//! Mock showing searcher for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::search::{SearchError, SearchQuery, Showing, ShowingSearcher};

/// Mock implementation of the ShowingSearcher trait.
///
/// Returns the configured showings for any query and records every query
/// it receives.
///
/// # Example
///
/// ```rust,ignore
/// use seatscout_core::testing::{MockShowingSearcher, fixtures};
///
/// let searcher = MockShowingSearcher::new();
/// searcher.set_showings(vec![
///     fixtures::showing("https://site/seats/1", "Alpha Cinemas"),
///     fixtures::showing("https://site/seats/2", "Beta Theater"),
/// ]).await;
///
/// let showings = searcher.search(&query).await?;
/// assert_eq!(showings.len(), 2);
/// assert_eq!(searcher.search_count().await, 1);
/// ```
pub struct MockShowingSearcher {
    /// Configured showings to return.
    showings: Arc<RwLock<Vec<Showing>>>,
    /// Recorded search queries.
    searches: Arc<RwLock<Vec<SearchQuery>>>,
    /// If set, the next search will fail with this error.
    next_error: Arc<RwLock<Option<SearchError>>>,
}

impl std::fmt::Debug for MockShowingSearcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockShowingSearcher")
            .field("showings", &"<showings>")
            .field("searches", &"<searches>")
            .field("next_error", &"<next_error>")
            .finish()
    }
}

impl Default for MockShowingSearcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MockShowingSearcher {
    /// Create a new mock searcher that finds nothing.
    pub fn new() -> Self {
        Self {
            showings: Arc::new(RwLock::new(Vec::new())),
            searches: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Set the showings to return for subsequent searches.
    pub async fn set_showings(&self, showings: Vec<Showing>) {
        *self.showings.write().await = showings;
    }

    /// Get recorded search queries.
    pub async fn recorded_searches(&self) -> Vec<SearchQuery> {
        self.searches.read().await.clone()
    }

    /// Get the number of searches performed.
    pub async fn search_count(&self) -> usize {
        self.searches.read().await.len()
    }

    /// Configure the next search to fail with the given error.
    pub async fn set_next_error(&self, error: SearchError) {
        *self.next_error.write().await = Some(error);
    }
}

#[async_trait]
impl ShowingSearcher for MockShowingSearcher {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Showing>, SearchError> {
        self.searches.write().await.push(query.clone());

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        Ok(self.showings.read().await.clone())
    }
}
