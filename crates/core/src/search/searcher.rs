//! Showing searcher backed by the ticketing site's movie times page.

use async_trait::async_trait;
use reqwest::Url;
use tracing::debug;

use crate::navigator::Navigator;

use super::{parse_search_page, SearchError, SearchQuery, Showing, ShowingSearcher};

/// Finds showings by loading and parsing the movie times page for a zip code.
pub struct PageShowingSearcher<N> {
    navigator: N,
    base_url: String,
}

impl<N: Navigator> PageShowingSearcher<N> {
    /// Create a searcher for the site at `base_url` (e.g., "https://www.fandango.com").
    pub fn new(navigator: N, base_url: impl Into<String>) -> Self {
        Self {
            navigator,
            base_url: base_url.into(),
        }
    }

    /// Build the movie times URL for a query.
    pub fn search_url(&self, query: &SearchQuery) -> Result<Url, SearchError> {
        let url = format!(
            "{}/{}_movietimes?date={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(&query.zip),
            query.date.format("%Y-%m-%d")
        );
        Url::parse(&url).map_err(|e| SearchError::InvalidUrl(format!("{}: {}", url, e)))
    }
}

#[async_trait]
impl<N: Navigator> ShowingSearcher for PageShowingSearcher<N> {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Showing>, SearchError> {
        let url = self.search_url(query)?;
        debug!(url = %url, "Searching");

        let html = self
            .navigator
            .goto(url.as_str())
            .await
            .map_err(|source| SearchError::Navigate {
                url: url.to_string(),
                source,
            })?;

        let showings = parse_search_page(&html, query, &url)?;
        debug!(num_showings = showings.len(), "Finished parsing showings");
        Ok(showings)
    }
}
