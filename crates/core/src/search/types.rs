//! Types for showing discovery.

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::navigator::NavigateError;

/// What to search for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// All or part of the movie title (case-insensitive).
    pub title: String,
    /// Day to search showings for.
    pub date: NaiveDate,
    /// 5 digit zip code to search near.
    pub zip: String,
}

/// A single screening of a movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Showing {
    /// Link to the seat page.
    pub link: String,
    /// Theater name.
    pub theater: String,
    /// Movie title as listed by the theater.
    pub title: String,
    /// Scheduled start time (theater local time).
    pub when: NaiveDateTime,
    /// Failed seat checks so far. Only the crawler touches this.
    #[serde(default)]
    pub retries: u32,
}

impl Showing {
    pub fn new(
        link: impl Into<String>,
        theater: impl Into<String>,
        title: impl Into<String>,
        when: NaiveDateTime,
    ) -> Self {
        Self {
            link: link.into(),
            theater: theater.into(),
            title: title.into(),
            when,
            retries: 0,
        }
    }

    /// Order by theater, then start time.
    pub fn cmp_by_theater_time(&self, other: &Showing) -> Ordering {
        self.theater
            .cmp(&other.theater)
            .then_with(|| self.when.cmp(&other.when))
    }
}

/// Errors that abort a search.
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    /// The search page could not be loaded.
    #[error("failed to load page at {url:?}: {source}")]
    Navigate {
        url: String,
        #[source]
        source: NavigateError,
    },

    /// The search page has no theaters on it.
    #[error("failed to find theaters on page {0:?}")]
    NoTheaters(String),

    /// The search URL could not be built.
    #[error("invalid search URL: {0}")]
    InvalidUrl(String),
}

impl SearchError {
    /// Whether the search was abandoned because the crawl was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SearchError::Navigate { source, .. } if source.is_cancelled())
    }
}

/// Finds showings for a query.
///
/// Implementations must be thread-safe (Send + Sync) for use across async tasks.
#[async_trait]
pub trait ShowingSearcher: Send + Sync {
    /// Return matching showings in the order the site lists them.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Showing>, SearchError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 11, 15)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap())
    }

    #[test]
    fn test_sort_by_theater_then_time() {
        let mut showings = vec![
            Showing::new("c", "MGoBlog", "Dune", at(16, 20)),
            Showing::new("b", "Google", "Dune", at(19, 11)),
            Showing::new("a", "Google", "Dune", at(9, 15)),
        ];
        showings.sort_by(Showing::cmp_by_theater_time);

        let links: Vec<_> = showings.iter().map(|s| s.link.as_str()).collect();
        assert_eq!(links, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_showing_serialization_defaults_retries() {
        let json = r#"{"link":"l","theater":"t","title":"m","when":"2024-11-15T19:30:00"}"#;
        let showing: Showing = serde_json::from_str(json).unwrap();
        assert_eq!(showing.retries, 0);
        assert_eq!(showing.when, at(19, 30));
    }

    #[test]
    fn test_error_display() {
        let err = SearchError::NoTheaters("https://site/48104_movietimes".to_string());
        assert_eq!(
            err.to_string(),
            "failed to find theaters on page \"https://site/48104_movietimes\""
        );

        let err = SearchError::Navigate {
            url: "u".to_string(),
            source: NavigateError::Cancelled,
        };
        assert!(err.is_cancelled());
    }
}
