//! Types for the crawler.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::CrawlConfig;
use crate::search::{SearchError, SearchQuery, Showing};
use crate::seatmap::SeatCheckError;

/// Most seat checks a single showing gets before it's marked failed.
pub const MAX_RETRIES: u32 = 3;

/// Errors that abort a crawl.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// Showing discovery failed.
    #[error("failed to get showings: {0}")]
    Search(#[from] SearchError),

    /// A one-off seat check failed.
    #[error("failed to check seats: {0}")]
    SeatCheck(#[from] SeatCheckError),

    /// The crawl was cancelled or ran out of time.
    #[error("crawl cancelled")]
    Cancelled,
}

/// Everything one crawl needs to know. Immutable for the whole crawl.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlRequest {
    /// What to search for.
    pub query: SearchQuery,
    /// Number of contiguous seats to find.
    pub num_seats: usize,
    /// Whether to retry failed seat checks.
    pub retry: bool,
    /// Max number of showings to check (None = unlimited).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub showing_limit: Option<usize>,
}

impl CrawlRequest {
    /// Build a request for `query` with the crawl knobs from `config`.
    pub fn new(query: SearchQuery, config: &CrawlConfig) -> Self {
        Self {
            query,
            num_seats: config.num_seats,
            retry: config.retry,
            showing_limit: config.showing_limit,
        }
    }
}

/// Output of a crawl.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlResult {
    /// Showings with a good block of seats.
    pub good: Vec<Showing>,
    /// Showings checked successfully but without enough good seats.
    pub bad: Vec<Showing>,
    /// Showings whose seat check never succeeded.
    pub failed: Vec<Showing>,
    /// Number of showings whose seats were checked (successfully or not).
    pub attempted: usize,
    /// Whether the crawl was cancelled before every showing was checked.
    #[serde(default)]
    pub cancelled: bool,
}

impl CrawlResult {
    /// Failure report for manual follow-up, if any showing was attempted.
    pub fn failure_summary(&self) -> Option<FailureSummary> {
        if self.attempted == 0 {
            return None;
        }
        Some(FailureSummary {
            failed: self.failed.len(),
            attempted: self.attempted,
            links: self.failed.iter().map(|s| s.link.clone()).collect(),
        })
    }
}

/// How many seat checks failed, and where.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureSummary {
    pub failed: usize,
    pub attempted: usize,
    pub links: Vec<String>,
}

impl FailureSummary {
    /// Failure rate as a percentage.
    pub fn rate_pct(&self) -> f64 {
        self.failed as f64 / self.attempted as f64 * 100.0
    }
}

impl fmt::Display for FailureSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Failed {} of {} requests ({:.1}% failure rate)",
            self.failed,
            self.attempted,
            self.rate_pct()
        )?;
        if !self.links.is_empty() {
            write!(
                f,
                "\nFailed to handle the following URLs. You may want to check them yourself:"
            )?;
            for link in &self.links {
                write!(f, "\n\t{}", link)?;
            }
        }
        Ok(())
    }
}
