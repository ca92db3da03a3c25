//! Crawler implementation.
//!
//! Showings are checked sequentially so every page load goes through the same
//! rate limiter. A showing whose check fails is retried right away, up to
//! [`MAX_RETRIES`] checks in total, before moving on.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::search::{SearchQuery, Showing, ShowingSearcher};
use crate::seatmap::SeatChecker;

use super::types::{CrawlError, CrawlRequest, CrawlResult, MAX_RETRIES};

/// Drives a crawl: showing search followed by one seat check per showing.
pub struct Crawler {
    searcher: Arc<dyn ShowingSearcher>,
    seats: Arc<dyn SeatChecker>,
    cancel: CancellationToken,
}

impl Crawler {
    /// Create a new crawler. Cancelling `cancel` stops the crawl at the next
    /// check boundary; showings already classified are still returned.
    pub fn new(
        searcher: Arc<dyn ShowingSearcher>,
        seats: Arc<dyn SeatChecker>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            searcher,
            seats,
            cancel,
        }
    }

    /// Search for showings, then classify each one by its seats.
    pub async fn crawl(&self, request: &CrawlRequest) -> Result<CrawlResult, CrawlError> {
        let showings = self.crawl_search(&request.query).await?;
        self.check_showings(showings, request).await
    }

    /// Only run the showing search.
    pub async fn crawl_search(&self, query: &SearchQuery) -> Result<Vec<Showing>, CrawlError> {
        if self.cancel.is_cancelled() {
            return Err(CrawlError::Cancelled);
        }

        info!(title = %query.title, date = %query.date, zip = %query.zip, "Searching for showings");
        match self.searcher.search(query).await {
            Ok(showings) => {
                info!(count = showings.len(), "Found showings");
                Ok(showings)
            }
            Err(e) if e.is_cancelled() => Err(CrawlError::Cancelled),
            Err(e) => Err(CrawlError::Search(e)),
        }
    }

    /// Only check the seats of a single showing, without retries.
    pub async fn crawl_seats(&self, link: &str, num_seats: usize) -> Result<bool, CrawlError> {
        if self.cancel.is_cancelled() {
            return Err(CrawlError::Cancelled);
        }

        match self.seats.check_seats(link, num_seats).await {
            Ok(good) => Ok(good),
            Err(e) if e.is_cancelled() => Err(CrawlError::Cancelled),
            Err(e) => Err(CrawlError::SeatCheck(e)),
        }
    }

    /// Classify `showings` in order, honoring the request's retry flag and
    /// showing limit.
    pub async fn check_showings(
        &self,
        showings: Vec<Showing>,
        request: &CrawlRequest,
    ) -> Result<CrawlResult, CrawlError> {
        let limit = request.showing_limit.unwrap_or(usize::MAX);
        if showings.len() > limit {
            info!(limit = limit, found = showings.len(), "Limiting showings checked");
        }

        let mut result = CrawlResult::default();
        'showings: for mut showing in showings.into_iter().take(limit) {
            loop {
                if self.cancel.is_cancelled() {
                    result.cancelled = true;
                    break 'showings;
                }

                match self.seats.check_seats(&showing.link, request.num_seats).await {
                    Ok(true) => {
                        debug!(theater = %showing.theater, when = %showing.when, "Good seats");
                        result.good.push(showing);
                        break;
                    }
                    Ok(false) => {
                        debug!(theater = %showing.theater, when = %showing.when, "No good seats");
                        result.bad.push(showing);
                        break;
                    }
                    Err(e) if e.is_cancelled() => {
                        // The in-flight check counts as failed; nothing after it is attempted.
                        showing.retries += 1;
                        result.failed.push(showing);
                        result.attempted += 1;
                        result.cancelled = true;
                        break 'showings;
                    }
                    Err(e) => {
                        showing.retries += 1;
                        warn!(
                            theater = %showing.theater,
                            title = %showing.title,
                            link = %showing.link,
                            retries = showing.retries,
                            error = %e,
                            "Failed to check seats"
                        );
                        if request.retry && showing.retries < MAX_RETRIES {
                            continue;
                        }
                        result.failed.push(showing);
                        break;
                    }
                }
            }
            result.attempted += 1;
        }

        if result.cancelled {
            info!(attempted = result.attempted, "Crawl cancelled, remaining showings skipped");
        }
        debug!(
            good = result.good.len(),
            bad = result.bad.len(),
            failed = result.failed.len(),
            "Seat crawl finished"
        );
        if let Some(summary) = result.failure_summary() {
            info!(
                failed = summary.failed,
                attempted = summary.attempted,
                rate_pct = summary.rate_pct(),
                "Seat crawl summary"
            );
        }

        Ok(result)
    }
}
