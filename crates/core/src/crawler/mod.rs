//! Showing crawl orchestration.
//!
//! The crawler drives a whole run: search for showings, then check the seats
//! of each one in discovery order, one at a time:
//! - **Good**: the seat check found a good block of seats
//! - **Bad**: the seat check succeeded but there's no good block left
//! - **Failed**: the seat check kept failing until retries ran out

mod runner;
mod types;

pub use runner::Crawler;
pub use types::{CrawlError, CrawlRequest, CrawlResult, FailureSummary, MAX_RETRIES};
