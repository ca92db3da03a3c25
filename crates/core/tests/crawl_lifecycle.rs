//! Crawl lifecycle integration tests.
//!
//! These tests run the whole crawl against canned pages:
//! search page -> showings -> seat pages -> good / bad / failed

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use seatscout_core::{
    testing::{fixtures, MockNavigator},
    CrawlError, CrawlRequest, Crawler, DurationRange, NavigateError, PageSeatChecker,
    PageShowingSearcher, RateLimitedNavigator, SearchQuery, SeatChecker, ShowingSearcher,
};

const BASE_URL: &str = "https://tickets.example";
const SEARCH_URL: &str = "https://tickets.example/48104_movietimes?date=2024-11-15";

fn seat_link(n: usize) -> String {
    format!("{}/seats/{}", BASE_URL, n)
}

/// Wires mock pages through the real navigator, searcher and seat checker.
struct TestHarness {
    pages: Arc<MockNavigator>,
    cancel: CancellationToken,
    interval: DurationRange,
}

impl TestHarness {
    fn new(interval: DurationRange) -> Self {
        Self {
            pages: Arc::new(MockNavigator::new()),
            cancel: CancellationToken::new(),
            interval,
        }
    }

    fn create_crawler(&self) -> Crawler {
        let navigator = Arc::new(RateLimitedNavigator::new(
            Arc::clone(&self.pages),
            self.interval,
            self.cancel.clone(),
        ));
        let searcher = PageShowingSearcher::new(Arc::clone(&navigator), BASE_URL);
        let seats = PageSeatChecker::new(navigator, Duration::from_secs(30));

        Crawler::new(
            Arc::new(searcher) as Arc<dyn ShowingSearcher>,
            Arc::new(seats) as Arc<dyn SeatChecker>,
            self.cancel.clone(),
        )
    }

    /// Reserved "Dune" showings link to seats/1, seats/2 and seats/5. seats/3
    /// is open seating and seats/4 is another movie.
    async fn set_search_page(&self) {
        self.pages
            .set_page(
                SEARCH_URL,
                fixtures::search_page(&[
                    fixtures::TheaterListing::new("Alpha Cinemas")
                        .movie("Dune: Part Two", &[(true, &["7:00p", "9:45p"]), (false, &["8:00p"])])
                        .movie("Wicked", &[(true, &["6:00p"])]),
                    fixtures::TheaterListing::new("Beta Theater")
                        .no_showtimes("Dune: Part Two")
                        .movie("Dune: Part Two", &[(true, &["1:15p"])]),
                ]),
            )
            .await;
    }
}

fn request() -> CrawlRequest {
    CrawlRequest {
        query: SearchQuery {
            title: "dune".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 11, 15).unwrap(),
            zip: "48104".to_string(),
        },
        num_seats: 2,
        retry: true,
        showing_limit: None,
    }
}

fn unavailable(n: usize) -> NavigateError {
    NavigateError::Status {
        status: 503,
        url: seat_link(n),
    }
}

#[tokio::test(start_paused = true)]
async fn test_full_crawl() {
    let h = TestHarness::new(DurationRange::from_secs(15, 25));
    h.set_search_page().await;
    h.pages
        .set_page(&seat_link(1), fixtures::seat_page(&fixtures::OPEN_THEATER))
        .await;
    h.pages
        .set_page(&seat_link(2), fixtures::seat_page(&fixtures::SOLD_OUT_THEATER))
        .await;
    h.pages
        .set_responses(
            &seat_link(5),
            vec![
                Err(unavailable(5)),
                Ok(fixtures::seat_page(&fixtures::OPEN_THEATER)),
            ],
        )
        .await;

    let start = Instant::now();
    let mut result = h.create_crawler().crawl(&request()).await.unwrap();

    result.good.sort_by(|a, b| a.cmp_by_theater_time(b));
    let good: Vec<_> = result.good.iter().map(|s| s.theater.as_str()).collect();
    assert_eq!(good, vec!["Alpha Cinemas", "Beta Theater"]);
    assert_eq!(result.good[1].retries, 1);
    assert_eq!(result.bad.len(), 1);
    assert_eq!(result.bad[0].link, seat_link(2));
    assert!(result.failed.is_empty());
    assert_eq!(result.attempted, 3);

    // Search, seats/1, seats/2, seats/5 twice.
    let visits = h.pages.recorded_visits().await;
    assert_eq!(visits.len(), 5);
    assert_eq!(visits[0], SEARCH_URL);
    assert!(start.elapsed() >= Duration::from_secs(4 * 15));

    let summary = result.failure_summary().unwrap();
    assert_eq!(summary.to_string(), "Failed 0 of 3 requests (0.0% failure rate)");
}

#[tokio::test(start_paused = true)]
async fn test_seat_map_renders_late() {
    let h = TestHarness::new(DurationRange::from_secs(2, 2));
    h.pages
        .set_pages(
            &seat_link(1),
            vec![
                "<html><body>Loading seats...</body></html>".to_string(),
                fixtures::seat_page(&fixtures::OPEN_THEATER),
            ],
        )
        .await;

    let showing = fixtures::showing(&seat_link(1), "Alpha Cinemas");
    let result = h
        .create_crawler()
        .check_showings(vec![showing], &request())
        .await
        .unwrap();

    assert_eq!(result.good.len(), 1);
    assert_eq!(result.good[0].retries, 0);
    assert_eq!(h.pages.visit_count_for(&seat_link(1)).await, 2);
}

#[tokio::test(start_paused = true)]
async fn test_persistent_failure_is_reported() {
    let h = TestHarness::new(DurationRange::from_secs(1, 1));
    h.set_search_page().await;
    h.pages
        .set_page(&seat_link(1), fixtures::seat_page(&fixtures::OPEN_THEATER))
        .await;
    h.pages.fail_url(&seat_link(2), unavailable(2)).await;
    h.pages.fail_url(&seat_link(5), unavailable(5)).await;

    let result = h.create_crawler().crawl(&request()).await.unwrap();

    assert_eq!(result.good.len(), 1);
    assert_eq!(result.failed.len(), 2);
    assert!(result.failed.iter().all(|s| s.retries == 3));
    assert_eq!(h.pages.visit_count_for(&seat_link(2)).await, 3);

    let summary = result.failure_summary().unwrap();
    assert_eq!(summary.failed, 2);
    assert_eq!(summary.attempted, 3);
    assert!(summary.to_string().contains(&seat_link(5)));
}

#[tokio::test(start_paused = true)]
async fn test_no_retry_and_limit() {
    let h = TestHarness::new(DurationRange::from_secs(1, 1));
    h.set_search_page().await;
    h.pages.fail_url(&seat_link(1), unavailable(1)).await;
    h.pages
        .set_page(&seat_link(2), fixtures::seat_page(&fixtures::OPEN_THEATER))
        .await;

    let request = CrawlRequest {
        retry: false,
        showing_limit: Some(2),
        ..request()
    };
    let result = h.create_crawler().crawl(&request).await.unwrap();

    assert_eq!(result.attempted, 2);
    assert_eq!(result.failed.len(), 1);
    assert_eq!(result.good.len(), 1);
    assert_eq!(h.pages.visit_count_for(&seat_link(1)).await, 1);
    assert_eq!(h.pages.visit_count_for(&seat_link(5)).await, 0);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_keeps_partial_results() {
    let h = TestHarness::new(DurationRange::from_secs(60, 60));
    h.set_search_page().await;
    h.pages
        .set_page(&seat_link(1), fixtures::seat_page(&fixtures::OPEN_THEATER))
        .await;

    let trigger = h.cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(90)).await;
        trigger.cancel();
    });

    let start = Instant::now();
    let result = h.create_crawler().crawl(&request()).await.unwrap();

    assert!(result.cancelled);
    assert_eq!(result.good.len(), 1);
    assert_eq!(result.good[0].link, seat_link(1));
    // Cancelled while waiting to load seats/2; seats/5 is never attempted.
    assert_eq!(result.failed.len(), 1);
    assert_eq!(result.failed[0].link, seat_link(2));
    assert_eq!(result.attempted, 2);
    assert_eq!(h.pages.visit_count().await, 2);
    assert!(start.elapsed() < Duration::from_secs(120));

    let summary = result.failure_summary().unwrap();
    assert_eq!(summary.to_string().lines().next(), Some("Failed 1 of 2 requests (50.0% failure rate)"));
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_during_search_is_fatal() {
    let h = TestHarness::new(DurationRange::from_secs(0, 0));
    h.set_search_page().await;
    h.cancel.cancel();

    let err = h.create_crawler().crawl(&request()).await.unwrap_err();
    assert!(matches!(err, CrawlError::Cancelled));
    assert_eq!(h.pages.visit_count().await, 0);
}

#[tokio::test]
async fn test_search_page_without_theaters_is_fatal() {
    let h = TestHarness::new(DurationRange::from_secs(0, 0));
    h.pages.set_page(SEARCH_URL, "<html><body></body></html>").await;

    let err = h.create_crawler().crawl(&request()).await.unwrap_err();
    assert!(matches!(err, CrawlError::Search(_)));
    assert_eq!(h.pages.visit_count().await, 1);
}
