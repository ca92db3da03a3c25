//! Per-showing seat check: navigate, read the seat map, judge it.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::navigator::{NavigateError, Navigator};

use super::{extract_seats, has_seat_map, SeatGrid, SeatMapError};

/// Delay between reloads of a seat page whose seat map hasn't shown up yet.
const RELOAD_BACKOFF: Duration = Duration::from_secs(1);

/// Errors that can occur while checking the seats of one showing.
#[derive(Debug, Clone, Error)]
pub enum SeatCheckError {
    /// Loading the seat page failed.
    #[error("failed to load seat page: {0}")]
    Navigate(#[from] NavigateError),

    /// The seat map was present but unusable.
    #[error("failed to read seat map: {0}")]
    SeatMap(#[from] SeatMapError),

    /// The seat map never showed up.
    #[error("seat map did not render within {}s", .0.as_secs())]
    Timeout(Duration),
}

impl SeatCheckError {
    /// Whether the check was abandoned because the crawl was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SeatCheckError::Navigate(e) if e.is_cancelled())
    }
}

/// Decides whether a showing still has good seats.
///
/// Implementations must be thread-safe (Send + Sync) for use across async tasks.
#[async_trait]
pub trait SeatChecker: Send + Sync {
    /// Check the seat page at `link` for `num_seats` contiguous good seats.
    async fn check_seats(&self, link: &str, num_seats: usize) -> Result<bool, SeatCheckError>;
}

/// Seat checker that reads the seat map from the showing's seat page.
pub struct PageSeatChecker<N> {
    navigator: N,
    seat_map_timeout: Duration,
}

impl<N: Navigator> PageSeatChecker<N> {
    pub fn new(navigator: N, seat_map_timeout: Duration) -> Self {
        Self {
            navigator,
            seat_map_timeout,
        }
    }

    /// Load the seat page, reloading until the seat map is present or the
    /// seat map timeout runs out.
    async fn load_seat_page(&self, link: &str) -> Result<String, SeatCheckError> {
        let html = self.navigator.goto(link).await?;
        if has_seat_map(&html) {
            return Ok(html);
        }

        debug!(link = link, "Seat map not rendered yet, reloading");
        let reload = async {
            loop {
                tokio::time::sleep(RELOAD_BACKOFF).await;
                let html = self.navigator.goto(link).await?;
                if has_seat_map(&html) {
                    return Ok::<_, SeatCheckError>(html);
                }
            }
        };

        match tokio::time::timeout(self.seat_map_timeout, reload).await {
            Ok(result) => result,
            Err(_) => Err(SeatCheckError::Timeout(self.seat_map_timeout)),
        }
    }
}

#[async_trait]
impl<N: Navigator> SeatChecker for PageSeatChecker<N> {
    async fn check_seats(&self, link: &str, num_seats: usize) -> Result<bool, SeatCheckError> {
        debug!(link = link, "Crawling seats");
        let html = self.load_seat_page(link).await?;

        let grid = SeatGrid::build(extract_seats(&html)?)?;
        let good = grid.has_good_seats(num_seats);

        debug!(
            link = link,
            rows = grid.max_row() + 1,
            max_col = grid.max_col(),
            available = grid.available_count(),
            good = good,
            "Crawled seats"
        );
        Ok(good)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixtures, MockNavigator};
    use std::sync::Arc;

    const LINK: &str = "https://tickets.example/seats/1";

    fn checker(mock: &Arc<MockNavigator>) -> PageSeatChecker<Arc<MockNavigator>> {
        PageSeatChecker::new(Arc::clone(mock), Duration::from_secs(30))
    }

    #[tokio::test]
    async fn test_check_good_showing() {
        let mock = Arc::new(MockNavigator::new());
        mock.set_page(LINK, fixtures::seat_page(&fixtures::OPEN_THEATER)).await;

        assert!(checker(&mock).check_seats(LINK, 2).await.unwrap());
        assert_eq!(mock.visit_count().await, 1);
    }

    #[tokio::test]
    async fn test_check_sold_out_showing() {
        let mock = Arc::new(MockNavigator::new());
        mock.set_page(LINK, fixtures::seat_page(&fixtures::SOLD_OUT_THEATER)).await;

        assert!(!checker(&mock).check_seats(LINK, 2).await.unwrap());
    }

    #[tokio::test]
    async fn test_check_ignores_open_wheelchair_spaces() {
        let mock = Arc::new(MockNavigator::new());
        let rows = ["........", "........", "........", "...ww...", "........", "........", "........"];
        mock.set_page(LINK, fixtures::seat_page(&rows)).await;

        assert!(!checker(&mock).check_seats(LINK, 2).await.unwrap());
    }

    #[tokio::test]
    async fn test_check_navigation_error() {
        let mock = Arc::new(MockNavigator::new());
        let err = checker(&mock).check_seats(LINK, 2).await.unwrap_err();
        assert!(matches!(err, SeatCheckError::Navigate(NavigateError::Status { status: 404, .. })));
        assert!(!err.is_cancelled());
    }

    #[tokio::test]
    async fn test_check_bad_reservation_attribute() {
        let mock = Arc::new(MockNavigator::new());
        mock.set_page(
            LINK,
            r#"<div class="seat-map__seat" style="top: 1px" aria-disabled="sometimes"></div>"#,
        )
        .await;

        let err = checker(&mock).check_seats(LINK, 2).await.unwrap_err();
        assert!(matches!(
            err,
            SeatCheckError::SeatMap(SeatMapError::InvalidReservation(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_check_reloads_until_rendered() {
        let mock = Arc::new(MockNavigator::new());
        mock.set_pages(
            LINK,
            vec![
                "<html>loading</html>".to_string(),
                "<html>still loading</html>".to_string(),
                fixtures::seat_page(&fixtures::OPEN_THEATER),
            ],
        )
        .await;

        assert!(checker(&mock).check_seats(LINK, 2).await.unwrap());
        assert_eq!(mock.visit_count().await, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_check_times_out_when_never_rendered() {
        let mock = Arc::new(MockNavigator::new());
        mock.set_page(LINK, "<html>loading</html>").await;

        let checker = PageSeatChecker::new(Arc::clone(&mock), Duration::from_secs(5));
        let err = checker.check_seats(LINK, 2).await.unwrap_err();
        assert!(matches!(err, SeatCheckError::Timeout(d) if d == Duration::from_secs(5)));
        assert_eq!(err.to_string(), "seat map did not render within 5s");
    }

    #[tokio::test]
    async fn test_check_cancelled_navigation() {
        let mock = Arc::new(MockNavigator::new());
        mock.fail_next(NavigateError::Cancelled).await;

        let err = checker(&mock).check_seats(LINK, 2).await.unwrap_err();
        assert!(err.is_cancelled());
    }
}
