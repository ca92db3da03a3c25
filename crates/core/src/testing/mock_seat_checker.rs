//! Mock seat checker for testing.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::navigator::NavigateError;
use crate::seatmap::{SeatCheckError, SeatChecker};

type Outcome = Result<bool, SeatCheckError>;

/// A recorded seat check for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCheck {
    /// The seat page link that was checked.
    pub link: String,
    /// The requested block size.
    pub num_seats: usize,
}

/// Mock implementation of the SeatChecker trait.
///
/// Outcomes are scripted per link and consumed in order, with the last one
/// repeating. Links with no script fail like a missing page.
///
/// # Example
///
/// ```rust,ignore
/// use seatscout_core::testing::MockSeatChecker;
///
/// let checker = MockSeatChecker::new();
/// checker.set_outcome("https://site/seats/1", Ok(true)).await;
/// checker.set_outcomes("https://site/seats/2", vec![Err(timeout), Ok(false)]).await;
///
/// assert!(checker.check_seats("https://site/seats/1", 2).await?);
/// assert_eq!(checker.check_count().await, 1);
/// ```
pub struct MockSeatChecker {
    /// Scripted outcomes per link.
    outcomes: Arc<RwLock<HashMap<String, VecDeque<Outcome>>>>,
    /// Recorded checks.
    checks: Arc<RwLock<Vec<RecordedCheck>>>,
    /// Simulated time each check takes.
    delay: Arc<RwLock<Option<Duration>>>,
}

impl std::fmt::Debug for MockSeatChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSeatChecker")
            .field("outcomes", &"<outcomes>")
            .field("checks", &"<checks>")
            .field("delay", &"<delay>")
            .finish()
    }
}

impl Default for MockSeatChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSeatChecker {
    /// Create a new mock seat checker with no scripted outcomes.
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(RwLock::new(HashMap::new())),
            checks: Arc::new(RwLock::new(Vec::new())),
            delay: Arc::new(RwLock::new(None)),
        }
    }

    /// Return `outcome` for every check of `link`.
    pub async fn set_outcome(&self, link: &str, outcome: Outcome) {
        self.set_outcomes(link, vec![outcome]).await;
    }

    /// Return `outcomes` for successive checks of `link`. The last one repeats.
    pub async fn set_outcomes(&self, link: &str, outcomes: Vec<Outcome>) {
        self.outcomes
            .write()
            .await
            .insert(link.to_string(), outcomes.into());
    }

    /// Make every check take `delay` before answering.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// Get recorded checks.
    pub async fn recorded_checks(&self) -> Vec<RecordedCheck> {
        self.checks.read().await.clone()
    }

    /// Get the number of checks performed.
    pub async fn check_count(&self) -> usize {
        self.checks.read().await.len()
    }

    /// Get the number of checks performed for `link`.
    pub async fn check_count_for(&self, link: &str) -> usize {
        self.checks
            .read()
            .await
            .iter()
            .filter(|check| check.link == link)
            .count()
    }
}

#[async_trait]
impl SeatChecker for MockSeatChecker {
    async fn check_seats(&self, link: &str, num_seats: usize) -> Result<bool, SeatCheckError> {
        self.checks.write().await.push(RecordedCheck {
            link: link.to_string(),
            num_seats,
        });

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let missing = || {
            Err(SeatCheckError::Navigate(NavigateError::Status {
                status: 404,
                url: link.to_string(),
            }))
        };

        let mut outcomes = self.outcomes.write().await;
        let Some(queue) = outcomes.get_mut(link) else {
            return missing();
        };
        let outcome = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        outcome.unwrap_or_else(missing)
    }
}
