//! Request pacing for page navigation.
//!
//! Every navigation after the first one waits a random duration drawn from a
//! configured range, so consecutive requests never go out back to back.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::{NavigateError, Navigator};

/// A range of allowable durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationRange {
    /// Lower bound on a duration.
    pub lower: Duration,
    /// Upper bound on a duration.
    pub upper: Duration,
}

/// Error returned when a duration range can't be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseDurationRangeError {
    #[error("invalid interval: {0:?}")]
    Invalid(String),

    #[error("upper bound {upper} cannot be less than lower bound {lower}")]
    Inverted { lower: u64, upper: u64 },
}

impl DurationRange {
    /// A range that always yields `duration`.
    pub fn fixed(duration: Duration) -> Self {
        Self {
            lower: duration,
            upper: duration,
        }
    }

    /// A range between `lower` and `upper` whole seconds.
    pub fn from_secs(lower: u64, upper: u64) -> Self {
        Self {
            lower: Duration::from_secs(lower),
            upper: Duration::from_secs(upper),
        }
    }

    /// Sample a duration from the range.
    ///
    /// Uniform over `[lower, upper)` when the bounds differ, otherwise the
    /// fixed value.
    pub fn sample(&self) -> Duration {
        if self.upper <= self.lower {
            return self.lower;
        }
        rand::rng().random_range(self.lower..self.upper)
    }
}

impl Default for DurationRange {
    fn default() -> Self {
        Self::fixed(Duration::ZERO)
    }
}

impl fmt::Display for DurationRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.lower == self.upper {
            write!(f, "{}", self.lower.as_secs())
        } else {
            write!(f, "{}-{}", self.lower.as_secs(), self.upper.as_secs())
        }
    }
}

/// Parses `"N"` or `"A-B"`, in whole seconds.
impl FromStr for DurationRange {
    type Err = ParseDurationRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseDurationRangeError::Invalid(s.to_string());
        let parse = |part: &str| {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse::<u64>().map_err(|_| invalid())
        };

        match s.trim().split_once('-') {
            None => {
                let secs = parse(s.trim())?;
                Ok(Self::from_secs(secs, secs))
            }
            Some((lower, upper)) => {
                let lower = parse(lower)?;
                let upper = parse(upper)?;
                if upper < lower {
                    return Err(ParseDurationRangeError::Inverted { lower, upper });
                }
                Ok(Self::from_secs(lower, upper))
            }
        }
    }
}

impl Serialize for DurationRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DurationRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RangeVisitor;

        impl de::Visitor<'_> for RangeVisitor {
            type Value = DurationRange;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a number of seconds or a range like \"3-10\"")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(DurationRange::from_secs(v, v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                u64::try_from(v)
                    .map(|v| DurationRange::from_secs(v, v))
                    .map_err(|_| E::custom("interval cannot be negative"))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(RangeVisitor)
    }
}

/// Paces navigations.
///
/// The first call to [`RateLimiter::wait`] returns immediately; every later
/// call sleeps for a duration sampled from the configured interval. The
/// "started" flag only ever goes from false to true.
#[derive(Debug)]
pub struct RateLimiter {
    interval: DurationRange,
    started: AtomicBool,
}

impl RateLimiter {
    /// Create a limiter that has not navigated yet.
    pub fn new(interval: DurationRange) -> Self {
        Self {
            interval,
            started: AtomicBool::new(false),
        }
    }

    /// Whether a navigation has already gone through this limiter.
    pub fn has_navigated_once(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// Claim the next navigation slot.
    ///
    /// Returns `None` for the very first navigation, otherwise the delay that
    /// must elapse before navigating.
    pub fn next_delay(&self) -> Option<Duration> {
        if self.started.swap(true, Ordering::SeqCst) {
            Some(self.interval.sample())
        } else {
            None
        }
    }

    /// Wait until the next navigation may proceed.
    ///
    /// Returns the time waited, or `NavigateError::Cancelled` if `cancel`
    /// fires during the wait.
    pub async fn wait(&self, cancel: &CancellationToken) -> Result<Duration, NavigateError> {
        let Some(delay) = self.next_delay() else {
            return Ok(Duration::ZERO);
        };

        debug!(delay_ms = delay.as_millis() as u64, "Pacing next navigation");
        tokio::select! {
            _ = cancel.cancelled() => Err(NavigateError::Cancelled),
            _ = tokio::time::sleep(delay) => Ok(delay),
        }
    }
}

/// A navigator whose calls are paced by a [`RateLimiter`] and abandoned on
/// cancellation.
pub struct RateLimitedNavigator<N> {
    inner: N,
    limiter: RateLimiter,
    cancel: CancellationToken,
}

impl<N: Navigator> RateLimitedNavigator<N> {
    pub fn new(inner: N, interval: DurationRange, cancel: CancellationToken) -> Self {
        Self {
            inner,
            limiter: RateLimiter::new(interval),
            cancel,
        }
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }
}

#[async_trait]
impl<N: Navigator> Navigator for RateLimitedNavigator<N> {
    async fn goto(&self, url: &str) -> Result<String, NavigateError> {
        if self.cancel.is_cancelled() {
            return Err(NavigateError::Cancelled);
        }
        self.limiter.wait(&self.cancel).await?;

        info!(url = url, "Visiting");
        tokio::select! {
            _ = self.cancel.cancelled() => Err(NavigateError::Cancelled),
            result = self.inner.goto(url) => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockNavigator;
    use std::sync::Arc;
    use tokio::time::Instant;

    #[test]
    fn test_parse_single_value() {
        let range: DurationRange = "5".parse().unwrap();
        assert_eq!(range, DurationRange::from_secs(5, 5));
        assert_eq!(range.to_string(), "5");
    }

    #[test]
    fn test_parse_range() {
        let range: DurationRange = "3-10".parse().unwrap();
        assert_eq!(range.lower, Duration::from_secs(3));
        assert_eq!(range.upper, Duration::from_secs(10));
        assert_eq!(range.to_string(), "3-10");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for input in ["", "soon", "-3", "3-", "3-10-12", "1.5", "+4"] {
            assert!(
                matches!(
                    input.parse::<DurationRange>(),
                    Err(ParseDurationRangeError::Invalid(_))
                ),
                "{input:?} should not parse"
            );
        }
    }

    #[test]
    fn test_parse_rejects_inverted() {
        let err = "10-3".parse::<DurationRange>().unwrap_err();
        assert_eq!(err, ParseDurationRangeError::Inverted { lower: 10, upper: 3 });
    }

    #[test]
    fn test_sample_fixed() {
        let range = DurationRange::fixed(Duration::from_millis(250));
        for _ in 0..10 {
            assert_eq!(range.sample(), Duration::from_millis(250));
        }
    }

    #[test]
    fn test_sample_within_bounds() {
        let range = DurationRange::from_secs(3, 10);
        for _ in 0..200 {
            let sampled = range.sample();
            assert!(sampled >= range.lower);
            assert!(sampled < range.upper);
        }
    }

    #[test]
    fn test_sample_span_wider_than_u64_nanos() {
        // 2^64 nanoseconds.
        let range = DurationRange {
            lower: Duration::ZERO,
            upper: Duration::new(18_446_744_073, 709_551_616),
        };
        for _ in 0..50 {
            assert!(range.sample() < range.upper);
        }
    }

    #[test]
    fn test_deserialize_from_number_and_string() {
        let from_num: DurationRange = serde_json::from_str("7").unwrap();
        assert_eq!(from_num, DurationRange::from_secs(7, 7));

        let from_str: DurationRange = serde_json::from_str("\"2-4\"").unwrap();
        assert_eq!(from_str, DurationRange::from_secs(2, 4));

        assert!(serde_json::from_str::<DurationRange>("-1").is_err());
    }

    #[test]
    fn test_first_navigation_is_free() {
        let limiter = RateLimiter::new(DurationRange::from_secs(15, 25));
        assert!(!limiter.has_navigated_once());

        assert_eq!(limiter.next_delay(), None);
        assert!(limiter.has_navigated_once());

        for _ in 0..5 {
            let delay = limiter.next_delay().unwrap();
            assert!(delay >= Duration::from_secs(15));
            assert!(delay < Duration::from_secs(25));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_sleeps_after_first_call() {
        let limiter = RateLimiter::new(DurationRange::from_secs(5, 5));
        let cancel = CancellationToken::new();

        let start = Instant::now();
        assert_eq!(limiter.wait(&cancel).await.unwrap(), Duration::ZERO);
        assert_eq!(start.elapsed(), Duration::ZERO);

        let waited = limiter.wait(&cancel).await.unwrap();
        assert_eq!(waited, Duration::from_secs(5));
        assert!(start.elapsed() >= Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_is_cancellable() {
        let limiter = RateLimiter::new(DurationRange::from_secs(60, 60));
        let cancel = CancellationToken::new();
        limiter.wait(&cancel).await.unwrap();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            trigger.cancel();
        });

        let err = limiter.wait(&cancel).await.unwrap_err();
        assert!(err.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_navigator_paces_every_call() {
        let mock = Arc::new(MockNavigator::new());
        mock.set_page("https://site/a", "<html>a</html>").await;
        mock.set_page("https://site/b", "<html>b</html>").await;

        let navigator = RateLimitedNavigator::new(
            Arc::clone(&mock),
            DurationRange::from_secs(2, 2),
            CancellationToken::new(),
        );

        let start = Instant::now();
        assert_eq!(navigator.goto("https://site/a").await.unwrap(), "<html>a</html>");
        assert_eq!(start.elapsed(), Duration::ZERO);

        navigator.goto("https://site/b").await.unwrap();
        navigator.goto("https://site/a").await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(4));

        let visits = mock.recorded_visits().await;
        assert_eq!(visits, vec!["https://site/a", "https://site/b", "https://site/a"]);
    }

    #[tokio::test]
    async fn test_rate_limited_navigator_refuses_after_cancel() {
        let mock = Arc::new(MockNavigator::new());
        mock.set_page("https://site/a", "a").await;
        let cancel = CancellationToken::new();
        let navigator =
            RateLimitedNavigator::new(Arc::clone(&mock), DurationRange::default(), cancel.clone());

        cancel.cancel();
        let err = navigator.goto("https://site/a").await.unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(mock.visit_count().await, 0);
        assert!(!navigator.limiter().has_navigated_once());
    }
}
