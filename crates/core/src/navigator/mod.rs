//! Page navigation.
//!
//! This module provides a `Navigator` trait for fetching pages from the
//! ticketing site, an HTTP implementation, and a wrapper that paces
//! consecutive navigations with a randomized delay.

mod http;
mod rate_limiter;
mod types;

pub use http::HttpNavigator;
pub use rate_limiter::{DurationRange, ParseDurationRangeError, RateLimitedNavigator, RateLimiter};
pub use types::*;
