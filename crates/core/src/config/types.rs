use serde::{Deserialize, Serialize};

use crate::navigator::DurationRange;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub crawl: CrawlConfig,
}

/// Ticketing site configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteConfig {
    /// Base URL of the ticketing site (e.g., "https://www.fandango.com")
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Per-request HTTP timeout in seconds (default: 30)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// How long to wait for a seat map to show up on a seat page (default: 30)
    #[serde(default = "default_seat_map_timeout")]
    pub seat_map_timeout_secs: u64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            request_timeout_secs: default_request_timeout(),
            seat_map_timeout_secs: default_seat_map_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://www.fandango.com".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_seat_map_timeout() -> u64 {
    30
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CrawlConfig {
    /// Number of contiguous seats to find (default: 2)
    #[serde(default = "default_num_seats")]
    pub num_seats: usize,
    /// Whether to retry failed seat crawls (default: true)
    #[serde(default = "default_retry")]
    pub retry: bool,
    /// Max number of showings to check (unset = unlimited)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub showing_limit: Option<usize>,
    /// Wait between HTTP requests, in seconds: "5" or "3-10" (default: "15-25")
    #[serde(default = "default_request_interval")]
    pub request_interval: DurationRange,
    /// Overall deadline for a run in seconds (unset = unlimited)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            num_seats: default_num_seats(),
            retry: default_retry(),
            showing_limit: None,
            request_interval: default_request_interval(),
            timeout_secs: None,
        }
    }
}

fn default_num_seats() -> usize {
    2
}

fn default_retry() -> bool {
    true
}

fn default_request_interval() -> DurationRange {
    DurationRange::from_secs(15, 25)
}
