pub mod config;
pub mod crawler;
pub mod navigator;
pub mod search;
pub mod seatmap;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, Config,
    ConfigError, CrawlConfig, SiteConfig,
};
pub use crawler::{CrawlError, CrawlRequest, CrawlResult, Crawler, FailureSummary, MAX_RETRIES};
pub use navigator::{
    DurationRange, HttpNavigator, NavigateError, Navigator, RateLimitedNavigator, RateLimiter,
};
pub use search::{PageShowingSearcher, SearchError, SearchQuery, Showing, ShowingSearcher};
pub use seatmap::{
    has_good_seats, PageSeatChecker, RawSeatDescriptor, Seat, SeatCheckError, SeatChecker,
    SeatGrid, SeatMapError,
};
