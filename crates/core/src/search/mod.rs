//! Showing discovery.
//!
//! This module provides a `ShowingSearcher` trait for finding the showings of
//! a movie near a zip code on a given day, and an implementation that reads
//! the ticketing site's movie times page.

mod parser;
mod searcher;
mod types;

pub use parser::{parse_search_page, parse_showtime};
pub use searcher::PageShowingSearcher;
pub use types::*;
