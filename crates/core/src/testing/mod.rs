//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the crawl seams (page
//! navigation, showing search, seat checks) plus page fixtures, so the whole
//! crawl can be exercised without touching the network.
//!
//! # Example
//!
//! ```rust,ignore
//! use seatscout_core::testing::{MockNavigator, fixtures};
//!
//! let navigator = MockNavigator::new();
//! navigator.set_page(
//!     "https://site/01778_movietimes?date=2024-11-05",
//!     fixtures::search_page(&[
//!         fixtures::TheaterListing::new("Alpha Cinemas").movie("Dune", &[(true, &["7:00p"])]),
//!     ]),
//! ).await;
//! navigator.set_page("https://site/seats/1", fixtures::seat_page(&fixtures::OPEN_THEATER)).await;
//! ```

mod mock_navigator;
mod mock_seat_checker;
mod mock_searcher;

pub use mock_navigator::MockNavigator;
pub use mock_seat_checker::{MockSeatChecker, RecordedCheck};
pub use mock_searcher::MockShowingSearcher;

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::fmt::Write;

    use chrono::NaiveDate;

    use crate::search::Showing;

    /// Vertical distance between seat rows in generated seat pages.
    pub const ROW_HEIGHT_PX: usize = 24;

    /// A theater with every seat open.
    pub const OPEN_THEATER: [&str; 7] = ["aaaaaaaa"; 7];

    /// A theater with every seat reserved.
    pub const SOLD_OUT_THEATER: [&str; 7] = ["........"; 7];

    /// Render a seat page from rows of seat codes.
    ///
    /// `a` is an available seat, `.` a reserved one, and `w` an available
    /// wheelchair space. Rows are listed front to back.
    pub fn seat_page(rows: &[&str]) -> String {
        let mut html = String::from("<html><body><div class=\"seat-map\">\n");
        for (r, row) in rows.iter().enumerate() {
            for (c, code) in row.chars().enumerate() {
                let (class, reserved) = match code {
                    'a' => ("seat-map__seat", false),
                    '.' => ("seat-map__seat", true),
                    'w' => ("seat-map__seat wheelchair", false),
                    other => panic!("invalid seat code {other:?}"),
                };
                let _ = writeln!(
                    html,
                    "  <div class=\"{}\" style=\"left: {}px; top: {}px\" aria-disabled=\"{}\"></div>",
                    class,
                    c * ROW_HEIGHT_PX,
                    r * ROW_HEIGHT_PX,
                    reserved
                );
            }
        }
        html.push_str("</div></body></html>\n");
        html
    }

    enum MovieListing {
        Showtimes {
            title: String,
            variants: Vec<(bool, Vec<String>)>,
        },
        NoShowtimes(String),
    }

    /// One theater on a generated movie times page.
    pub struct TheaterListing {
        name: String,
        movies: Vec<MovieListing>,
    }

    impl TheaterListing {
        pub fn new(name: &str) -> Self {
            Self {
                name: name.to_string(),
                movies: Vec::new(),
            }
        }

        /// Add a movie with one showtime variant per `(reserved_seating, times)`.
        pub fn movie(mut self, title: &str, variants: &[(bool, &[&str])]) -> Self {
            self.movies.push(MovieListing::Showtimes {
                title: title.to_string(),
                variants: variants
                    .iter()
                    .map(|(reserved, times)| {
                        (*reserved, times.iter().map(|t| t.to_string()).collect())
                    })
                    .collect(),
            });
            self
        }

        /// Add a movie that is listed without any showtimes.
        pub fn no_showtimes(mut self, title: &str) -> Self {
            self.movies.push(MovieListing::NoShowtimes(title.to_string()));
            self
        }
    }

    /// Render a movie times page.
    ///
    /// Every showtime links to `/seats/{n}`, numbered from 1 in page order
    /// (variants without reserved seating included).
    pub fn search_page(theaters: &[TheaterListing]) -> String {
        let mut next_link = 1;
        let mut html = String::from("<html><body><div class=\"fd-showtimes\">\n");
        for theater in theaters {
            let slug = theater.name.to_lowercase().replace(' ', "-");
            let _ = writeln!(
                html,
                "<div class=\"fd-theater\">\n  <div class=\"fd-theater__name\"><a href=\"/theaters/{}\">{}</a></div>\n  <ul>",
                slug, theater.name
            );
            for movie in &theater.movies {
                match movie {
                    MovieListing::NoShowtimes(title) => {
                        let _ = writeln!(
                            html,
                            "    <li class=\"fd-movie\"><h3 class=\"fd-movie__title\">{}</h3><p class=\"fd-movie__no-showtimes\">No showtimes available</p></li>",
                            title
                        );
                    }
                    MovieListing::Showtimes { title, variants } => {
                        let _ = writeln!(
                            html,
                            "    <li class=\"fd-movie\"><h3 class=\"fd-movie__title\">{}</h3>\n      <ul>",
                            title
                        );
                        for (reserved, times) in variants {
                            let amenity = if *reserved { "Reserved seating" } else { "Open seating" };
                            let _ = writeln!(
                                html,
                                "        <li class=\"fd-movie__showtimes-variant\">\n          <ul class=\"fd-movie__amenity-list\"><li><button>{}</button></li></ul>\n          <ol class=\"showtimes-btn-list\">",
                                amenity
                            );
                            for time in times {
                                let _ = writeln!(
                                    html,
                                    "            <li class=\"showtimes-btn-list__item\"><a href=\"/seats/{}\">{}</a></li>",
                                    next_link, time
                                );
                                next_link += 1;
                            }
                            html.push_str("          </ol>\n        </li>\n");
                        }
                        html.push_str("      </ul>\n    </li>\n");
                    }
                }
            }
            html.push_str("  </ul>\n</div>\n");
        }
        html.push_str("</div></body></html>\n");
        html
    }

    /// Create a showing of "Dune" at 7pm on 2024-11-15.
    pub fn showing(link: &str, theater: &str) -> Showing {
        let when = NaiveDate::from_ymd_opt(2024, 11, 15)
            .and_then(|d| d.and_hms_opt(19, 0, 0))
            .unwrap_or_default();
        Showing::new(link, theater, "Dune", when)
    }
}
