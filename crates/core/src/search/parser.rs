//! Movie times page parsing.
//!
//! Past the theater list, nothing on this page is fatal: a theater, movie or
//! showtime that can't be read is logged and skipped so the rest of the page
//! still counts.

use std::sync::LazyLock;

use chrono::NaiveTime;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

use super::{SearchError, SearchQuery, Showing};

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

static THEATER: LazyLock<Selector> = LazyLock::new(|| selector(".fd-showtimes .fd-theater"));
static THEATER_NAME: LazyLock<Selector> = LazyLock::new(|| selector(".fd-theater__name > a"));
static MOVIE: LazyLock<Selector> = LazyLock::new(|| selector(".fd-movie"));
static NO_SHOWTIMES: LazyLock<Selector> = LazyLock::new(|| selector(".fd-movie__no-showtimes"));
static MOVIE_TITLE: LazyLock<Selector> = LazyLock::new(|| selector(".fd-movie__title"));
static VARIANT: LazyLock<Selector> =
    LazyLock::new(|| selector("li.fd-movie__showtimes-variant"));
static AMENITY: LazyLock<Selector> =
    LazyLock::new(|| selector(".fd-movie__amenity-list > li > button"));
static SHOWTIME: LazyLock<Selector> =
    LazyLock::new(|| selector("li.showtimes-btn-list__item > a"));

/// Parse the showings matching `query` out of a movie times page.
///
/// Only variants with reserved seating are kept; seat links are resolved
/// against `page_url`.
pub fn parse_search_page(
    html: &str,
    query: &SearchQuery,
    page_url: &Url,
) -> Result<Vec<Showing>, SearchError> {
    let document = Html::parse_document(html);
    let theaters: Vec<_> = document.select(&THEATER).collect();
    if theaters.is_empty() {
        return Err(SearchError::NoTheaters(page_url.to_string()));
    }

    let wanted = query.title.to_lowercase();
    let mut showings = Vec::new();

    for theater in theaters {
        let Some(name) = theater.select(&THEATER_NAME).next().map(text) else {
            info!(search_page = %page_url, "Failed to find theater name");
            continue;
        };
        debug!(theater = %name, "Handling theater");

        let movies: Vec<_> = theater.select(&MOVIE).collect();
        if movies.is_empty() {
            info!(search_page = %page_url, theater = %name, "Failed to find a movie on page");
            continue;
        }

        for movie in movies {
            if movie.select(&NO_SHOWTIMES).next().is_some() {
                debug!(theater = %name, "No showings available");
                continue;
            }
            let Some(title) = movie.select(&MOVIE_TITLE).next().map(text) else {
                info!(search_page = %page_url, theater = %name, "Failed to find a movie title");
                continue;
            };
            if !title.to_lowercase().contains(&wanted) {
                continue;
            }
            debug!(theater = %name, title = %title, "Found matching movie");

            let variants: Vec<_> = movie.select(&VARIANT).collect();
            if variants.is_empty() {
                info!(theater = %name, title = %title, "Failed to find showtime variants");
                continue;
            }

            for (i, variant) in variants.into_iter().enumerate() {
                if !has_reserved_seating(variant) {
                    debug!(theater = %name, variant = i, "Skipping variant without reserved seating");
                    continue;
                }
                showings.extend(parse_variant(variant, query, page_url, &name, &title));
            }
        }
    }

    Ok(showings)
}

fn parse_variant(
    variant: ElementRef<'_>,
    query: &SearchQuery,
    page_url: &Url,
    theater: &str,
    title: &str,
) -> Vec<Showing> {
    let mut showings = Vec::new();
    for anchor in variant.select(&SHOWTIME) {
        let raw = text(anchor);
        let Some(time) = parse_showtime(&raw) else {
            info!(theater = theater, title = title, time = %raw, "Failed to parse time");
            continue;
        };
        let Some(href) = anchor.value().attr("href") else {
            info!(theater = theater, title = title, time = %raw, "Failed to get link");
            continue;
        };
        let link = match page_url.join(href) {
            Ok(link) => link,
            Err(e) => {
                info!(theater = theater, href = href, error = %e, "Failed to resolve link");
                continue;
            }
        };

        debug!(theater = theater, time = %time, "Found showing");
        showings.push(Showing::new(
            link.to_string(),
            theater,
            title,
            query.date.and_time(time),
        ));
    }
    showings
}

fn has_reserved_seating(variant: ElementRef<'_>) -> bool {
    variant
        .select(&AMENITY)
        .any(|amenity| text(amenity).to_lowercase().contains("reserve"))
}

fn text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Parse a listed showtime such as `9:30a` or `12:30p`.
///
/// Surrounding whitespace is ignored and a trailing `m` is accepted.
pub fn parse_showtime(raw: &str) -> Option<NaiveTime> {
    let lower = raw.trim().to_ascii_lowercase();
    let trimmed = lower.strip_suffix('m').unwrap_or(&lower);
    let (clock, pm) = if let Some(clock) = trimmed.strip_suffix('p') {
        (clock, true)
    } else if let Some(clock) = trimmed.strip_suffix('a') {
        (clock, false)
    } else {
        return None;
    };

    let (hour, minute) = clock.trim_end().split_once(':')?;
    if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
        return None;
    }
    if !hour.bytes().chain(minute.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;
    if !(1..=12).contains(&hour) {
        return None;
    }

    let hour = match (hour, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, false) => h,
        (h, true) => h + 12,
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
}
