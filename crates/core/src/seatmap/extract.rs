//! Reads seat descriptors out of seat page markup.
//!
//! Assumptions about the seat map, from poking around real pages:
//!
//! - The seat map is a flat list of `.seat-map__seat` elements.
//! - Seats are listed left to right, front to back.
//! - Seats are absolutely positioned; every seat in a row has the same `top`.
//! - `aria-disabled` is "true" for reserved seats and "false" otherwise.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::{RawSeatDescriptor, SeatMapError};

static ANY_SEAT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".seat-map__seat").expect("static selector"));

// Wheelchair and companion seats are skipped: they are almost always open,
// which would make every showing look good.
static REGULAR_SEAT: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".seat-map__seat:not(.wheelchair):not(.companion)").expect("static selector")
});

/// Whether the page contains any seat map markup.
pub fn has_seat_map(html: &str) -> bool {
    Html::parse_document(html).select(&ANY_SEAT).next().is_some()
}

/// Extract the regular seats of a seat page, in document order.
pub fn extract_seats(html: &str) -> Result<Vec<RawSeatDescriptor>, SeatMapError> {
    let document = Html::parse_document(html);
    if document.select(&ANY_SEAT).next().is_none() {
        return Err(SeatMapError::NotRendered);
    }

    let seats = document
        .select(&REGULAR_SEAT)
        .enumerate()
        .map(|(index, seat)| {
            let top = style_top(seat).ok_or(SeatMapError::MissingPosition { index })?;
            Ok(RawSeatDescriptor::new(
                top.to_string(),
                seat.value().attr("aria-disabled").map(str::to_string),
            ))
        })
        .collect::<Result<Vec<_>, SeatMapError>>()?;

    if seats.is_empty() {
        return Err(SeatMapError::NoSeats);
    }
    Ok(seats)
}

/// The `top` declaration of an element's inline style.
fn style_top(element: ElementRef<'_>) -> Option<&str> {
    element
        .value()
        .attr("style")?
        .split(';')
        .filter_map(|decl| decl.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("top"))
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}
