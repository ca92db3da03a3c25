//! Seat map inference and seat quality evaluation.
//!
//! A seat page lists seats as a flat sequence of elements, left to right and
//! front to back, where only the vertical position tells rows apart. This
//! module turns that sequence into a row/column [`SeatGrid`] and decides
//! whether the grid has a good block of seats left.

mod builder;
mod checker;
mod evaluator;
mod extract;
mod types;

pub use checker::{PageSeatChecker, SeatCheckError, SeatChecker};
pub use evaluator::{has_good_seats, BUFFER};
pub use extract::{extract_seats, has_seat_map};
pub use types::*;
