//! Types for seat maps.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while reading a seat map.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeatMapError {
    /// The page has no seat map markup at all.
    #[error("seat map not rendered")]
    NotRendered,

    /// The seat map has no selectable seats.
    #[error("no seats found")]
    NoSeats,

    /// A seat element has no vertical position.
    #[error("seat {index} has no vertical position")]
    MissingPosition { index: usize },

    /// A seat's reservation attribute is neither "true" nor "false".
    #[error("failed to parse reservation attribute {0:?}")]
    InvalidReservation(Option<String>),
}

/// A seat as it appears on the page, before rows and columns are known.
///
/// `vertical_position` is only ever compared for equality: two consecutive
/// seats with the same value sit in the same row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSeatDescriptor<K = String> {
    /// Opaque vertical position token (e.g. a CSS `top` value).
    pub vertical_position: K,
    /// Raw reservation attribute as rendered (`aria-disabled`).
    pub reserved_attr: Option<String>,
}

impl<K> RawSeatDescriptor<K> {
    pub fn new(vertical_position: K, reserved_attr: Option<String>) -> Self {
        Self {
            vertical_position,
            reserved_attr,
        }
    }

    /// An available seat at `vertical_position`.
    pub fn open(vertical_position: K) -> Self {
        Self::new(vertical_position, Some("false".to_string()))
    }

    /// A reserved seat at `vertical_position`.
    pub fn taken(vertical_position: K) -> Self {
        Self::new(vertical_position, Some("true".to_string()))
    }

    /// Decode the reservation attribute.
    pub fn is_reserved(&self) -> Result<bool, SeatMapError> {
        match self.reserved_attr.as_deref() {
            Some("true") => Ok(true),
            Some("false") => Ok(false),
            _ => Err(SeatMapError::InvalidReservation(self.reserved_attr.clone())),
        }
    }
}

/// A seat placed in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub row: usize,
    pub col: usize,
    pub reserved: bool,
}

/// Row/column model of a theater's seats for one showing.
///
/// Seats stay in the order they were built (row-major). `max_col` is the
/// highest column index seen in any row, so short rows are judged against the
/// widest row's edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatGrid {
    pub(crate) seats: Vec<Seat>,
    pub(crate) max_row: usize,
    pub(crate) max_col: usize,
}

impl SeatGrid {
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn max_row(&self) -> usize {
        self.max_row
    }

    pub fn max_col(&self) -> usize {
        self.max_col
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn available_count(&self) -> usize {
        self.seats.iter().filter(|s| !s.reserved).count()
    }
}
