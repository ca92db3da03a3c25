//! Decides whether a seat grid still has a good block of seats.
//!
//! A good block is `num_seats` available seats side by side in one row, none
//! of them within [`BUFFER`] seats of the front, back, or either side of the
//! grid. Edge seats are treated as bad viewing angles.

use super::SeatGrid;

/// Rows and columns this close to any edge of the grid never count as good.
pub const BUFFER: usize = 3;

/// Scan `grid` for `num_seats` contiguous good seats.
///
/// Seats are visited in construction order (front to back, left to right), so
/// the scan stops as soon as it reaches the back buffer. The first qualifying
/// block wins.
pub fn has_good_seats(grid: &SeatGrid, num_seats: usize) -> bool {
    let mut contiguous = 0;
    for seat in &grid.seats {
        // New row.
        if seat.col == 0 {
            contiguous = 0;
        }
        // Nothing past here is far enough from the back.
        if seat.row + BUFFER > grid.max_row {
            break;
        }
        if seat.row < BUFFER
            || seat.col < BUFFER
            || seat.col + BUFFER > grid.max_col
            || seat.reserved
        {
            contiguous = 0;
            continue;
        }

        contiguous += 1;
        if contiguous >= num_seats {
            return true;
        }
    }

    false
}

impl SeatGrid {
    /// See [`has_good_seats`].
    pub fn has_good_seats(&self, num_seats: usize) -> bool {
        has_good_seats(self, num_seats)
    }
}
