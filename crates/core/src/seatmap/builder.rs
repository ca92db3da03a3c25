//! Builds a [`SeatGrid`] from the flat seat sequence of a seat page.

use super::{RawSeatDescriptor, Seat, SeatGrid, SeatMapError};

impl SeatGrid {
    /// Assign rows and columns to `descriptors`, in order.
    ///
    /// A new row starts whenever a seat's vertical position differs from the
    /// seat right before it. Columns count up from 0 within each row. Fails
    /// without a partial grid if any reservation attribute can't be decoded.
    pub fn build<K, I>(descriptors: I) -> Result<SeatGrid, SeatMapError>
    where
        K: PartialEq,
        I: IntoIterator<Item = RawSeatDescriptor<K>>,
    {
        let descriptors = descriptors.into_iter();
        // Most theaters have fewer than 256 seats.
        let mut seats = Vec::with_capacity(descriptors.size_hint().0.max(256));
        let mut current: Option<K> = None;
        let mut row: Option<usize> = None;
        let mut col = 0;
        let mut max_col = 0;

        for descriptor in descriptors {
            let reserved = descriptor.is_reserved()?;

            if current.as_ref() != Some(&descriptor.vertical_position) {
                current = Some(descriptor.vertical_position);
                row = Some(row.map_or(0, |r| r + 1));
                col = 0;
            }

            seats.push(Seat {
                row: row.unwrap_or_default(),
                col,
                reserved,
            });

            max_col = max_col.max(col);
            col += 1;
        }

        let Some(max_row) = row else {
            return Err(SeatMapError::NoSeats);
        };

        Ok(SeatGrid {
            seats,
            max_row,
            max_col,
        })
    }
}
