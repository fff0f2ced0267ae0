use crate::core::{Field, field::to_coord};

use super::events::{RowCollapse, ShiftedCell};

/// Removes every full row in `row_range_size` rows starting at `row_range_start`
/// and returns how many rows were removed.
///
/// The range is normally the vertical extent of the piece that just locked, since
/// no other row can have become full. Scanning the whole field gives the same
/// result, only slower.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Field, scan_and_clear};
///
/// let mut field = Field::from_ascii(4, 4, 2, "
///     .#..
///     #####
///     #####
///     #.##
/// ");
/// assert_eq!(scan_and_clear(&mut field, 1, 4), 2);
/// assert_eq!(field, Field::from_ascii(4, 4, 2, "
///     .#..
///     #.##
/// "));
/// ```
pub fn scan_and_clear(field: &mut Field, row_range_start: i32, row_range_size: usize) -> usize {
    let mut scan = LineScan::new(field, row_range_start, row_range_size);
    while let Some(y) = scan.next_full_row(field) {
        field.shift_rows_down(y);
        scan.cleared += 1;
    }
    scan.cleared
}

/// Incremental line scan that stops after each removed row.
///
/// The scan walks the range bottom-up. When row `y` is full it is removed and the
/// same `y` is examined again, since the row that moved into it may be full too.
/// This lets the caller wait for a collapse to settle before looking for the next
/// one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineScan {
    next_y: i32,
    end_y: i32,
    cleared: usize,
}

impl LineScan {
    /// Prepares a scan of `row_range_size` rows from `row_range_start`.
    ///
    /// The start is clamped above the floor and the end to the top of the grid.
    #[must_use]
    pub fn new(field: &Field, row_range_start: i32, row_range_size: usize) -> Self {
        let next_y = row_range_start.max(1);
        let size = i32::try_from(row_range_size).unwrap_or(i32::MAX);
        let end_y = next_y
            .saturating_add(size)
            .min(to_coord(field.total_height()));
        Self {
            next_y,
            end_y,
            cleared: 0,
        }
    }

    /// Number of rows removed so far.
    #[must_use]
    pub fn cleared(&self) -> usize {
        self.cleared
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.next_y >= self.end_y
    }

    fn next_full_row(&mut self, field: &Field) -> Option<i32> {
        while self.next_y < self.end_y {
            if field.is_row_full(self.next_y) {
                return Some(self.next_y);
            }
            self.next_y += 1;
        }
        None
    }

    /// Removes the next full row of the range and describes the shift.
    ///
    /// Returns `None` once no full row is left in the range.
    pub fn next_collapse(&mut self, field: &mut Field) -> Option<RowCollapse> {
        let y = self.next_full_row(field)?;
        let shifted = field
            .occupied_playable_cells()
            .filter(|cell| cell.y > y)
            .map(|cell| ShiftedCell {
                x: cell.x,
                from_y: cell.y,
                to_y: cell.y - 1,
            })
            .collect();
        field.shift_rows_down(y);
        self.cleared += 1;
        Some(RowCollapse { y, shifted })
    }
}
