use std::{fmt, ops::Range};

use serde::{Deserialize, Serialize};

use super::shape_matrix::ShapeMatrix;

/// A cell position in field coordinates.
///
/// `y = 0` is the floor row and `y` increases upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellPos {
    pub x: i32,
    pub y: i32,
}

impl CellPos {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Single row of the field grid, sentinel columns included.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FieldRow {
    cells: Box<[bool]>,
}

impl FieldRow {
    fn empty(total_width: usize, playable: Range<usize>) -> Self {
        let mut cells = vec![true; total_width].into_boxed_slice();
        cells[playable].fill(false);
        Self { cells }
    }

    fn full(total_width: usize) -> Self {
        Self {
            cells: vec![true; total_width].into_boxed_slice(),
        }
    }

    fn is_playable_filled(&self, playable: Range<usize>) -> bool {
        self.cells[playable].iter().all(|&c| c)
    }

    fn copy_playable_from(&mut self, other: &Self, playable: Range<usize>) {
        self.cells[playable.clone()].copy_from_slice(&other.cells[playable]);
    }

    fn clear_playable(&mut self, playable: Range<usize>) {
        self.cells[playable].fill(false);
    }
}

/// Occupancy grid of the whole playing area.
///
/// # Layout
///
/// The playable interior of `width × height` cells is padded with sentinel cells
/// that are permanently occupied:
///
/// - `border` wall columns on each side, where `border` is the largest shape size,
///   so that every empty column of a shape can hang over the wall,
/// - a single floor row at `y = 0`.
///
/// Above the playable rows there are `border - 1` open rows where pieces spawn.
///
/// ```text
///  y
///  7  W W . . . . W W    ← spawn rows (border - 1)
///  6  W W . . . . W W
///  5  W W . . . . W W    ← playable rows 1..=height
///  ...
///  1  W W . . . . W W
///  0  W W W W W W W W    ← floor
/// ```
///
/// Because walls and floor are ordinary occupied cells, a collision with them is
/// indistinguishable from a collision with a locked piece and no bounds checks
/// are needed. Coordinates outside the grid are reported as occupied as well.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    width: usize,
    height: usize,
    border: usize,
    rows: Vec<FieldRow>,
}

impl Field {
    /// Creates an empty field with all sentinel cells set.
    ///
    /// `border` must be at least the size of the largest shape that will be
    /// placed on the field.
    #[must_use]
    pub fn new(width: usize, height: usize, border: usize) -> Self {
        let total_width = width + 2 * border;
        let total_height = height + border;
        let playable = border..border + width;
        let mut rows = Vec::with_capacity(total_height);
        rows.push(FieldRow::full(total_width));
        rows.resize(total_height, FieldRow::empty(total_width, playable));
        Self {
            width,
            height,
            border,
            rows,
        }
    }

    /// Builds a field from ASCII art for testing.
    ///
    /// `'#'` is an occupied cell and `'.'` is an empty one; other characters are
    /// ignored. Lines are listed from top to bottom and the last line is row 1,
    /// just above the floor.
    #[must_use]
    pub fn from_ascii(width: usize, height: usize, border: usize, art: &str) -> Self {
        let mut field = Self::new(width, height, border);
        let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();
        assert!(
            lines.len() < field.total_height(),
            "Art has {} rows, but the field only has {} open rows",
            lines.len(),
            field.total_height() - 1
        );

        for (i, line) in lines.iter().rev().enumerate() {
            let chars: Vec<char> = line.chars().filter(|c| *c == '#' || *c == '.').collect();
            assert_eq!(
                chars.len(),
                width,
                "Each row must have exactly {width} cells, got {} at row {}",
                chars.len(),
                i + 1
            );
            for (x, &ch) in chars.iter().enumerate() {
                if ch == '#' {
                    field.rows[i + 1].cells[border + x] = true;
                }
            }
        }
        field
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn border(&self) -> usize {
        self.border
    }

    #[must_use]
    pub fn total_width(&self) -> usize {
        self.width + 2 * self.border
    }

    #[must_use]
    pub fn total_height(&self) -> usize {
        self.rows.len()
    }

    /// Column range of the playable interior.
    #[must_use]
    pub fn playable_x_range(&self) -> Range<usize> {
        self.border..self.border + self.width
    }

    /// Row range of the visible playable rows (the spawn rows above are excluded).
    #[must_use]
    pub fn playable_y_range(&self) -> Range<usize> {
        1..self.height + 1
    }

    /// Anchor at which a shape of the given size spawns: horizontally centered,
    /// top row of the shape on the top row of the grid.
    #[must_use]
    pub fn spawn_anchor(&self, shape_size: usize) -> CellPos {
        CellPos::new(
            to_coord(self.total_width() / 2 - shape_size / 2),
            to_coord(self.total_height() - 1),
        )
    }

    fn index(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        (x < self.total_width() && y < self.total_height()).then_some((x, y))
    }

    /// Returns whether the cell at `(x, y)` is occupied.
    #[must_use]
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.index(x, y)
            .is_none_or(|(x, y)| self.rows[y].cells[x])
    }

    /// Checks whether `shape` overlaps any occupied cell when its top-left cell is
    /// placed at `(x, y)`.
    ///
    /// Shape cell `(col, row)` lands on field cell `(x + col, y - row)`. The bottom
    /// row of the shape is checked first since that is where a falling piece
    /// usually collides.
    #[must_use]
    pub fn check_overlap(&self, shape: &ShapeMatrix, x: i32, y: i32) -> bool {
        let size = shape.size();
        (0..size).rev().any(|row| {
            (0..size).any(|col| {
                shape.is_occupied(col, row)
                    && self.is_occupied(x + to_coord(col), y - to_coord(row))
            })
        })
    }

    /// Writes every occupied cell of `shape` placed at `(x, y)` into the field.
    ///
    /// The placement is not validated; callers ensure that
    /// [`check_overlap`](Self::check_overlap) was false at this position.
    pub fn commit(&mut self, shape: &ShapeMatrix, x: i32, y: i32) {
        for (col, row) in shape.occupied_cells() {
            let pos = self.index(x + to_coord(col), y - to_coord(row));
            debug_assert!(pos.is_some(), "committed cell outside the field");
            if let Some((cx, cy)) = pos {
                self.rows[cy].cells[cx] = true;
            }
        }
    }

    /// Returns whether every playable cell of row `y` is occupied.
    ///
    /// Wall columns are excluded by range. The floor and rows outside the grid are
    /// never full.
    #[must_use]
    pub fn is_row_full(&self, y: i32) -> bool {
        match usize::try_from(y) {
            Ok(y) if y >= 1 && y < self.total_height() => {
                self.rows[y].is_playable_filled(self.playable_x_range())
            }
            _ => false,
        }
    }

    /// Deletes row `from_y` by moving every row above it down by one.
    ///
    /// Rows are rewritten in increasing `y` order so that each source row is read
    /// before it is overwritten; the top row is cleared afterwards. Only playable
    /// columns are touched and the floor row is never overwritten.
    pub fn shift_rows_down(&mut self, from_y: i32) {
        let playable = self.playable_x_range();
        let top = self.total_height() - 1;
        let from_y = usize::try_from(from_y).unwrap_or(0).max(1);
        if from_y > top {
            return;
        }
        for y in from_y..top {
            let (lower, upper) = self.rows.split_at_mut(y + 1);
            lower[y].copy_playable_from(&upper[0], playable.clone());
        }
        self.rows[top].clear_playable(playable);
    }

    /// Iterates over occupied cells of the playable columns above the floor,
    /// bottom row first.
    pub fn occupied_playable_cells(&self) -> impl Iterator<Item = CellPos> + '_ {
        let playable = self.playable_x_range();
        self.rows
            .iter()
            .enumerate()
            .skip(1)
            .flat_map(move |(y, row)| {
                playable
                    .clone()
                    .filter(move |&x| row.cells[x])
                    .map(move |x| CellPos::new(to_coord(x), to_coord(y)))
            })
    }
}

/// Dumps the whole grid, top row first, as lines of `'1'` and `'0'`.
impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows.iter().rev() {
            for &cell in &row.cells {
                f.write_str(if cell { "1" } else { "0" })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub(crate) const fn to_coord(v: usize) -> i32 {
    v as i32
}
