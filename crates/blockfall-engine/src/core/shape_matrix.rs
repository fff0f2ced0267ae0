use std::ops::RangeInclusive;

/// Smallest accepted shape size.
pub const MIN_SHAPE_SIZE: usize = 2;

/// Error returned when a shape declaration cannot be turned into a [`ShapeMatrix`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum InvalidShapeDefinition {
    #[display("shape must have at least 2 rows, got {size}")]
    TooSmall { size: usize },
    #[display("shape must not be larger than {max}, got {size}")]
    TooLarge { size: usize, max: usize },
    #[display("row {row} has {len} cells, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[display("invalid cell {ch:?} at row {row}, column {col}")]
    InvalidCell { row: usize, col: usize, ch: char },
    #[display("shape has no occupied cells")]
    Empty,
}

/// Square occupancy grid of a single piece.
///
/// Cells are addressed as `(col, row)` with row 0 at the top, matching the order
/// in which the shape is declared. A matrix is never mutated after construction;
/// rotation returns a new matrix.
///
/// # Example
///
/// ```
/// use blockfall_engine::ShapeMatrix;
///
/// let t = ShapeMatrix::from_rows(&["010", "111", "000"], 5).unwrap();
/// let rotated = t.rotated_clockwise();
/// assert_eq!(rotated.to_rows(), ["010", "011", "010"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeMatrix {
    size: usize,
    cells: Box<[bool]>,
}

impl ShapeMatrix {
    /// Parses a shape from rows of `'0'` (empty) and `'1'` (occupied) cells.
    ///
    /// The declaration must be square, between [`MIN_SHAPE_SIZE`] and `max_size`
    /// cells wide, and contain at least one occupied cell.
    pub fn from_rows<S>(rows: &[S], max_size: usize) -> Result<Self, InvalidShapeDefinition>
    where
        S: AsRef<str>,
    {
        let size = rows.len();
        if size < MIN_SHAPE_SIZE {
            return Err(InvalidShapeDefinition::TooSmall { size });
        }
        if size > max_size {
            return Err(InvalidShapeDefinition::TooLarge {
                size,
                max: max_size,
            });
        }

        let mut cells = vec![false; size * size].into_boxed_slice();
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let len = line.chars().count();
            if len != size {
                return Err(InvalidShapeDefinition::NotSquare {
                    row,
                    len,
                    expected: size,
                });
            }
            for (col, ch) in line.chars().enumerate() {
                cells[row * size + col] = match ch {
                    '1' => true,
                    '0' => false,
                    _ => return Err(InvalidShapeDefinition::InvalidCell { row, col, ch }),
                };
            }
        }

        if !cells.iter().any(|&c| c) {
            return Err(InvalidShapeDefinition::Empty);
        }
        Ok(Self { size, cells })
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns whether the cell at `(col, row)` is occupied.
    ///
    /// Cells outside the matrix are reported as empty.
    #[must_use]
    pub fn is_occupied(&self, col: usize, row: usize) -> bool {
        col < self.size && row < self.size && self.cells[row * self.size + col]
    }

    /// Iterates over the `(col, row)` coordinates of occupied cells, top row first.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, occupied)| **occupied)
            .map(|(i, _)| (i % self.size, i / self.size))
    }

    /// Range of matrix rows that contain at least one occupied cell.
    #[must_use]
    pub fn occupied_rows(&self) -> RangeInclusive<usize> {
        let mut rows = self.occupied_cells().map(|(_, row)| row);
        // Non-empty by construction.
        let first = rows.next().unwrap_or(0);
        let last = rows.last().unwrap_or(first);
        first..=last
    }

    /// Returns the matrix rotated 90° clockwise about its center.
    ///
    /// The new cell at `(c, r)` is the old cell at `(r, size - 1 - c)`.
    /// The receiver is left untouched.
    #[must_use]
    pub fn rotated_clockwise(&self) -> Self {
        let size = self.size;
        let mut cells = vec![false; size * size].into_boxed_slice();
        for row in 0..size {
            for col in 0..size {
                cells[row * size + col] = self.cells[(size - 1 - col) * size + row];
            }
        }
        Self { size, cells }
    }

    /// Renders the matrix back into its `'0'`/`'1'` declaration form.
    #[must_use]
    pub fn to_rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.size)
            .map(|row| row.iter().map(|&c| if c { '1' } else { '0' }).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_shape() {
        let shape = ShapeMatrix::from_rows(&["110", "011", "000"], 5).unwrap();
        assert_eq!(shape.size(), 3);
        assert!(shape.is_occupied(0, 0));
        assert!(shape.is_occupied(1, 0));
        assert!(!shape.is_occupied(2, 0));
        assert!(shape.is_occupied(2, 1));
        assert!(!shape.is_occupied(0, 2));
        assert!(!shape.is_occupied(3, 0));
        assert_eq!(
            shape.occupied_cells().collect::<Vec<_>>(),
            [(0, 0), (1, 0), (1, 1), (2, 1)]
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            ShapeMatrix::from_rows(&["1"], 5),
            Err(InvalidShapeDefinition::TooSmall { size: 1 })
        );
        assert_eq!(
            ShapeMatrix::from_rows::<&str>(&[], 5),
            Err(InvalidShapeDefinition::TooSmall { size: 0 })
        );
        assert_eq!(
            ShapeMatrix::from_rows(&["000", "111", "000"], 2),
            Err(InvalidShapeDefinition::TooLarge { size: 3, max: 2 })
        );
        assert_eq!(
            ShapeMatrix::from_rows(&["01", "110"], 5),
            Err(InvalidShapeDefinition::NotSquare {
                row: 1,
                len: 3,
                expected: 2
            })
        );
        assert_eq!(
            ShapeMatrix::from_rows(&["0110", "0110"], 5),
            Err(InvalidShapeDefinition::NotSquare {
                row: 0,
                len: 4,
                expected: 2
            })
        );
        assert_eq!(
            ShapeMatrix::from_rows(&["0x", "11"], 5),
            Err(InvalidShapeDefinition::InvalidCell {
                row: 0,
                col: 1,
                ch: 'x'
            })
        );
        assert_eq!(
            ShapeMatrix::from_rows(&["00", "00"], 5),
            Err(InvalidShapeDefinition::Empty)
        );
    }

    #[test]
    fn test_rotate_clockwise() {
        let l = ShapeMatrix::from_rows(&["001", "111", "000"], 5).unwrap();
        let r1 = l.rotated_clockwise();
        assert_eq!(r1.to_rows(), ["010", "010", "011"]);
        let r2 = r1.rotated_clockwise();
        assert_eq!(r2.to_rows(), ["000", "111", "100"]);

        // The top-left corner moves to the top-right corner.
        let corner = ShapeMatrix::from_rows(&["10", "00"], 5).unwrap();
        assert_eq!(corner.rotated_clockwise().to_rows(), ["01", "00"]);
    }

    #[test]
    fn test_rotate_does_not_mutate_receiver() {
        let i = ShapeMatrix::from_rows(&["0000", "1111", "0000", "0000"], 5).unwrap();
        let rotated = i.rotated_clockwise();
        assert_eq!(i.to_rows(), ["0000", "1111", "0000", "0000"]);
        assert_eq!(rotated.to_rows(), ["0010", "0010", "0010", "0010"]);
    }

    #[test]
    fn test_four_rotations_are_identity() {
        let shapes: [&[&str]; 4] = [
            &["11", "10"],
            &["010", "111", "000"],
            &["0000", "1111", "0000", "0000"],
            &["10000", "11000", "01100", "00110", "00011"],
        ];
        for rows in shapes {
            let shape = ShapeMatrix::from_rows(rows, 5).unwrap();
            let rotated = shape
                .rotated_clockwise()
                .rotated_clockwise()
                .rotated_clockwise()
                .rotated_clockwise();
            assert_eq!(rotated, shape);
        }
    }

    #[test]
    fn test_occupied_rows() {
        let i = ShapeMatrix::from_rows(&["0000", "1111", "0000", "0000"], 5).unwrap();
        assert_eq!(i.occupied_rows(), 1..=1);
        assert_eq!(i.rotated_clockwise().occupied_rows(), 0..=3);
        let t = ShapeMatrix::from_rows(&["010", "111", "000"], 5).unwrap();
        assert_eq!(t.occupied_rows(), 0..=1);
    }
}
