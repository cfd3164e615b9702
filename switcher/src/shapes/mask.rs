use std::fmt::{self, Debug};

use crate::{CellSet, BOARD_SIZE};

/// A binary mask of at most 6x6 cells.
///
/// Bit `r * cols + c` is set iff the cell at row `r`, column `c` is part of
/// the mask. Two masks are equal only if their dimensions and bits are equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mask {
    rows: u8,
    cols: u8,
    bits: u64,
}

impl Mask {
    /// Builds a mask from rows of 0/1 values.
    ///
    /// Panics if the rows are ragged or larger than the board.
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        let num_rows = rows.len();
        let num_cols = rows.first().map_or(0, |row| row.len());
        assert!(num_rows <= BOARD_SIZE as usize && num_cols <= BOARD_SIZE as usize);
        let mut bits = 0;
        for (r, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), num_cols, "ragged mask");
            for (c, &value) in row.iter().enumerate() {
                if value != 0 {
                    bits |= 1u64 << (r * num_cols + c);
                }
            }
        }
        Self {
            rows: num_rows as u8,
            cols: num_cols as u8,
            bits,
        }
    }

    /// Extracts the mask of a set of cells, sized to its bounding box.
    ///
    /// Returns the mask together with the top-left corner of the bounding box,
    /// or `None` for an empty set.
    pub fn from_cells(cells: CellSet) -> Option<(Self, i8, i8)> {
        let bbox = cells.bbox()?;
        let (rows, cols) = (bbox.rows(), bbox.cols());
        let mut bits = 0;
        for (i, j) in cells {
            let r = (i - bbox.i_min) as u64;
            let c = (j - bbox.j_min) as u64;
            bits |= 1u64 << (r * cols as u64 + c);
        }
        Some((Self { rows, cols, bits }, bbox.i_min, bbox.j_min))
    }

    pub fn rows(self) -> u8 {
        self.rows
    }

    pub fn cols(self) -> u8 {
        self.cols
    }

    /// Number of set cells.
    pub fn len(self) -> u32 {
        self.bits.count_ones()
    }

    pub fn get(self, r: u8, c: u8) -> bool {
        r < self.rows && c < self.cols && self.bits & (1u64 << (r * self.cols + c)) != 0
    }

    /// The mask turned by 90° clockwise.
    #[must_use]
    pub fn rotate_cw(self) -> Self {
        let mut bits = 0;
        // The new mask has the old column count as its row count and vice versa.
        for r in 0..self.cols {
            for c in 0..self.rows {
                if self.get(self.rows - 1 - c, r) {
                    bits |= 1u64 << (r * self.rows + c);
                }
            }
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            bits,
        }
    }

    /// The board cells covered when the top-left corner of the mask is put on `(i, j)`.
    ///
    /// Cells falling off the board are dropped.
    pub fn place(self, i: i8, j: i8) -> CellSet {
        let mut cells = CellSet::new();
        for r in 0..self.rows {
            for c in 0..self.cols {
                if self.get(r, c) {
                    cells = cells.insert(i + r as i8, j + c as i8);
                }
            }
        }
        cells
    }
}

impl Debug for Mask {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut s = String::new();
        for r in 0..self.rows {
            for c in 0..self.cols {
                s.push(if self.get(r, c) { '1' } else { '0' });
            }
            s.push('\n');
        }
        write!(f, "{}", s)
    }
}
