use std::fmt::{self, Debug};

use super::{cell_index, BoundingBox, BOARD_SIZE};
use crate::bitset::bitset_traits;

const VALID_BITS: u64 = 0xfffffffff;

/// A [`Copy`] set of board cells that stores a single bit per cell.
///
/// Bit `i * 6 + j` stands for the cell `(i, j)`. It can be converted back
/// into a list of coordinate pairs by means of its [`IntoIterator`] instance.
///
/// Note that its "mutating" methods return a new object instead of really mutating.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellSet {
    // Only the low 36 bits are used.
    bits: u64,
}

bitset_traits!(CellSet, VALID_BITS);

impl CellSet {
    pub fn new() -> Self {
        Self { bits: 0 }
    }

    /// Inserts `(i, j)`. Coordinates off the board are ignored.
    #[must_use]
    pub fn insert(self, i: i8, j: i8) -> Self {
        match cell_index(i, j) {
            Some(idx) => Self {
                bits: self.bits | (1u64 << idx),
            },
            None => self,
        }
    }

    pub fn contains(self, i: i8, j: i8) -> bool {
        cell_index(i, j).is_some_and(|idx| self.bits & (1u64 << idx) != 0)
    }

    pub fn is_empty(self) -> bool {
        self.bits == 0
    }

    pub fn len(self) -> u32 {
        self.bits.count_ones()
    }

    /// The smallest area enclosing every cell of the set.
    pub fn bbox(self) -> Option<BoundingBox> {
        BoundingBox::from_coordinates_iter(self.into_iter())
    }
}

impl Debug for CellSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut s = String::with_capacity(36 * 2);
        for i in 0..BOARD_SIZE {
            for j in 0..BOARD_SIZE {
                s.push(if self.contains(i, j) { '1' } else { '.' });
                s.push(if j == BOARD_SIZE - 1 { '\n' } else { ' ' });
            }
        }
        write!(f, "{}", s)
    }
}

impl FromIterator<(i8, i8)> for CellSet {
    fn from_iter<T: IntoIterator<Item = (i8, i8)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(CellSet::new(), |set, (i, j)| set.insert(i, j))
    }
}

/// Iterator produced by [`CellSet::into_iter()`].
pub struct CellSetIter {
    bits: u64,
}

impl IntoIterator for CellSet {
    type Item = (i8, i8);

    type IntoIter = CellSetIter;

    fn into_iter(self) -> Self::IntoIter {
        CellSetIter { bits: self.bits }
    }
}

impl Iterator for CellSetIter {
    type Item = (i8, i8);

    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            None
        } else {
            // This cast is safe, as the max value for trailing_zeros is 64
            let idx = self.bits.trailing_zeros() as i8;
            // Clear the flag corresponding to this coordinate
            self.bits ^= 1u64 << idx;
            Some((idx / BOARD_SIZE, idx % BOARD_SIZE))
        }
    }
}
