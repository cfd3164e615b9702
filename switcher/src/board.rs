mod bbox;
mod cell_set;

use std::str::FromStr;

pub use bbox::*;
pub use cell_set::*;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{BoardSnapshot, IllegalAction, ParseError};

/// Side length of the square board.
pub const BOARD_SIZE: i8 = 6;
/// Number of cells on the board.
pub const NUM_CELLS: usize = 36;
/// How often each color appears on a board.
pub const CELLS_PER_COLOR: usize = 9;

/// The colors of a board, in row-major order.
pub type Grid = [Color; NUM_CELLS];

/// The color of a single cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Color {
    #[serde(rename = "r")]
    R,
    #[serde(rename = "g")]
    G,
    #[serde(rename = "b")]
    B,
    #[serde(rename = "y")]
    Y,
}

impl Color {
    pub const ALL: [Color; 4] = [Color::R, Color::G, Color::B, Color::Y];

    /// The single-letter wire representation.
    pub fn letter(self) -> char {
        match self {
            Color::R => 'r',
            Color::G => 'g',
            Color::B => 'b',
            Color::Y => 'y',
        }
    }

    pub fn from_letter(c: char) -> Result<Self, ParseError> {
        match c {
            'r' => Ok(Color::R),
            'g' => Ok(Color::G),
            'b' => Ok(Color::B),
            'y' => Ok(Color::Y),
            _ => Err(ParseError::InvalidColor { found: c }),
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Maps a coordinate pair to its row-major index, if it lies on the board.
pub fn cell_index(i: i8, j: i8) -> Option<usize> {
    if (0..BOARD_SIZE).contains(&i) && (0..BOARD_SIZE).contains(&j) {
        Some(i as usize * BOARD_SIZE as usize + j as usize)
    } else {
        None
    }
}

/// The 6x6 board.
///
/// There are always two versions of the board: the `live` one, which has
/// every swap applied that was staged since the last checkpoint, and the
/// `checkpoint`, which is the last confirmed state. Both are permutations of
/// the same 36 colors, nine of each.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    live: Grid,
    checkpoint: Grid,
}

impl Board {
    /// Creates a board from a grid, checking that every color appears exactly nine times.
    pub fn from_grid(grid: Grid) -> Result<Self, ParseError> {
        for color in Color::ALL {
            let count = grid.iter().filter(|&&c| c == color).count();
            if count != CELLS_PER_COLOR {
                return Err(ParseError::UnbalancedBoard { color, count });
            }
        }
        Ok(Self {
            live: grid,
            checkpoint: grid,
        })
    }

    /// A uniformly shuffled board, with `live` and `checkpoint` equal.
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut grid = [Color::R; NUM_CELLS];
        for (idx, cell) in grid.iter_mut().enumerate() {
            *cell = Color::ALL[idx / CELLS_PER_COLOR];
        }
        grid.shuffle(rng);
        Self {
            live: grid,
            checkpoint: grid,
        }
    }

    /// Swaps the colors of two cells on the live board.
    ///
    /// The checkpoint is not touched. Nothing changes if either coordinate is off the board.
    pub fn exchange(&mut self, i1: i8, j1: i8, i2: i8, j2: i8) -> Result<(), IllegalAction> {
        let first = cell_index(i1, j1).ok_or(IllegalAction::OutOfRange { i: i1, j: j1 })?;
        let second = cell_index(i2, j2).ok_or(IllegalAction::OutOfRange { i: i2, j: j2 })?;
        self.live.swap(first, second);
        Ok(())
    }

    /// Confirms all staged swaps.
    pub fn commit(&mut self) {
        self.checkpoint = self.live;
    }

    /// Discards all staged swaps.
    pub fn undo(&mut self) {
        self.live = self.checkpoint;
    }

    /// Reads the live board.
    pub fn color_at(&self, i: i8, j: i8) -> Result<Color, IllegalAction> {
        cell_index(i, j)
            .map(|idx| self.live[idx])
            .ok_or(IllegalAction::OutOfRange { i, j })
    }

    pub fn live(&self) -> &Grid {
        &self.live
    }

    pub fn checkpoint(&self) -> &Grid {
        &self.checkpoint
    }

    /// Are there swaps that have neither been committed nor undone?
    pub fn has_staged_moves(&self) -> bool {
        self.live != self.checkpoint
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::from_grid(&self.live)
    }
}

impl FromStr for Board {
    type Err = ParseError;

    /// Parses the 36-letter row-major wire format, e.g. `"rrrrrrrrrbbbbbbbbbggggggggg..."`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::from_grid(parse_grid(s)?)
    }
}

/// Parses 36 color letters without checking the color balance.
pub fn parse_grid(s: &str) -> Result<Grid, ParseError> {
    let mut grid = [Color::R; NUM_CELLS];
    let mut len = 0;
    for (idx, c) in s.chars().enumerate() {
        if idx < NUM_CELLS {
            grid[idx] = Color::from_letter(c)?;
        }
        len += 1;
    }
    if len != NUM_CELLS {
        return Err(ParseError::WrongBoardLength { len });
    }
    Ok(grid)
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", crate::visualize_grid(&self.live))
    }
}
