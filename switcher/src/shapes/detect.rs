use crate::{cell_index, CellSet, Color, Grid, Mask, ShapeId, BOARD_SIZE};

/// A figure found on the board.
///
/// Matches are cheap to recompute and are never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShapeMatch {
    pub shape: ShapeId,
    /// Top-left corner of the bounding box.
    pub i: i8,
    pub j: i8,
    /// The figure's cells within its bounding box.
    pub mask: Mask,
}

impl ShapeMatch {
    /// The board cells this match occupies.
    pub fn cells(&self) -> CellSet {
        self.mask.place(self.i, self.j)
    }

    pub fn covers(&self, x: i8, y: i8) -> bool {
        self.cells().contains(x, y)
    }
}

/// A region of orthogonally connected cells with the same color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Component {
    pub color: Color,
    pub cells: CellSet,
}

const NEIGHBORS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Partitions the board into maximal same-colored regions.
///
/// Only orthogonal neighbors connect; diagonal ones don't.
pub fn connected_components(grid: &Grid) -> Vec<Component> {
    let mut components = Vec::new();
    let mut visited = CellSet::new();
    for i in 0..BOARD_SIZE {
        for j in 0..BOARD_SIZE {
            if visited.contains(i, j) {
                continue;
            }
            let color = grid[i as usize * BOARD_SIZE as usize + j as usize];
            let mut cells = CellSet::new().insert(i, j);
            visited = visited.insert(i, j);
            let mut stack = vec![(i, j)];
            while let Some((ci, cj)) = stack.pop() {
                for (di, dj) in NEIGHBORS {
                    let (ni, nj) = (ci + di, cj + dj);
                    let same_color = cell_index(ni, nj).is_some_and(|idx| grid[idx] == color);
                    if same_color && !visited.contains(ni, nj) {
                        visited = visited.insert(ni, nj);
                        cells = cells.insert(ni, nj);
                        stack.push((ni, nj));
                    }
                }
            }
            components.push(Component { color, cells });
        }
    }
    components
}

/// Finds every figure on the board.
///
/// Each connected region is cut out along its bounding box and compared
/// with every rotation of every figure. A region matches at most one
/// figure; regions matching none are dropped.
pub fn detect(grid: &Grid) -> Vec<ShapeMatch> {
    connected_components(grid)
        .into_iter()
        .filter(|component| (4..=5).contains(&component.cells.len()))
        .filter_map(|component| {
            let (mask, i, j) = Mask::from_cells(component.cells)?;
            let shape = ShapeId::identify(mask)?;
            Some(ShapeMatch { shape, i, j, mask })
        })
        .collect()
}

/// Finds every occurrence of one particular figure on the board.
pub fn detect_shape(grid: &Grid, shape: ShapeId) -> Vec<ShapeMatch> {
    detect(grid)
        .into_iter()
        .filter(|m| m.shape == shape)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_grid;

    /// A background in which no region has four or five cells.
    fn checkerboard() -> Grid {
        let mut grid = [Color::R; 36];
        for i in 0..6 {
            for j in 0..6 {
                grid[i * 6 + j] = if (i + j) % 2 == 0 { Color::G } else { Color::B };
            }
        }
        grid
    }

    fn paint(grid: &mut Grid, cells: CellSet, color: Color) {
        for (i, j) in cells {
            grid[i as usize * 6 + j as usize] = color;
        }
    }

    #[test]
    fn checkerboard_has_no_figures() {
        assert!(detect(&checkerboard()).is_empty());
        assert_eq!(connected_components(&checkerboard()).len(), 36);
    }

    #[test]
    fn every_rotation_is_detected_at_its_corner() {
        for shape in ShapeId::ALL {
            for &variant in shape.variants() {
                let (i_max, j_max) = (6 - variant.rows() as i8, 6 - variant.cols() as i8);
                for (i, j) in [(0, 0), (1.min(i_max), 2.min(j_max)), (i_max, j_max)] {
                    let mut grid = checkerboard();
                    paint(&mut grid, variant.place(i, j), Color::Y);
                    let matches = detect(&grid);
                    assert_eq!(
                        matches,
                        vec![ShapeMatch { shape, i, j, mask: variant }],
                        "{} at ({}, {})",
                        shape,
                        i,
                        j
                    );
                }
            }
        }
    }

    #[test]
    fn one_cell_more_or_less_matches_nothing() {
        let mut grid = checkerboard();
        // A bar of six cells is neither h5 nor s6
        paint(&mut grid, CellSet::from_iter((0..6).map(|j| (2, j))), Color::Y);
        assert!(detect_shape(&grid, ShapeId::H5).is_empty());
        assert!(detect(&grid).is_empty());

        let mut grid = checkerboard();
        // A bar of three cells is too short for s6
        paint(&mut grid, CellSet::from_iter((0..3).map(|j| (2, j))), Color::Y);
        assert!(detect(&grid).is_empty());
    }

    #[test]
    fn diagonal_neighbors_do_not_connect() {
        let mut grid = checkerboard();
        // Two s2 squares touching only at a corner
        paint(&mut grid, ShapeId::S2.template().place(0, 0), Color::Y);
        paint(&mut grid, ShapeId::S2.template().place(2, 2), Color::Y);
        let matches = detect(&grid);
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|m| m.shape == ShapeId::S2));
    }

    #[test]
    fn full_block_is_noise() {
        let grid = parse_grid("rrrgbgrrrbgbrrrgbgbgbgbgyyyyyybgbgbg").unwrap();
        let components = connected_components(&grid);
        assert!(components.iter().any(|c| c.color == Color::R && c.cells.len() == 9));
        assert!(detect(&grid).is_empty());
    }

    #[test]
    fn horizontal_bar_in_a_row() {
        let grid = parse_grid("gbgbgbbyyyyygbgbgbbgbgbgrrrrrrgbgbgb").unwrap();
        let matches = detect_shape(&grid, ShapeId::H5);
        assert_eq!(matches.len(), 1);
        assert_eq!((matches[0].i, matches[0].j), (1, 1));
        assert!(matches[0].covers(1, 5));
        assert!(!matches[0].covers(1, 0));
    }
}
