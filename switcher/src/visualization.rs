use crate::{Grid, BOARD_SIZE};

/// Draws a board as a box of color letters, with row and column numbers.
pub fn visualize_grid(grid: &Grid) -> String {
    let mut result = String::from("    ");
    for j in 0..BOARD_SIZE {
        result += &format!("{:>2}", j);
    }
    result += "\n    ╭";
    for _ in 0..BOARD_SIZE {
        result += "──";
    }
    result += "╮";
    for (i, row) in grid.chunks(BOARD_SIZE as usize).enumerate() {
        result += &format!("\n{:>3} │", i);
        for color in row {
            result += &format!("{} ", color.letter().to_ascii_uppercase());
        }
        result += "│";
    }
    result += "\n    ╰";
    for _ in 0..BOARD_SIZE {
        result += "──";
    }
    result += "╯";
    result
}
