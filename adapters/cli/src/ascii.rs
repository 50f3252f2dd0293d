//! Plain-text rendering of maze walls, top row first.

use std::fmt::Write as _;

use maze_chase_core::{CellCoord, Maze, Walls};

/// Renders every wall of `maze` using `+`, `-` and `|`.
pub(crate) fn render(maze: &Maze) -> String {
    let mut out = String::new();
    for row in (0..maze.height()).rev() {
        horizontal(maze, row, |walls| walls.north, &mut out);
        out.push(if walls(maze, CellCoord::new(0, row)).west {
            '|'
        } else {
            ' '
        });
        for column in 0..maze.width() {
            let east = walls(maze, CellCoord::new(column, row)).east;
            let _ = write!(out, "   {}", if east { '|' } else { ' ' });
        }
        out.push('\n');
    }
    horizontal(maze, 0, |walls| walls.south, &mut out);
    out
}

fn horizontal(maze: &Maze, row: u32, side: impl Fn(Walls) -> bool, out: &mut String) {
    out.push('+');
    for column in 0..maze.width() {
        let closed = side(walls(maze, CellCoord::new(column, row)));
        out.push_str(if closed { "---+" } else { "   +" });
    }
    out.push('\n');
}

fn walls(maze: &Maze, coord: CellCoord) -> Walls {
    maze.walls(coord).unwrap_or(Walls::ALL)
}

#[cfg(test)]
mod tests {
    use maze_chase_core::{Direction, Grid};

    use super::*;

    #[test]
    fn single_cell_shows_both_openings() {
        let maze = Grid::new(1, 1).expect("grid").open(0, 0).expect("maze");
        assert_eq!(render(&maze), "+   +\n|   |\n+   +\n");
    }

    #[test]
    fn carved_passages_are_blank() {
        let mut grid = Grid::new(2, 2).expect("grid");
        let _ = grid.remove_wall_between(CellCoord::new(0, 0), Direction::East);
        let _ = grid.remove_wall_between(CellCoord::new(1, 0), Direction::North);
        let _ = grid.remove_wall_between(CellCoord::new(1, 1), Direction::West);
        let maze = grid.open(0, 1).expect("maze");

        let expected = "\
+---+   +
|       |
+---+   +
|       |
+   +---+
";
        assert_eq!(render(&maze), expected);
    }
}
