#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Procedural maze topology generation.
//!
//! Mazes are carved with an iterative depth-first backtracker starting at the
//! bottom-left cell. Every cell is visited exactly once and every carve removes
//! one mirrored wall pair, so the passages form a spanning tree: exactly one
//! simple path connects any two cells. Afterwards one column on the bottom row
//! and one column on the top row are opened to the exterior.

use std::collections::VecDeque;

use maze_chase_core::{CellCoord, Direction, Grid, Maze, MazeError};
use rand::{seq::SliceRandom, Rng};

/// Generates a maze with the provided dimensions.
///
/// Entrance and exit columns are drawn independently, so narrow mazes may
/// place both openings in the same column.
pub fn generate<R>(width: u32, height: u32, rng: &mut R) -> Result<Maze, MazeError>
where
    R: Rng + ?Sized,
{
    let mut grid = Grid::new(width, height)?;
    carve(&mut grid, rng);

    let entrance = rng.gen_range(0..width);
    let exit = rng.gen_range(0..width);
    grid.open(entrance, exit)
}

fn carve<R>(grid: &mut Grid, rng: &mut R)
where
    R: Rng + ?Sized,
{
    let mut stack: Vec<CellCoord> = Vec::new();
    let mut candidates: Vec<(Direction, CellCoord)> = Vec::with_capacity(Direction::ALL.len());
    let mut current = CellCoord::new(0, 0);
    grid.mark_visited(current);

    loop {
        candidates.clear();
        for direction in Direction::ALL {
            if let Some(next) = grid.neighbor(current, direction) {
                if !grid.is_visited(next) {
                    candidates.push((direction, next));
                }
            }
        }

        if let Some(&(direction, next)) = candidates.choose(rng) {
            let removed = grid.remove_wall_between(current, direction);
            debug_assert!(removed, "candidates always lie inside the grid");
            grid.mark_visited(next);
            stack.push(current);
            current = next;
        } else if let Some(previous) = stack.pop() {
            current = previous;
        } else {
            break;
        }
    }
}

/// Returns the unique path of cells leading from `from` to `to`, both inclusive.
///
/// Returns `None` when either coordinate lies outside the maze or the cells
/// are not connected.
#[must_use]
pub fn solve(maze: &Maze, from: CellCoord, to: CellCoord) -> Option<Vec<CellCoord>> {
    if maze.cell(from).is_none() || maze.cell(to).is_none() {
        return None;
    }

    let width = usize::try_from(maze.width()).ok()?;
    let height = usize::try_from(maze.height()).ok()?;
    let slot = |coord: CellCoord| -> Option<usize> {
        let column = usize::try_from(coord.column()).ok()?;
        let row = usize::try_from(coord.row()).ok()?;
        Some(row * width + column)
    };

    let mut parents: Vec<Option<CellCoord>> = vec![None; width * height];
    let mut seen = vec![false; width * height];
    let mut frontier = VecDeque::new();
    seen[slot(from)?] = true;
    frontier.push_back(from);

    while let Some(cell) = frontier.pop_front() {
        if cell == to {
            break;
        }
        for next in maze.passages(cell) {
            let index = slot(next)?;
            if seen[index] {
                continue;
            }
            seen[index] = true;
            parents[index] = Some(cell);
            frontier.push_back(next);
        }
    }

    if !seen[slot(to)?] {
        return None;
    }

    let mut path = vec![to];
    let mut cursor = to;
    while cursor != from {
        cursor = parents[slot(cursor)?]?;
        path.push(cursor);
    }
    path.reverse();
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn carving_visits_every_cell() {
        let mut grid = Grid::new(6, 4).expect("grid");
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        carve(&mut grid, &mut rng);

        for row in 0..4 {
            for column in 0..6 {
                assert!(grid.is_visited(CellCoord::new(column, row)));
            }
        }
    }

    #[test]
    fn solve_returns_single_cell_for_identical_endpoints() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let maze = generate(3, 3, &mut rng).expect("maze");
        let cell = CellCoord::new(1, 1);
        assert_eq!(solve(&maze, cell, cell), Some(vec![cell]));
    }

    #[test]
    fn solve_rejects_cells_outside_maze() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let maze = generate(3, 3, &mut rng).expect("maze");
        assert!(solve(&maze, CellCoord::new(0, 0), CellCoord::new(3, 0)).is_none());
    }
}
