//! Maze topology: the mutable generation grid and the immutable maze it yields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{CellCoord, Direction};

/// Errors raised while building a maze topology.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum MazeError {
    /// The grid was requested with a zero side or more than [`MAX_CELLS`] cells.
    #[error(
        "maze dimensions must be positive and hold at most {} cells, got {width}x{height}",
        MAX_CELLS
    )]
    InvalidDimensions {
        /// Requested number of columns.
        width: u32,
        /// Requested number of rows.
        height: u32,
    },
    /// A boundary opening was requested outside the grid.
    #[error("opening column {column} lies outside a maze of width {width}")]
    OpeningOutOfBounds {
        /// Requested column.
        column: u32,
        /// Number of columns in the grid.
        width: u32,
    },
}

/// Largest number of cells a grid may hold.
pub const MAX_CELLS: u64 = 1 << 24;

/// Wall flags on the four sides of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Walls {
    /// Wall toward the next row up.
    pub north: bool,
    /// Wall toward the next column right.
    pub east: bool,
    /// Wall toward the previous row.
    pub south: bool,
    /// Wall toward the previous column.
    pub west: bool,
}

impl Walls {
    /// All four walls standing.
    pub const ALL: Self = Self {
        north: true,
        east: true,
        south: true,
        west: true,
    };

    /// Reports whether the wall on the provided side is standing.
    #[must_use]
    pub const fn has(&self, direction: Direction) -> bool {
        match direction {
            Direction::North => self.north,
            Direction::East => self.east,
            Direction::South => self.south,
            Direction::West => self.west,
        }
    }

    /// Number of walls still standing.
    #[must_use]
    pub fn count(&self) -> usize {
        Direction::ALL
            .iter()
            .filter(|direction| self.has(**direction))
            .count()
    }

    fn remove(&mut self, direction: Direction) {
        match direction {
            Direction::North => self.north = false,
            Direction::East => self.east = false,
            Direction::South => self.south = false,
            Direction::West => self.west = false,
        }
    }
}

/// Unit square of the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    walls: Walls,
    visited: bool,
}

impl Cell {
    const fn sealed() -> Self {
        Self {
            walls: Walls::ALL,
            visited: false,
        }
    }

    /// Wall flags of the cell.
    #[must_use]
    pub const fn walls(&self) -> Walls {
        self.walls
    }

    /// Reports whether generation visited the cell.
    #[must_use]
    pub const fn visited(&self) -> bool {
        self.visited
    }
}

/// Mutable cell grid used while carving a maze.
///
/// Every cell starts unvisited with all walls standing. Walls are only ever
/// removed in mirrored pairs, so a side is open exactly when the matching
/// side of the neighbour is open. Consuming the grid through [`Grid::open`]
/// freezes the topology into a [`Maze`].
#[derive(Clone, Debug)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates a sealed grid with the provided dimensions.
    pub fn new(width: u32, height: u32) -> Result<Self, MazeError> {
        let capacity = cell_capacity(width, height)
            .ok_or(MazeError::InvalidDimensions { width, height })?;
        Ok(Self {
            width,
            height,
            cells: vec![Cell::sealed(); capacity],
        })
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Returns the cell at the provided coordinate, if it lies inside the grid.
    #[must_use]
    pub fn cell(&self, coord: CellCoord) -> Option<&Cell> {
        index(self.width, self.height, coord).and_then(|index| self.cells.get(index))
    }

    /// Reports whether the cell has been visited. Cells outside the grid report `true`.
    #[must_use]
    pub fn is_visited(&self, coord: CellCoord) -> bool {
        self.cell(coord).map_or(true, Cell::visited)
    }

    /// Marks the cell as visited.
    pub fn mark_visited(&mut self, coord: CellCoord) {
        if let Some(index) = index(self.width, self.height, coord) {
            self.cells[index].visited = true;
        }
    }

    /// Neighbouring coordinate inside the grid in the provided direction.
    #[must_use]
    pub fn neighbor(&self, coord: CellCoord, direction: Direction) -> Option<CellCoord> {
        neighbor(self.width, self.height, coord, direction)
    }

    /// Removes the wall pair between `coord` and its neighbour in `direction`.
    ///
    /// Returns `false` without touching the grid when the neighbour lies
    /// outside the grid.
    pub fn remove_wall_between(&mut self, coord: CellCoord, direction: Direction) -> bool {
        let Some(next) = self.neighbor(coord, direction) else {
            return false;
        };
        let (Some(from), Some(to)) = (
            index(self.width, self.height, coord),
            index(self.width, self.height, next),
        ) else {
            return false;
        };

        self.cells[from].walls.remove(direction);
        self.cells[to].walls.remove(direction.opposite());
        true
    }

    /// Opens the entrance on the bottom row and the exit on the top row,
    /// freezing the grid into an immutable maze.
    pub fn open(mut self, entrance_column: u32, exit_column: u32) -> Result<Maze, MazeError> {
        for column in [entrance_column, exit_column] {
            if column >= self.width {
                return Err(MazeError::OpeningOutOfBounds {
                    column,
                    width: self.width,
                });
            }
        }

        let entrance = CellCoord::new(entrance_column, 0);
        let exit = CellCoord::new(exit_column, self.height - 1);
        self.open_boundary(entrance, Direction::South);
        self.open_boundary(exit, Direction::North);

        Ok(Maze {
            width: self.width,
            height: self.height,
            cells: self.cells,
            entrance,
            exit,
        })
    }

    fn open_boundary(&mut self, coord: CellCoord, direction: Direction) {
        if let Some(index) = index(self.width, self.height, coord) {
            self.cells[index].walls.remove(direction);
        }
    }
}

/// Immutable maze topology with one entrance and one exit on the perimeter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maze {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
    entrance: CellCoord,
    exit: CellCoord,
}

impl Maze {
    /// Number of columns in the maze.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the maze.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Bottom-row cell whose south wall is open to the exterior.
    #[must_use]
    pub const fn entrance(&self) -> CellCoord {
        self.entrance
    }

    /// Top-row cell whose north wall is open to the exterior.
    #[must_use]
    pub const fn exit(&self) -> CellCoord {
        self.exit
    }

    /// Returns the cell at the provided coordinate, if it lies inside the maze.
    #[must_use]
    pub fn cell(&self, coord: CellCoord) -> Option<&Cell> {
        index(self.width, self.height, coord).and_then(|index| self.cells.get(index))
    }

    /// Wall flags of the cell at the provided coordinate.
    #[must_use]
    pub fn walls(&self, coord: CellCoord) -> Option<Walls> {
        self.cell(coord).map(Cell::walls)
    }

    /// Neighbouring coordinate inside the maze in the provided direction.
    #[must_use]
    pub fn neighbor(&self, coord: CellCoord, direction: Direction) -> Option<CellCoord> {
        neighbor(self.width, self.height, coord, direction)
    }

    /// Neighbour reachable from `coord` through an open interior side.
    #[must_use]
    pub fn passage(&self, coord: CellCoord, direction: Direction) -> Option<CellCoord> {
        let walls = self.walls(coord)?;
        if walls.has(direction) {
            return None;
        }
        self.neighbor(coord, direction)
    }

    /// Iterator over the neighbours reachable from `coord`.
    pub fn passages(&self, coord: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| self.passage(coord, direction))
    }

    /// Number of interior wall pairs removed during generation.
    #[must_use]
    pub fn passage_count(&self) -> usize {
        self.coords()
            .map(|coord| {
                [Direction::North, Direction::East]
                    .into_iter()
                    .filter(|direction| self.passage(coord, *direction).is_some())
                    .count()
            })
            .sum()
    }

    /// Iterator over every coordinate in row-major order, bottom row first.
    pub fn coords(&self) -> impl Iterator<Item = CellCoord> {
        let width = self.width;
        (0..self.height).flat_map(move |row| (0..width).map(move |column| CellCoord::new(column, row)))
    }
}

fn cell_capacity(width: u32, height: u32) -> Option<usize> {
    if width == 0 || height == 0 {
        return None;
    }
    let capacity = u64::from(width).checked_mul(u64::from(height))?;
    if capacity > MAX_CELLS {
        return None;
    }
    usize::try_from(capacity).ok()
}

fn index(width: u32, height: u32, coord: CellCoord) -> Option<usize> {
    if coord.column() < width && coord.row() < height {
        let row = usize::try_from(coord.row()).ok()?;
        let column = usize::try_from(coord.column()).ok()?;
        let width = usize::try_from(width).ok()?;
        Some(row * width + column)
    } else {
        None
    }
}

fn neighbor(width: u32, height: u32, coord: CellCoord, direction: Direction) -> Option<CellCoord> {
    coord
        .step(direction)
        .filter(|next| next.column() < width && next.row() < height)
}
