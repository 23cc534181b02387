//! Wall grid and maze contracts shared by generation, navigation and collision.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{CellCoord, Direction, Hazard};

/// Precondition failures raised when addressing a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// A grid was requested with a zero dimension.
    #[error("maze dimensions must be positive, got {columns}x{rows}")]
    EmptyDimensions {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
    /// A cell outside the grid was addressed.
    #[error("cell ({column}, {row}) lies outside the {columns}x{rows} grid")]
    OutOfBounds {
        /// Column of the offending cell.
        column: u32,
        /// Row of the offending cell.
        row: u32,
        /// Column count of the grid.
        columns: u32,
        /// Row count of the grid.
        rows: u32,
    },
}

/// Closed/open flags for the four sides of a cell, indexed by [`Direction`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Walls {
    closed: [bool; 4],
}

impl Walls {
    /// Walls with every side closed.
    #[must_use]
    pub const fn all_closed() -> Self {
        Self { closed: [true; 4] }
    }

    /// Reports whether the wall on the provided side is standing.
    #[must_use]
    pub const fn is_closed(&self, direction: Direction) -> bool {
        self.closed[direction.index()]
    }

    /// Reports whether the wall on the provided side has been knocked down.
    #[must_use]
    pub const fn is_open(&self, direction: Direction) -> bool {
        !self.is_closed(direction)
    }

    /// Number of sides that are still standing.
    #[must_use]
    pub fn closed_count(&self) -> usize {
        self.closed.iter().filter(|closed| **closed).count()
    }

    fn open(&mut self, direction: Direction) {
        self.closed[direction.index()] = false;
    }
}

impl Default for Walls {
    fn default() -> Self {
        Self::all_closed()
    }
}

/// Single maze cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    coord: CellCoord,
    walls: Walls,
    hazard: Option<Hazard>,
}

impl Cell {
    fn new(coord: CellCoord) -> Self {
        Self {
            coord,
            walls: Walls::all_closed(),
            hazard: None,
        }
    }

    /// Coordinate of the cell within its grid.
    #[must_use]
    pub const fn coord(&self) -> CellCoord {
        self.coord
    }

    /// Wall flags of the cell.
    #[must_use]
    pub const fn walls(&self) -> Walls {
        self.walls
    }

    /// Hazard placed on the cell, if any.
    #[must_use]
    pub const fn hazard(&self) -> Option<Hazard> {
        self.hazard
    }
}

/// Dense row-major matrix of cells.
///
/// Walls are only ever opened in pairs through [`Grid::carve`], so the flag a
/// cell holds toward a neighbour always equals the neighbour's flag back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    columns: u32,
    rows: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates a grid of fully walled cells.
    pub fn new(columns: u32, rows: u32) -> Result<Self, GridError> {
        if columns == 0 || rows == 0 {
            return Err(GridError::EmptyDimensions { columns, rows });
        }

        let mut cells = Vec::with_capacity(columns as usize * rows as usize);
        for row in 0..rows {
            for column in 0..columns {
                cells.push(Cell::new(CellCoord::new(column, row)));
            }
        }

        Ok(Self {
            columns,
            rows,
            cells,
        })
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the coordinate addresses a cell of this grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Fails with [`GridError::OutOfBounds`] when the coordinate lies outside the grid.
    pub fn ensure_contains(&self, cell: CellCoord) -> Result<(), GridError> {
        if self.contains(cell) {
            Ok(())
        } else {
            Err(GridError::OutOfBounds {
                column: cell.column(),
                row: cell.row(),
                columns: self.columns,
                rows: self.rows,
            })
        }
    }

    /// Row-major index of the cell, if it lies inside the grid.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        Some(row * width + column)
    }

    /// Cell stored at the coordinate.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Option<&Cell> {
        self.index(cell).and_then(|index| self.cells.get(index))
    }

    /// Iterator over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Geometric neighbour in the provided direction, ignoring walls.
    #[must_use]
    pub fn neighbor(&self, cell: CellCoord, direction: Direction) -> Option<CellCoord> {
        if !self.contains(cell) {
            return None;
        }
        cell.step(direction, self.columns, self.rows)
    }

    /// Reports whether a passage leads from `cell` toward `direction`.
    ///
    /// Sides on the outer boundary never count as open.
    #[must_use]
    pub fn is_open(&self, cell: CellCoord, direction: Direction) -> bool {
        self.neighbor(cell, direction).is_some()
            && self
                .cell(cell)
                .is_some_and(|stored| stored.walls.is_open(direction))
    }

    /// Neighbours reachable through open walls, in [`Direction::ALL`] order.
    pub fn passages(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        Direction::ALL.into_iter().filter_map(move |direction| {
            if self.is_open(cell, direction) {
                self.neighbor(cell, direction)
            } else {
                None
            }
        })
    }

    /// Knocks down the wall between `cell` and its neighbour in `direction`.
    ///
    /// Both sides are opened together. Returns the neighbour, or `None` when
    /// the move would leave the grid.
    pub fn carve(&mut self, cell: CellCoord, direction: Direction) -> Option<CellCoord> {
        let neighbor = self.neighbor(cell, direction)?;
        let from = self.index(cell)?;
        let to = self.index(neighbor)?;
        self.cells[from].walls.open(direction);
        self.cells[to].walls.open(direction.opposite());
        Some(neighbor)
    }

    /// Number of adjacent cell pairs joined by an open wall.
    #[must_use]
    pub fn open_wall_pairs(&self) -> usize {
        self.cells
            .iter()
            .map(|cell| {
                [Direction::East, Direction::South]
                    .into_iter()
                    .filter(|direction| self.is_open(cell.coord, *direction))
                    .count()
            })
            .sum()
    }

    /// Hazard placed on the cell, if any.
    #[must_use]
    pub fn hazard(&self, cell: CellCoord) -> Option<Hazard> {
        self.cell(cell).and_then(Cell::hazard)
    }

    /// Places or clears a hazard. Returns `false` when the cell lies outside the grid.
    pub fn set_hazard(&mut self, cell: CellCoord, hazard: Option<Hazard>) -> bool {
        match self.index(cell) {
            Some(index) => {
                self.cells[index].hazard = hazard;
                true
            }
            None => false,
        }
    }

    /// Iterator over every hazard cell in row-major order.
    pub fn hazards(&self) -> impl Iterator<Item = (CellCoord, Hazard)> + '_ {
        self.cells
            .iter()
            .filter_map(|cell| cell.hazard.map(|hazard| (cell.coord, hazard)))
    }
}

/// Generated level layout: a grid plus its designated start, goal and main path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maze {
    grid: Grid,
    start: CellCoord,
    goal: CellCoord,
    main_path: Vec<CellCoord>,
}

impl Maze {
    /// Assembles a maze, checking that the designated cells lie inside the grid.
    pub fn new(
        grid: Grid,
        start: CellCoord,
        goal: CellCoord,
        main_path: Vec<CellCoord>,
    ) -> Result<Self, GridError> {
        grid.ensure_contains(start)?;
        grid.ensure_contains(goal)?;
        Ok(Self {
            grid,
            start,
            goal,
            main_path,
        })
    }

    /// Underlying wall grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable access to the grid, used while placing hazards.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Cell the player starts in.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        self.start
    }

    /// Cell the player must reach.
    #[must_use]
    pub const fn goal(&self) -> CellCoord {
        self.goal
    }

    /// Ordered cells from start to goal inclusive.
    #[must_use]
    pub fn main_path(&self) -> &[CellCoord] {
        &self.main_path
    }
}
