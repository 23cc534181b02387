#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomised depth-first backtracking that carves a perfect maze.

use final_door_core::{CellCoord, Direction, Grid, GridError};
use rand::Rng;

/// Maze generator that reuses its scratch buffers between levels.
#[derive(Debug, Default)]
pub struct MazeGenerator {
    stack: Vec<CellCoord>,
    visited: Vec<bool>,
    candidates: Vec<Direction>,
}

impl MazeGenerator {
    /// Creates a new generator with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Carves a spanning tree over a freshly walled `columns` x `rows` grid.
    ///
    /// Every cell is visited exactly once, so the result is fully connected
    /// and contains no cycles. Zero dimensions are rejected before any
    /// random draw is made.
    pub fn generate<R>(&mut self, columns: u32, rows: u32, rng: &mut R) -> Result<Grid, GridError>
    where
        R: Rng + ?Sized,
    {
        let mut grid = Grid::new(columns, rows)?;

        self.stack.clear();
        self.visited.clear();
        self.visited.resize(grid.cell_count(), false);

        let origin = CellCoord::new(rng.gen_range(0..columns), rng.gen_range(0..rows));
        self.mark_visited(&grid, origin);
        self.stack.push(origin);

        while let Some(&current) = self.stack.last() {
            self.candidates.clear();
            for direction in Direction::ALL {
                if let Some(neighbor) = grid.neighbor(current, direction) {
                    if !self.is_visited(&grid, neighbor) {
                        self.candidates.push(direction);
                    }
                }
            }

            if self.candidates.is_empty() {
                let _ = self.stack.pop();
                continue;
            }

            let direction = self.candidates[rng.gen_range(0..self.candidates.len())];
            if let Some(next) = grid.carve(current, direction) {
                self.mark_visited(&grid, next);
                self.stack.push(next);
            }
        }

        Ok(grid)
    }

    fn mark_visited(&mut self, grid: &Grid, cell: CellCoord) {
        if let Some(index) = grid.index(cell) {
            self.visited[index] = true;
        }
    }

    fn is_visited(&self, grid: &Grid, cell: CellCoord) -> bool {
        grid.index(cell)
            .map_or(true, |index| self.visited.get(index).copied().unwrap_or(true))
    }
}
