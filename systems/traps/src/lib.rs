#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Hazard placement that spreads holes and spikes across a generated grid.

use final_door_core::{CellCoord, Direction, Grid, GridError, Hazard};
use rand::{seq::SliceRandom, Rng};

/// Outcome of a placement pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrapPlacement {
    /// Cells that received a hole, in placement order.
    pub holes: Vec<CellCoord>,
    /// Cells that received spikes, in placement order.
    pub spikes: Vec<CellCoord>,
}

impl TrapPlacement {
    /// Total number of traps placed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.holes.len() + self.spikes.len()
    }

    /// Reports whether no trap was placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.holes.is_empty() && self.spikes.is_empty()
    }
}

/// Trap placer that reuses its candidate and exclusion buffers between levels.
#[derive(Debug, Default)]
pub struct TrapPlacer {
    candidates: Vec<CellCoord>,
    excluded: Vec<bool>,
}

impl TrapPlacer {
    /// Creates a new trap placer with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears existing hazards and places up to `holes` holes followed by up
    /// to `spikes` spike patches.
    ///
    /// Candidates are every cell other than `start` and `goal`, visited in a
    /// shuffled order. A placed trap excludes its own cell and its four
    /// orthogonal neighbours from both passes, so no two traps touch. When
    /// too few cells remain, fewer traps are placed.
    pub fn place<R>(
        &mut self,
        grid: &mut Grid,
        start: CellCoord,
        goal: CellCoord,
        holes: usize,
        spikes: usize,
        rng: &mut R,
    ) -> Result<TrapPlacement, GridError>
    where
        R: Rng + ?Sized,
    {
        grid.ensure_contains(start)?;
        grid.ensure_contains(goal)?;

        self.candidates.clear();
        for column in 0..grid.columns() {
            for row in 0..grid.rows() {
                let cell = CellCoord::new(column, row);
                let _ = grid.set_hazard(cell, None);
                if cell != start && cell != goal {
                    self.candidates.push(cell);
                }
            }
        }
        self.candidates.shuffle(rng);

        self.excluded.clear();
        self.excluded.resize(grid.cell_count(), false);

        let mut placement = TrapPlacement::default();
        self.place_kind(grid, Hazard::Hole, holes, &mut placement.holes);
        self.place_kind(grid, Hazard::Spike, spikes, &mut placement.spikes);
        Ok(placement)
    }

    fn place_kind(
        &mut self,
        grid: &mut Grid,
        hazard: Hazard,
        requested: usize,
        placed: &mut Vec<CellCoord>,
    ) {
        for &cell in &self.candidates {
            if placed.len() >= requested {
                break;
            }
            let Some(index) = grid.index(cell) else {
                continue;
            };
            if self.excluded[index] {
                continue;
            }

            let _ = grid.set_hazard(cell, Some(hazard));
            placed.push(cell);

            self.excluded[index] = true;
            for direction in Direction::ALL {
                if let Some(neighbor) = grid.neighbor(cell, direction) {
                    if let Some(neighbor_index) = grid.index(neighbor) {
                        self.excluded[neighbor_index] = true;
                    }
                }
            }
        }
    }
}
