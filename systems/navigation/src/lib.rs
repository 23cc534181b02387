#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Breadth-first search over the wall-graph of a maze.
//!
//! Vertices are cells and edges join orthogonal neighbours whose shared wall
//! is open. Both queries run in O(columns x rows) and reuse the pathfinder's
//! distance, parent and frontier buffers between calls.

use std::collections::VecDeque;

use final_door_core::{CellCoord, Grid, GridError};

const UNREACHED: u32 = u32::MAX;

/// Farthest cell from a start together with the path leading to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GoalRoute {
    /// Cell with the strictly greatest hop distance from the start.
    pub goal: CellCoord,
    /// Hop distance from the start to the goal.
    pub distance: u32,
    /// Ordered cells from the start to the goal inclusive.
    pub path: Vec<CellCoord>,
}

/// Hop distances from a single origin to every cell of a grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistanceField {
    columns: u32,
    rows: u32,
    distances: Vec<u32>,
}

impl DistanceField {
    /// Hop distance to the cell, or `None` when it is unreachable or outside the grid.
    #[must_use]
    pub fn distance(&self, cell: CellCoord) -> Option<u32> {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return None;
        }
        let width = usize::try_from(self.columns).ok()?;
        let distance = *index(width, cell).and_then(|offset| self.distances.get(offset))?;
        (distance != UNREACHED).then_some(distance)
    }

    /// Greatest finite distance in the field.
    #[must_use]
    pub fn eccentricity(&self) -> u32 {
        self.distances
            .iter()
            .copied()
            .filter(|distance| *distance != UNREACHED)
            .max()
            .unwrap_or(0)
    }

    /// Number of cells reachable from the origin, the origin included.
    #[must_use]
    pub fn reachable_count(&self) -> usize {
        self.distances
            .iter()
            .filter(|distance| **distance != UNREACHED)
            .count()
    }
}

/// Breadth-first pathfinder with reusable scratch buffers.
#[derive(Debug, Default)]
pub struct Pathfinder {
    distances: Vec<u32>,
    parents: Vec<Option<CellCoord>>,
    frontier: VecDeque<CellCoord>,
}

impl Pathfinder {
    /// Creates a pathfinder with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes hop distances from `origin` to every cell.
    pub fn distance_field(
        &mut self,
        grid: &Grid,
        origin: CellCoord,
    ) -> Result<DistanceField, GridError> {
        grid.ensure_contains(origin)?;
        self.flood(grid, origin, None);
        Ok(DistanceField {
            columns: grid.columns(),
            rows: grid.rows(),
            distances: self.distances.clone(),
        })
    }

    /// Picks the goal as the cell farthest from `start`.
    ///
    /// Ties are broken by scanning columns ascending, then rows ascending, and
    /// keeping the first cell whose distance is strictly greater than every
    /// cell seen before it.
    pub fn farthest_from(&mut self, grid: &Grid, start: CellCoord) -> Result<GoalRoute, GridError> {
        grid.ensure_contains(start)?;
        self.flood(grid, start, None);

        let width = grid.columns() as usize;
        let mut best: Option<(CellCoord, u32)> = None;
        for column in 0..grid.columns() {
            for row in 0..grid.rows() {
                let cell = CellCoord::new(column, row);
                let Some(distance) = index(width, cell).map(|offset| self.distances[offset]) else {
                    continue;
                };
                if distance == UNREACHED {
                    continue;
                }
                if best.map_or(true, |(_, longest)| distance > longest) {
                    best = Some((cell, distance));
                }
            }
        }

        let (goal, distance) = best.unwrap_or((start, 0));
        Ok(GoalRoute {
            goal,
            distance,
            path: self.trace(width, start, goal),
        })
    }

    /// Ordered cells from `from` to `to` inclusive along a shortest route.
    ///
    /// Returns `[from]` when both ends coincide and an empty path when `to`
    /// cannot be reached.
    pub fn shortest_path(
        &mut self,
        grid: &Grid,
        from: CellCoord,
        to: CellCoord,
    ) -> Result<Vec<CellCoord>, GridError> {
        grid.ensure_contains(from)?;
        grid.ensure_contains(to)?;
        self.flood(grid, from, Some(to));

        let width = grid.columns() as usize;
        let reached = index(width, to).is_some_and(|offset| self.distances[offset] != UNREACHED);
        if !reached {
            return Ok(Vec::new());
        }
        Ok(self.trace(width, from, to))
    }

    fn flood(&mut self, grid: &Grid, origin: CellCoord, stop_at: Option<CellCoord>) {
        let cell_count = grid.cell_count();
        let width = grid.columns() as usize;

        self.distances.clear();
        self.distances.resize(cell_count, UNREACHED);
        self.parents.clear();
        self.parents.resize(cell_count, None);
        self.frontier.clear();

        let Some(origin_index) = index(width, origin) else {
            return;
        };
        self.distances[origin_index] = 0;
        self.frontier.push_back(origin);

        while let Some(cell) = self.frontier.pop_front() {
            if stop_at == Some(cell) {
                break;
            }
            let Some(current_index) = index(width, cell) else {
                continue;
            };
            let next_distance = self.distances[current_index].saturating_add(1);

            for neighbor in grid.passages(cell) {
                let Some(neighbor_index) = index(width, neighbor) else {
                    continue;
                };
                if self.distances[neighbor_index] != UNREACHED {
                    continue;
                }
                self.distances[neighbor_index] = next_distance;
                self.parents[neighbor_index] = Some(cell);
                self.frontier.push_back(neighbor);
            }
        }
    }

    fn trace(&self, width: usize, origin: CellCoord, target: CellCoord) -> Vec<CellCoord> {
        let mut path = vec![target];
        let mut current = target;
        while current != origin {
            let Some(parent) = index(width, current).and_then(|offset| self.parents[offset]) else {
                return Vec::new();
            };
            path.push(parent);
            current = parent;
        }
        path.reverse();
        path
    }
}

fn index(width: usize, cell: CellCoord) -> Option<usize> {
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}
