//! Cached shortest route from the player's cell to the goal.

use final_door_core::{CellCoord, Grid};
use final_door_system_navigation::Pathfinder;

/// Guidance mode state. The route is recomputed only when the occupied
/// cell differs from the one it was last computed for.
#[derive(Debug, Default)]
pub(crate) struct Guidance {
    enabled: bool,
    last_cell: Option<CellCoord>,
    path: Vec<CellCoord>,
}

impl Guidance {
    pub(crate) const fn enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn path(&self) -> &[CellCoord] {
        &self.path
    }

    /// Flips the mode and returns the new state. Enabling forces the next
    /// refresh to recompute; disabling drops the cached route.
    pub(crate) fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.reset();
        self.enabled
    }

    pub(crate) fn reset(&mut self) {
        self.last_cell = None;
        self.path.clear();
    }

    pub(crate) fn refresh(
        &mut self,
        pathfinder: &mut Pathfinder,
        grid: &Grid,
        occupied: Option<CellCoord>,
        goal: CellCoord,
    ) {
        if !self.enabled {
            return;
        }
        let Some(cell) = occupied else {
            return;
        };
        if self.last_cell == Some(cell) {
            return;
        }

        match pathfinder.shortest_path(grid, cell, goal) {
            Ok(path) => self.path = path,
            Err(error) => {
                tracing::debug!(%error, "guidance route unavailable");
                self.path.clear();
            }
        }
        self.last_cell = Some(cell);
    }
}
