#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Bounded-concurrency release of hostile agents from a per-level backlog.

use final_door_core::{AgentId, CellCoord, Maze, SpawnTuning, WorldPoint};
use final_door_system_collision::CollisionField;
use rand::Rng;

/// Request to place a new agent, emitted by [`SpawnController`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnOrder {
    /// Identifier reserved for the agent.
    pub agent: AgentId,
    /// Cell the agent appears in.
    pub cell: CellCoord,
    /// Centre of that cell.
    pub position: WorldPoint,
}

/// Spawn controller tracking how many agents are still waiting to enter.
///
/// The backlog bounds the total number of spawns in a level while
/// `max_active` bounds how many agents are alive at once.
#[derive(Debug)]
pub struct SpawnController {
    max_active: usize,
    min_distance_cells: f32,
    backlog: u32,
    next_id: u32,
    eligible: Vec<CellCoord>,
}

impl SpawnController {
    /// Creates a controller with an empty backlog.
    #[must_use]
    pub fn new(tuning: &SpawnTuning) -> Self {
        Self {
            max_active: tuning.max_active,
            min_distance_cells: tuning.min_distance_cells,
            backlog: 0,
            next_id: 0,
            eligible: Vec::new(),
        }
    }

    /// Agents still waiting to spawn.
    #[must_use]
    pub const fn backlog(&self) -> u32 {
        self.backlog
    }

    /// Most agents allowed alive at once.
    #[must_use]
    pub const fn max_active(&self) -> usize {
        self.max_active
    }

    /// Starts a new level with `total` agents queued and identifiers reset.
    pub fn reset(&mut self, total: u32) {
        self.backlog = total;
        self.next_id = 0;
    }

    /// Hands out the next unused agent identifier.
    pub fn reserve_id(&mut self) -> AgentId {
        let agent = AgentId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        agent
    }

    /// Releases the opening wave of up to `max_active` agents.
    pub fn prime<R>(
        &mut self,
        maze: &Maze,
        field: &CollisionField<'_>,
        player: WorldPoint,
        rng: &mut R,
        out: &mut Vec<SpawnOrder>,
    ) where
        R: Rng + ?Sized,
    {
        let wave = usize::try_from(self.backlog)
            .unwrap_or(usize::MAX)
            .min(self.max_active);
        for _ in 0..wave {
            self.spawn_one(maze, field, player, rng, out);
        }
    }

    /// Releases at most one agent when fewer than `max_active` are alive.
    pub fn handle<R>(
        &mut self,
        active: usize,
        maze: &Maze,
        field: &CollisionField<'_>,
        player: WorldPoint,
        rng: &mut R,
        out: &mut Vec<SpawnOrder>,
    ) where
        R: Rng + ?Sized,
    {
        if active >= self.max_active {
            return;
        }
        self.spawn_one(maze, field, player, rng, out);
    }

    fn spawn_one<R>(
        &mut self,
        maze: &Maze,
        field: &CollisionField<'_>,
        player: WorldPoint,
        rng: &mut R,
        out: &mut Vec<SpawnOrder>,
    ) where
        R: Rng + ?Sized,
    {
        if self.backlog == 0 {
            return;
        }

        let Some(cell) = self.select_cell(maze, field, player, rng) else {
            return;
        };

        out.push(SpawnOrder {
            agent: self.reserve_id(),
            cell,
            position: field.cell_center(cell),
        });
        self.backlog -= 1;
    }

    fn select_cell<R>(
        &mut self,
        maze: &Maze,
        field: &CollisionField<'_>,
        player: WorldPoint,
        rng: &mut R,
    ) -> Option<CellCoord>
    where
        R: Rng + ?Sized,
    {
        let min_distance = self.min_distance_cells * field.cell_size();

        self.eligible.clear();
        self.eligible.extend(maze.grid().cells().map(|cell| cell.coord()).filter(|cell| {
            *cell != maze.start()
                && *cell != maze.goal()
                && field.cell_center(*cell).distance(player) > min_distance
        }));

        if self.eligible.is_empty() {
            return None;
        }
        Some(self.eligible[rng.gen_range(0..self.eligible.len())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use final_door_core::{Grid, MazeTuning};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn maze(columns: u32, rows: u32) -> Maze {
        let grid = Grid::new(columns, rows).expect("grid");
        Maze::new(
            grid,
            CellCoord::new(0, 0),
            CellCoord::new(columns - 1, rows - 1),
            Vec::new(),
        )
        .expect("maze")
    }

    #[test]
    fn empty_backlog_spawns_nothing() {
        let maze = maze(6, 6);
        let field = CollisionField::new(maze.grid(), &MazeTuning::default());
        let mut controller = SpawnController::new(&SpawnTuning::default());
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut out = Vec::new();

        controller.handle(0, &maze, &field, WorldPoint::new(100.0, 100.0), &mut rng, &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn crowded_maze_skips_spawn_and_keeps_backlog() {
        let maze = maze(2, 2);
        let field = CollisionField::new(maze.grid(), &MazeTuning::default());
        let mut controller = SpawnController::new(&SpawnTuning::default());
        controller.reset(4);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut out = Vec::new();

        controller.prime(&maze, &field, WorldPoint::new(100.0, 100.0), &mut rng, &mut out);

        assert!(out.is_empty());
        assert_eq!(controller.backlog(), 4);
    }
}
