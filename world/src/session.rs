//! Per-level simulation state and the fixed-order tick.

use final_door_core::{
    CellCoord, EnemyTuning, Event, GameOverCause, GridError, LevelId, LevelSettings, Maze,
    PlayerIntent, PlayerState, ProjectileOwner, Tuning,
};
use final_door_system_collision::CollisionField;
use final_door_system_combat::{Arena, Combat};
use final_door_system_enemy_ai::{Enemy, EnemyAi, FireOrder};
use final_door_system_maze_generation::MazeGenerator;
use final_door_system_navigation::Pathfinder;
use final_door_system_projectiles::{Expired, Projectile, ProjectileMotion};
use final_door_system_spawning::{SpawnController, SpawnOrder};
use final_door_system_traps::TrapPlacer;
use rand::Rng;

use crate::guidance::Guidance;

/// Systems and scratch buffers reused across levels.
#[derive(Debug, Default)]
pub(crate) struct Systems {
    pub(crate) generator: MazeGenerator,
    pub(crate) pathfinder: Pathfinder,
    traps: TrapPlacer,
    enemy_ai: EnemyAi,
    motion: ProjectileMotion,
    combat: Combat,
    fire_orders: Vec<FireOrder>,
    spawn_orders: Vec<SpawnOrder>,
    expired: Vec<Expired>,
}

/// How a tick ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TickOutcome {
    Running,
    GameOver(GameOverCause),
    Completed,
}

/// Everything owned by a single level run. Rebuilt from scratch on every
/// start or restart.
#[derive(Debug)]
pub(crate) struct Session {
    pub(crate) level: LevelId,
    pub(crate) settings: LevelSettings,
    pub(crate) maze: Maze,
    pub(crate) player: PlayerState,
    pub(crate) enemies: Vec<Enemy>,
    pub(crate) projectiles: Vec<Projectile>,
    pub(crate) spawner: SpawnController,
    pub(crate) tick: u64,
}

impl Session {
    /// Generates the maze, picks the start, derives the goal and main path,
    /// then places traps.
    pub(crate) fn build<R>(
        level: LevelId,
        settings: LevelSettings,
        tuning: &Tuning,
        systems: &mut Systems,
        rng: &mut R,
    ) -> Result<Self, GridError>
    where
        R: Rng + ?Sized,
    {
        let mut grid = systems
            .generator
            .generate(settings.columns, settings.rows, rng)?;
        let start = CellCoord::new(
            rng.gen_range(0..grid.columns()),
            rng.gen_range(0..grid.rows()),
        );
        let route = systems.pathfinder.farthest_from(&grid, start)?;
        let placement = systems.traps.place(
            &mut grid,
            start,
            route.goal,
            settings.hole_traps,
            settings.spike_traps,
            rng,
        )?;
        tracing::debug!(
            holes = placement.holes.len(),
            spikes = placement.spikes.len(),
            distance = route.distance,
            "level layout ready"
        );

        let maze = Maze::new(grid, start, route.goal, route.path)?;
        Ok(Self::from_maze(level, settings, maze, tuning))
    }

    /// Wraps an existing maze with a fresh player standing on the start cell.
    pub(crate) fn from_maze(
        level: LevelId,
        settings: LevelSettings,
        maze: Maze,
        tuning: &Tuning,
    ) -> Self {
        let start = CollisionField::new(maze.grid(), &tuning.maze).cell_center(maze.start());
        Self {
            level,
            settings,
            player: PlayerState::new(start, tuning.player.max_health),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            spawner: SpawnController::new(&tuning.spawn),
            tick: 0,
            maze,
        }
    }

    /// Queues the level's agents and releases the opening wave.
    pub(crate) fn prime<R>(
        &mut self,
        tuning: &Tuning,
        systems: &mut Systems,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) where
        R: Rng + ?Sized,
    {
        let field = CollisionField::new(self.maze.grid(), &tuning.maze);
        self.spawner.reset(self.settings.total_enemies);

        systems.spawn_orders.clear();
        self.spawner.prime(
            &self.maze,
            &field,
            self.player.position(),
            rng,
            &mut systems.spawn_orders,
        );
        release(
            &mut systems.spawn_orders,
            &mut self.enemies,
            &field,
            &tuning.enemy,
            rng,
            out_events,
        );
    }

    /// Number of agents still in play.
    pub(crate) fn active_agents(&self) -> usize {
        self.enemies.iter().filter(|enemy| enemy.is_alive()).count()
    }

    /// Advances the level by one fixed step.
    ///
    /// Player intents and the guidance refresh run first, then projectile
    /// motion, agent behaviour, hit and hazard resolution and finally the
    /// spawn top-up. A step that ends the run skips everything after it.
    pub(crate) fn tick<R>(
        &mut self,
        intent: PlayerIntent,
        guidance: &mut Guidance,
        tuning: &Tuning,
        systems: &mut Systems,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) -> TickOutcome
    where
        R: Rng + ?Sized,
    {
        self.tick = self.tick.saturating_add(1);
        out_events.push(Event::TimeAdvanced { tick: self.tick });

        let field = CollisionField::new(self.maze.grid(), &tuning.maze);

        steer(
            &mut self.player,
            &mut self.projectiles,
            &field,
            tuning,
            intent,
            out_events,
        );
        guidance.refresh(
            &mut systems.pathfinder,
            self.maze.grid(),
            field.cell_at(self.player.position()),
            self.maze.goal(),
        );
        self.player.tick_spike_cooldown();

        systems.expired.clear();
        systems.motion.handle(
            &mut self.projectiles,
            &field,
            &tuning.projectile,
            &mut systems.expired,
        );
        if !systems.expired.is_empty() {
            tracing::trace!(count = systems.expired.len(), "projectiles expired");
        }

        systems.fire_orders.clear();
        systems.enemy_ai.handle(
            &mut self.enemies,
            self.player.position(),
            &field,
            &tuning.enemy,
            rng,
            &mut systems.fire_orders,
        );
        for order in systems.fire_orders.drain(..) {
            self.projectiles.push(Projectile::new(
                order.origin,
                order.angle_degrees,
                ProjectileOwner::Enemy,
                &tuning.projectile,
            ));
            out_events.push(Event::ProjectileFired {
                owner: ProjectileOwner::Enemy,
                position: order.origin,
            });
        }

        let cause = systems.combat.handle(
            Arena {
                player: &mut self.player,
                enemies: &mut self.enemies,
                projectiles: &mut self.projectiles,
            },
            &field,
            tuning,
            guidance.enabled(),
            out_events,
        );
        self.projectiles.retain(Projectile::is_active);
        if let Some(cause) = cause {
            return TickOutcome::GameOver(cause);
        }

        let active = self.active_agents();
        systems.spawn_orders.clear();
        self.spawner.handle(
            active,
            &self.maze,
            &field,
            self.player.position(),
            rng,
            &mut systems.spawn_orders,
        );
        release(
            &mut systems.spawn_orders,
            &mut self.enemies,
            &field,
            &tuning.enemy,
            rng,
            out_events,
        );

        let goal = field.cell_center(self.maze.goal());
        let at_goal = self.player.position().distance(goal) < tuning.player.goal_reach();
        let cleared = !self.settings.clear_required
            || (self.spawner.backlog() == 0 && self.active_agents() == 0);

        if at_goal && cleared {
            TickOutcome::Completed
        } else {
            TickOutcome::Running
        }
    }
}

/// Applies movement, turning and fire intents. A move commits only when
/// the destination is clear with the actor buffer.
fn steer(
    player: &mut PlayerState,
    projectiles: &mut Vec<Projectile>,
    field: &CollisionField<'_>,
    tuning: &Tuning,
    intent: PlayerIntent,
    out_events: &mut Vec<Event>,
) {
    let stride = if intent.forward {
        Some(tuning.player.speed)
    } else if intent.backward {
        Some(-tuning.player.speed)
    } else {
        None
    };
    if let Some(distance) = stride {
        let candidate = player.position().offset(player.angle_degrees(), distance);
        if !field.collides_actor(candidate) {
            player.set_position(candidate);
        }
    }

    if intent.turn_left {
        player.turn(tuning.player.turn_speed_degrees);
    } else if intent.turn_right {
        player.turn(-tuning.player.turn_speed_degrees);
    }

    if intent.fire {
        let angle = player.angle_degrees();
        let origin = player.position().offset(angle, tuning.player.muzzle_offset);
        projectiles.push(Projectile::new(
            origin,
            angle,
            ProjectileOwner::Player,
            &tuning.projectile,
        ));
        out_events.push(Event::ProjectileFired {
            owner: ProjectileOwner::Player,
            position: origin,
        });
    }
}

fn release<R>(
    orders: &mut Vec<SpawnOrder>,
    enemies: &mut Vec<Enemy>,
    field: &CollisionField<'_>,
    tuning: &EnemyTuning,
    rng: &mut R,
    out_events: &mut Vec<Event>,
) where
    R: Rng + ?Sized,
{
    for order in orders.drain(..) {
        let enemy = Enemy::spawn(order.agent, order.position, field, tuning, rng);
        tracing::debug!(
            agent = order.agent.get(),
            column = order.cell.column(),
            row = order.cell.row(),
            "agent spawned"
        );
        out_events.push(Event::AgentSpawned {
            agent: order.agent,
            position: order.position,
        });
        enemies.push(enemy);
    }
}
