#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for The Final Door.
//!
//! The world owns the seeded random source, the current [`GamePhase`], the
//! backdrop maze shown behind the title menu and, while a level is loaded,
//! the per-level session holding the maze, player, agents and projectiles.
//! All mutation flows through [`apply`]; all observation flows through the
//! [`query`] module.

mod guidance;
mod session;

use final_door_core::{
    default_levels, Command, Event, GamePhase, Grid, LevelId, LevelSettings, Tuning,
    WELCOME_BANNER,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub use final_door_system_collision::{Clearance, CollisionField};

use crate::{
    guidance::Guidance,
    session::{Session, Systems, TickOutcome},
};

/// Represents the authoritative Final Door world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    tuning: Tuning,
    levels: Vec<LevelSettings>,
    rng: ChaCha8Rng,
    phase: GamePhase,
    backdrop: Option<Grid>,
    session: Option<Session>,
    guidance: Guidance,
    systems: Systems,
}

impl World {
    /// Creates a world on the title screen using the built-in tuning and levels.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, Tuning::default(), default_levels())
    }

    /// Creates a world on the title screen with explicit tuning and levels.
    #[must_use]
    pub fn with_config(seed: u64, tuning: Tuning, levels: Vec<LevelSettings>) -> Self {
        let mut world = Self {
            banner: WELCOME_BANNER,
            tuning,
            levels,
            rng: ChaCha8Rng::seed_from_u64(seed),
            phase: GamePhase::IntroMenu,
            backdrop: None,
            session: None,
            guidance: Guidance::default(),
            systems: Systems::default(),
        };
        world.regenerate_backdrop();
        world
    }

    fn regenerate_backdrop(&mut self) {
        let columns = self.tuning.maze.demo_columns;
        let rows = self.tuning.maze.demo_rows;
        self.backdrop = match self.systems.generator.generate(columns, rows, &mut self.rng) {
            Ok(grid) => Some(grid),
            Err(error) => {
                tracing::warn!(%error, "backdrop maze unavailable");
                None
            }
        };
    }

    fn set_phase(&mut self, phase: GamePhase, out_events: &mut Vec<Event>) {
        self.phase = phase;
        out_events.push(Event::PhaseChanged { phase });
    }

    fn start_level(&mut self, level: LevelId, out_events: &mut Vec<Event>) {
        let Some(settings) = level
            .slot()
            .and_then(|slot| self.levels.get(slot))
            .cloned()
        else {
            tracing::debug!(level = level.get(), "ignoring unknown level");
            return;
        };

        let session = match Session::build(
            level,
            settings,
            &self.tuning,
            &mut self.systems,
            &mut self.rng,
        ) {
            Ok(session) => session,
            Err(error) => {
                tracing::warn!(%error, level = level.get(), "level generation failed");
                return;
            }
        };

        self.launch(session, out_events);
    }

    fn launch(&mut self, mut session: Session, out_events: &mut Vec<Event>) {
        let start = session.maze.start();
        let goal = session.maze.goal();
        out_events.push(Event::LevelStarted {
            level: session.level,
            start,
            goal,
        });
        session.prime(&self.tuning, &mut self.systems, &mut self.rng, out_events);

        self.guidance.reset();
        self.guidance.refresh(
            &mut self.systems.pathfinder,
            session.maze.grid(),
            Some(start),
            goal,
        );

        tracing::info!(
            level = session.level.get(),
            name = %session.settings.name,
            columns = session.maze.grid().columns(),
            rows = session.maze.grid().rows(),
            total_enemies = session.settings.total_enemies,
            ?start,
            ?goal,
            "level started"
        );

        self.session = Some(session);
        self.set_phase(GamePhase::Playing, out_events);
    }

    fn current_level(&self) -> Option<LevelId> {
        self.session.as_ref().map(|session| session.level)
    }

    fn following_level(&self, level: LevelId) -> LevelId {
        let next = level.next();
        match next.slot() {
            Some(slot) if slot < self.levels.len() => next,
            _ => LevelId::FIRST,
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::OpenLevelSelect => {
            if world.phase != GamePhase::IntroMenu {
                tracing::debug!(phase = ?world.phase, "level select only opens from the title");
                return;
            }
            world.set_phase(GamePhase::LevelSelect, out_events);
        }
        Command::ReturnToMenu => {
            world.session = None;
            world.guidance.reset();
            world.regenerate_backdrop();
            world.set_phase(GamePhase::IntroMenu, out_events);
        }
        Command::StartLevel { level } => world.start_level(level, out_events),
        Command::RestartLevel => {
            let restartable = matches!(
                world.phase,
                GamePhase::Playing | GamePhase::LevelComplete | GamePhase::GameOver { .. }
            );
            match world.current_level() {
                Some(level) if restartable => world.start_level(level, out_events),
                _ => tracing::debug!(phase = ?world.phase, "nothing to restart"),
            }
        }
        Command::AdvanceLevel => {
            if world.phase != GamePhase::LevelComplete {
                tracing::debug!(phase = ?world.phase, "advance requires a completed level");
                return;
            }
            if let Some(level) = world.current_level() {
                let next = world.following_level(level);
                world.start_level(next, out_events);
            }
        }
        Command::ToggleGuidance => {
            let enabled = world.guidance.toggle();
            if let Some(session) = world.session.as_ref() {
                let field = CollisionField::new(session.maze.grid(), &world.tuning.maze);
                world.guidance.refresh(
                    &mut world.systems.pathfinder,
                    session.maze.grid(),
                    field.cell_at(session.player.position()),
                    session.maze.goal(),
                );
            }
            tracing::info!(enabled, "guidance toggled");
            out_events.push(Event::GuidanceToggled { enabled });
        }
        Command::Tick { intent } => {
            if !world.phase.is_playing() {
                return;
            }
            let Some(session) = world.session.as_mut() else {
                return;
            };

            let level = session.level;
            let outcome = session.tick(
                intent,
                &mut world.guidance,
                &world.tuning,
                &mut world.systems,
                &mut world.rng,
                out_events,
            );

            match outcome {
                TickOutcome::Running => {}
                TickOutcome::GameOver(cause) => {
                    tracing::info!(level = level.get(), %cause, "game over");
                    out_events.push(Event::GameOver { cause });
                    world.set_phase(GamePhase::GameOver { cause }, out_events);
                }
                TickOutcome::Completed => {
                    tracing::info!(level = level.get(), "level complete");
                    out_events.push(Event::LevelCompleted { level });
                    world.set_phase(GamePhase::LevelComplete, out_events);
                }
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use final_door_core::{
        AgentView, CellCoord, GamePhase, Grid, LevelId, LevelSettings, Maze, PlayerState,
        ProjectileView, Tuning,
    };
    use final_door_system_collision::CollisionField;

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Current top-level phase.
    #[must_use]
    pub fn phase(world: &World) -> GamePhase {
        world.phase
    }

    /// Tuning the world was created with.
    #[must_use]
    pub fn tuning(world: &World) -> &Tuning {
        &world.tuning
    }

    /// Level catalogue the world was created with.
    #[must_use]
    pub fn levels(world: &World) -> &[LevelSettings] {
        &world.levels
    }

    /// Level currently loaded, if any.
    #[must_use]
    pub fn current_level(world: &World) -> Option<LevelId> {
        world.current_level()
    }

    /// Settings of the level currently loaded.
    #[must_use]
    pub fn level_settings(world: &World) -> Option<&LevelSettings> {
        world.session.as_ref().map(|session| &session.settings)
    }

    /// Maze of the level currently loaded.
    #[must_use]
    pub fn maze(world: &World) -> Option<&Maze> {
        world.session.as_ref().map(|session| &session.maze)
    }

    /// Decorative maze shown behind the title and level-select menus.
    #[must_use]
    pub fn backdrop(world: &World) -> Option<&Grid> {
        world.backdrop.as_ref()
    }

    /// Player state of the level currently loaded.
    #[must_use]
    pub fn player(world: &World) -> Option<&PlayerState> {
        world.session.as_ref().map(|session| &session.player)
    }

    /// Snapshot of every agent spawned this level, active or not.
    #[must_use]
    pub fn agent_view(world: &World) -> AgentView {
        let snapshots: Vec<_> = world
            .session
            .as_ref()
            .map(|session| session.enemies.iter().map(|enemy| enemy.snapshot()).collect())
            .unwrap_or_default();
        AgentView::from_snapshots(snapshots)
    }

    /// Number of agents currently in play.
    #[must_use]
    pub fn active_agents(world: &World) -> usize {
        world
            .session
            .as_ref()
            .map_or(0, |session| session.active_agents())
    }

    /// Agents still waiting to spawn.
    #[must_use]
    pub fn spawn_backlog(world: &World) -> u32 {
        world
            .session
            .as_ref()
            .map_or(0, |session| session.spawner.backlog())
    }

    /// Snapshot of every projectile in flight, in launch order.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        let snapshots: Vec<_> = world
            .session
            .as_ref()
            .map(|session| {
                session
                    .projectiles
                    .iter()
                    .map(|projectile| projectile.snapshot())
                    .collect()
            })
            .unwrap_or_default();
        ProjectileView::from_snapshots(snapshots)
    }

    /// Reports whether guidance mode is active.
    #[must_use]
    pub fn guidance_enabled(world: &World) -> bool {
        world.guidance.enabled()
    }

    /// Cached route from the player's cell to the goal; empty unless guidance is on.
    #[must_use]
    pub fn guidance_path(world: &World) -> &[CellCoord] {
        world.guidance.path()
    }

    /// Number of ticks simulated in the current level.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.session.as_ref().map_or(0, |session| session.tick)
    }

    /// Collision view over the loaded maze, for camera placement and steering.
    #[must_use]
    pub fn collision_field(world: &World) -> Option<CollisionField<'_>> {
        world
            .session
            .as_ref()
            .map(|session| CollisionField::new(session.maze.grid(), &world.tuning.maze))
    }

    /// Message explaining the defeat while the game-over screen is shown.
    #[must_use]
    pub fn game_over_message(world: &World) -> Option<&'static str> {
        match world.phase {
            GamePhase::GameOver { cause } => Some(cause.message()),
            _ => None,
        }
    }
}

/// Helpers that build deterministic scenarios without going through level
/// generation.
#[cfg(any(test, feature = "scenario_scaffolding"))]
pub mod scaffolding {
    use final_door_core::{AgentId, Event, LevelId, LevelSettings, Maze, WorldPoint};
    use final_door_system_enemy_ai::Enemy;

    use super::{Session, World};

    /// Loads a hand-built maze as the given level and releases its opening wave.
    pub fn start_with_maze(
        world: &mut World,
        level: LevelId,
        settings: LevelSettings,
        maze: Maze,
        out_events: &mut Vec<Event>,
    ) {
        let session = Session::from_maze(level, settings, maze, &world.tuning);
        world.launch(session, out_events);
    }

    /// Moves the player and sets its facing angle. Returns `false` without a level.
    pub fn place_player(world: &mut World, position: WorldPoint, angle_degrees: f32) -> bool {
        let Some(session) = world.session.as_mut() else {
            return false;
        };
        session.player.set_position(position);
        let delta = angle_degrees - session.player.angle_degrees();
        session.player.turn(delta);
        true
    }

    /// Adds an agent that patrols in place and holds its fire for the
    /// longest configured cooldown.
    pub fn insert_stationary_agent(world: &mut World, position: WorldPoint) -> Option<AgentId> {
        let session = world.session.as_mut()?;
        let agent = session.spawner.reserve_id();
        session
            .enemies
            .push(Enemy::new(agent, position, position, &world.tuning.enemy));
        Some(agent)
    }

    /// Removes an agent from play as if it had been destroyed.
    pub fn deactivate_agent(world: &mut World, agent: AgentId) -> bool {
        let Some(session) = world.session.as_mut() else {
            return false;
        };
        match session.enemies.iter_mut().find(|enemy| enemy.id() == agent) {
            Some(enemy) => {
                enemy.deactivate();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use final_door_core::{
        CellCoord, Direction, GameOverCause, Hazard, Maze, PlayerIntent, WorldPoint,
    };

    fn drain(world: &mut World, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, command, &mut events);
        events
    }

    fn idle_tick(world: &mut World) -> Vec<Event> {
        drain(
            world,
            Command::Tick {
                intent: PlayerIntent::IDLE,
            },
        )
    }

    fn quiet_level() -> LevelSettings {
        LevelSettings {
            name: "Test Hall".to_owned(),
            columns: 3,
            rows: 3,
            total_enemies: 0,
            hole_traps: 0,
            spike_traps: 0,
            clear_required: false,
        }
    }

    fn serpentine() -> Maze {
        let mut grid = Grid::new(3, 3).expect("grid");
        for row in 0..3 {
            for column in 0..2 {
                let _ = grid.carve(CellCoord::new(column, row), Direction::East);
            }
        }
        let _ = grid.carve(CellCoord::new(2, 0), Direction::South);
        let _ = grid.carve(CellCoord::new(0, 1), Direction::South);
        Maze::new(
            grid,
            CellCoord::new(0, 0),
            CellCoord::new(2, 2),
            Vec::new(),
        )
        .expect("maze")
    }

    #[test]
    fn new_world_waits_on_title_screen() {
        let world = World::new(7);

        assert_eq!(query::phase(&world), GamePhase::IntroMenu);
        assert_eq!(query::welcome_banner(&world), WELCOME_BANNER);
        let backdrop = query::backdrop(&world).expect("backdrop");
        assert_eq!((backdrop.columns(), backdrop.rows()), (12, 12));
        assert!(query::maze(&world).is_none());
    }

    #[test]
    fn ticks_outside_play_are_ignored() {
        let mut world = World::new(1);
        assert!(idle_tick(&mut world).is_empty());
        assert_eq!(query::tick_index(&world), 0);
    }

    #[test]
    fn menu_navigation_emits_phase_changes() {
        let mut world = World::new(2);

        let events = drain(&mut world, Command::OpenLevelSelect);
        assert_eq!(
            events,
            vec![Event::PhaseChanged {
                phase: GamePhase::LevelSelect
            }]
        );

        assert!(drain(&mut world, Command::OpenLevelSelect).is_empty());

        let events = drain(&mut world, Command::ReturnToMenu);
        assert_eq!(
            events,
            vec![Event::PhaseChanged {
                phase: GamePhase::IntroMenu
            }]
        );
    }

    #[test]
    fn starting_a_level_builds_and_primes_it() {
        let mut world = World::new(3);
        let events = drain(
            &mut world,
            Command::StartLevel {
                level: LevelId::FIRST,
            },
        );

        assert!(matches!(events.first(), Some(Event::LevelStarted { .. })));
        assert_eq!(
            events.last(),
            Some(&Event::PhaseChanged {
                phase: GamePhase::Playing
            })
        );
        let spawned = events
            .iter()
            .filter(|event| matches!(event, Event::AgentSpawned { .. }))
            .count();
        assert_eq!(spawned, 5);
        assert_eq!(query::active_agents(&world), 5);
        assert_eq!(query::spawn_backlog(&world), 5);

        let maze = query::maze(&world).expect("maze");
        assert_eq!(maze.main_path().first(), Some(&maze.start()));
        assert_eq!(maze.main_path().last(), Some(&maze.goal()));
        let player = query::player(&world).expect("player");
        assert_eq!(player.health(), player.max_health());
        assert_eq!(player.kills(), 0);
    }

    #[test]
    fn unknown_levels_are_ignored() {
        let mut world = World::new(4);
        assert!(drain(&mut world, Command::StartLevel { level: LevelId::new(9) }).is_empty());
        assert!(drain(&mut world, Command::StartLevel { level: LevelId::new(0) }).is_empty());
        assert_eq!(query::phase(&world), GamePhase::IntroMenu);
    }

    #[test]
    fn guidance_tracks_route_to_goal() {
        let mut world = World::with_config(5, Tuning::default(), vec![quiet_level()]);
        let mut events = Vec::new();
        scaffolding::start_with_maze(
            &mut world,
            LevelId::FIRST,
            quiet_level(),
            serpentine(),
            &mut events,
        );

        assert!(query::guidance_path(&world).is_empty());
        let events = drain(&mut world, Command::ToggleGuidance);
        assert_eq!(events, vec![Event::GuidanceToggled { enabled: true }]);

        let path = query::guidance_path(&world).to_vec();
        assert_eq!(path.len(), 9);
        assert_eq!(path.first(), Some(&CellCoord::new(0, 0)));
        assert_eq!(path.last(), Some(&CellCoord::new(2, 2)));

        assert!(scaffolding::place_player(
            &mut world,
            WorldPoint::new(300.0, 100.0),
            0.0
        ));
        let _ = idle_tick(&mut world);
        assert_eq!(query::guidance_path(&world).len(), 8);

        let _ = drain(&mut world, Command::ToggleGuidance);
        assert!(!query::guidance_enabled(&world));
        assert!(query::guidance_path(&world).is_empty());
    }

    #[test]
    fn reaching_the_goal_completes_and_advance_wraps() {
        let mut world = World::with_config(6, Tuning::default(), vec![quiet_level()]);
        let mut events = Vec::new();
        scaffolding::start_with_maze(
            &mut world,
            LevelId::FIRST,
            quiet_level(),
            serpentine(),
            &mut events,
        );

        assert!(scaffolding::place_player(
            &mut world,
            WorldPoint::new(500.0, 500.0),
            0.0
        ));
        let events = idle_tick(&mut world);

        assert!(events.contains(&Event::LevelCompleted {
            level: LevelId::FIRST
        }));
        assert_eq!(query::phase(&world), GamePhase::LevelComplete);
        assert!(idle_tick(&mut world).is_empty());

        let events = drain(&mut world, Command::AdvanceLevel);
        assert!(matches!(
            events.first(),
            Some(Event::LevelStarted {
                level: LevelId::FIRST,
                ..
            })
        ));
        assert_eq!(query::phase(&world), GamePhase::Playing);
    }

    #[test]
    fn clear_requirement_holds_back_completion() {
        let settings = LevelSettings {
            clear_required: true,
            ..quiet_level()
        };
        let mut world = World::with_config(8, Tuning::default(), vec![settings.clone()]);
        let mut events = Vec::new();
        scaffolding::start_with_maze(
            &mut world,
            LevelId::FIRST,
            settings,
            serpentine(),
            &mut events,
        );
        let agent = scaffolding::insert_stationary_agent(&mut world, WorldPoint::new(100.0, 500.0))
            .expect("agent");
        assert!(scaffolding::place_player(
            &mut world,
            WorldPoint::new(500.0, 500.0),
            0.0
        ));

        let _ = idle_tick(&mut world);
        assert_eq!(query::phase(&world), GamePhase::Playing);

        assert!(scaffolding::deactivate_agent(&mut world, agent));
        let _ = idle_tick(&mut world);
        assert_eq!(query::phase(&world), GamePhase::LevelComplete);
    }

    #[test]
    fn restart_after_defeat_rebuilds_the_level() {
        let mut world = World::with_config(9, Tuning::default(), vec![quiet_level()]);
        let mut events = Vec::new();
        let mut maze = serpentine();
        let _ = maze
            .grid_mut()
            .set_hazard(CellCoord::new(1, 0), Some(Hazard::Hole));
        scaffolding::start_with_maze(&mut world, LevelId::FIRST, quiet_level(), maze, &mut events);
        assert!(scaffolding::place_player(
            &mut world,
            WorldPoint::new(300.0, 100.0),
            0.0
        ));

        let events = idle_tick(&mut world);
        assert!(events.contains(&Event::GameOver {
            cause: GameOverCause::FellInHole
        }));
        assert_eq!(
            query::game_over_message(&world),
            Some("You fell into a hole!")
        );

        let events = drain(&mut world, Command::RestartLevel);
        assert!(matches!(events.first(), Some(Event::LevelStarted { .. })));
        assert_eq!(query::phase(&world), GamePhase::Playing);
        let player = query::player(&world).expect("player");
        assert_eq!(player.health(), player.max_health());
    }

    #[test]
    fn player_moves_turns_and_fires() {
        let mut world = World::with_config(10, Tuning::default(), vec![quiet_level()]);
        let mut events = Vec::new();
        scaffolding::start_with_maze(
            &mut world,
            LevelId::FIRST,
            quiet_level(),
            serpentine(),
            &mut events,
        );

        let events = drain(
            &mut world,
            Command::Tick {
                intent: PlayerIntent {
                    forward: true,
                    fire: true,
                    ..PlayerIntent::IDLE
                },
            },
        );

        let player = query::player(&world).expect("player");
        assert!((player.position().x() - 109.0).abs() < 1e-3);
        assert!(events.iter().any(|event| matches!(
            event,
            Event::ProjectileFired {
                owner: final_door_core::ProjectileOwner::Player,
                ..
            }
        )));
        assert_eq!(query::projectile_view(&world).len(), 1);

        let _ = drain(
            &mut world,
            Command::Tick {
                intent: PlayerIntent {
                    turn_left: true,
                    ..PlayerIntent::IDLE
                },
            },
        );
        let player = query::player(&world).expect("player");
        assert!((player.angle_degrees() - 4.0).abs() < 1e-4);
    }

    #[test]
    fn walls_block_player_movement() {
        let mut world = World::with_config(11, Tuning::default(), vec![quiet_level()]);
        let mut events = Vec::new();
        scaffolding::start_with_maze(
            &mut world,
            LevelId::FIRST,
            quiet_level(),
            serpentine(),
            &mut events,
        );
        // Facing north into the outer wall.
        assert!(scaffolding::place_player(
            &mut world,
            WorldPoint::new(100.0, 25.0),
            -90.0
        ));

        let _ = drain(
            &mut world,
            Command::Tick {
                intent: PlayerIntent {
                    forward: true,
                    ..PlayerIntent::IDLE
                },
            },
        );

        let player = query::player(&world).expect("player");
        assert_eq!(player.position(), WorldPoint::new(100.0, 25.0));
    }
}
