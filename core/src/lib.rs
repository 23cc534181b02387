#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across The Final Door simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and the pure systems. Adapters submit [`Command`]
//! values describing player intents and phase transitions, the world executes
//! those commands via its `apply` entry point, and then broadcasts [`Event`]
//! values describing what changed. Systems operate on the grid and entity
//! contracts declared here and never own shared state themselves.

mod grid;
mod tuning;

use serde::{Deserialize, Serialize};

pub use grid::{Cell, Grid, GridError, Maze, Walls};
pub use tuning::{
    default_levels, EnemyTuning, HazardTuning, LevelSettings, MazeTuning, PlayerTuning,
    ProjectileTuning, SpawnTuning, Tuning,
};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to The Final Door.";

/// Cardinal directions used to address cell walls and neighbours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing row indices.
    North,
    /// Toward increasing column indices.
    East,
    /// Toward increasing row indices.
    South,
    /// Toward decreasing column indices.
    West,
}

impl Direction {
    /// Every direction in the order neighbours are explored.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Direction that faces back toward the origin of a move.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Stable slot used when indexing per-direction storage.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }

    /// Column and row deltas produced by a single step in this direction.
    #[must_use]
    pub const fn offset(self) -> (i64, i64) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }
}

/// Location of a single maze cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Neighbouring coordinate in the provided direction, bounded by the grid size.
    #[must_use]
    pub fn step(self, direction: Direction, columns: u32, rows: u32) -> Option<CellCoord> {
        let (dx, dy) = direction.offset();
        let column = i64::from(self.column) + dx;
        let row = i64::from(self.row) + dy;
        if column < 0 || row < 0 || column >= i64::from(columns) || row >= i64::from(rows) {
            return None;
        }
        Some(CellCoord::new(
            u32::try_from(column).ok()?,
            u32::try_from(row).ok()?,
        ))
    }

    /// Direction leading from `self` to an orthogonally adjacent cell.
    #[must_use]
    pub fn direction_to(self, other: CellCoord) -> Option<Direction> {
        let column_diff = self.column.abs_diff(other.column);
        let row_diff = self.row.abs_diff(other.row);

        if column_diff + row_diff != 1 {
            return None;
        }

        if column_diff == 1 {
            if other.column > self.column {
                Some(Direction::East)
            } else {
                Some(Direction::West)
            }
        } else if other.row > self.row {
            Some(Direction::South)
        } else {
            Some(Direction::North)
        }
    }
}

/// Continuous position measured in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    x: f32,
    y: f32,
}

impl WorldPoint {
    /// Creates a point from world-space coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: WorldPoint) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Point reached by travelling `distance` units along `angle_degrees`.
    #[must_use]
    pub fn offset(self, angle_degrees: f32, distance: f32) -> WorldPoint {
        let radians = angle_degrees.to_radians();
        WorldPoint::new(
            self.x + radians.cos() * distance,
            self.y + radians.sin() * distance,
        )
    }

    /// Facing angle in degrees that points from `self` toward `other`.
    #[must_use]
    pub fn heading_to(self, other: WorldPoint) -> f32 {
        (other.y - self.y).atan2(other.x - self.x).to_degrees()
    }

    /// Linear interpolation toward `other`, with `t` in `0.0..=1.0`.
    #[must_use]
    pub fn lerp(self, other: WorldPoint, t: f32) -> WorldPoint {
        WorldPoint::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

/// Hazard marker a trap cell may carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hazard {
    /// Instant death when the player steps close to the cell centre.
    Hole,
    /// Fixed damage gated by a per-player cooldown.
    Spike,
}

/// Unique identifier assigned to a hostile agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(u32);

impl AgentId {
    /// Creates a new agent identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Behaviour state of a hostile agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentState {
    /// Walking between two patrol endpoints while the player is unseen.
    Patrol,
    /// Standing still, aiming and firing at a visible player.
    Engage,
}

/// Side that fired a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileOwner {
    /// Fired by the player; damages agents.
    Player,
    /// Fired by an agent; damages the player.
    Enemy,
}

/// One-based index into the level catalogue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LevelId(u8);

impl LevelId {
    /// Opening level of the catalogue.
    pub const FIRST: LevelId = LevelId(1);

    /// Creates a level identifier from its one-based number.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// One-based number of the level.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Zero-based catalogue slot, if the identifier is non-zero.
    #[must_use]
    pub fn slot(&self) -> Option<usize> {
        usize::from(self.0).checked_sub(1)
    }

    /// Level that follows this one.
    #[must_use]
    pub const fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Reason a level ended in defeat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOverCause {
    /// The player stepped into a hole trap.
    FellInHole,
    /// Spike damage drained the remaining health.
    HitSpikes,
    /// Enemy fire drained the remaining health.
    Shot,
    /// The player touched a live agent.
    CollidedWithEnemy,
}

impl GameOverCause {
    /// Human-readable message shown on the game-over screen.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::FellInHole => "You fell into a hole!",
            Self::HitSpikes => "You ran into the spikes!",
            Self::Shot => "You were shot by an enemy!",
            Self::CollidedWithEnemy => "You ran into an enemy!",
        }
    }
}

impl std::fmt::Display for GameOverCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Top-level state of the experience.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen with a demo maze in the background.
    IntroMenu,
    /// Level picker.
    LevelSelect,
    /// Simulation active; ticks advance the level.
    Playing,
    /// The player reached the goal.
    LevelComplete,
    /// The player died.
    GameOver {
        /// What ended the run.
        cause: GameOverCause,
    },
}

impl GamePhase {
    /// Reports whether ticks advance the simulation in this phase.
    #[must_use]
    pub const fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }
}

/// Discrete intents gathered by the input layer for a single tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerIntent {
    /// Step forward along the facing angle.
    pub forward: bool,
    /// Step backward against the facing angle.
    pub backward: bool,
    /// Rotate counter-clockwise.
    pub turn_left: bool,
    /// Rotate clockwise.
    pub turn_right: bool,
    /// Fire a projectile along the facing angle.
    pub fire: bool,
}

impl PlayerIntent {
    /// Intent that does nothing, used for idle ticks.
    pub const IDLE: PlayerIntent = PlayerIntent {
        forward: false,
        backward: false,
        turn_left: false,
        turn_right: false,
        fire: false,
    };
}

/// Minimal player state owned by the world for the duration of a level.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerState {
    position: WorldPoint,
    angle_degrees: f32,
    health: u32,
    max_health: u32,
    kills: u32,
    spike_cooldown: u32,
}

impl PlayerState {
    /// Creates a fresh player at full health facing along the positive x axis.
    #[must_use]
    pub const fn new(position: WorldPoint, max_health: u32) -> Self {
        Self {
            position,
            angle_degrees: 0.0,
            health: max_health,
            max_health,
            kills: 0,
            spike_cooldown: 0,
        }
    }

    /// Current position in world units.
    #[must_use]
    pub const fn position(&self) -> WorldPoint {
        self.position
    }

    /// Relocates the player.
    pub fn set_position(&mut self, position: WorldPoint) {
        self.position = position;
    }

    /// Facing angle in degrees.
    #[must_use]
    pub const fn angle_degrees(&self) -> f32 {
        self.angle_degrees
    }

    /// Rotates the player by the provided number of degrees.
    pub fn turn(&mut self, delta_degrees: f32) {
        self.angle_degrees += delta_degrees;
    }

    /// Remaining health, clamped to `0..=max_health`.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Health ceiling.
    #[must_use]
    pub const fn max_health(&self) -> u32 {
        self.max_health
    }

    /// Applies damage, saturating at zero, and returns the remaining health.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        self.health = self.health.saturating_sub(amount);
        self.health
    }

    /// Drops health to zero regardless of the remaining amount.
    pub fn kill(&mut self) {
        self.health = 0;
    }

    /// Reports whether health has been exhausted.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// Number of agents defeated this level.
    #[must_use]
    pub const fn kills(&self) -> u32 {
        self.kills
    }

    /// Increments the kill counter.
    pub fn record_kill(&mut self) {
        self.kills = self.kills.saturating_add(1);
    }

    /// Ticks that must elapse before spikes may hurt the player again.
    #[must_use]
    pub const fn spike_cooldown(&self) -> u32 {
        self.spike_cooldown
    }

    /// Blocks spike damage for the provided number of ticks.
    pub fn arm_spike_cooldown(&mut self, ticks: u32) {
        self.spike_cooldown = ticks;
    }

    /// Counts the spike cooldown down by one tick.
    pub fn tick_spike_cooldown(&mut self) {
        self.spike_cooldown = self.spike_cooldown.saturating_sub(1);
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Moves from the title screen to the level picker.
    OpenLevelSelect,
    /// Returns to the title screen, regenerating the backdrop maze.
    ReturnToMenu,
    /// Builds and starts the requested level from scratch.
    StartLevel {
        /// Level to start.
        level: LevelId,
    },
    /// Rebuilds the current level.
    RestartLevel,
    /// Starts the level after the one just completed.
    AdvanceLevel,
    /// Flips guidance mode on or off.
    ToggleGuidance,
    /// Advances the simulation by one fixed step.
    Tick {
        /// Player intents collected for this step.
        intent: PlayerIntent,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces that the top-level phase changed.
    PhaseChanged {
        /// Phase that became active.
        phase: GamePhase,
    },
    /// Confirms that a level was generated and the player placed at its start.
    LevelStarted {
        /// Level that started.
        level: LevelId,
        /// Cell the player starts in.
        start: CellCoord,
        /// Cell the player must reach.
        goal: CellCoord,
    },
    /// Indicates that the simulation advanced one step.
    TimeAdvanced {
        /// Index of the completed step within the level.
        tick: u64,
    },
    /// Confirms that an agent entered the maze.
    AgentSpawned {
        /// Identifier assigned to the agent.
        agent: AgentId,
        /// Spawn position.
        position: WorldPoint,
    },
    /// Confirms that a player projectile destroyed an agent.
    AgentDefeated {
        /// Identifier of the destroyed agent.
        agent: AgentId,
    },
    /// Confirms that a projectile was launched.
    ProjectileFired {
        /// Side that fired.
        owner: ProjectileOwner,
        /// Launch position.
        position: WorldPoint,
    },
    /// Reports damage dealt to the player.
    PlayerDamaged {
        /// Damage applied.
        amount: u32,
        /// Health remaining after the hit.
        health: u32,
    },
    /// Reports that guidance mode changed.
    GuidanceToggled {
        /// Whether guidance is now active.
        enabled: bool,
    },
    /// Reports that the player reached the goal.
    LevelCompleted {
        /// Level that was completed.
        level: LevelId,
    },
    /// Reports that the player died.
    GameOver {
        /// What ended the run.
        cause: GameOverCause,
    },
}

/// Immutable representation of a single agent used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentSnapshot {
    /// Unique identifier assigned to the agent.
    pub id: AgentId,
    /// Current position in world units.
    pub position: WorldPoint,
    /// Facing angle in degrees.
    pub angle_degrees: f32,
    /// Behaviour state during the last tick.
    pub state: AgentState,
    /// Whether the agent is still active.
    pub alive: bool,
}

/// Read-only snapshot describing all agents within the maze.
#[derive(Clone, Debug, Default)]
pub struct AgentView {
    snapshots: Vec<AgentSnapshot>,
}

impl AgentView {
    /// Creates a new agent view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<AgentSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured agent snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &AgentSnapshot> {
        self.snapshots.iter()
    }

    /// Number of agents that are still active.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.snapshots.iter().filter(|snapshot| snapshot.alive).count()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<AgentSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single projectile used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Current position in world units.
    pub position: WorldPoint,
    /// Side that fired the projectile.
    pub owner: ProjectileOwner,
}

/// Read-only snapshot describing all projectiles in flight.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view preserving launch order.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<ProjectileSnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured projectile snapshots in launch order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Number of projectiles in flight.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no projectile is in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}
