#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Patrol and engage behaviour for hostile agents.
//!
//! Each tick an agent first checks whether it can see the player. A visible
//! player puts the agent into [`AgentState::Engage`]: it stands still, turns
//! to face the player and counts its firing cooldown down. Otherwise the
//! agent is in [`AgentState::Patrol`] and walks between its two patrol
//! endpoints. The state is recomputed every tick; nothing latches.

use final_door_core::{AgentId, AgentSnapshot, AgentState, Direction, EnemyTuning, WorldPoint};
use final_door_system_collision::CollisionField;
use rand::Rng;

/// Which patrol endpoint an agent is currently walking toward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PatrolLeg {
    /// Walking back to the spawn point.
    TowardStart,
    /// Walking out to the far endpoint.
    TowardEnd,
}

impl PatrolLeg {
    const fn flipped(self) -> Self {
        match self {
            Self::TowardStart => Self::TowardEnd,
            Self::TowardEnd => Self::TowardStart,
        }
    }
}

/// Hostile agent owned by the simulation loop.
#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    id: AgentId,
    position: WorldPoint,
    angle_degrees: f32,
    state: AgentState,
    patrol_start: WorldPoint,
    patrol_end: WorldPoint,
    leg: PatrolLeg,
    ammo: u32,
    cooldown: u32,
    radius: f32,
    alive: bool,
}

impl Enemy {
    /// Creates an agent with explicit patrol endpoints, facing angle zero and
    /// the longest firing cooldown.
    #[must_use]
    pub fn new(
        id: AgentId,
        position: WorldPoint,
        patrol_end: WorldPoint,
        tuning: &EnemyTuning,
    ) -> Self {
        Self {
            id,
            position,
            angle_degrees: 0.0,
            state: AgentState::Patrol,
            patrol_start: position,
            patrol_end,
            leg: PatrolLeg::TowardEnd,
            ammo: tuning.ammo,
            cooldown: tuning.cooldown_min.max(tuning.cooldown_max),
            radius: tuning.radius,
            alive: true,
        }
    }

    /// Spawns an agent at `position` with a random facing, a random firing
    /// cooldown and a patrol leg derived from the surrounding corridors.
    ///
    /// The far endpoint is found by picking a random open side of the spawn
    /// cell and walking between the configured minimum and maximum number of
    /// cells through open walls, stopping early at a wall or the boundary.
    /// An agent boxed in on all sides patrols in place.
    pub fn spawn<R>(
        id: AgentId,
        position: WorldPoint,
        field: &CollisionField<'_>,
        tuning: &EnemyTuning,
        rng: &mut R,
    ) -> Self
    where
        R: Rng + ?Sized,
    {
        let angle_degrees = rng.gen_range(0..360u32) as f32;
        let cooldown = draw_cooldown(tuning, rng);
        let patrol_end = find_patrol_end(position, field, tuning, rng);

        let mut enemy = Self::new(id, position, patrol_end, tuning);
        enemy.angle_degrees = angle_degrees;
        enemy.cooldown = cooldown;
        enemy
    }

    /// Identifier assigned at spawn.
    #[must_use]
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// Current position in world units.
    #[must_use]
    pub const fn position(&self) -> WorldPoint {
        self.position
    }

    /// Facing angle in degrees.
    #[must_use]
    pub const fn angle_degrees(&self) -> f32 {
        self.angle_degrees
    }

    /// Behaviour state chosen during the last update.
    #[must_use]
    pub const fn state(&self) -> AgentState {
        self.state
    }

    /// Spawn point and far endpoint of the patrol leg.
    #[must_use]
    pub const fn patrol_endpoints(&self) -> (WorldPoint, WorldPoint) {
        (self.patrol_start, self.patrol_end)
    }

    /// Endpoint the agent is walking toward.
    #[must_use]
    pub const fn leg(&self) -> PatrolLeg {
        self.leg
    }

    /// Shots left.
    #[must_use]
    pub const fn ammo(&self) -> u32 {
        self.ammo
    }

    /// Ticks of visibility left before the next shot.
    #[must_use]
    pub const fn cooldown(&self) -> u32 {
        self.cooldown
    }

    /// Body radius.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Reports whether the agent is still active.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Removes the agent from play.
    pub fn deactivate(&mut self) {
        self.alive = false;
    }

    /// Immutable snapshot used by queries.
    #[must_use]
    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            id: self.id,
            position: self.position,
            angle_degrees: self.angle_degrees,
            state: self.state,
            alive: self.alive,
        }
    }

    fn target(&self) -> WorldPoint {
        match self.leg {
            PatrolLeg::TowardStart => self.patrol_start,
            PatrolLeg::TowardEnd => self.patrol_end,
        }
    }
}

/// Request to launch an agent projectile, produced by [`EnemyAi::handle`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FireOrder {
    /// Agent that fired.
    pub agent: AgentId,
    /// Launch position at the agent's muzzle.
    pub origin: WorldPoint,
    /// Flight direction in degrees.
    pub angle_degrees: f32,
}

/// Pure system that advances every active agent by one tick.
#[derive(Debug, Default)]
pub struct EnemyAi {
    scratch: Vec<FireOrder>,
}

impl EnemyAi {
    /// Creates a new enemy AI system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs the patrol/engage state machine for every active agent and
    /// appends the resulting fire orders to `out`.
    pub fn handle<R>(
        &mut self,
        enemies: &mut [Enemy],
        player: WorldPoint,
        field: &CollisionField<'_>,
        tuning: &EnemyTuning,
        rng: &mut R,
        out: &mut Vec<FireOrder>,
    ) where
        R: Rng + ?Sized,
    {
        self.scratch.clear();

        for enemy in enemies.iter_mut().filter(|enemy| enemy.alive) {
            let visible = has_line_of_sight(
                enemy.position,
                player,
                field,
                tuning.sight_range,
                tuning.sight_interval,
            );

            if visible {
                engage(enemy, player, tuning, rng, &mut self.scratch);
            } else {
                patrol(enemy, field, tuning);
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

/// Sampled visibility test between two points.
///
/// Points farther apart than `range` are never visible. Otherwise the
/// segment is split into `floor(distance / interval)` steps and every step
/// end is tested with the actor clearance. A segment too short for a single
/// step is always visible.
#[must_use]
pub fn has_line_of_sight(
    from: WorldPoint,
    to: WorldPoint,
    field: &CollisionField<'_>,
    range: f32,
    interval: f32,
) -> bool {
    let distance = from.distance(to);
    if distance > range {
        return false;
    }

    let steps = if interval > 0.0 {
        (distance / interval).floor() as u32
    } else {
        1
    };
    if steps == 0 {
        return true;
    }

    (1..=steps).all(|step| {
        let t = step as f32 / steps as f32;
        !field.collides_actor(from.lerp(to, t))
    })
}

fn engage<R>(
    enemy: &mut Enemy,
    player: WorldPoint,
    tuning: &EnemyTuning,
    rng: &mut R,
    out: &mut Vec<FireOrder>,
) where
    R: Rng + ?Sized,
{
    enemy.state = AgentState::Engage;
    enemy.angle_degrees = enemy.position.heading_to(player);
    enemy.cooldown = enemy.cooldown.saturating_sub(1);

    if enemy.cooldown > 0 {
        return;
    }

    if enemy.ammo > 0 {
        enemy.ammo -= 1;
        out.push(FireOrder {
            agent: enemy.id,
            origin: enemy
                .position
                .offset(enemy.angle_degrees, tuning.muzzle_offset),
            angle_degrees: enemy.angle_degrees,
        });
    }
    enemy.cooldown = draw_cooldown(tuning, rng);
}

fn patrol(enemy: &mut Enemy, field: &CollisionField<'_>, tuning: &EnemyTuning) {
    enemy.state = AgentState::Patrol;
    let target = enemy.target();

    if enemy.position.distance(target) < tuning.speed * 2.0 {
        enemy.leg = enemy.leg.flipped();
        return;
    }

    enemy.angle_degrees = enemy.position.heading_to(target);
    let next = enemy.position.offset(enemy.angle_degrees, tuning.speed);
    if !field.collides_actor(next) {
        enemy.position = next;
    }
}

fn draw_cooldown<R>(tuning: &EnemyTuning, rng: &mut R) -> u32
where
    R: Rng + ?Sized,
{
    let low = tuning.cooldown_min.min(tuning.cooldown_max);
    let high = tuning.cooldown_min.max(tuning.cooldown_max);
    rng.gen_range(low..=high)
}

fn find_patrol_end<R>(
    position: WorldPoint,
    field: &CollisionField<'_>,
    tuning: &EnemyTuning,
    rng: &mut R,
) -> WorldPoint
where
    R: Rng + ?Sized,
{
    let Some(origin) = field.cell_at(position) else {
        return position;
    };
    let grid = field.grid();

    let open: Vec<Direction> = Direction::ALL
        .into_iter()
        .filter(|direction| grid.is_open(origin, *direction))
        .collect();
    if open.is_empty() {
        return position;
    }

    let direction = open[rng.gen_range(0..open.len())];
    let low = tuning.patrol_min_cells.min(tuning.patrol_max_cells);
    let high = tuning.patrol_min_cells.max(tuning.patrol_max_cells);
    let length = rng.gen_range(low..=high);

    let mut current = origin;
    for _ in 0..length {
        if !grid.is_open(current, direction) {
            break;
        }
        match grid.neighbor(current, direction) {
            Some(next) => current = next,
            None => break,
        }
    }

    field.cell_center(current)
}
