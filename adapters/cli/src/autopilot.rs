//! Scripted driver that walks the shortest route to the goal and shoots
//! agents it can see.

use std::collections::HashMap;

use final_door_core::{AgentId, CellCoord, WorldPoint};
use final_door_rendering::FrameInput;
use final_door_system_enemy_ai::has_line_of_sight;
use final_door_system_navigation::Pathfinder;
use final_door_world::{query, CollisionField, World};

/// Distance from a cell centre at which the next waypoint takes over.
const ARRIVAL_RADIUS: f32 = 10.0;
/// Bearing error under which the player walks or fires.
const ALIGNED_DEGREES: f32 = 10.0;
/// Ticks between two shots.
const RELOAD_TICKS: u32 = 15;
/// Shots spent on a single agent before it is ignored.
const SHOTS_PER_TARGET: u32 = 6;

#[derive(Debug, Default)]
pub(crate) struct Autopilot {
    pathfinder: Pathfinder,
    route: Vec<CellCoord>,
    route_origin: Option<CellCoord>,
    reload: u32,
    shots: HashMap<AgentId, u32>,
}

impl Autopilot {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Input for the next tick. Idle when no level is loaded.
    pub(crate) fn steer(&mut self, world: &World) -> FrameInput {
        let (Some(field), Some(player)) = (query::collision_field(world), query::player(world))
        else {
            return FrameInput::default();
        };
        let tuning = query::tuning(world);
        let position = player.position();
        let facing = player.angle_degrees();
        let tolerance = tuning.player.turn_speed_degrees / 2.0;
        self.reload = self.reload.saturating_sub(1);

        if let Some((agent, target)) = self.pick_target(world, &field, position) {
            let heading = position.heading_to(target);
            let mut input = turn_towards(facing, heading, tolerance);
            if self.reload == 0 && bearing_error(facing, heading).abs() <= ALIGNED_DEGREES {
                input.fire = true;
                self.reload = RELOAD_TICKS;
                *self.shots.entry(agent).or_default() += 1;
            }
            return input;
        }

        let Some(goal) = query::maze(world).map(|maze| maze.goal()) else {
            return FrameInput::default();
        };
        let waypoint = self.waypoint(&field, position, goal);
        let heading = position.heading_to(waypoint);
        let mut input = turn_towards(facing, heading, tolerance);
        input.forward = bearing_error(facing, heading).abs() <= ALIGNED_DEGREES;
        input
    }

    /// Nearest visible agent that has not soaked up its share of shots.
    fn pick_target(
        &self,
        world: &World,
        field: &CollisionField<'_>,
        position: WorldPoint,
    ) -> Option<(AgentId, WorldPoint)> {
        let enemy = &query::tuning(world).enemy;
        query::agent_view(world)
            .iter()
            .filter(|agent| agent.alive)
            .filter(|agent| self.shots.get(&agent.id).copied().unwrap_or(0) < SHOTS_PER_TARGET)
            .filter(|agent| {
                has_line_of_sight(
                    position,
                    agent.position,
                    field,
                    enemy.sight_range,
                    enemy.sight_interval,
                )
            })
            .map(|agent| (agent.id, agent.position))
            .min_by(|left, right| {
                position
                    .distance(left.1)
                    .total_cmp(&position.distance(right.1))
            })
    }

    /// Centre of the current cell until the player stands on it, then the
    /// centre of the next cell along the route.
    fn waypoint(
        &mut self,
        field: &CollisionField<'_>,
        position: WorldPoint,
        goal: CellCoord,
    ) -> WorldPoint {
        let Some(cell) = field.cell_at(position) else {
            return field.cell_center(goal);
        };
        if self.route_origin != Some(cell) {
            self.route = self
                .pathfinder
                .shortest_path(field.grid(), cell, goal)
                .unwrap_or_default();
            self.route_origin = Some(cell);
        }

        let centre = field.cell_center(cell);
        if position.distance(centre) > ARRIVAL_RADIUS {
            return centre;
        }
        self.route
            .get(1)
            .map_or(centre, |next| field.cell_center(*next))
    }
}

/// Signed difference from `facing` to `heading`, in `(-180, 180]` degrees.
fn bearing_error(facing: f32, heading: f32) -> f32 {
    let error = (heading - facing).rem_euclid(360.0);
    if error > 180.0 {
        error - 360.0
    } else {
        error
    }
}

fn turn_towards(facing: f32, heading: f32, tolerance: f32) -> FrameInput {
    let error = bearing_error(facing, heading);
    FrameInput {
        turn_left: error > tolerance,
        turn_right: error < -tolerance,
        ..FrameInput::default()
    }
}
