//! Tuning surface and level catalogue.

use serde::{Deserialize, Serialize};

/// Aggregated tuning knobs controlling every adjustable aspect of a level.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Cell geometry and collision buffers.
    pub maze: MazeTuning,
    /// Player body, movement and health.
    pub player: PlayerTuning,
    /// Agent body, patrol, sight and firing cadence.
    pub enemy: EnemyTuning,
    /// Projectile speed, size, range and damage.
    pub projectile: ProjectileTuning,
    /// Trap radii, damage and cooldown.
    pub hazard: HazardTuning,
    /// Concurrency cap and spawn spacing for agents.
    pub spawn: SpawnTuning,
}

/// Cell geometry and collision buffers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeTuning {
    /// Side length of a square cell in world units.
    pub cell_size: f32,
    /// Thickness of a wall measured inward from the cell edge.
    pub wall_thickness: f32,
    /// Extra clearance kept between moving actors and walls.
    pub actor_clearance: f32,
    /// Smaller clearance that lets the camera approach walls more closely.
    pub camera_clearance: f32,
    /// Column count of the maze shown behind the title menu.
    pub demo_columns: u32,
    /// Row count of the maze shown behind the title menu.
    pub demo_rows: u32,
}

impl Default for MazeTuning {
    fn default() -> Self {
        Self {
            cell_size: 200.0,
            wall_thickness: 10.0,
            actor_clearance: 9.0,
            camera_clearance: 5.0,
            demo_columns: 12,
            demo_rows: 12,
        }
    }
}

/// Player body, movement and health.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Collision radius of the player body.
    pub radius: f32,
    /// Distance covered by one forward or backward step.
    pub speed: f32,
    /// Degrees turned per turn intent.
    pub turn_speed_degrees: f32,
    /// Health at level start.
    pub max_health: u32,
    /// Distance ahead of the body where player projectiles appear.
    pub muzzle_offset: f32,
    /// Extra slack beyond the body radius for touching the goal.
    pub goal_margin: f32,
}

impl PlayerTuning {
    /// Distance from the goal centre at which the level counts as complete.
    #[must_use]
    pub fn goal_reach(&self) -> f32 {
        self.radius + self.goal_margin
    }
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            radius: 9.0,
            speed: 9.0,
            turn_speed_degrees: 4.0,
            max_health: 150,
            muzzle_offset: 12.0,
            goal_margin: 20.0,
        }
    }
}

/// Agent body, patrol, sight and firing cadence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    /// Collision radius of an agent body.
    pub radius: f32,
    /// Patrol distance covered per tick.
    pub speed: f32,
    /// Shots available to each agent.
    pub ammo: u32,
    /// Lower bound of the random firing cooldown, in ticks.
    pub cooldown_min: u32,
    /// Upper bound (inclusive) of the random firing cooldown, in ticks.
    pub cooldown_max: u32,
    /// Distance ahead of the body where agent projectiles appear.
    pub muzzle_offset: f32,
    /// Farthest distance at which the player can be seen.
    pub sight_range: f32,
    /// Spacing between line-of-sight samples.
    pub sight_interval: f32,
    /// Shortest patrol leg, in cells.
    pub patrol_min_cells: u32,
    /// Longest patrol leg, in cells.
    pub patrol_max_cells: u32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            radius: 22.0,
            speed: 0.07,
            ammo: 10,
            cooldown_min: 60,
            cooldown_max: 120,
            muzzle_offset: 25.0,
            sight_range: 450.0,
            sight_interval: 20.0,
            patrol_min_cells: 2,
            patrol_max_cells: 5,
        }
    }
}

/// Projectile speed, size, range and damage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    /// Distance covered per tick.
    pub speed: f32,
    /// Collision radius.
    pub radius: f32,
    /// Distance after which a projectile expires.
    pub max_travel: f32,
    /// Damage an agent projectile deals to the player.
    pub damage: u32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            speed: 5.0,
            radius: 1.0,
            max_travel: 2_400.0,
            damage: 10,
        }
    }
}

/// Trap radii, damage and cooldown.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardTuning {
    /// Radius of a hole measured from the cell centre.
    pub hole_radius: f32,
    /// Radius of a spike patch measured from the cell centre.
    pub spike_radius: f32,
    /// Damage dealt by one spike hit.
    pub spike_damage: u32,
    /// Ticks between two spike hits.
    pub spike_cooldown_ticks: u32,
}

impl HazardTuning {
    /// Centre distance under which a hole swallows a body of the given radius.
    #[must_use]
    pub fn hole_trigger(&self, body_radius: f32) -> f32 {
        self.hole_radius - body_radius
    }

    /// Centre distance under which spikes hurt a body of the given radius.
    #[must_use]
    pub fn spike_trigger(&self, body_radius: f32) -> f32 {
        self.spike_radius - body_radius
    }
}

impl Default for HazardTuning {
    fn default() -> Self {
        let cell_size = MazeTuning::default().cell_size;
        Self {
            hole_radius: cell_size / 3.5,
            spike_radius: cell_size / 3.0,
            spike_damage: 15,
            spike_cooldown_ticks: 30,
        }
    }
}

/// Concurrency cap and spawn spacing for agents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    /// Most agents alive at the same time.
    pub max_active: usize,
    /// Minimum distance from the player to a spawn point, in cells.
    pub min_distance_cells: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            max_active: 5,
            min_distance_cells: 3.0,
        }
    }
}

/// Parameters of a single level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSettings {
    /// Display name.
    pub name: String,
    /// Maze width in cells.
    pub columns: u32,
    /// Maze height in cells.
    pub rows: u32,
    /// Agents released over the course of the level.
    pub total_enemies: u32,
    /// Hole traps requested.
    pub hole_traps: usize,
    /// Spike traps requested.
    pub spike_traps: usize,
    /// Whether every agent must be defeated before the goal counts.
    #[serde(default)]
    pub clear_required: bool,
}

/// Built-in level catalogue.
#[must_use]
pub fn default_levels() -> Vec<LevelSettings> {
    vec![
        LevelSettings {
            name: "The Dawn Gardens".to_owned(),
            columns: 8,
            rows: 8,
            total_enemies: 10,
            hole_traps: 2,
            spike_traps: 4,
            clear_required: false,
        },
        LevelSettings {
            name: "The Sunstone Labyrinth".to_owned(),
            columns: 12,
            rows: 12,
            total_enemies: 20,
            hole_traps: 5,
            spike_traps: 8,
            clear_required: false,
        },
        LevelSettings {
            name: "The Midnight Maze".to_owned(),
            columns: 15,
            rows: 15,
            total_enemies: 30,
            hole_traps: 8,
            spike_traps: 12,
            clear_required: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trap_triggers_shrink_by_body_radius() {
        let hazard = HazardTuning::default();
        assert!((hazard.hole_trigger(9.0) - (200.0 / 3.5 - 9.0)).abs() < 1e-4);
        assert!(hazard.spike_trigger(9.0) > hazard.hole_trigger(9.0));
    }

    #[test]
    fn catalogue_grows_in_size_and_threat() {
        let levels = default_levels();
        assert_eq!(levels.len(), 3);
        assert!(levels
            .windows(2)
            .all(|pair| pair[0].columns < pair[1].columns
                && pair[0].total_enemies < pair[1].total_enemies));
    }

    #[test]
    fn goal_reach_adds_margin_to_radius() {
        assert!((PlayerTuning::default().goal_reach() - 29.0).abs() < f32::EPSILON);
    }
}
