#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Straight-line projectile motion with wall, boundary and range expiry.

use final_door_core::{ProjectileOwner, ProjectileSnapshot, ProjectileTuning, WorldPoint};
use final_door_system_collision::CollisionField;

/// Reason a projectile left play during motion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Expiry {
    /// Left the maze bounding box.
    OutOfBounds,
    /// Entered a wall band.
    Wall,
    /// Flew farther than the configured range.
    MaxTravel,
}

/// Projectile in flight.
#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    position: WorldPoint,
    angle_degrees: f32,
    owner: ProjectileOwner,
    speed: f32,
    radius: f32,
    travelled: f32,
    active: bool,
}

impl Projectile {
    /// Launches a projectile from `position` along `angle_degrees`.
    #[must_use]
    pub fn new(
        position: WorldPoint,
        angle_degrees: f32,
        owner: ProjectileOwner,
        tuning: &ProjectileTuning,
    ) -> Self {
        Self {
            position,
            angle_degrees,
            owner,
            speed: tuning.speed,
            radius: tuning.radius,
            travelled: 0.0,
            active: true,
        }
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> WorldPoint {
        self.position
    }

    /// Flight direction in degrees.
    #[must_use]
    pub const fn angle_degrees(&self) -> f32 {
        self.angle_degrees
    }

    /// Side that fired the projectile.
    #[must_use]
    pub const fn owner(&self) -> ProjectileOwner {
        self.owner
    }

    /// Collision radius.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Distance covered since launch.
    #[must_use]
    pub const fn travelled(&self) -> f32 {
        self.travelled
    }

    /// Reports whether the projectile is still in flight.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Removes the projectile from play after it scored a hit.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Immutable snapshot used by queries.
    #[must_use]
    pub const fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            position: self.position,
            owner: self.owner,
        }
    }

    /// Moves the projectile one step and reports why it expired, if it did.
    ///
    /// Causes are checked in a fixed order (bounds, then wall, then range)
    /// and at most one is reported. Inactive projectiles do not move.
    pub fn advance(&mut self, field: &CollisionField<'_>, max_travel: f32) -> Option<Expiry> {
        if !self.active {
            return None;
        }

        self.position = self.position.offset(self.angle_degrees, self.speed);
        self.travelled += self.speed;

        let expiry = if !field.contains(self.position) {
            Some(Expiry::OutOfBounds)
        } else if field.collides_actor(self.position) {
            Some(Expiry::Wall)
        } else if self.travelled > max_travel {
            Some(Expiry::MaxTravel)
        } else {
            None
        };

        if expiry.is_some() {
            self.active = false;
        }
        expiry
    }
}

/// Projectile that expired during motion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Expired {
    /// Side that fired it.
    pub owner: ProjectileOwner,
    /// Position at which it expired.
    pub position: WorldPoint,
    /// Why it expired.
    pub cause: Expiry,
}

/// Pure system advancing every projectile and dropping the expired ones.
#[derive(Debug, Default)]
pub struct ProjectileMotion;

impl ProjectileMotion {
    /// Creates a new projectile motion system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Advances all projectiles, removes every inactive one and records
    /// motion expiries in `out`.
    pub fn handle(
        &mut self,
        projectiles: &mut Vec<Projectile>,
        field: &CollisionField<'_>,
        tuning: &ProjectileTuning,
        out: &mut Vec<Expired>,
    ) {
        for projectile in projectiles.iter_mut() {
            if let Some(cause) = projectile.advance(field, tuning.max_travel) {
                out.push(Expired {
                    owner: projectile.owner,
                    position: projectile.position,
                    cause,
                });
            }
        }
        projectiles.retain(Projectile::is_active);
    }
}
