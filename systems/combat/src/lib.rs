#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system resolving hits, body contact and trap triggers for one tick.
//!
//! Resolution runs in a fixed order: player projectiles against agents,
//! agent projectiles against the player, player body against agent bodies,
//! then the hazard under the player. The first step that ends the run
//! returns its cause and the remaining steps are skipped.

use final_door_core::{Event, GameOverCause, Hazard, PlayerState, ProjectileOwner, Tuning};
use final_door_system_collision::CollisionField;
use final_door_system_enemy_ai::Enemy;
use final_door_system_projectiles::Projectile;

/// Mutable entity state combat resolves against.
#[derive(Debug)]
pub struct Arena<'a> {
    /// Player state.
    pub player: &'a mut PlayerState,
    /// Live agent collection.
    pub enemies: &'a mut [Enemy],
    /// Projectiles that survived motion this tick.
    pub projectiles: &'a mut [Projectile],
}

/// Combat system applying the resolution steps of a tick.
#[derive(Debug, Default)]
pub struct Combat;

impl Combat {
    /// Creates a new combat system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Runs every resolution step and reports what ended the run, if anything.
    ///
    /// While `guidance` is enabled the player ignores agent projectiles,
    /// agent bodies and hazards; player projectiles still score.
    pub fn handle(
        &mut self,
        arena: Arena<'_>,
        field: &CollisionField<'_>,
        tuning: &Tuning,
        guidance: bool,
        out: &mut Vec<Event>,
    ) -> Option<GameOverCause> {
        let Arena {
            player,
            enemies,
            projectiles,
        } = arena;

        resolve_player_fire(player, enemies, projectiles, out);
        if guidance {
            return None;
        }

        resolve_enemy_fire(player, projectiles, tuning, out)
            .or_else(|| resolve_contact(player, enemies, tuning))
            .or_else(|| resolve_hazard(player, field, tuning, out))
    }
}

/// Matches each active player projectile against the first overlapping agent.
pub fn resolve_player_fire(
    player: &mut PlayerState,
    enemies: &mut [Enemy],
    projectiles: &mut [Projectile],
    out: &mut Vec<Event>,
) {
    let player_shots = projectiles.iter_mut().filter(|projectile| {
        projectile.is_active() && projectile.owner() == ProjectileOwner::Player
    });
    for projectile in player_shots {
        let hit = enemies.iter_mut().find(|enemy| {
            enemy.is_alive()
                && projectile.position().distance(enemy.position())
                    < projectile.radius() + enemy.radius()
        });

        if let Some(enemy) = hit {
            enemy.deactivate();
            projectile.deactivate();
            player.record_kill();
            out.push(Event::AgentDefeated { agent: enemy.id() });
        }
    }
}

/// Applies agent projectile damage to the player.
pub fn resolve_enemy_fire(
    player: &mut PlayerState,
    projectiles: &mut [Projectile],
    tuning: &Tuning,
    out: &mut Vec<Event>,
) -> Option<GameOverCause> {
    let body = player.position();
    for projectile in projectiles
        .iter_mut()
        .filter(|projectile| projectile.is_active() && projectile.owner() == ProjectileOwner::Enemy)
    {
        if projectile.position().distance(body) >= tuning.player.radius + projectile.radius() {
            continue;
        }

        projectile.deactivate();
        let amount = tuning.projectile.damage;
        let health = player.take_damage(amount);
        out.push(Event::PlayerDamaged { amount, health });
        if player.is_dead() {
            return Some(GameOverCause::Shot);
        }
    }
    None
}

/// Ends the run when the player body overlaps any active agent.
pub fn resolve_contact(
    player: &mut PlayerState,
    enemies: &[Enemy],
    tuning: &Tuning,
) -> Option<GameOverCause> {
    let body = player.position();
    let touching = enemies.iter().any(|enemy| {
        enemy.is_alive() && body.distance(enemy.position()) < tuning.player.radius + enemy.radius()
    });

    if touching {
        player.kill();
        Some(GameOverCause::CollidedWithEnemy)
    } else {
        None
    }
}

/// Triggers the hazard of the cell the player occupies.
pub fn resolve_hazard(
    player: &mut PlayerState,
    field: &CollisionField<'_>,
    tuning: &Tuning,
    out: &mut Vec<Event>,
) -> Option<GameOverCause> {
    let position = player.position();
    let cell = field.cell_at(position)?;
    let hazard = field.grid().hazard(cell)?;
    let from_centre = position.distance(field.cell_center(cell));
    let radius = tuning.player.radius;

    match hazard {
        Hazard::Hole if from_centre < tuning.hazard.hole_trigger(radius) => {
            player.kill();
            Some(GameOverCause::FellInHole)
        }
        Hazard::Spike
            if from_centre < tuning.hazard.spike_trigger(radius) && player.spike_cooldown() == 0 =>
        {
            let amount = tuning.hazard.spike_damage;
            let health = player.take_damage(amount);
            player.arm_spike_cooldown(tuning.hazard.spike_cooldown_ticks);
            out.push(Event::PlayerDamaged { amount, health });
            player.is_dead().then_some(GameOverCause::HitSpikes)
        }
        Hazard::Hole | Hazard::Spike => None,
    }
}
