use final_door_core::{
    AgentId, CellCoord, EnemyTuning, Event, GameOverCause, Grid, Hazard, MazeTuning, PlayerState,
    ProjectileOwner, ProjectileTuning, Tuning, WorldPoint,
};
use final_door_system_collision::CollisionField;
use final_door_system_combat::{Arena, Combat};
use final_door_system_enemy_ai::Enemy;
use final_door_system_projectiles::Projectile;

fn enemy(id: u32, position: WorldPoint) -> Enemy {
    Enemy::new(AgentId::new(id), position, position, &EnemyTuning::default())
}

fn shot(owner: ProjectileOwner, position: WorldPoint) -> Projectile {
    Projectile::new(position, 0.0, owner, &ProjectileTuning::default())
}

fn spiked_cell() -> Grid {
    let mut grid = Grid::new(2, 1).expect("grid");
    let _ = grid.set_hazard(CellCoord::new(0, 0), Some(Hazard::Spike));
    grid
}

#[test]
fn body_contact_is_fatal_at_full_health() {
    let grid = Grid::new(2, 1).expect("grid");
    let field = CollisionField::new(&grid, &MazeTuning::default());
    let tuning = Tuning::default();
    let mut player = PlayerState::new(WorldPoint::new(100.0, 100.0), 150);
    let mut enemies = vec![enemy(0, WorldPoint::new(130.0, 100.0))];
    let mut out = Vec::new();

    let cause = Combat::new().handle(
        Arena {
            player: &mut player,
            enemies: &mut enemies,
            projectiles: &mut [],
        },
        &field,
        &tuning,
        false,
        &mut out,
    );

    assert_eq!(cause, Some(GameOverCause::CollidedWithEnemy));
    assert_eq!(player.health(), 0);
}

#[test]
fn fatal_shot_skips_later_steps() {
    let grid = spiked_cell();
    let field = CollisionField::new(&grid, &MazeTuning::default());
    let tuning = Tuning::default();
    let body = WorldPoint::new(100.0, 100.0);
    let mut player = PlayerState::new(body, 10);
    let mut enemies = vec![enemy(0, WorldPoint::new(120.0, 100.0))];
    let mut projectiles = vec![shot(ProjectileOwner::Enemy, body)];
    let mut out = Vec::new();

    let cause = Combat::new().handle(
        Arena {
            player: &mut player,
            enemies: &mut enemies,
            projectiles: &mut projectiles,
        },
        &field,
        &tuning,
        false,
        &mut out,
    );

    assert_eq!(cause, Some(GameOverCause::Shot));
    assert_eq!(player.spike_cooldown(), 0, "spikes must not run after death");
    assert_eq!(out.len(), 1);
}

#[test]
fn guidance_shields_the_player_but_not_the_agents() {
    let grid = spiked_cell();
    let field = CollisionField::new(&grid, &MazeTuning::default());
    let tuning = Tuning::default();
    let body = WorldPoint::new(100.0, 100.0);
    let mut player = PlayerState::new(body, 150);
    let mut enemies = vec![
        enemy(0, WorldPoint::new(110.0, 100.0)),
        enemy(1, WorldPoint::new(300.0, 100.0)),
    ];
    let mut projectiles = vec![
        shot(ProjectileOwner::Enemy, body),
        shot(ProjectileOwner::Player, WorldPoint::new(290.0, 100.0)),
    ];
    let mut out = Vec::new();

    let cause = Combat::new().handle(
        Arena {
            player: &mut player,
            enemies: &mut enemies,
            projectiles: &mut projectiles,
        },
        &field,
        &tuning,
        true,
        &mut out,
    );

    assert_eq!(cause, None);
    assert_eq!(player.health(), 150);
    assert_eq!(player.kills(), 1);
    assert!(projectiles[0].is_active(), "enemy fire passes through");
    assert!(!projectiles[1].is_active());
    assert_eq!(out, vec![Event::AgentDefeated { agent: AgentId::new(1) }]);
}

#[test]
fn hole_at_cell_centre_is_instant_death() {
    let mut grid = Grid::new(3, 3).expect("grid");
    let _ = grid.set_hazard(CellCoord::new(1, 1), Some(Hazard::Hole));
    let field = CollisionField::new(&grid, &MazeTuning::default());
    let tuning = Tuning::default();
    let mut player = PlayerState::new(field.cell_center(CellCoord::new(1, 1)), 150);
    let mut out = Vec::new();

    let cause = Combat::new().handle(
        Arena {
            player: &mut player,
            enemies: &mut [],
            projectiles: &mut [],
        },
        &field,
        &tuning,
        false,
        &mut out,
    );

    assert_eq!(cause, Some(GameOverCause::FellInHole));
    assert_eq!(cause.map(GameOverCause::message), Some("You fell into a hole!"));
    assert_eq!(player.health(), 0);
}

#[test]
fn spikes_wound_without_ending_the_run() {
    let grid = spiked_cell();
    let field = CollisionField::new(&grid, &MazeTuning::default());
    let tuning = Tuning::default();
    let mut player = PlayerState::new(WorldPoint::new(110.0, 110.0), 150);
    let mut out = Vec::new();

    let cause = Combat::new().handle(
        Arena {
            player: &mut player,
            enemies: &mut [],
            projectiles: &mut [],
        },
        &field,
        &tuning,
        false,
        &mut out,
    );

    assert_eq!(cause, None);
    assert_eq!(
        out,
        vec![Event::PlayerDamaged {
            amount: 15,
            health: 135
        }]
    );
}
