use final_door_core::{
    CellCoord, Direction, Grid, MazeTuning, ProjectileOwner, ProjectileTuning, WorldPoint,
};
use final_door_system_collision::CollisionField;
use final_door_system_projectiles::{Expired, Expiry, Projectile, ProjectileMotion};

fn open_pair() -> Grid {
    let mut grid = Grid::new(2, 1).expect("grid");
    let _ = grid.carve(CellCoord::new(0, 0), Direction::East);
    grid
}

fn launch(x: f32, y: f32, angle: f32) -> Projectile {
    Projectile::new(
        WorldPoint::new(x, y),
        angle,
        ProjectileOwner::Player,
        &ProjectileTuning::default(),
    )
}

#[test]
fn wall_stops_projectile() {
    let grid = open_pair();
    let field = CollisionField::new(&grid, &MazeTuning::default());
    // North wall band of cell 0 ends at y = 19.
    let mut projectile = launch(100.0, 22.0, -90.0);

    assert_eq!(projectile.advance(&field, 2_400.0), Some(Expiry::Wall));
    assert!(!projectile.is_active());
}

#[test]
fn leaving_the_bounding_box_takes_priority_over_walls() {
    let grid = open_pair();
    let field = CollisionField::new(&grid, &MazeTuning::default());
    // One step carries the projectile past the outer edge, which is also a wall.
    let mut projectile = launch(398.0, 100.0, 0.0);

    assert_eq!(projectile.advance(&field, 2_400.0), Some(Expiry::OutOfBounds));
}

#[test]
fn motion_system_drops_expired_projectiles() {
    let grid = open_pair();
    let field = CollisionField::new(&grid, &MazeTuning::default());
    let mut projectiles = vec![
        launch(100.0, 100.0, 0.0),
        launch(100.0, 22.0, -90.0),
        launch(200.0, 100.0, 180.0),
    ];
    let mut out = Vec::new();

    ProjectileMotion::new().handle(
        &mut projectiles,
        &field,
        &ProjectileTuning::default(),
        &mut out,
    );

    assert_eq!(projectiles.len(), 2);
    assert!(projectiles.iter().all(Projectile::is_active));
    assert_eq!(out.len(), 1);
    let Expired { owner, cause, .. } = out[0];
    assert_eq!(owner, ProjectileOwner::Player);
    assert_eq!(cause, Expiry::Wall);
}

#[test]
fn projectiles_crossing_open_walls_keep_flying() {
    let grid = open_pair();
    let field = CollisionField::new(&grid, &MazeTuning::default());
    let mut projectile = launch(100.0, 100.0, 0.0);
    let mut expiry = None;
    let mut steps = 0;

    while expiry.is_none() && steps < 100 {
        expiry = projectile.advance(&field, 2_400.0);
        steps += 1;
    }

    // Flies through the shared opening and stops at the far wall band of cell 1.
    assert_eq!(expiry, Some(Expiry::Wall));
    assert!(projectile.position().x() > 380.0);
}
