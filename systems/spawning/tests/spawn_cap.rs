use final_door_core::{Command, Event, GamePhase, LevelId, LevelSettings, PlayerIntent, Tuning};
use final_door_world::{self as world, query, scaffolding, World};

fn crowded_level() -> LevelSettings {
    LevelSettings {
        name: "Crowded".to_owned(),
        columns: 8,
        rows: 8,
        total_enemies: 20,
        hole_traps: 0,
        spike_traps: 0,
        clear_required: false,
    }
}

fn started_world() -> (World, Vec<Event>) {
    let mut world = World::with_config(0x00c0_ffee, Tuning::default(), vec![crowded_level()]);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::StartLevel {
            level: LevelId::FIRST,
        },
        &mut events,
    );
    assert_eq!(query::phase(&world), GamePhase::Playing);
    (world, events)
}

#[test]
fn opening_wave_fills_the_cap() {
    let (world, events) = started_world();

    let spawned = events
        .iter()
        .filter(|event| matches!(event, Event::AgentSpawned { .. }))
        .count();
    assert_eq!(spawned, 5);
    assert_eq!(query::active_agents(&world), 5);
    assert_eq!(query::spawn_backlog(&world), 15);
}

#[test]
fn defeated_agent_is_replaced_one_per_tick() {
    let (mut world, _) = started_world();
    let victim = query::agent_view(&world)
        .iter()
        .next()
        .map(|agent| agent.id)
        .expect("agent spawned");
    assert!(scaffolding::deactivate_agent(&mut world, victim));
    assert_eq!(query::active_agents(&world), 4);

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::Tick {
            intent: PlayerIntent::IDLE,
        },
        &mut events,
    );

    assert_eq!(query::active_agents(&world), 5);
    assert_eq!(query::spawn_backlog(&world), 14);
    assert_eq!(
        events
            .iter()
            .filter(|event| matches!(event, Event::AgentSpawned { .. }))
            .count(),
        1
    );
}

#[test]
fn spawns_keep_their_distance_from_the_player() {
    let (world, _) = started_world();
    let player = query::player(&world).expect("player").position();
    let tuning = query::tuning(&world);
    let min_distance = tuning.spawn.min_distance_cells * tuning.maze.cell_size;
    let maze = query::maze(&world).expect("maze");
    let field = query::collision_field(&world).expect("field");

    for agent in query::agent_view(&world).iter() {
        assert!(agent.position.distance(player) > min_distance);
        let cell = field.cell_at(agent.position).expect("inside maze");
        assert_ne!(cell, maze.start());
        assert_ne!(cell, maze.goal());
    }
}
