#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs The Final Door headlessly.

mod autopilot;
mod config;
mod presenter;

use std::{io, path::PathBuf};

use anyhow::{bail, Result};
use clap::Parser;
use final_door_core::{Command, GamePhase, LevelId};
use final_door_rendering::{FrameInput, Presenter, Scene};
use final_door_world::{self as world, query, World};
use tracing_subscriber::EnvFilter;

use crate::{autopilot::Autopilot, config::GameConfig, presenter::TextPresenter};

/// Headless runner for The Final Door.
#[derive(Debug, Parser)]
#[command(name = "final-door", version)]
struct Args {
    /// Seed for maze generation and every other random draw.
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// One-based level to play.
    #[arg(long, default_value_t = 1)]
    level: u8,
    /// Most ticks to simulate before giving up.
    #[arg(long, default_value_t = 20_000)]
    ticks: u64,
    /// TOML file overriding tuning and the level catalogue.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Let the built-in driver walk to the goal and shoot agents.
    #[arg(long)]
    autopilot: bool,
    /// Start with guidance mode enabled.
    #[arg(long)]
    guidance: bool,
    /// Print an ASCII map whenever the phase changes.
    #[arg(long)]
    map: bool,
    /// Ticks between two status lines; zero disables them.
    #[arg(long, default_value_t = 600)]
    report_every: u64,
    /// Log simulation detail to stderr.
    #[arg(short, long)]
    verbose: bool,
}

/// Settings for a single headless run.
#[derive(Clone, Copy, Debug)]
struct RunOptions {
    level: LevelId,
    ticks: u64,
    autopilot: bool,
    guidance: bool,
}

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct RunSummary {
    phase: GamePhase,
    ticks: u64,
    health: u32,
    kills: u32,
}

/// Entry point for The Final Door command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    let (tuning, levels) = config.into_parts();
    let mut world = World::with_config(args.seed, tuning, levels);
    println!("{}", query::welcome_banner(&world));

    let stdout = io::stdout();
    let mut presenter = TextPresenter::new(stdout.lock(), args.report_every, args.map);
    let options = RunOptions {
        level: LevelId::new(args.level),
        ticks: args.ticks,
        autopilot: args.autopilot,
        guidance: args.guidance,
    };
    let summary = run(&mut world, options, &mut presenter)?;
    presenter.finish()?;

    tracing::info!(?summary, seed = args.seed, "run finished");
    let outcome = match summary.phase {
        GamePhase::LevelComplete => "level complete".to_owned(),
        GamePhase::GameOver { cause } => format!("game over: {}", cause.message()),
        GamePhase::Playing => "out of ticks".to_owned(),
        other => format!("{other:?}"),
    };
    println!(
        "{outcome} after {} ticks | health {} | kills {}",
        summary.ticks, summary.health, summary.kills
    );
    Ok(())
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Starts the requested level and ticks it until it ends or the tick budget
/// runs out.
fn run<P>(world: &mut World, options: RunOptions, presenter: &mut P) -> Result<RunSummary>
where
    P: Presenter,
{
    let mut events = Vec::new();
    world::apply(
        world,
        Command::StartLevel {
            level: options.level,
        },
        &mut events,
    );
    if !query::phase(world).is_playing() {
        bail!(
            "level {} is not in the catalogue of {} levels",
            options.level.get(),
            query::levels(world).len()
        );
    }
    if options.guidance {
        world::apply(world, Command::ToggleGuidance, &mut events);
    }
    presenter.present(&Scene::capture(world))?;

    let mut autopilot = Autopilot::new();
    let mut commands = Vec::new();
    let mut ticks = 0;
    while ticks < options.ticks && query::phase(world).is_playing() {
        let input = if options.autopilot {
            autopilot.steer(world)
        } else {
            FrameInput::default()
        };
        input.commands(&mut commands);
        for command in commands.drain(..) {
            world::apply(world, command, &mut events);
        }
        events.clear();
        ticks += 1;
        presenter.present(&Scene::capture(world))?;
    }

    let (health, kills) =
        query::player(world).map_or((0, 0), |player| (player.health(), player.kills()));
    Ok(RunSummary {
        phase: query::phase(world),
        ticks,
        health,
        kills,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use final_door_core::{LevelSettings, Tuning};

    #[derive(Default)]
    struct CountingPresenter {
        frames: usize,
    }

    impl Presenter for CountingPresenter {
        fn present(&mut self, _scene: &Scene) -> Result<()> {
            self.frames += 1;
            Ok(())
        }
    }

    fn small_level() -> LevelSettings {
        LevelSettings {
            name: "Courtyard".to_owned(),
            columns: 3,
            rows: 3,
            total_enemies: 0,
            hole_traps: 0,
            spike_traps: 0,
            clear_required: false,
        }
    }

    fn options(autopilot: bool, guidance: bool, ticks: u64) -> RunOptions {
        RunOptions {
            level: LevelId::FIRST,
            ticks,
            autopilot,
            guidance,
        }
    }

    #[test]
    fn args_parse_every_flag() {
        let args = Args::try_parse_from([
            "final-door",
            "--seed",
            "42",
            "--level",
            "2",
            "--ticks",
            "100",
            "--config",
            "tuning.toml",
            "--autopilot",
            "--guidance",
            "--map",
            "-v",
        ])
        .expect("valid arguments");

        assert_eq!(args.seed, 42);
        assert_eq!(args.level, 2);
        assert_eq!(args.ticks, 100);
        assert_eq!(args.config, Some(PathBuf::from("tuning.toml")));
        assert!(args.autopilot && args.guidance && args.map && args.verbose);
    }

    #[test]
    fn idle_run_exhausts_its_ticks() {
        let mut world = World::with_config(5, Tuning::default(), vec![small_level()]);
        let mut presenter = CountingPresenter::default();

        let summary = run(&mut world, options(false, false, 25), &mut presenter).expect("run");

        assert_eq!(summary.phase, GamePhase::Playing);
        assert_eq!(summary.ticks, 25);
        assert_eq!(summary.health, 150);
        assert_eq!(presenter.frames, 26);
    }

    #[test]
    fn autopilot_reaches_the_goal() {
        for seed in 0..4 {
            let mut world = World::with_config(seed, Tuning::default(), vec![small_level()]);
            let mut presenter = CountingPresenter::default();

            let summary =
                run(&mut world, options(true, false, 2_000), &mut presenter).expect("run");

            assert_eq!(summary.phase, GamePhase::LevelComplete, "seed {seed}");
        }
    }

    #[test]
    fn guided_autopilot_clears_the_first_level() {
        let mut world = World::new(9);
        let mut presenter = CountingPresenter::default();

        let summary = run(&mut world, options(true, true, 20_000), &mut presenter).expect("run");

        assert_eq!(summary.phase, GamePhase::LevelComplete);
        assert_eq!(summary.health, 150);
    }

    #[test]
    fn unknown_level_is_an_error() {
        let mut world = World::new(1);
        let mut presenter = CountingPresenter::default();
        let options = RunOptions {
            level: LevelId::new(7),
            ..options(false, false, 10)
        };

        let error = run(&mut world, options, &mut presenter).expect_err("unknown level");
        assert!(error.to_string().contains("level 7"));
    }
}
