#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for The Final Door adapters.
//!
//! Adapters never reach into world internals: they capture a [`Scene`]
//! snapshot through the world's query surface, translate raw input into
//! [`PlayerIntent`]s or menu [`Command`]s, and hand the scene to a
//! [`Presenter`].

use anyhow::Result as AnyResult;
use final_door_core::{
    AgentId, AgentState, CellCoord, Command, GamePhase, Grid, LevelId, PlayerIntent,
    ProjectileOwner, WorldPoint,
};
use final_door_world::{query, CollisionField, World};
use glam::Vec2;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }
}

/// Converts a simulation point into presentation space.
#[must_use]
pub fn to_vec2(point: WorldPoint) -> Vec2 {
    Vec2::new(point.x(), point.y())
}

/// Health bar colouring bands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HealthBand {
    /// Above two thirds of maximum health.
    High,
    /// Between one and two thirds of maximum health.
    Medium,
    /// At or below one third of maximum health.
    Low,
}

impl HealthBand {
    /// Classifies the provided health against its maximum.
    #[must_use]
    pub fn classify(health: u32, max_health: u32) -> Self {
        if max_health == 0 {
            return Self::Low;
        }
        let ratio = health as f32 / max_health as f32;
        if ratio > 0.66 {
            Self::High
        } else if ratio > 0.33 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Bar colour for the band.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::High => Color::new(0.1, 0.9, 0.1, 1.0),
            Self::Medium => Color::new(0.9, 0.9, 0.1, 1.0),
            Self::Low => Color::new(0.9, 0.1, 0.1, 1.0),
        }
    }
}

/// Input snapshot gathered by adapters before advancing the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Forward key held.
    pub forward: bool,
    /// Backward key held.
    pub backward: bool,
    /// Turn-left key held.
    pub turn_left: bool,
    /// Turn-right key held.
    pub turn_right: bool,
    /// Fire pressed on this frame.
    pub fire: bool,
    /// Guidance toggle pressed on this frame.
    pub toggle_guidance: bool,
    /// View toggle pressed on this frame.
    pub toggle_view: bool,
}

impl FrameInput {
    /// Movement, turning and fire intents for the next tick.
    #[must_use]
    pub const fn intent(&self) -> PlayerIntent {
        PlayerIntent {
            forward: self.forward,
            backward: self.backward,
            turn_left: self.turn_left,
            turn_right: self.turn_right,
            fire: self.fire,
        }
    }

    /// Commands the frame produces while a level is being played.
    pub fn commands(&self, out: &mut Vec<Command>) {
        if self.toggle_guidance {
            out.push(Command::ToggleGuidance);
        }
        out.push(Command::Tick {
            intent: self.intent(),
        });
    }

    /// Switches the camera perspective when the view toggle was pressed.
    pub fn update_camera(&self, camera: &mut Camera) {
        if self.toggle_view {
            camera.toggle_mode();
        }
    }
}

/// Buttons offered by the menu screens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MenuAction {
    /// Start the first level.
    Play,
    /// Open the level catalogue.
    SelectLevel,
    /// Start a specific level.
    Level(LevelId),
    /// Continue with the following level.
    NextLevel,
    /// Start over after the final level.
    PlayAgain,
    /// Replay the level that just ended.
    Restart,
    /// Back to the title screen.
    MainMenu,
    /// Leave the game.
    Quit,
}

impl MenuAction {
    /// Button caption.
    #[must_use]
    pub fn label(&self, world: &World) -> String {
        match self {
            Self::Play => "Play Game".to_owned(),
            Self::SelectLevel => "Select Level".to_owned(),
            Self::Level(level) => level
                .slot()
                .and_then(|slot| query::levels(world).get(slot))
                .map_or_else(|| format!("Level {}", level.get()), |settings| settings.name.clone()),
            Self::NextLevel => "Next Level".to_owned(),
            Self::PlayAgain => "Play Again?".to_owned(),
            Self::Restart => "Restart Level".to_owned(),
            Self::MainMenu => "Back to Main Menu".to_owned(),
            Self::Quit => "Quit Game".to_owned(),
        }
    }

    /// World command triggered by the button; `None` for [`MenuAction::Quit`].
    #[must_use]
    pub const fn command(&self) -> Option<Command> {
        match self {
            Self::Play => Some(Command::StartLevel {
                level: LevelId::FIRST,
            }),
            Self::SelectLevel => Some(Command::OpenLevelSelect),
            Self::Level(level) => Some(Command::StartLevel { level: *level }),
            Self::NextLevel | Self::PlayAgain => Some(Command::AdvanceLevel),
            Self::Restart => Some(Command::RestartLevel),
            Self::MainMenu => Some(Command::ReturnToMenu),
            Self::Quit => None,
        }
    }
}

/// Buttons shown for the world's current phase, top to bottom.
#[must_use]
pub fn menu_actions(world: &World) -> Vec<MenuAction> {
    match query::phase(world) {
        GamePhase::IntroMenu => vec![MenuAction::Play, MenuAction::SelectLevel, MenuAction::Quit],
        GamePhase::LevelSelect => {
            let mut actions: Vec<MenuAction> = (1..=query::levels(world).len())
                .filter_map(|number| u8::try_from(number).ok())
                .map(|number| MenuAction::Level(LevelId::new(number)))
                .collect();
            actions.push(MenuAction::MainMenu);
            actions
        }
        GamePhase::Playing => Vec::new(),
        GamePhase::LevelComplete => {
            let last = query::current_level(world)
                .and_then(|level| level.slot())
                .is_some_and(|slot| slot + 1 >= query::levels(world).len());
            let proceed = if last {
                MenuAction::PlayAgain
            } else {
                MenuAction::NextLevel
            };
            vec![proceed, MenuAction::MainMenu]
        }
        GamePhase::GameOver { .. } => {
            vec![MenuAction::Restart, MenuAction::MainMenu, MenuAction::Quit]
        }
    }
}

/// Menu button with its caption resolved against the level catalogue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuEntry {
    /// What the button does.
    pub action: MenuAction,
    /// Caption shown on the button.
    pub label: String,
}

/// Static layout of the maze being shown.
#[derive(Clone, Debug, PartialEq)]
pub struct MazePresentation {
    /// Wall grid, including trap markers.
    pub grid: Grid,
    /// Side length of a cell in world units.
    pub cell_size: f32,
    /// Wall thickness in world units.
    pub wall_thickness: f32,
    /// Start cell; `None` for the menu backdrop.
    pub start: Option<CellCoord>,
    /// Goal cell; `None` for the menu backdrop.
    pub goal: Option<CellCoord>,
    /// Longest shortest path from start to goal.
    pub main_path: Vec<CellCoord>,
}

/// Player body as drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerPresentation {
    /// Centre of the body.
    pub position: Vec2,
    /// Facing angle in degrees.
    pub angle_degrees: f32,
    /// Body radius.
    pub radius: f32,
}

/// Agent body as drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentPresentation {
    /// Identifier allocated by the world.
    pub id: AgentId,
    /// Centre of the body.
    pub position: Vec2,
    /// Facing angle in degrees.
    pub angle_degrees: f32,
    /// Whether the agent is engaging the player.
    pub engaging: bool,
}

/// Projectile as drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectilePresentation {
    /// Centre of the projectile.
    pub position: Vec2,
    /// Who fired it.
    pub owner: ProjectileOwner,
}

/// Heads-up display values.
#[derive(Clone, Debug, PartialEq)]
pub struct Hud {
    /// Name of the level being played.
    pub level_name: String,
    /// Remaining health.
    pub health: u32,
    /// Health at level start.
    pub max_health: u32,
    /// Colour band of the health bar.
    pub band: HealthBand,
    /// Fill colour of the health bar.
    pub bar_color: Color,
    /// Agents defeated this level.
    pub kills: u32,
    /// Whether guidance mode is active.
    pub guidance: bool,
}

/// Everything a backend needs to draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Current top-level phase.
    pub phase: GamePhase,
    /// Maze shown this frame: the level maze, or the backdrop on menus.
    pub maze: Option<MazePresentation>,
    /// Player body while a level is loaded.
    pub player: Option<PlayerPresentation>,
    /// Active agents.
    pub agents: Vec<AgentPresentation>,
    /// Projectiles in flight.
    pub projectiles: Vec<ProjectilePresentation>,
    /// Guidance route as cell centres, empty unless guidance is on.
    pub guidance_path: Vec<Vec2>,
    /// Heads-up display while a level is loaded.
    pub hud: Option<Hud>,
    /// Defeat message on the game-over screen.
    pub game_over_message: Option<&'static str>,
    /// Menu buttons for the phase, top to bottom.
    pub menu: Vec<MenuEntry>,
}

impl Scene {
    /// Captures a snapshot of the world through its query surface.
    #[must_use]
    pub fn capture(world: &World) -> Self {
        let phase = query::phase(world);
        let tuning = query::tuning(world);

        let maze = match query::maze(world) {
            Some(maze) if !matches!(phase, GamePhase::IntroMenu | GamePhase::LevelSelect) => {
                Some(MazePresentation {
                    grid: maze.grid().clone(),
                    cell_size: tuning.maze.cell_size,
                    wall_thickness: tuning.maze.wall_thickness,
                    start: Some(maze.start()),
                    goal: Some(maze.goal()),
                    main_path: maze.main_path().to_vec(),
                })
            }
            _ => query::backdrop(world).map(|grid| MazePresentation {
                grid: grid.clone(),
                cell_size: tuning.maze.cell_size,
                wall_thickness: tuning.maze.wall_thickness,
                start: None,
                goal: None,
                main_path: Vec::new(),
            }),
        };

        let player = query::player(world).map(|player| PlayerPresentation {
            position: to_vec2(player.position()),
            angle_degrees: player.angle_degrees(),
            radius: tuning.player.radius,
        });

        let agents = query::agent_view(world)
            .iter()
            .filter(|agent| agent.alive)
            .map(|agent| AgentPresentation {
                id: agent.id,
                position: to_vec2(agent.position),
                angle_degrees: agent.angle_degrees,
                engaging: agent.state == AgentState::Engage,
            })
            .collect();

        let projectiles = query::projectile_view(world)
            .iter()
            .map(|projectile| ProjectilePresentation {
                position: to_vec2(projectile.position),
                owner: projectile.owner,
            })
            .collect();

        let guidance_path = query::collision_field(world)
            .map(|field| {
                query::guidance_path(world)
                    .iter()
                    .map(|cell| to_vec2(field.cell_center(*cell)))
                    .collect()
            })
            .unwrap_or_default();

        let hud = query::player(world).map(|player| {
            let band = HealthBand::classify(player.health(), player.max_health());
            Hud {
                level_name: query::level_settings(world)
                    .map(|settings| settings.name.clone())
                    .unwrap_or_default(),
                health: player.health(),
                max_health: player.max_health(),
                band,
                bar_color: band.color(),
                kills: player.kills(),
                guidance: query::guidance_enabled(world),
            }
        });

        Self {
            phase,
            maze,
            player,
            agents,
            projectiles,
            guidance_path,
            hud,
            game_over_message: query::game_over_message(world),
            menu: menu_actions(world)
                .into_iter()
                .map(|action| MenuEntry {
                    label: action.label(world),
                    action,
                })
                .collect(),
        }
    }
}

/// Camera perspective.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ViewMode {
    /// Trailing boom behind the player.
    #[default]
    ThirdPerson,
    /// Eye at the player's position.
    FirstPerson,
}

impl ViewMode {
    /// The other perspective.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::ThirdPerson => Self::FirstPerson,
            Self::FirstPerson => Self::ThirdPerson,
        }
    }
}

/// Smoothed chase camera kept clear of walls with the camera collision profile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    mode: ViewMode,
    boom_length: f32,
    eye: Vec2,
    look_at: Vec2,
}

impl Camera {
    /// Distance of the ideal third-person eye behind the player.
    pub const DEFAULT_BOOM_LENGTH: f32 = 80.0;
    /// Fraction of the remaining distance covered per update.
    pub const SMOOTHING: f32 = 0.1;
    /// Samples taken along the boom when checking for walls.
    const BOOM_SAMPLES: u32 = 20;
    /// Shortest boom, as a fraction of its length, when a wall is in the way.
    const MIN_BOOM_FRACTION: f32 = 0.2;

    /// Creates a third-person camera resting at `origin`.
    #[must_use]
    pub fn new(origin: Vec2) -> Self {
        Self {
            mode: ViewMode::default(),
            boom_length: Self::DEFAULT_BOOM_LENGTH,
            eye: origin,
            look_at: origin,
        }
    }

    /// Active perspective.
    #[must_use]
    pub const fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Switches perspective.
    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
    }

    /// Current eye position.
    #[must_use]
    pub const fn eye(&self) -> Vec2 {
        self.eye
    }

    /// Current look-at point.
    #[must_use]
    pub const fn look_at(&self) -> Vec2 {
        self.look_at
    }

    /// Moves the camera towards its target for the player's pose.
    pub fn follow(&mut self, player: Vec2, angle_degrees: f32, field: &CollisionField<'_>) {
        match self.mode {
            ViewMode::FirstPerson => {
                let (sin, cos) = angle_degrees.to_radians().sin_cos();
                self.eye = player;
                self.look_at = player + Vec2::new(cos, sin) * 100.0;
            }
            ViewMode::ThirdPerson => {
                let target = self.boom_target(player, angle_degrees, field);
                self.eye += (target - self.eye) * Self::SMOOTHING;
                self.look_at += (player - self.look_at) * Self::SMOOTHING;
            }
        }
    }

    /// Third-person eye position before smoothing.
    #[must_use]
    pub fn boom_target(
        &self,
        player: Vec2,
        angle_degrees: f32,
        field: &CollisionField<'_>,
    ) -> Vec2 {
        let (sin, cos) = angle_degrees.to_radians().sin_cos();
        let ideal = player - Vec2::new(cos, sin) * self.boom_length;

        for sample in 1..=Self::BOOM_SAMPLES {
            let t = sample as f32 / Self::BOOM_SAMPLES as f32;
            let probe = player.lerp(ideal, t);
            if field.collides_camera(WorldPoint::new(probe.x, probe.y)) {
                let safe = ((sample - 1) as f32 / Self::BOOM_SAMPLES as f32)
                    .max(Self::MIN_BOOM_FRACTION);
                return player.lerp(ideal, safe);
            }
        }
        ideal
    }
}

/// Backend capable of showing scenes.
pub trait Presenter {
    /// Presents one frame.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;

    /// Called once after the final frame.
    fn finish(&mut self) -> AnyResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use final_door_core::{Direction, Event};

    #[test]
    fn health_band_thresholds() {
        assert_eq!(HealthBand::classify(150, 150), HealthBand::High);
        assert_eq!(HealthBand::classify(100, 150), HealthBand::High);
        assert_eq!(HealthBand::classify(99, 150), HealthBand::Medium);
        assert_eq!(HealthBand::classify(50, 150), HealthBand::Medium);
        assert_eq!(HealthBand::classify(49, 150), HealthBand::Low);
        assert_eq!(HealthBand::classify(0, 150), HealthBand::Low);
        assert_eq!(HealthBand::classify(0, 0), HealthBand::Low);
    }

    #[test]
    fn frame_input_maps_to_intent() {
        let input = FrameInput {
            forward: true,
            turn_right: true,
            fire: true,
            ..FrameInput::default()
        };

        assert_eq!(
            input.intent(),
            PlayerIntent {
                forward: true,
                backward: false,
                turn_left: false,
                turn_right: true,
                fire: true,
            }
        );
    }

    #[test]
    fn guidance_toggle_precedes_tick() {
        let input = FrameInput {
            toggle_guidance: true,
            ..FrameInput::default()
        };
        let mut commands = Vec::new();
        input.commands(&mut commands);

        assert_eq!(
            commands,
            vec![
                Command::ToggleGuidance,
                Command::Tick {
                    intent: PlayerIntent::IDLE
                }
            ]
        );
    }

    #[test]
    fn bands_have_distinct_bar_colours() {
        let high = HealthBand::High.color();
        let medium = HealthBand::Medium.color();
        let low = HealthBand::Low.color();

        assert!(high.green > high.red);
        assert!(low.red > low.green);
        assert_ne!(medium, high);
        assert_ne!(medium, low);
    }

    #[test]
    fn view_toggle_switches_camera_without_commands() {
        let mut camera = Camera::new(Vec2::ZERO);
        let input = FrameInput {
            toggle_view: true,
            ..FrameInput::default()
        };
        let mut commands = Vec::new();
        input.commands(&mut commands);
        input.update_camera(&mut camera);

        assert_eq!(
            commands,
            vec![Command::Tick {
                intent: PlayerIntent::IDLE
            }]
        );
        assert_eq!(camera.mode(), ViewMode::FirstPerson);

        FrameInput::default().update_camera(&mut camera);
        assert_eq!(camera.mode(), ViewMode::FirstPerson);

        input.update_camera(&mut camera);
        assert_eq!(camera.mode(), ViewMode::ThirdPerson);
    }

    #[test]
    fn title_menu_offers_play_select_quit() {
        let world = World::new(1);
        let actions = menu_actions(&world);

        assert_eq!(
            actions,
            vec![MenuAction::Play, MenuAction::SelectLevel, MenuAction::Quit]
        );
        assert_eq!(MenuAction::Quit.command(), None);
        assert_eq!(
            MenuAction::Play.command(),
            Some(Command::StartLevel {
                level: LevelId::FIRST
            })
        );
    }

    #[test]
    fn level_select_lists_catalogue_names() {
        let mut world = World::new(2);
        let mut events: Vec<Event> = Vec::new();
        final_door_world::apply(&mut world, Command::OpenLevelSelect, &mut events);

        let actions = menu_actions(&world);
        assert_eq!(actions.len(), 4);
        assert_eq!(actions[0].label(&world), "The Dawn Gardens");
        assert_eq!(actions[2].label(&world), "The Midnight Maze");
        assert_eq!(actions[3], MenuAction::MainMenu);
    }

    #[test]
    fn title_scene_shows_backdrop_without_hud() {
        let world = World::new(3);
        let scene = Scene::capture(&world);

        assert_eq!(scene.phase, GamePhase::IntroMenu);
        let maze = scene.maze.expect("backdrop");
        assert_eq!(maze.grid.columns(), 12);
        assert!(maze.goal.is_none());
        assert!(scene.hud.is_none());
        assert!(scene.player.is_none());
    }

    #[test]
    fn playing_scene_carries_hud_and_agents() {
        let mut world = World::new(4);
        let mut events = Vec::new();
        final_door_world::apply(
            &mut world,
            Command::StartLevel {
                level: LevelId::FIRST,
            },
            &mut events,
        );

        let scene = Scene::capture(&world);
        let hud = scene.hud.expect("hud");
        assert_eq!(hud.level_name, "The Dawn Gardens");
        assert_eq!(hud.band, HealthBand::High);
        assert_eq!(hud.bar_color, Color::new(0.1, 0.9, 0.1, 1.0));
        assert_eq!(scene.agents.len(), 5);
        assert!(scene.menu.is_empty());
        assert!(scene.maze.expect("maze").goal.is_some());
    }

    #[test]
    fn camera_boom_stops_short_of_walls() {
        let mut grid = Grid::new(2, 1).expect("grid");
        let _ = grid.carve(CellCoord::new(0, 0), Direction::East);
        let tuning = final_door_core::MazeTuning::default();
        let field = CollisionField::new(&grid, &tuning);
        let camera = Camera::new(Vec2::ZERO);

        // Facing east from near the west wall: the boom would poke through it.
        let player = Vec2::new(40.0, 100.0);
        let target = camera.boom_target(player, 0.0, &field);
        assert!(target.x < player.x);
        assert!(target.x > 15.0);

        // Facing west in the open corridor: full boom length.
        let player = Vec2::new(300.0, 100.0);
        let target = camera.boom_target(player, 180.0, &field);
        assert!((target.x - 380.0).abs() < 1e-3);
    }

    #[test]
    fn first_person_eye_sits_on_player() {
        let grid = Grid::new(1, 1).expect("grid");
        let tuning = final_door_core::MazeTuning::default();
        let field = CollisionField::new(&grid, &tuning);
        let mut camera = Camera::new(Vec2::ZERO);
        camera.toggle_mode();
        camera.follow(Vec2::new(100.0, 100.0), 90.0, &field);

        assert_eq!(camera.mode(), ViewMode::FirstPerson);
        assert_eq!(camera.eye(), Vec2::new(100.0, 100.0));
        assert!((camera.look_at().y - 200.0).abs() < 1e-3);
    }
}
