//! Plain-text presenter writing status lines and maze maps.

use std::io::Write;

use anyhow::{Context, Result};
use final_door_core::{CellCoord, Direction, GamePhase, Hazard};
use final_door_rendering::{MazePresentation, Presenter, Scene};
use glam::Vec2;

pub(crate) struct TextPresenter<W> {
    out: W,
    report_every: u64,
    show_map: bool,
    frames: u64,
    last_phase: Option<GamePhase>,
}

impl<W: Write> TextPresenter<W> {
    pub(crate) fn new(out: W, report_every: u64, show_map: bool) -> Self {
        Self {
            out,
            report_every,
            show_map,
            frames: 0,
            last_phase: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for TextPresenter<W> {
    fn present(&mut self, scene: &Scene) -> Result<()> {
        self.frames += 1;

        if self.last_phase != Some(scene.phase) {
            self.last_phase = Some(scene.phase);
            writeln!(self.out, "== {} ==", phase_title(scene.phase))?;
            if let Some(message) = scene.game_over_message {
                writeln!(self.out, "{message}")?;
            }
            if self.show_map {
                if let Some(map) = draw_map(scene) {
                    write!(self.out, "{map}")?;
                }
            }
            for (index, entry) in scene.menu.iter().enumerate() {
                writeln!(self.out, "  {}. {}", index + 1, entry.label)?;
            }
        }

        let due = self.report_every > 0 && self.frames % self.report_every == 0;
        if due && scene.phase.is_playing() {
            if let Some(hud) = &scene.hud {
                writeln!(
                    self.out,
                    "[{:>6}] {} | health {}/{} ({:?}) | kills {} | agents {} | projectiles {}{}",
                    self.frames,
                    hud.level_name,
                    hud.health,
                    hud.max_health,
                    hud.band,
                    hud.kills,
                    scene.agents.len(),
                    scene.projectiles.len(),
                    if hud.guidance { " | guidance" } else { "" },
                )?;
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush().context("failed to flush presenter output")
    }
}

fn phase_title(phase: GamePhase) -> &'static str {
    match phase {
        GamePhase::IntroMenu => "THE FINAL DOOR",
        GamePhase::LevelSelect => "SELECT LEVEL",
        GamePhase::Playing => "PLAYING",
        GamePhase::LevelComplete => "LEVEL COMPLETE!",
        GamePhase::GameOver { .. } => "GAME OVER!",
    }
}

/// Renders the maze as ASCII art, two characters per cell.
///
/// `@` player, `G` goal, `S` start, `E` agent, `O` hole, `^` spikes,
/// `.` guidance route.
pub(crate) fn draw_map(scene: &Scene) -> Option<String> {
    let maze = scene.maze.as_ref()?;
    let grid = &maze.grid;
    let mut map = String::new();

    map.push('+');
    for _ in 0..grid.columns() {
        map.push_str("--+");
    }
    map.push('\n');

    for row in 0..grid.rows() {
        let mut walls = String::from("|");
        let mut floor = String::from("+");
        for column in 0..grid.columns() {
            let cell = CellCoord::new(column, row);
            walls.push(glyph(scene, maze, cell));
            walls.push(' ');
            walls.push(if grid.is_open(cell, Direction::East) {
                ' '
            } else {
                '|'
            });
            floor.push_str(if grid.is_open(cell, Direction::South) {
                "  +"
            } else {
                "--+"
            });
        }
        map.push_str(&walls);
        map.push('\n');
        map.push_str(&floor);
        map.push('\n');
    }
    Some(map)
}

fn glyph(scene: &Scene, maze: &MazePresentation, cell: CellCoord) -> char {
    let size = maze.cell_size;
    if scene
        .player
        .is_some_and(|player| cell_of(player.position, size) == Some(cell))
    {
        return '@';
    }
    if scene
        .agents
        .iter()
        .any(|agent| cell_of(agent.position, size) == Some(cell))
    {
        return 'E';
    }
    if maze.goal == Some(cell) {
        return 'G';
    }
    if maze.start == Some(cell) {
        return 'S';
    }
    match maze.grid.hazard(cell) {
        Some(Hazard::Hole) => return 'O',
        Some(Hazard::Spike) => return '^',
        None => {}
    }
    let on_route = scene
        .guidance_path
        .iter()
        .any(|point| cell_of(*point, size) == Some(cell));
    if on_route {
        '.'
    } else {
        ' '
    }
}

fn cell_of(point: Vec2, cell_size: f32) -> Option<CellCoord> {
    if cell_size <= 0.0 || !(point.x >= 0.0 && point.y >= 0.0) {
        return None;
    }
    Some(CellCoord::new(
        (point.x / cell_size) as u32,
        (point.y / cell_size) as u32,
    ))
}
