#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Continuous-space wall collision against the discrete maze grid.
//!
//! A position is first mapped to the cell containing it. Positions outside
//! the grid always collide. Inside the grid, the position's offset within
//! its cell is compared against a band of `wall_thickness + buffer` along
//! every side whose wall is still standing.

use final_door_core::{CellCoord, Direction, Grid, MazeTuning, WorldPoint};

/// Clearance profile selecting the buffer kept between a point and the walls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Clearance {
    /// Wider buffer used for player and agent bodies.
    Actor,
    /// Narrower buffer that lets the camera approach walls more closely.
    Camera,
}

/// Read-only collision view over a grid.
#[derive(Clone, Copy, Debug)]
pub struct CollisionField<'a> {
    grid: &'a Grid,
    cell_size: f32,
    wall_thickness: f32,
    actor_clearance: f32,
    camera_clearance: f32,
}

impl<'a> CollisionField<'a> {
    /// Creates a collision field using the cell geometry from the provided tuning.
    #[must_use]
    pub fn new(grid: &'a Grid, tuning: &MazeTuning) -> Self {
        Self {
            grid,
            cell_size: tuning.cell_size,
            wall_thickness: tuning.wall_thickness,
            actor_clearance: tuning.actor_clearance,
            camera_clearance: tuning.camera_clearance,
        }
    }

    /// Grid the field tests against.
    #[must_use]
    pub const fn grid(&self) -> &'a Grid {
        self.grid
    }

    /// Side length of a cell in world units.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Width and height of the maze in world units.
    #[must_use]
    pub fn extent(&self) -> (f32, f32) {
        (
            self.grid.columns() as f32 * self.cell_size,
            self.grid.rows() as f32 * self.cell_size,
        )
    }

    /// Reports whether the point lies strictly inside the maze bounding box.
    #[must_use]
    pub fn contains(&self, point: WorldPoint) -> bool {
        let (width, height) = self.extent();
        point.x() > 0.0 && point.x() < width && point.y() > 0.0 && point.y() < height
    }

    /// Cell containing the point, or `None` outside the grid.
    ///
    /// Uses floor division, so small negative coordinates fall outside the
    /// grid rather than onto row or column zero.
    #[must_use]
    pub fn cell_at(&self, point: WorldPoint) -> Option<CellCoord> {
        let column = (point.x() / self.cell_size).floor();
        let row = (point.y() / self.cell_size).floor();
        let columns = self.grid.columns() as f32;
        let rows = self.grid.rows() as f32;

        // Written as negated ranges so NaN falls outside.
        if !(column >= 0.0 && column < columns && row >= 0.0 && row < rows) {
            return None;
        }

        let cell = CellCoord::new(column as u32, row as u32);
        self.grid.contains(cell).then_some(cell)
    }

    /// World-space centre of the cell.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> WorldPoint {
        let half = self.cell_size / 2.0;
        WorldPoint::new(
            cell.column() as f32 * self.cell_size + half,
            cell.row() as f32 * self.cell_size + half,
        )
    }

    /// Tests the point against the walls of its cell using an explicit buffer.
    #[must_use]
    pub fn collides(&self, point: WorldPoint, buffer: f32) -> bool {
        let Some(cell) = self.cell_at(point) else {
            return true;
        };
        let Some(stored) = self.grid.cell(cell) else {
            return true;
        };

        let walls = stored.walls();
        let local_x = point.x().rem_euclid(self.cell_size);
        let local_y = point.y().rem_euclid(self.cell_size);
        let near = self.wall_thickness + buffer;
        let far = self.cell_size - near;

        (walls.is_closed(Direction::North) && local_y < near)
            || (walls.is_closed(Direction::South) && local_y > far)
            || (walls.is_closed(Direction::West) && local_x < near)
            || (walls.is_closed(Direction::East) && local_x > far)
    }

    /// Tests the point using the buffer of the provided clearance profile.
    #[must_use]
    pub fn collides_with(&self, point: WorldPoint, clearance: Clearance) -> bool {
        let buffer = match clearance {
            Clearance::Actor => self.actor_clearance,
            Clearance::Camera => self.camera_clearance,
        };
        self.collides(point, buffer)
    }

    /// Shorthand for [`Clearance::Actor`] tests used by bodies and projectiles.
    #[must_use]
    pub fn collides_actor(&self, point: WorldPoint) -> bool {
        self.collides_with(point, Clearance::Actor)
    }

    /// Shorthand for [`Clearance::Camera`] tests used by camera placement.
    #[must_use]
    pub fn collides_camera(&self, point: WorldPoint) -> bool {
        self.collides_with(point, Clearance::Camera)
    }
}
