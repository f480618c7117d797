//! World-space layout of the board.
//!
//! Cells live on an integer lattice; the presentation layer works in world
//! units. The board is centered on `origin`, with one world unit per cell.
//! Even-sized boards put cell centers on half units, odd-sized boards on
//! whole units. A layer offset shifts positions vertically so the board and
//! the piece tray can share one coordinate system.

use glam::Vec2;

use crate::cell::CellCoord;
use crate::grid::in_bounds;

/// Positions are snapped to this many steps per world unit before being
/// mapped back onto the lattice.
pub const SNAP_PRECISION: f32 = 10.0;

/// Largest distance from a lattice point still treated as "on" it after
/// rounding.
const LATTICE_EPSILON: f32 = 1e-3;

/// Rounds a world position to [`SNAP_PRECISION`].
#[inline]
pub fn round_to_precision(position: Vec2) -> Vec2 {
    (position * SNAP_PRECISION).round() / SNAP_PRECISION
}

/// Maps lattice coordinates to world positions and back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardLayout {
    pub grid_size: usize,
    /// World position of the board's center.
    pub origin: Vec2,
}

impl BoardLayout {
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            origin: Vec2::ZERO,
        }
    }

    /// Offset from the lower-left lattice point to the board origin.
    #[inline]
    fn lattice_offset(&self) -> f32 {
        let half_cell = if self.grid_size % 2 == 1 { 0.0 } else { 0.5 };
        // integer division on purpose: odd boards center on a cell
        -((self.grid_size / 2) as f32) + half_cell
    }

    /// World position of the center of `coord`, shifted up by `layer_offset`.
    pub fn world_position(&self, coord: CellCoord, layer_offset: f32) -> Vec2 {
        let offset = self.lattice_offset();
        Vec2::new(
            self.origin.x + offset + coord.x as f32,
            self.origin.y + offset + coord.y as f32 + layer_offset,
        )
    }

    /// Inverse of [`BoardLayout::world_position`].
    ///
    /// The position is rounded to [`SNAP_PRECISION`] first; returns `None`
    /// unless the result lands exactly on an in-range lattice point.
    pub fn cell_at(&self, position: Vec2, layer_offset: f32) -> Option<CellCoord> {
        let rounded = round_to_precision(position);
        let offset = self.lattice_offset();
        let lattice = Vec2::new(
            rounded.x - self.origin.x - offset,
            rounded.y - self.origin.y - offset - layer_offset,
        );
        let snapped = lattice.round();
        if (lattice - snapped).abs().max_element() > LATTICE_EPSILON {
            return None;
        }
        let coord = CellCoord::new(snapped.x as i32, snapped.y as i32);
        in_bounds(self.grid_size, coord).then_some(coord)
    }

    /// The in-range cell whose center is closest to `position`, with its
    /// distance. Ties go to the first cell in row-major order.
    pub fn nearest_cell(&self, position: Vec2, layer_offset: f32) -> Option<(CellCoord, f32)> {
        crate::grid::all_coords(self.grid_size)
            .map(|coord| {
                let distance = self.world_position(coord, layer_offset).distance(position);
                (coord, distance)
            })
            .fold(None, |best: Option<(CellCoord, f32)>, candidate| match best {
                Some(current) if current.1 <= candidate.1 => Some(current),
                _ => Some(candidate),
            })
    }
}

/// Axis-aligned rectangle pieces are scattered into when a puzzle starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrayArea {
    pub min: Vec2,
    pub max: Vec2,
}

impl Default for TrayArea {
    fn default() -> Self {
        Self {
            min: Vec2::new(-2.5, -4.0),
            max: Vec2::new(2.5, -3.0),
        }
    }
}

/// Arithmetic mean of a set of points, `Vec2::ZERO` for an empty set.
pub fn centroid(points: &[Vec2]) -> Vec2 {
    if points.is_empty() {
        return Vec2::ZERO;
    }
    points.iter().copied().sum::<Vec2>() / points.len() as f32
}
