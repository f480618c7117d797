//! Snapping a released piece onto the board.
//!
//! A release is a transaction: find the snap offset from the piece's first
//! sub-cell, map every sub-cell through that one rigid offset, check all of
//! them, and only then write anything to the grid.

use glam::Vec2;

use crate::cell::{CellCoord, CellValue};
use crate::geometry::{round_to_precision, BoardLayout};
use crate::grid::Grid;
use crate::pieces::{Piece, PieceState};

/// Largest distance, in cells, between a piece's reference sub-cell and a
/// board cell for the release to count as an alignment attempt.
pub const DEFAULT_SNAP_TOLERANCE: f32 = 0.5;

/// What happened to a released piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlacementResult {
    pub committed: bool,
    pub puzzle_solved: bool,
}

/// Board parameters a placement is checked against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapTarget<'a> {
    pub layout: &'a BoardLayout,
    /// Layer offset the board cells are laid out on.
    pub board_layer: f32,
    pub tolerance: f32,
}

impl SnapTarget<'_> {
    /// Offset that moves the piece's first sub-cell onto the nearest board
    /// cell, if that cell is strictly closer than the tolerance.
    pub fn snap_offset(&self, piece: &Piece) -> Option<Vec2> {
        let (reference, _) = piece.world_cells().next()?;
        let (coord, distance) = self.layout.nearest_cell(reference, self.board_layer)?;
        (distance < self.tolerance)
            .then(|| self.layout.world_position(coord, self.board_layer) - reference)
    }

    /// Board cell each sub-cell lands on when the piece moves by `offset`,
    /// paired with the merged value the cell would hold.
    ///
    /// Returns `None` if any sub-cell misses the board or collides with a
    /// value it cannot merge with.
    pub fn plan(&self, grid: &Grid, piece: &Piece, offset: Vec2) -> Option<Vec<(CellCoord, CellValue)>> {
        piece
            .world_cells()
            .map(|(world, value)| {
                let target = round_to_precision(world + offset);
                let coord = self.layout.cell_at(target, self.board_layer)?;
                let merged = grid.get(coord)?.merge(value)?;
                Some((coord, merged))
            })
            .collect()
    }

    /// Snaps, validates and commits a released piece.
    ///
    /// On success the grid receives every sub-cell, the piece moves by the
    /// snap offset and records its placement. Otherwise nothing on the grid
    /// changes and the piece is left where it was dropped, unplaced.
    pub fn release(&self, grid: &mut Grid, piece: &mut Piece) -> PlacementResult {
        let landing = self
            .snap_offset(piece)
            .and_then(|offset| Some((offset, self.plan(grid, piece, offset)?)));

        let Some((offset, cells)) = landing else {
            piece.state = PieceState::Idle;
            piece.placement = None;
            return PlacementResult::default();
        };

        for &(coord, merged) in &cells {
            grid.set(coord, merged);
        }
        piece.position += offset;
        piece.placement = Some(cells.into_iter().map(|(coord, _)| coord).collect());
        piece.state = PieceState::Placed;

        PlacementResult {
            committed: true,
            puzzle_solved: grid.is_complete(),
        }
    }
}

/// Clears every grid cell a placed piece occupies back to `Empty`.
///
/// A cell shared with another piece's triangle is cleared as well; the
/// other piece keeps its placement record.
pub fn vacate(grid: &mut Grid, piece: &mut Piece) {
    let Some(coords) = piece.placement.take() else {
        return;
    };
    for coord in coords {
        grid.set(coord, CellValue::Empty);
    }
}
