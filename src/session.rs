//! The engine a presentation layer drives.
//!
//! A [`PuzzleSession`] owns the random source, the current puzzle, the live
//! grid and the draggable pieces. Input arrives as discrete drag events and
//! each runs to completion before the next.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, info};

use crate::cell::CellCoord;
use crate::error::{Error, Result};
use crate::generator::{generate_puzzle, GeneratorConfig, Puzzle};
use crate::geometry::{BoardLayout, TrayArea};
use crate::grid::Grid;
use crate::placement::{vacate, PlacementResult, SnapTarget, DEFAULT_SNAP_TOLERANCE};
use crate::pieces::{Piece, PieceId, PieceState};

/// Layer offset of the board cells.
pub const DEFAULT_BOARD_LAYER: f32 = 3.0;
/// Layer offset used to lay out piece shapes before they move to the tray.
pub const DEFAULT_PIECE_LAYER: f32 = -3.0;

/// Everything a session needs besides its random source.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub generator: GeneratorConfig,
    /// World position of the board center.
    pub origin: Vec2,
    pub board_layer: f32,
    pub piece_layer: f32,
    pub snap_tolerance: f32,
    /// Area piece centroids are scattered into on generation.
    pub tray: TrayArea,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            origin: Vec2::ZERO,
            board_layer: DEFAULT_BOARD_LAYER,
            piece_layer: DEFAULT_PIECE_LAYER,
            snap_tolerance: DEFAULT_SNAP_TOLERANCE,
            tray: TrayArea::default(),
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<()> {
        self.generator.validate()?;
        if !(self.snap_tolerance > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "snap tolerance must be positive, got {}",
                self.snap_tolerance
            )));
        }
        if !(self.tray.min.x < self.tray.max.x && self.tray.min.y < self.tray.max.y) {
            return Err(Error::InvalidConfig(format!(
                "tray area {:?}..{:?} is empty",
                self.tray.min, self.tray.max
            )));
        }
        Ok(())
    }
}

/// A puzzle in play.
pub struct PuzzleSession<R: Rng = StdRng> {
    config: SessionConfig,
    rng: R,
    layout: BoardLayout,
    puzzle: Puzzle,
    pieces: Vec<Piece>,
    selected: Option<PieceId>,
}

impl<R: Rng> PuzzleSession<R> {
    /// Generates the first puzzle and scatters its pieces over the tray.
    pub fn new(config: SessionConfig, mut rng: R) -> Result<Self> {
        config.validate()?;
        let layout = BoardLayout {
            grid_size: config.generator.grid_size,
            origin: config.origin,
        };
        let puzzle = generate_puzzle(&config.generator, &mut rng)?;
        let pieces = spawn_pieces(&config, &layout, &puzzle, &mut rng);

        Ok(Self {
            config,
            rng,
            layout,
            puzzle,
            pieces,
            selected: None,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn grid(&self) -> &Grid {
        &self.puzzle.grid
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.0)
    }

    /// The piece currently being dragged, if any.
    pub fn selected(&self) -> Option<PieceId> {
        self.selected
    }

    pub fn is_complete(&self) -> bool {
        self.puzzle.grid.is_complete()
    }

    /// World position of a board cell center on the given layer.
    pub fn world_position_of(&self, coord: CellCoord, layer_offset: f32) -> Vec2 {
        self.layout.world_position(coord, layer_offset)
    }

    /// Piece position that puts every sub-cell on its solved cell.
    pub fn home_position(&self, id: PieceId) -> Option<Vec2> {
        let piece = self.piece(id)?;
        let &(coord, _) = self.puzzle.definition(id)?.cells.first()?;
        let first = piece.cells.first()?;
        Some(self.layout.world_position(coord, self.config.board_layer) - first.local)
    }

    /// Picks up a piece under the pointer.
    ///
    /// Every cell the piece was placed on is cleared to `Empty` right away,
    /// including cells it shared with another piece.
    pub fn begin_drag(&mut self, id: PieceId, pointer: Vec2) -> Result<()> {
        if let Some(active) = self.selected {
            return Err(Error::DragInProgress { active });
        }
        let piece = self
            .pieces
            .get_mut(id.0)
            .ok_or(Error::UnknownPiece(id))?;

        vacate(&mut self.puzzle.grid, piece);
        piece.state = PieceState::Dragging {
            grab_offset: piece.position - pointer,
        };
        self.selected = Some(id);
        debug!("Picked up piece {}.", id);
        Ok(())
    }

    /// Moves a dragged piece with the pointer. Never touches the grid.
    pub fn update_drag_position(&mut self, id: PieceId, pointer: Vec2) -> Result<()> {
        let piece = self.dragged_piece_mut(id)?;
        if let PieceState::Dragging { grab_offset } = piece.state {
            piece.position = pointer + grab_offset;
        }
        Ok(())
    }

    /// Drops a dragged piece and tries to snap it onto the board.
    pub fn end_drag(&mut self, id: PieceId) -> Result<PlacementResult> {
        self.dragged_piece_mut(id)?;
        self.selected = None;

        let target = SnapTarget {
            layout: &self.layout,
            board_layer: self.config.board_layer,
            tolerance: self.config.snap_tolerance,
        };
        let piece = &mut self.pieces[id.0];
        let result = target.release(&mut self.puzzle.grid, piece);

        if result.committed {
            debug!("Placed piece {}.", id);
        } else {
            debug!("Piece {} did not fit.", id);
        }
        if result.puzzle_solved {
            info!("Puzzle solved.");
        }
        Ok(result)
    }

    /// Throws away the current puzzle and generates a new one.
    ///
    /// Refused while a piece is being dragged. On error the current puzzle
    /// is kept.
    pub fn reset(&mut self, grid_size: usize) -> Result<()> {
        if let Some(active) = self.selected {
            return Err(Error::DragInProgress { active });
        }
        let mut config = self.config.clone();
        config.generator.grid_size = grid_size;
        config.validate()?;

        let layout = BoardLayout {
            grid_size,
            origin: config.origin,
        };
        let puzzle = generate_puzzle(&config.generator, &mut self.rng)?;

        self.pieces.clear();
        self.puzzle = puzzle;
        self.pieces = spawn_pieces(&config, &layout, &self.puzzle, &mut self.rng);
        self.layout = layout;
        self.config = config;
        Ok(())
    }

    fn dragged_piece_mut(&mut self, id: PieceId) -> Result<&mut Piece> {
        let piece = self
            .pieces
            .get_mut(id.0)
            .ok_or(Error::UnknownPiece(id))?;
        if self.selected != Some(id) || !piece.is_dragging() {
            return Err(Error::NotDragging(id));
        }
        Ok(piece)
    }
}

/// Builds runtime pieces with their centroids at random tray positions.
fn spawn_pieces<R: Rng>(
    config: &SessionConfig,
    layout: &BoardLayout,
    puzzle: &Puzzle,
    rng: &mut R,
) -> Vec<Piece> {
    let tray = config.tray;
    puzzle
        .pieces
        .iter()
        .map(|definition| {
            let spawn = Vec2::new(
                rng.random_range(tray.min.x..tray.max.x),
                rng.random_range(tray.min.y..tray.max.y),
            );
            Piece::from_definition(definition, layout, config.piece_layer, spawn)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::cell::CellValue;
    use crate::generator::Difficulty;

    fn session(seed: u64) -> PuzzleSession {
        PuzzleSession::new(SessionConfig::default(), StdRng::seed_from_u64(seed)).unwrap()
    }

    fn easy_session(seed: u64, piece_count: usize) -> PuzzleSession {
        let config = SessionConfig {
            generator: GeneratorConfig {
                difficulty: Some(Difficulty::Easy),
                piece_count: Some(piece_count),
                cross_count: Some(0),
                ..GeneratorConfig::default()
            },
            ..SessionConfig::default()
        };
        PuzzleSession::new(config, StdRng::seed_from_u64(seed)).unwrap()
    }

    /// Drags a piece from where it is to `position`.
    fn drag_to(session: &mut PuzzleSession, id: PieceId, position: Vec2) -> PlacementResult {
        let start = session.piece(id).unwrap().position;
        let pointer = start + Vec2::new(0.25, 0.1);
        session.begin_drag(id, pointer).unwrap();
        session
            .update_drag_position(id, position + Vec2::new(0.25, 0.1))
            .unwrap();
        session.end_drag(id).unwrap()
    }

    fn drag_home(session: &mut PuzzleSession, id: PieceId) -> PlacementResult {
        let home = session.home_position(id).unwrap();
        drag_to(session, id, home)
    }

    #[test]
    fn test_pieces_spawn_in_tray() {
        let session = session(1);
        assert!(!session.pieces().is_empty());
        for piece in session.pieces() {
            let tray = session.config().tray;
            assert!(piece.position.x >= tray.min.x && piece.position.x < tray.max.x);
            assert!(piece.position.y >= tray.min.y && piece.position.y < tray.max.y);
            assert_eq!(piece.state, PieceState::Idle);
        }
        assert!(session.grid().iter().all(|(_, value)| value == CellValue::Empty));
    }

    #[test]
    fn test_placing_every_piece_home_solves_the_puzzle() {
        for seed in 0..40 {
            let mut session = session(seed);
            let count = session.pieces().len();
            for index in 0..count {
                let result = drag_home(&mut session, PieceId(index));
                assert!(result.committed, "seed {seed}: piece {index}");
                assert_eq!(result.puzzle_solved, index + 1 == count, "seed {seed}");
            }
            assert!(session.is_complete());
            assert!(session.is_complete());
        }
    }

    #[test]
    fn test_drag_moves_piece_without_touching_grid() {
        let mut session = easy_session(3, 5);
        let id = PieceId(0);
        let start = session.piece(id).unwrap().position;

        session.begin_drag(id, start + Vec2::new(0.1, 0.1)).unwrap();
        assert_eq!(session.selected(), Some(id));
        session
            .update_drag_position(id, Vec2::new(7.1, 9.1))
            .unwrap();

        let moved = session.piece(id).unwrap().position;
        assert!(moved.distance(Vec2::new(7.0, 9.0)) < 1e-5);
        assert_eq!(session.grid().open_cells(), 36);
    }

    #[test]
    fn test_release_far_from_board_keeps_piece_unplaced() {
        let mut session = easy_session(4, 5);
        let result = drag_to(&mut session, PieceId(1), Vec2::new(20.0, 20.0));

        assert_eq!(result, PlacementResult::default());
        let piece = session.piece(PieceId(1)).unwrap();
        assert!(!piece.is_placed());
        assert_eq!(piece.state, PieceState::Idle);
        assert!(piece.position.distance(Vec2::new(20.0, 20.0)) < 1e-5);
        assert_eq!(session.grid().open_cells(), 36);
        assert_eq!(session.selected(), None);
    }

    #[test]
    fn test_overlapping_release_aborts_and_lifted_cells_stay_empty() {
        let mut session = easy_session(5, 5);
        let first = PieceId(0);
        let second = PieceId(1);
        assert!(drag_home(&mut session, first).committed);
        assert!(drag_home(&mut session, second).committed);
        let second_cells = session.piece(second).unwrap().placement.clone().unwrap();

        // drop the second piece squarely onto the first one's cells
        let onto_first = session.home_position(first).unwrap()
            + session.piece(first).unwrap().cells[0].local
            - session.piece(second).unwrap().cells[0].local;
        let result = drag_to(&mut session, second, onto_first);

        assert!(!result.committed);
        for coord in second_cells {
            assert_eq!(session.grid().get(coord), Some(CellValue::Empty));
        }
        let first_cells = session.piece(first).unwrap().placement.clone().unwrap();
        for coord in first_cells {
            assert_eq!(session.grid().get(coord), Some(CellValue::Filled));
        }
    }

    #[test]
    fn test_lifting_a_placed_piece_frees_its_cells() {
        let mut session = easy_session(6, 5);
        let id = PieceId(2);
        assert!(drag_home(&mut session, id).committed);
        let occupied = session.grid().iter().filter(|(_, v)| *v != CellValue::Empty).count();
        assert_eq!(occupied, session.piece(id).unwrap().cells.len());

        let position = session.piece(id).unwrap().position;
        session.begin_drag(id, position).unwrap();
        assert_eq!(session.grid().open_cells(), 36);
        assert!(!session.piece(id).unwrap().is_placed());

        // putting it straight back commits again
        let result = session.end_drag(id).unwrap();
        assert!(result.committed);
    }

    #[test]
    fn test_drag_protocol_misuse_is_rejected() {
        let mut session = easy_session(7, 5);
        let a = PieceId(0);
        let b = PieceId(1);

        assert_eq!(session.end_drag(a), Err(Error::NotDragging(a)));
        assert_eq!(
            session.update_drag_position(a, Vec2::ZERO),
            Err(Error::NotDragging(a))
        );
        assert_eq!(
            session.begin_drag(PieceId(99), Vec2::ZERO),
            Err(Error::UnknownPiece(PieceId(99)))
        );

        session.begin_drag(a, Vec2::ZERO).unwrap();
        assert_eq!(
            session.begin_drag(b, Vec2::ZERO),
            Err(Error::DragInProgress { active: a })
        );
        assert_eq!(session.end_drag(b), Err(Error::NotDragging(b)));
        assert_eq!(session.reset(6), Err(Error::DragInProgress { active: a }));

        session.end_drag(a).unwrap();
        assert_eq!(session.end_drag(a), Err(Error::NotDragging(a)));
    }

    #[test]
    fn test_reset_regenerates_and_clears_grid() {
        let mut session = session(8);
        let id = PieceId(0);
        assert!(drag_home(&mut session, id).committed);
        assert!(session.grid().open_cells() < 36);

        session.reset(5).unwrap();
        assert_eq!(session.grid().size(), 5);
        assert_eq!(session.layout().grid_size, 5);
        assert_eq!(session.grid().open_cells(), 25);
        assert!(session.pieces().iter().all(|piece| !piece.is_placed()));
        let total: usize = session
            .puzzle()
            .pieces
            .iter()
            .flat_map(|piece| &piece.cells)
            .map(|&(_, value)| value as usize)
            .sum();
        assert_eq!(total, 25 * CellValue::Filled as usize);
    }

    #[test]
    fn test_failed_reset_keeps_current_puzzle() {
        let mut session = session(9);
        let before = session.puzzle().clone();
        assert!(matches!(session.reset(0), Err(Error::InvalidConfig(_))));
        assert_eq!(session.puzzle(), &before);
        assert_eq!(session.layout().grid_size, 6);
    }

    #[test]
    fn test_invalid_session_config_is_rejected() {
        let config = SessionConfig {
            snap_tolerance: 0.0,
            ..SessionConfig::default()
        };
        assert!(matches!(
            PuzzleSession::new(config, StdRng::seed_from_u64(0)),
            Err(Error::InvalidConfig(_))
        ));

        let config = SessionConfig {
            tray: TrayArea {
                min: Vec2::new(1.0, 1.0),
                max: Vec2::new(1.0, 2.0),
            },
            ..SessionConfig::default()
        };
        assert!(matches!(
            PuzzleSession::new(config, StdRng::seed_from_u64(0)),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_world_position_of_uses_layout() {
        let session = session(10);
        assert_eq!(
            session.world_position_of(CellCoord::new(0, 0), DEFAULT_BOARD_LAYER),
            Vec2::new(-2.5, 0.5)
        );
    }
}
