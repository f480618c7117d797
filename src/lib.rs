//! Tangram Grid Puzzle Library
//!
//! Generates tiling puzzles by cutting a square board into pieces, some of
//! them sharing diagonally split cells, and validates drag-and-drop
//! placements of those pieces back onto the board.
//!
//! Typical use goes through [`PuzzleSession`]:
//!
//! ```no_run
//! use rand::SeedableRng;
//! use tangram::{PieceId, PuzzleSession, SessionConfig};
//!
//! let rng = rand::rngs::StdRng::seed_from_u64(7);
//! let mut session = PuzzleSession::new(SessionConfig::default(), rng)?;
//! let home = session.home_position(PieceId(0)).unwrap();
//! let start = session.piece(PieceId(0)).unwrap().position;
//! session.begin_drag(PieceId(0), start)?;
//! session.update_drag_position(PieceId(0), home)?;
//! let result = session.end_drag(PieceId(0))?;
//! assert!(result.committed);
//! # Ok::<(), tangram::Error>(())
//! ```

pub mod cell;
pub mod corner_cut;
pub mod error;
pub mod generator;
pub mod geometry;
pub mod grid;
pub mod partition;
pub mod pieces;
pub mod placement;
pub mod session;

pub use cell::{CellCoord, CellValue, Side};
pub use error::{Error, Result};
pub use generator::{generate_puzzle, Difficulty, GeneratorConfig, Puzzle};
pub use geometry::{BoardLayout, TrayArea};
pub use grid::Grid;
pub use pieces::{Piece, PieceDefinition, PieceId, PieceState};
pub use placement::PlacementResult;
pub use session::{PuzzleSession, SessionConfig};
