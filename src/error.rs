//! Error types and result alias for the crate.
//!
//! Placement rejections are not errors: a release that does not fit simply
//! reports `committed: false`. The variants here cover bad configuration and
//! misuse of the drag protocol.
use thiserror::Error;

use crate::pieces::PieceId;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown piece {0}")]
    UnknownPiece(PieceId),

    #[error("piece {0} is not being dragged")]
    NotDragging(PieceId),

    #[error("piece {active} is still being dragged")]
    DragInProgress { active: PieceId },

    #[error("unknown difficulty '{0}' (expected easy, medium or hard)")]
    UnknownDifficulty(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_piece() {
        let err = Error::DragInProgress {
            active: PieceId(3),
        };
        assert_eq!(err.to_string(), "piece #3 is still being dragged");
        assert_eq!(
            Error::NotDragging(PieceId(0)).to_string(),
            "piece #0 is not being dragged"
        );
    }
}
