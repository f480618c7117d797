//! Cell values, lattice coordinates and neighbour directions.
//!
//! A cell is either empty, filled, or covered by one triangular half. The
//! halves are numbered so that two complementary halves add up to exactly
//! [`CellValue::Filled`], which is what lets two pieces share one cell.

use std::fmt;

/// An integer lattice coordinate. `y` grows upwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the axis-adjacent coordinate on the given side.
    #[inline]
    pub const fn step(self, side: Side) -> Self {
        match side {
            Side::Top => Self::new(self.x, self.y + 1),
            Side::Bottom => Self::new(self.x, self.y - 1),
            Side::Left => Self::new(self.x - 1, self.y),
            Side::Right => Self::new(self.x + 1, self.y),
        }
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four axis directions around a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

/// Occupancy of a single cell.
///
/// The discriminants are part of the contract: `TopLeft + BottomRight` and
/// `TopRight + BottomLeft` both equal `Filled`.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellValue {
    #[default]
    Empty = 0,
    TopLeft = 1,
    TopRight = 2,
    BottomLeft = 3,
    BottomRight = 4,
    Filled = 5,
}

impl CellValue {
    /// The four corner triangles, in discriminant order.
    pub const HALVES: [CellValue; 4] = [
        CellValue::TopLeft,
        CellValue::TopRight,
        CellValue::BottomLeft,
        CellValue::BottomRight,
    ];

    #[inline]
    pub const fn is_half(self) -> bool {
        matches!(
            self,
            CellValue::TopLeft | CellValue::TopRight | CellValue::BottomLeft | CellValue::BottomRight
        )
    }

    /// Whether this half has an edge along the given side of the cell.
    ///
    /// Full and empty cells touch no side in this sense.
    pub const fn touches(self, side: Side) -> bool {
        match side {
            Side::Top => matches!(self, CellValue::TopLeft | CellValue::TopRight),
            Side::Bottom => matches!(self, CellValue::BottomLeft | CellValue::BottomRight),
            Side::Left => matches!(self, CellValue::TopLeft | CellValue::BottomLeft),
            Side::Right => matches!(self, CellValue::TopRight | CellValue::BottomRight),
        }
    }

    /// Result of dropping `incoming` onto a cell currently holding `self`.
    ///
    /// An empty cell accepts anything; otherwise the raw sum must be exactly
    /// `Filled`. Any other combination would overlap and is rejected.
    pub fn merge(self, incoming: CellValue) -> Option<CellValue> {
        if self == CellValue::Empty {
            return Some(incoming);
        }
        let sum = self as u8 + incoming as u8;
        (sum == CellValue::Filled as u8).then_some(CellValue::Filled)
    }
}
