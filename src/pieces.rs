//! Piece definitions and runtime pieces.
//!
//! A [`PieceDefinition`] is the home footprint produced by generation: which
//! lattice cells the piece covers in the solved board and with which value.
//! A [`Piece`] is the draggable instance built from it: the same cells laid
//! out in world space around an aggregate position.

use std::fmt;

use glam::Vec2;
use rustc_hash::FxHashMap;

use crate::cell::{CellCoord, CellValue};
use crate::geometry::{centroid, BoardLayout};

/// One piece's footprint while the generator is still shaping it.
pub type CoordinateGroup = FxHashMap<CellCoord, CellValue>;

/// Index of a piece within one generated puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub usize);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The solved-board footprint of a piece.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceDefinition {
    pub id: PieceId,
    /// Cells in row-major order (bottom row first).
    pub cells: Vec<(CellCoord, CellValue)>,
}

impl PieceDefinition {
    /// Builds a definition from a generator group, sorting its cells.
    pub fn from_group(id: PieceId, group: &CoordinateGroup) -> Self {
        let mut cells: Vec<(CellCoord, CellValue)> =
            group.iter().map(|(&coord, &value)| (coord, value)).collect();
        cells.sort_by_key(|&(coord, _)| (coord.y, coord.x));
        Self { id, cells }
    }

    /// Whether any cell of this piece is a triangle.
    pub fn has_half_cells(&self) -> bool {
        self.cells.iter().any(|(_, value)| value.is_half())
    }
}

/// One sub-cell of a runtime piece.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieceCell {
    /// Offset of the sub-cell's center from the piece position.
    pub local: Vec2,
    pub value: CellValue,
}

/// Where a piece is in its drag lifecycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PieceState {
    Idle,
    /// Being dragged; `grab_offset` is piece position minus pointer.
    Dragging { grab_offset: Vec2 },
    Placed,
}

/// A draggable piece.
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub id: PieceId,
    pub cells: Vec<PieceCell>,
    /// Aggregate world position; sub-cell `i` sits at `position + cells[i].local`.
    pub position: Vec2,
    pub state: PieceState,
    /// Grid cells this piece currently contributes to, parallel to `cells`.
    pub placement: Option<Vec<CellCoord>>,
}

impl Piece {
    /// Lays out a definition in world space with its centroid at `spawn`.
    ///
    /// Sub-cells keep the relative spacing they have on the board, computed
    /// on the given layer.
    pub fn from_definition(
        definition: &PieceDefinition,
        layout: &BoardLayout,
        layer_offset: f32,
        spawn: Vec2,
    ) -> Self {
        let home: Vec<Vec2> = definition
            .cells
            .iter()
            .map(|&(coord, _)| layout.world_position(coord, layer_offset))
            .collect();
        let center = centroid(&home);
        let cells = definition
            .cells
            .iter()
            .zip(&home)
            .map(|(&(_, value), &world)| PieceCell {
                local: world - center,
                value,
            })
            .collect();

        Self {
            id: definition.id,
            cells,
            position: spawn,
            state: PieceState::Idle,
            placement: None,
        }
    }

    /// World positions of every sub-cell.
    pub fn world_cells(&self) -> impl Iterator<Item = (Vec2, CellValue)> + '_ {
        self.cells
            .iter()
            .map(move |cell| (self.position + cell.local, cell.value))
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, PieceState::Dragging { .. })
    }

    #[inline]
    pub fn is_placed(&self) -> bool {
        self.placement.is_some()
    }
}

/// Label used for a piece in text layouts: 0-9, then A-Z.
pub fn piece_label(id: PieceId) -> char {
    match id.0 {
        n @ 0..=9 => char::from(b'0' + n as u8),
        n @ 10..=35 => char::from(b'A' + (n - 10) as u8),
        _ => '?',
    }
}

/// Formats the solved board, labelling each cell with its owning piece.
///
/// Cells split between two pieces show the dividing diagonal: `/` when the
/// halves are top-left and bottom-right, `\` for top-right and bottom-left.
/// A half covered by a single piece shows its triangle glyph and cells
/// nobody covers show as `.`.
pub fn format_layout(size: usize, definitions: &[PieceDefinition]) -> String {
    let mut owners: FxHashMap<CellCoord, Vec<(PieceId, CellValue)>> = FxHashMap::default();
    for definition in definitions {
        for &(coord, value) in &definition.cells {
            owners.entry(coord).or_default().push((definition.id, value));
        }
    }

    let mut output = String::new();
    for y in (0..size as i32).rev() {
        for x in 0..size as i32 {
            let glyph = match owners.get(&CellCoord::new(x, y)).map(Vec::as_slice) {
                None | Some([]) => '.',
                Some([(id, CellValue::Filled)]) => piece_label(*id),
                Some([(_, value)]) => crate::grid::value_glyph(*value),
                Some([(_, value), ..]) => match value {
                    CellValue::TopLeft | CellValue::BottomRight => '/',
                    _ => '\\',
                },
            };
            output.push(glyph);
        }
        output.push('\n');
    }
    output
}

/// Formats one line per piece listing its cells.
pub fn format_definitions(definitions: &[PieceDefinition]) -> String {
    let mut output = String::new();
    for definition in definitions {
        output.push_str(&format!(
            "Piece {} ({} cells):",
            definition.id,
            definition.cells.len()
        ));
        for &(coord, value) in &definition.cells {
            output.push(' ');
            output.push_str(&format!("{coord}"));
            if value != CellValue::Filled {
                output.push(crate::grid::value_glyph(value));
            }
        }
        output.push('\n');
    }
    output
}
