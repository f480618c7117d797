//! Grid representation and occupancy operations.
//!
//! The grid is a square `size x size` lattice stored as a flat vector in
//! row-major order (y outer, x inner). Every in-range coordinate always has
//! exactly one [`CellValue`].

use crate::cell::{CellCoord, CellValue};
use crate::error::{Error, Result};

/// Default board edge length.
pub const DEFAULT_GRID_SIZE: usize = 6;

/// Converts (x, y) coordinates to a linear cell index.
///
/// Index order is row-major: `idx = y * size + x`.
#[inline(always)]
pub const fn coord_to_idx(size: usize, coord: CellCoord) -> usize {
    (coord.y as usize) * size + (coord.x as usize)
}

/// Converts a linear cell index to (x, y) coordinates.
#[inline(always)]
pub const fn idx_to_coord(size: usize, cell_index: usize) -> CellCoord {
    CellCoord::new((cell_index % size) as i32, (cell_index / size) as i32)
}

/// Occupancy state of the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<CellValue>,
}

impl Grid {
    /// Creates a grid with every cell `Empty`.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidConfig("grid size must be at least 1".into()));
        }
        Ok(Self {
            size,
            cells: vec![CellValue::Empty; size * size],
        })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn contains(&self, coord: CellCoord) -> bool {
        in_bounds(self.size, coord)
    }

    /// Returns the value at `coord`, or `None` outside the grid.
    #[inline]
    pub fn get(&self, coord: CellCoord) -> Option<CellValue> {
        self.contains(coord)
            .then(|| self.cells[coord_to_idx(self.size, coord)])
    }

    /// Overwrites the value at `coord`.
    ///
    /// # Panics
    /// Panics if `coord` is outside the grid.
    pub fn set(&mut self, coord: CellCoord, value: CellValue) {
        assert!(
            self.contains(coord),
            "cell {coord} is outside the {0}x{0} grid",
            self.size
        );
        let idx = coord_to_idx(self.size, coord);
        self.cells[idx] = value;
    }

    /// True iff every cell is `Filled`.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(|&value| value == CellValue::Filled)
    }

    /// Number of cells that are not yet `Filled`.
    pub fn open_cells(&self) -> usize {
        self.cells
            .iter()
            .filter(|&&value| value != CellValue::Filled)
            .count()
    }

    /// All coordinates in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = CellCoord> + '_ {
        all_coords(self.size)
    }

    /// All `(coordinate, value)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, CellValue)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(idx, &value)| (idx_to_coord(self.size, idx), value))
    }
}

/// Whether `coord` lies inside a `size x size` lattice.
#[inline]
pub fn in_bounds(size: usize, coord: CellCoord) -> bool {
    let size = size as i32;
    (0..size).contains(&coord.x) && (0..size).contains(&coord.y)
}

/// All coordinates of a `size x size` lattice in row-major order.
pub fn all_coords(size: usize) -> impl Iterator<Item = CellCoord> {
    (0..size * size).map(move |idx| idx_to_coord(size, idx))
}

/// Display glyph for a cell value.
pub fn value_glyph(value: CellValue) -> char {
    match value {
        CellValue::Empty => '.',
        CellValue::TopLeft => '◤',
        CellValue::TopRight => '◥',
        CellValue::BottomLeft => '◣',
        CellValue::BottomRight => '◢',
        CellValue::Filled => '#',
    }
}

/// Formats the grid occupancy as text, top row first.
pub fn format_grid(grid: &Grid) -> String {
    let mut output = String::with_capacity(grid.size * (grid.size + 1));
    for y in (0..grid.size as i32).rev() {
        for x in 0..grid.size as i32 {
            let value = grid.cells[coord_to_idx(grid.size, CellCoord::new(x, y))];
            output.push(value_glyph(value));
        }
        output.push('\n');
    }
    output
}
