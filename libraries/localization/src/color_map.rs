//! Static color map of the light projection

use crate::{LocalizationError, LocalizationResult};

/// Number of cells along each side of the map
pub const MAP_SIZE: usize = 8;

/// Number of distinct colors in the projection
pub const NUMBER_OF_COLORS: u8 = 8;

/// Reserved id for "outside the mapped area" and "no reliable observation"
pub const AMBIENT_COLOR: u8 = NUMBER_OF_COLORS;

/// Projection layout, first row is the top (far) edge of the map
///
/// Every horizontal and vertical neighbor differs, so a single cell step is
/// always visible as a color change.
pub const DEFAULT_COLOR_MAP: [[u8; MAP_SIZE]; MAP_SIZE] = [
    [5, 6, 7, 0, 1, 2, 3, 4],
    [2, 3, 4, 5, 6, 7, 0, 1],
    [7, 0, 1, 2, 3, 4, 5, 6],
    [4, 5, 6, 7, 0, 1, 2, 3],
    [1, 2, 3, 4, 5, 6, 7, 0],
    [6, 7, 0, 1, 2, 3, 4, 5],
    [3, 4, 5, 6, 7, 0, 1, 2],
    [0, 1, 2, 3, 4, 5, 6, 7],
];

/// Read-only grid of color ids addressed by (column, row)
///
/// Rows are counted from the bottom-left origin while the table is written
/// top row first, so `lookup(col, row)` reads `table[MAP_SIZE - 1 - row][col]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorMap {
    table: [[u8; MAP_SIZE]; MAP_SIZE],
}

impl ColorMap {
    /// Create a map, rejecting entries above the ambient sentinel
    pub fn new(table: [[u8; MAP_SIZE]; MAP_SIZE]) -> LocalizationResult<Self> {
        for (row, cells) in table.iter().enumerate() {
            for (column, &value) in cells.iter().enumerate() {
                if value > AMBIENT_COLOR {
                    return Err(LocalizationError::InvalidColorId { value, column, row });
                }
            }
        }
        Ok(Self { table })
    }

    /// Color id of a cell, or [`AMBIENT_COLOR`] outside `[0, MAP_SIZE)²`
    pub fn lookup(&self, column: i32, row: i32) -> u8 {
        let size = MAP_SIZE as i32;
        if column < 0 || column >= size || row < 0 || row >= size {
            return AMBIENT_COLOR;
        }
        self.table[(size - 1 - row) as usize][column as usize]
    }

    /// The raw table, top row first
    pub fn table(&self) -> &[[u8; MAP_SIZE]; MAP_SIZE] {
        &self.table
    }
}

impl Default for ColorMap {
    fn default() -> Self {
        Self {
            table: DEFAULT_COLOR_MAP,
        }
    }
}
