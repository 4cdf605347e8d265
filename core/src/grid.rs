//! Board layout and world-space projection shared by placement and movement.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{CellIndex, Viewport};

/// Unscaled side length of a square plot in world units.
const BASE_CELL_LENGTH: f32 = 300.0;
/// Scale applied to the base footprint when projecting the board.
const CELL_SCALE: f32 = 0.9;
/// Divisor locating the board origin along the viewport width.
const ORIGIN_X_DIVISOR: f32 = 3.2;
/// Divisor locating the board origin along the viewport height.
const ORIGIN_Y_DIVISOR: f32 = 1.75;
/// Divisor compressing the per-column advance along the x axis.
const COLUMN_SPACING_DIVISOR: f32 = 2.2;
/// Divisor compressing the per-row advance along the y axis.
const ROW_SPACING_DIVISOR: f32 = 2.7;
/// Horizontal shear applied per row for the isometric-like skew.
const ROW_SHEAR_X: f32 = 140.0;
/// Vertical shear applied per column for the isometric-like skew.
const COLUMN_SHEAR_Y: f32 = 120.0;

/// Describes the discrete plot layout of the board.
///
/// Owns the decomposition of a linear [`CellIndex`] into column and row
/// coordinates. Total over `[0, total_cells)`; callers range-check with
/// [`BoardLayout::contains`] before deriving positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardLayout {
    columns: u32,
    rows: u32,
}

impl BoardLayout {
    /// Creates a new board layout description.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Number of plot columns laid out on the board.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of plot rows laid out on the board.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of addressable cells.
    #[must_use]
    pub const fn total_cells(&self) -> u32 {
        self.columns * self.rows
    }

    /// Reports whether the index addresses a cell on this board.
    #[must_use]
    pub const fn contains(&self, cell: CellIndex) -> bool {
        cell.get() < self.total_cells()
    }

    /// Zero-based column of the addressed cell.
    #[must_use]
    pub const fn column_of(&self, cell: CellIndex) -> u32 {
        cell.get() % self.columns
    }

    /// Zero-based row of the addressed cell.
    #[must_use]
    pub const fn row_of(&self, cell: CellIndex) -> u32 {
        cell.get() / self.columns
    }

    /// Recomposes a cell index from column and row coordinates.
    #[must_use]
    pub const fn index_at(&self, column: u32, row: u32) -> CellIndex {
        CellIndex::new(row * self.columns + column)
    }

    /// Iterator over every cell index on the board in linear order.
    pub fn cells(&self) -> impl Iterator<Item = CellIndex> {
        (0..self.total_cells()).map(CellIndex::new)
    }
}

/// Projects cell indices into world-space positions.
///
/// Placement and wanderer movement both derive positions from the same
/// geometry so a wanderer standing on a cell aligns with a house occupying
/// it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardGeometry {
    viewport: Viewport,
    cell_length: f32,
}

impl BoardGeometry {
    /// Creates a projection for the provided viewport.
    #[must_use]
    pub const fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            cell_length: BASE_CELL_LENGTH * CELL_SCALE,
        }
    }

    /// Side length of one plot's footprint in world units.
    #[must_use]
    pub const fn cell_length(&self) -> f32 {
        self.cell_length
    }

    /// World-space center of the addressed cell.
    ///
    /// Out-of-range input is a caller error; the projection itself is total.
    #[must_use]
    pub fn position(&self, layout: &BoardLayout, cell: CellIndex) -> Vec2 {
        debug_assert!(layout.contains(cell), "cell {} out of range", cell.get());

        let column = layout.column_of(cell) as f32;
        let row = layout.row_of(cell) as f32;

        let x = self.viewport.width() / ORIGIN_X_DIVISOR
            + column * self.cell_length / COLUMN_SPACING_DIVISOR
            + row * ROW_SHEAR_X;
        let y = self.viewport.height() / ORIGIN_Y_DIVISOR
            + row * self.cell_length / ROW_SPACING_DIVISOR
            - column * COLUMN_SHEAR_Y;

        Vec2::new(x, y)
    }
}
