use serde::{Deserialize, Serialize};
use tabula_engine::engine::{Cell, CellLookup, Dependents, Grid, Position, Value};

use crate::error::{Result, SheetError};

/// Dimensions of the printable area: rows and columns from A1 to the
/// furthest non-empty cell.
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub rows: usize,
    pub cols: usize,
}

impl Size {
    pub const fn new(rows: usize, cols: usize) -> Size {
        Size { rows, cols }
    }

    /// Grow to include `pos`.
    pub(crate) fn extend(&mut self, pos: Position) {
        self.rows = self.rows.max(pos.row + 1);
        self.cols = self.cols.max(pos.col + 1);
    }
}

/// A sheet of cells.
///
/// Only non-empty cells are stored; every other position reads as an empty
/// cell. All edits go through [`Sheet::set_cell`] and [`Sheet::clear_cell`],
/// which keep the dependency graph acyclic and every cached formula value
/// consistent with the cells it reads.
#[derive(Debug, Default)]
pub struct Sheet {
    /// Non-empty cells by position
    pub(crate) cells: Grid,
    /// Reverse dependency map: position -> formula cells that read it
    pub(crate) dependents: Dependents,
    /// Bounding box of `cells`
    pub(crate) size: Size,
}

impl Sheet {
    /// Create an empty sheet.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn check_position(pos: Position) -> Result<()> {
        if pos.is_valid() {
            Ok(())
        } else {
            Err(SheetError::InvalidPosition(pos))
        }
    }

    /// The cell at `pos`, or None if the position is empty.
    pub fn cell(&self, pos: Position) -> Result<Option<&Cell>> {
        Self::check_position(pos)?;
        Ok(self.cells.get(&pos))
    }

    /// Value of the cell at `pos`; empty positions read as an empty string.
    pub fn value(&self, pos: Position) -> Result<Value> {
        Ok(self
            .cell(pos)?
            .map(|cell| cell.value(self))
            .unwrap_or_default())
    }

    /// Text of the cell at `pos`; empty positions read as an empty string.
    pub fn text(&self, pos: Position) -> Result<String> {
        Ok(self.cell(pos)?.map(Cell::text).unwrap_or_default())
    }

    /// Positions read by the cell at `pos`, sorted and de-duplicated.
    pub fn referenced_cells(&self, pos: Position) -> Result<Vec<Position>> {
        Ok(self
            .cell(pos)?
            .map(|cell| cell.referenced_cells().to_vec())
            .unwrap_or_default())
    }

    /// Formula cells that read `pos` directly.
    pub fn dependents_of(&self, pos: Position) -> Result<Vec<Position>> {
        Self::check_position(pos)?;
        Ok(self.dependents.direct(pos).collect())
    }

    /// The smallest rectangle anchored at A1 containing every cell.
    pub fn printable_size(&self) -> Size {
        self.size
    }

    /// Number of non-empty cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Non-empty cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Cell)> {
        let mut cells: Vec<_> = self.cells.iter().map(|(pos, cell)| (*pos, cell)).collect();
        cells.sort_by_key(|(pos, _)| *pos);
        cells.into_iter()
    }
}

impl CellLookup for Sheet {
    fn get_cell(&self, pos: Position) -> Option<&Cell> {
        self.cells.get(&pos)
    }
}
