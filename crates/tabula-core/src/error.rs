//! Error types for Tabula core.

use thiserror::Error;

use tabula_engine::engine::{CellError, ParseError, Position, format_cycle};

/// Errors returned by sheet operations.
///
/// A rejected edit never changes the sheet.
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("invalid position {}", describe_position(.0))]
    InvalidPosition(Position),

    #[error("{pos}: {source}")]
    Parse {
        pos: Position,
        #[source]
        source: ParseError,
    },

    #[error("{pos}: circular dependency: {}", format_cycle(.path))]
    CircularDependency { pos: Position, path: Vec<Position> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SheetError {
    /// Attach the edited position to a cell-level failure.
    pub(crate) fn from_cell(pos: Position, err: CellError) -> SheetError {
        match err {
            CellError::Parse(source) => SheetError::Parse { pos, source },
            CellError::CircularDependency { path } => SheetError::CircularDependency { pos, path },
        }
    }

    /// The position the failed request was about, if any.
    pub fn position(&self) -> Option<Position> {
        match self {
            SheetError::InvalidPosition(pos)
            | SheetError::Parse { pos, .. }
            | SheetError::CircularDependency { pos, .. } => Some(*pos),
            SheetError::Io(_) => None,
        }
    }
}

/// Out-of-grid positions may not have an A1 name, so show raw coordinates.
fn describe_position(pos: &Position) -> String {
    format!("(row {}, column {})", pos.row, pos.col)
}

pub type Result<T> = std::result::Result<T, SheetError>;
