//! Spreadsheet engine API.
//!
//! This module provides the core computation engine for the spreadsheet:
//!
//! - [`Cell`], [`CellContent`], [`Grid`] - Data structures for cell storage
//! - [`Position`] - Cell addresses (A1 notation ↔ row/col indices)
//! - [`Formula`] - Formula parsing, evaluation and canonical printing
//! - [`detect_cycle`] - Circular dependency detection
//! - [`Dependents`] - Reverse dependency index for cache invalidation
//! - [`Value`], [`FormulaError`] - Evaluation results and their display

mod cell;
mod cycle;
mod deps;
mod format;
pub mod formula;
mod position;
mod value;

pub use cell::{
    Cell, CellContent, CellError, CellLookup, ESCAPE_SIGN, FORMULA_SIGN, FormulaCell, Grid,
};
pub use cycle::{detect_cycle, format_cycle};
pub use deps::Dependents;
pub use format::format_number;
pub use formula::{Formula, ParseError};
pub use position::Position;
pub use value::{FormulaError, Value};
