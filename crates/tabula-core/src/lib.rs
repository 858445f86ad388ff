//! tabula-core - sheet model: cell store, edits, cache invalidation and rendering.

pub mod error;
pub mod render;
pub mod sheet;

pub use error::{Result, SheetError};
pub use render::RenderOptions;
pub use sheet::{Sheet, Size};

pub use tabula_engine::engine::{Cell, FormulaError, Position, Value};
