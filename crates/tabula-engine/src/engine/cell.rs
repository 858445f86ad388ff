//! Cell data structures for the spreadsheet grid.
//!
//! - [`CellContent`] - What a cell holds: nothing, literal text, or a formula
//! - [`Cell`] - A cell with its content and, for formulas, the memoized value
//! - [`CellLookup`] - Position-based access used for evaluation and cycle checks
//! - [`Grid`] - Sparse storage for cells

use std::cell::OnceCell;
use std::collections::{HashMap, HashSet};

use thiserror::Error;

use super::cycle::{detect_cycle, format_cycle};
use super::formula::{Formula, ParseError};
use super::{Position, Value};

/// Marks text that should not be interpreted; stripped from the value only.
pub const ESCAPE_SIGN: char = '\'';
/// Prefix that turns the rest of the input into a formula.
pub const FORMULA_SIGN: char = '=';

/// Why new content was refused for a cell.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CellError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("circular dependency: {}", format_cycle(.path))]
    CircularDependency { path: Vec<Position> },
}

/// A formula and its memoized result.
///
/// The cache is filled on first read and emptied by [`Cell::invalidate`].
/// Filling it through `&self` is not observable: the same inputs always
/// produce the same value.
#[derive(Clone, Debug)]
pub struct FormulaCell {
    formula: Formula,
    cache: OnceCell<Value>,
}

impl FormulaCell {
    pub fn new(formula: Formula) -> FormulaCell {
        FormulaCell {
            formula,
            cache: OnceCell::new(),
        }
    }

}

/// The content stored in a cell.
#[derive(Clone, Debug, Default)]
pub enum CellContent {
    #[default]
    Empty,
    Text(String),
    Formula(FormulaCell),
}

impl CellContent {
    /// Classify raw input.
    /// - Empty string -> Empty
    /// - `=` followed by at least one character -> Formula (parsed)
    /// - Anything else, including a bare `=` -> Text, verbatim
    pub fn from_input(input: &str) -> Result<CellContent, ParseError> {
        if input.is_empty() {
            return Ok(CellContent::Empty);
        }
        match input.strip_prefix(FORMULA_SIGN) {
            Some(expression) if !expression.is_empty() => {
                Ok(CellContent::Formula(FormulaCell::new(Formula::parse(expression)?)))
            }
            _ => Ok(CellContent::Text(input.to_string())),
        }
    }

    /// Build content for the cell at `at`, refusing formulas that would close a
    /// dependency cycle through the cells already committed in `cells`.
    ///
    /// Nothing is mutated: on error the caller keeps its previous content.
    pub fn prepare<L: CellLookup + ?Sized>(
        at: Position,
        input: &str,
        cells: &L,
    ) -> Result<CellContent, CellError> {
        let content = CellContent::from_input(input)?;
        if let CellContent::Formula(f) = &content
            && let Some(path) = detect_cycle(at, f.formula.referenced_cells(), cells)
        {
            return Err(CellError::CircularDependency { path });
        }
        Ok(content)
    }

    /// Positions read by this content.
    pub fn depends_on(&self) -> &[Position] {
        match self {
            CellContent::Formula(f) => f.formula.referenced_cells(),
            CellContent::Empty | CellContent::Text(_) => &[],
        }
    }
}

/// A cell in the spreadsheet grid. Its position is the key it is stored under.
#[derive(Clone, Debug, Default)]
pub struct Cell {
    contents: CellContent,
}

impl Cell {
    pub fn with_contents(contents: CellContent) -> Cell {
        Cell { contents }
    }

    /// Replace the content wholesale, returning the previous content.
    pub fn replace(&mut self, contents: CellContent) -> CellContent {
        std::mem::replace(&mut self.contents, contents)
    }

    pub fn clear(&mut self) {
        self.contents = CellContent::Empty;
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.contents, CellContent::Empty)
    }

    /// The value of the cell, evaluating (and caching) a formula on first use.
    pub fn value<L: CellLookup + ?Sized>(&self, cells: &L) -> Value {
        match &self.contents {
            CellContent::Empty => Value::empty(),
            CellContent::Text(text) => {
                let shown = text.strip_prefix(ESCAPE_SIGN).unwrap_or(text);
                Value::Text(shown.to_string())
            }
            CellContent::Formula(f) => {
                if f.cache.get().is_none() {
                    self.fill_dependency_caches(cells);
                }
                f.cache
                    .get_or_init(|| {
                        let lookup = |pos: Position| {
                            cells
                                .get_cell(pos)
                                .map(|cell| cell.value(cells))
                                .unwrap_or_default()
                        };
                        Value::from(f.formula.evaluate(&lookup))
                    })
                    .clone()
            }
        }
    }

    /// Evaluate every uncached formula this cell reads, deepest first, so the
    /// lookups made while evaluating this cell are all cache hits.
    ///
    /// Uses an explicit stack: a chain can be as long as the grid is tall.
    fn fill_dependency_caches<L: CellLookup + ?Sized>(&self, cells: &L) {
        let mut stack: Vec<(&Cell, usize)> = vec![(self, 0)];
        let mut seen = HashSet::new();
        while let Some(frame) = stack.last_mut() {
            let cell: &Cell = frame.0;
            match cell.referenced_cells().get(frame.1).copied() {
                Some(dep) => {
                    frame.1 += 1;
                    if seen.insert(dep)
                        && let Some(child) = cells.get_cell(dep)
                        && child.needs_evaluation()
                    {
                        stack.push((child, 0));
                    }
                }
                None => {
                    stack.pop();
                    // The root is evaluated by the caller.
                    if !stack.is_empty() {
                        cell.value(cells);
                    }
                }
            }
        }
    }

    fn needs_evaluation(&self) -> bool {
        matches!(&self.contents, CellContent::Formula(f) if f.cache.get().is_none())
    }

    /// The text the cell was set from, with formulas in canonical form.
    pub fn text(&self) -> String {
        match &self.contents {
            CellContent::Empty => String::new(),
            CellContent::Text(text) => text.clone(),
            CellContent::Formula(f) => format!("{}{}", FORMULA_SIGN, f.formula.expression()),
        }
    }

    /// Positions this cell reads, sorted and de-duplicated.
    pub fn referenced_cells(&self) -> &[Position] {
        self.contents.depends_on()
    }

    pub fn has_cache(&self) -> bool {
        match &self.contents {
            CellContent::Formula(f) => f.cache.get().is_some(),
            _ => false,
        }
    }

    /// Drop the memoized value. Returns whether there was one.
    pub fn invalidate(&mut self) -> bool {
        match &mut self.contents {
            CellContent::Formula(f) => f.cache.take().is_some(),
            _ => false,
        }
    }
}

/// Read access to cells by position; absent positions are implicit empty cells.
pub trait CellLookup {
    fn get_cell(&self, pos: Position) -> Option<&Cell>;
}

/// Sparse grid storage.
pub type Grid = HashMap<Position, Cell>;

impl CellLookup for Grid {
    fn get_cell(&self, pos: Position) -> Option<&Cell> {
        self.get(&pos)
    }
}
