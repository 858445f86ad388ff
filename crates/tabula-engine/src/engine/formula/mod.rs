//! Formula parsing and evaluation.
//!
//! [`Formula`] is the only type cells talk to: it parses formula text,
//! evaluates against a caller-supplied cell lookup, renders canonical text
//! and reports the positions it reads.

mod ast;
mod parser;

use std::collections::BTreeSet;

pub use ast::{BinaryOp, Expr, UnaryOp};
pub use parser::ParseError;

use super::{FormulaError, Position, Value};

/// A parsed formula together with the sorted set of cells it reads.
#[derive(Clone, Debug, PartialEq)]
pub struct Formula {
    expr: Expr,
    referenced: Vec<Position>,
}

impl Formula {
    /// Parse formula text without the leading `=`.
    pub fn parse(text: &str) -> Result<Formula, ParseError> {
        let expr = parser::parse(text)?;
        let mut cells = BTreeSet::new();
        expr.collect_cells(&mut cells);
        Ok(Formula {
            expr,
            referenced: cells.into_iter().collect(),
        })
    }

    /// Evaluate the formula. `lookup` may itself evaluate other formulas.
    pub fn evaluate(&self, lookup: &dyn Fn(Position) -> Value) -> Result<f64, FormulaError> {
        self.expr.evaluate(lookup)
    }

    /// Canonical text of the expression, without the leading `=`.
    pub fn expression(&self) -> String {
        self.expr.to_string()
    }

    /// In-grid positions read by the formula, de-duplicated and sorted.
    pub fn referenced_cells(&self) -> &[Position] {
        &self.referenced
    }
}
