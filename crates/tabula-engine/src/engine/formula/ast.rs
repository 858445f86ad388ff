//! Expression tree: evaluation and canonical printing.

use std::collections::BTreeSet;
use std::fmt;

use crate::engine::format::format_number;
use crate::engine::{FormulaError, Position, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    fn symbol(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
        }
    }

    fn precedence(self) -> u8 {
        match self {
            BinaryOp::Add | BinaryOp::Sub => 1,
            BinaryOp::Mul | BinaryOp::Div => 2,
        }
    }
}

const UNARY_PRECEDENCE: u8 = 3;
const ATOM_PRECEDENCE: u8 = 4;

/// A parsed formula expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(f64),
    Cell(Position),
    /// A syntactically valid reference that points outside the grid.
    InvalidRef,
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Number(_) | Expr::Cell(_) | Expr::InvalidRef => ATOM_PRECEDENCE,
            Expr::Unary { .. } => UNARY_PRECEDENCE,
            Expr::Binary { op, .. } => op.precedence(),
        }
    }

    /// Collect every in-grid position this expression reads.
    pub fn collect_cells(&self, out: &mut BTreeSet<Position>) {
        match self {
            Expr::Cell(pos) => {
                out.insert(*pos);
            }
            Expr::Number(_) | Expr::InvalidRef => {}
            Expr::Unary { operand, .. } => operand.collect_cells(out),
            Expr::Binary { lhs, rhs, .. } => {
                lhs.collect_cells(out);
                rhs.collect_cells(out);
            }
        }
    }

    /// Evaluate against the values supplied by `lookup`.
    pub fn evaluate(&self, lookup: &dyn Fn(Position) -> Value) -> Result<f64, FormulaError> {
        match self {
            Expr::Number(n) => Ok(*n),
            Expr::InvalidRef => Err(FormulaError::Ref),
            Expr::Cell(pos) => coerce(lookup(*pos)),
            Expr::Unary { op, operand } => {
                let v = operand.evaluate(lookup)?;
                Ok(match op {
                    UnaryOp::Plus => v,
                    UnaryOp::Minus => -v,
                })
            }
            Expr::Binary { op, lhs, rhs } => {
                let l = lhs.evaluate(lookup)?;
                let r = rhs.evaluate(lookup)?;
                let result = match op {
                    BinaryOp::Add => l + r,
                    BinaryOp::Sub => l - r,
                    BinaryOp::Mul => l * r,
                    BinaryOp::Div => {
                        if r == 0.0 {
                            return Err(FormulaError::Arithmetic);
                        }
                        l / r
                    }
                };
                if result.is_finite() {
                    Ok(result)
                } else {
                    Err(FormulaError::Arithmetic)
                }
            }
        }
    }

    fn fmt_child(&self, f: &mut fmt::Formatter<'_>, parens: bool) -> fmt::Result {
        if parens {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

/// Convert a referenced cell's value into a number.
fn coerce(value: Value) -> Result<f64, FormulaError> {
    match value {
        Value::Number(n) => Ok(n),
        Value::Error(e) => Err(e),
        Value::Text(s) if s.is_empty() => Ok(0.0),
        Value::Text(s) => match s.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(n),
            _ => Err(FormulaError::Arithmetic),
        },
    }
}

/// Canonical text: no whitespace and only the parentheses the tree needs.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => f.write_str(&format_number(*n)),
            Expr::Cell(pos) => write!(f, "{}", pos),
            Expr::InvalidRef => f.write_str(FormulaError::Ref.as_str()),
            Expr::Unary { op, operand } => {
                f.write_str(match op {
                    UnaryOp::Plus => "+",
                    UnaryOp::Minus => "-",
                })?;
                operand.fmt_child(f, operand.precedence() < UNARY_PRECEDENCE)
            }
            Expr::Binary { op, lhs, rhs } => {
                let prec = op.precedence();
                lhs.fmt_child(f, lhs.precedence() < prec)?;
                write!(f, "{}", op.symbol())?;
                // Operators group to the left, so an equal-precedence right
                // operand keeps its parentheses even for `+` and `*`.
                rhs.fmt_child(f, rhs.precedence() <= prec)
            }
        }
    }
}
