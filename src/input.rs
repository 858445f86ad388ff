//! Parsing of edit commands for command mode and stdin.
//!
//! Each line has the form `A1=text`: the cell name, `=`, and everything
//! after that first `=` as the cell input. `A2==A1+1` therefore stores the
//! formula `=A1+1`, and `A1=` clears the cell.

use tabula_core::Position;

/// A single edit read from the command line or stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Set(Position, String),
    Clear(Position),
}

/// Parse one input line. Blank lines and `#` comments yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<Edit>, String> {
    let trimmed = line.trim_end_matches(['\r', '\n']);
    if trimmed.trim().is_empty() || trimmed.trim_start().starts_with('#') {
        return Ok(None);
    }

    let Some((name, input)) = trimmed.split_once('=') else {
        return Err(format!("expected CELL=TEXT, got: {}", trimmed));
    };
    let pos: Position = name.trim().parse()?;

    if input.is_empty() {
        Ok(Some(Edit::Clear(pos)))
    } else {
        Ok(Some(Edit::Set(pos, input.to_string())))
    }
}
