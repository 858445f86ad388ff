//! Plain-text rendering of the printable area.
//!
//! Every position in the printable area is written in row-major order,
//! fields separated by the delimiter and each row terminated by a newline.
//! Empty positions produce empty fields.

use std::io::Write;

use crate::error::Result;
use crate::sheet::Sheet;
use tabula_engine::engine::{CellLookup, Position};

/// Options for rendering a sheet.
#[derive(Clone, Debug)]
pub struct RenderOptions {
    /// Separator between fields of a row.
    pub delimiter: char,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions { delimiter: '\t' }
    }
}

impl Sheet {
    /// Write cell values (formulas evaluated) to `out`.
    pub fn write_values<W: Write>(&self, out: &mut W, options: &RenderOptions) -> Result<()> {
        out.write_all(self.render_grid(options, Self::value_field).as_bytes())?;
        Ok(())
    }

    /// Write cell texts (formulas shown as `=expression`) to `out`.
    pub fn write_texts<W: Write>(&self, out: &mut W, options: &RenderOptions) -> Result<()> {
        out.write_all(self.render_grid(options, Self::text_field).as_bytes())?;
        Ok(())
    }

    /// Render values into a string using the default options.
    pub fn values_to_string(&self) -> String {
        self.render_grid(&RenderOptions::default(), Self::value_field)
    }

    /// Render texts into a string using the default options.
    pub fn texts_to_string(&self) -> String {
        self.render_grid(&RenderOptions::default(), Self::text_field)
    }

    fn value_field(&self, pos: Position) -> String {
        self.get_cell(pos)
            .map(|cell| cell.value(self).to_string())
            .unwrap_or_default()
    }

    fn text_field(&self, pos: Position) -> String {
        self.get_cell(pos).map(|cell| cell.text()).unwrap_or_default()
    }

    fn render_grid(&self, options: &RenderOptions, field: fn(&Sheet, Position) -> String) -> String {
        let size = self.printable_size();
        let mut out = String::new();
        for row in 0..size.rows {
            for col in 0..size.cols {
                if col > 0 {
                    out.push(options.delimiter);
                }
                out.push_str(&field(self, Position::new(row, col)));
            }
            out.push('\n');
        }
        out
    }
}
