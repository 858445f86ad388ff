use super::{Sheet, Size};
use crate::error::{Result, SheetError};
use tabula_engine::engine::{CellContent, Position};

impl Sheet {
    /// Clear the cached value of every cell that depends (transitively) on
    /// the changed position.
    ///
    /// A formula is only cached after every cell it read was cached, so the
    /// walk stops at readers whose cache is already empty.
    fn invalidate_dependents(&mut self, changed: Position) {
        let mut cleared = 0usize;
        let cells = &mut self.cells;
        self.dependents.walk_transitive(changed, |pos| {
            let had_cache = cells.get_mut(&pos).is_some_and(|cell| cell.invalidate());
            if had_cache {
                cleared += 1;
            }
            had_cache
        });
        if cleared > 0 {
            log::debug!("{}: invalidated {} cached value(s)", changed, cleared);
        }
    }

    /// Recompute the printable size from the remaining cells.
    fn update_size(&mut self) {
        let mut size = Size::default();
        for pos in self.cells.keys() {
            size.extend(*pos);
        }
        self.size = size;
    }

    /// Set cell contents from input text.
    ///
    /// - `""` empties the cell
    /// - `=` followed by an expression stores a formula
    /// - anything else is stored as text
    ///
    /// Parse errors and circular references are rejected and leave the sheet
    /// exactly as it was.
    pub fn set_cell(&mut self, pos: Position, text: &str) -> Result<()> {
        Self::check_position(pos)?;

        let content = CellContent::prepare(pos, text, &*self).map_err(|err| {
            log::warn!("{}: rejected {:?}: {}", pos, text, err);
            SheetError::from_cell(pos, err)
        })?;

        if matches!(content, CellContent::Empty) {
            self.remove(pos);
            return Ok(());
        }

        let cell = self.cells.entry(pos).or_default();
        let old = cell.replace(content);
        self.dependents
            .replace_edges(pos, old.depends_on(), cell.referenced_cells());
        self.size.extend(pos);
        log::debug!("{}: set to {:?}", pos, text);

        self.invalidate_dependents(pos);
        Ok(())
    }

    /// Clear the specified cell. Clearing an empty position does nothing.
    pub fn clear_cell(&mut self, pos: Position) -> Result<()> {
        Self::check_position(pos)?;
        self.remove(pos);
        Ok(())
    }

    fn remove(&mut self, pos: Position) {
        let Some(old) = self.cells.remove(&pos) else {
            return;
        };
        self.dependents.replace_edges(pos, old.referenced_cells(), &[]);
        self.update_size();
        log::debug!("{}: cleared", pos);

        self.invalidate_dependents(pos);
    }
}
