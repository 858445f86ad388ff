//! Reverse dependency index.
//!
//! Cells store the positions they read; this index answers the inverse
//! question ("who reads this position?") so a change can clear every cache
//! computed from the old content.
//!
//! Edges are keyed by position, not by cell, so a formula that reads an
//! empty position is still found when that position is filled in later.

use std::collections::{BTreeSet, HashMap, HashSet};

use super::Position;

/// For each position, the formula cells whose formulas read it.
#[derive(Default, Debug, Clone)]
pub struct Dependents {
    readers: HashMap<Position, BTreeSet<Position>>,
}

impl Dependents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cells whose formulas read `pos` directly, in row-major order.
    pub fn direct(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        self.readers.get(&pos).into_iter().flat_map(|s| s.iter().copied())
    }

    /// Swap the edges of `cell` from `old` dependencies to `new` ones.
    pub fn replace_edges(&mut self, cell: Position, old: &[Position], new: &[Position]) {
        for dep in old {
            if let Some(readers) = self.readers.get_mut(dep) {
                readers.remove(&cell);
                if readers.is_empty() {
                    self.readers.remove(dep);
                }
            }
        }
        for dep in new {
            self.readers.entry(*dep).or_default().insert(cell);
        }
    }

    /// Visit the cells that read `changed`, directly or through other formulas.
    ///
    /// Each dependent is passed to `visit` once even when the graph
    /// reconverges. The walk continues past a dependent only when `visit`
    /// returns `true`.
    pub fn walk_transitive(&self, changed: Position, mut visit: impl FnMut(Position) -> bool) {
        let mut to_process = vec![changed];
        let mut visited = HashSet::from([changed]);
        while let Some(pos) = to_process.pop() {
            for reader in self.direct(pos) {
                if visited.insert(reader) && visit(reader) {
                    to_process.push(reader);
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.readers.is_empty()
    }
}
