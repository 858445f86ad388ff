//! Circular dependency detection for formula cells.
//!
//! When a formula is entered, we must verify it doesn't create a cycle
//! (e.g., A1 references B1, B1 references C1, C1 references A1) before it
//! is committed. The search is an iterative depth-first traversal with an
//! explicit stack, so deep dependency chains cannot overflow the call stack.

use std::collections::HashSet;

use super::{CellLookup, Position};

/// Detect whether giving `root` the dependencies `root_deps` would close a cycle.
///
/// Every other cell contributes its committed dependencies from `cells`;
/// positions without a cell are leaves. Returns the cycle as a path that
/// starts and ends at the same position, or None if the graph stays acyclic.
pub fn detect_cycle<'a, L: CellLookup + ?Sized>(
    root: Position,
    root_deps: &'a [Position],
    cells: &'a L,
) -> Option<Vec<Position>> {
    let mut on_stack: HashSet<Position> = HashSet::from([root]);
    let mut visited: HashSet<Position> = HashSet::new();
    // (node, its dependencies, index of the next dependency to explore)
    let mut stack: Vec<(Position, &'a [Position], usize)> = vec![(root, root_deps, 0)];

    while let Some((node, deps, next)) = stack.last_mut() {
        if *next == deps.len() {
            let node = *node;
            stack.pop();
            on_stack.remove(&node);
            continue;
        }
        let dep = deps[*next];
        *next += 1;

        if on_stack.contains(&dep) {
            let start = stack.iter().position(|(p, _, _)| *p == dep).unwrap_or(0);
            let mut path: Vec<Position> = stack[start..].iter().map(|(p, _, _)| *p).collect();
            path.push(dep);
            log::debug!("cycle detected: {}", format_cycle(&path));
            return Some(path);
        }
        if !visited.insert(dep) {
            continue;
        }

        let dep_deps = cells.get_cell(dep).map(|c| c.referenced_cells()).unwrap_or(&[]);
        if !dep_deps.is_empty() {
            on_stack.insert(dep);
            stack.push((dep, dep_deps, 0));
        }
    }

    None
}

/// Render a cycle path as `A1 -> B1 -> A1`.
pub fn format_cycle(path: &[Position]) -> String {
    path.iter()
        .map(Position::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}
