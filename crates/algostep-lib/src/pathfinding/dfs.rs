use crate::grid::{Coord, Grid};

use super::{FrontierEntry, PathAlgorithm, PathfindingGenerator, PathfindingStep, SearchCore};

/// Depth-first search over a copy of `grid`.
///
/// Finds *a* path, not necessarily a shortest one.
pub fn dfs(grid: &Grid) -> DfsSteps {
    DfsSteps::new(grid)
}

/// Step generator for depth-first search.
///
/// A cell may sit on the stack more than once; later copies are skipped when
/// popped. The parent and depth of a cell are fixed at the moment it is
/// popped for the first time, from the entry that reached it.
#[derive(Debug, Clone)]
pub struct DfsSteps {
    core: SearchCore,
    /// `(cell, pushed_from)`; top of the stack is the last element.
    stack: Vec<(Coord, Option<Coord>)>,
}

impl DfsSteps {
    pub fn new(grid: &Grid) -> Self {
        let core = SearchCore::new(grid, PathAlgorithm::Dfs);
        let stack = core
            .endpoints
            .map(|(start, _)| (start, None))
            .into_iter()
            .collect();
        Self { core, stack }
    }

    fn pending(&self) -> Vec<FrontierEntry> {
        self.core.frontier(
            self.stack
                .iter()
                .rev()
                .map(|&(coord, _)| FrontierEntry { coord, cost: None }),
        )
    }
}

impl Iterator for DfsSteps {
    type Item = PathfindingStep;

    fn next(&mut self) -> Option<PathfindingStep> {
        if self.core.finished {
            return None;
        }
        let Some(end) = self.core.end() else {
            return Some(self.core.no_path());
        };

        while let Some((current, from)) = self.stack.pop() {
            self.core.operations += 1;
            if self.core.is_visited(current) {
                continue;
            }
            if let Some(from) = from {
                let depth = self.core.g_cost(from).saturating_add(1);
                if let Some(cell) = self.core.grid.cell_mut(current) {
                    cell.parent = Some(from);
                    cell.g_cost = Some(depth);
                }
            }
            self.core.visit(current);
            if current == end {
                let frontier = self.pending();
                return Some(self.core.found(end, frontier));
            }

            // Push in reverse so the first neighbour (up) is explored first.
            let neighbors = self.core.grid.neighbors(current);
            for &next in neighbors.iter().rev() {
                self.core.operations += 1;
                let Some(cell) = self.core.grid.cell_mut(next) else {
                    continue;
                };
                if cell.is_visited {
                    continue;
                }
                cell.is_frontier = true;
                self.stack.push((next, Some(current)));
            }

            let depth = self.core.g_cost(current);
            let frontier = self.pending();
            let operation = format!(
                "Popped {current} at depth {depth}; {} cells on the stack",
                frontier.len()
            );
            return Some(self.core.step(current, frontier, operation));
        }

        Some(self.core.no_path())
    }
}

impl PathfindingGenerator for DfsSteps {
    fn algorithm(&self) -> PathAlgorithm {
        PathAlgorithm::Dfs
    }
}
