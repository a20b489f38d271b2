use std::collections::VecDeque;

use crate::grid::{Coord, Grid};

use super::{FrontierEntry, PathAlgorithm, PathfindingGenerator, PathfindingStep, SearchCore};

/// Breadth-first search over a copy of `grid`.
///
/// Cells are expanded in non-decreasing depth order, so the first time the
/// end cell is dequeued its parent chain is a shortest path by edge count.
pub fn bfs(grid: &Grid) -> BfsSteps {
    BfsSteps::new(grid)
}

/// Step generator for breadth-first search.
#[derive(Debug, Clone)]
pub struct BfsSteps {
    core: SearchCore,
    queue: VecDeque<Coord>,
}

impl BfsSteps {
    pub fn new(grid: &Grid) -> Self {
        let core = SearchCore::new(grid, PathAlgorithm::Bfs);
        let queue = core.endpoints.map(|(start, _)| start).into_iter().collect();
        Self { core, queue }
    }

    fn pending(&self) -> Vec<FrontierEntry> {
        self.core.frontier(self.queue.iter().map(|&coord| FrontierEntry { coord, cost: None }))
    }
}

impl Iterator for BfsSteps {
    type Item = PathfindingStep;

    fn next(&mut self) -> Option<PathfindingStep> {
        if self.core.finished {
            return None;
        }
        let Some(end) = self.core.end() else {
            return Some(self.core.no_path());
        };

        while let Some(current) = self.queue.pop_front() {
            self.core.operations += 1;
            if self.core.is_visited(current) {
                continue;
            }
            self.core.visit(current);
            if current == end {
                let frontier = self.pending();
                return Some(self.core.found(end, frontier));
            }

            let depth = self.core.g_cost(current);
            for next in self.core.grid.neighbors(current) {
                self.core.operations += 1;
                let Some(cell) = self.core.grid.cell_mut(next) else {
                    continue;
                };
                if cell.is_visited || cell.is_frontier {
                    continue;
                }
                cell.is_frontier = true;
                cell.g_cost = Some(depth + 1);
                cell.parent = Some(current);
                self.queue.push_back(next);
            }

            let frontier = self.pending();
            let operation = format!(
                "Dequeued {current} at depth {depth}; {} cells waiting in the queue",
                frontier.len()
            );
            return Some(self.core.step(current, frontier, operation));
        }

        Some(self.core.no_path())
    }
}

impl PathfindingGenerator for BfsSteps {
    fn algorithm(&self) -> PathAlgorithm {
        PathAlgorithm::Bfs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::create_grid;

    #[test]
    fn single_cell_grid_yields_one_terminal_step() {
        let grid = create_grid(1, 1, Coord::new(0, 0), Coord::new(0, 0), &[]);
        let steps: Vec<_> = bfs(&grid).collect();

        assert_eq!(steps.len(), 1);
        let last = &steps[0];
        assert!(last.is_complete);
        assert_eq!(last.path, vec![Coord::new(0, 0)]);
        assert_eq!(last.path_length, 1);
    }

    #[test]
    fn frontier_tracks_queue_in_fifo_order() {
        let grid = create_grid(3, 3, Coord::new(1, 1), Coord::new(0, 0), &[]);
        let first = bfs(&grid).next().expect("first step");

        assert_eq!(first.current, Some(Coord::new(1, 1)));
        let frontier: Vec<Coord> = first.frontier.iter().map(|entry| entry.coord).collect();
        assert_eq!(
            frontier,
            vec![
                Coord::new(0, 1),
                Coord::new(2, 1),
                Coord::new(1, 0),
                Coord::new(1, 2)
            ]
        );
        assert!(first.frontier.iter().all(|entry| entry.cost.is_none()));
        assert_eq!(first.visited, vec![Coord::new(1, 1)]);
    }

    #[test]
    fn finds_shortest_corridor_path() {
        let grid = Grid::parse("S.#.\n..#.\n...E").expect("map");
        let last = bfs(&grid).last().expect("terminal");

        assert!(last.found_path());
        assert_eq!(last.path.first(), Some(&Coord::new(0, 0)));
        assert_eq!(last.path.last(), Some(&Coord::new(2, 3)));
        assert_eq!(last.path_length, 6);
        assert!(last.path.iter().all(|&c| last.grid.cell(c).unwrap().is_path));
    }

    #[test]
    fn operations_count_pops_and_neighbour_checks() {
        let grid = Grid::parse("S.E").expect("map");
        let counts: Vec<usize> = bfs(&grid).map(|step| step.operations_count).collect();
        // Pop S + 1 neighbour; pop the middle + 2 neighbours; pop E.
        assert_eq!(counts, vec![2, 5, 6]);
    }

    #[test]
    fn exhausted_generator_stays_exhausted() {
        let grid = create_grid(1, 2, Coord::new(0, 0), Coord::new(0, 1), &[]);
        let mut steps = bfs(&grid);
        while steps.next().is_some() {}
        assert!(steps.next().is_none());
    }
}
