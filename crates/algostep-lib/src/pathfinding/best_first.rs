use crate::grid::{manhattan_distance, Coord, Grid};

use super::{FrontierEntry, PathAlgorithm, PathfindingGenerator, PathfindingStep, SearchCore};

/// Dijkstra's algorithm over a copy of `grid`, every move costing 1.
pub fn dijkstra(grid: &Grid) -> BestFirstSteps {
    BestFirstSteps::new(grid, PathAlgorithm::Dijkstra)
}

/// A* over a copy of `grid`, guided by Manhattan distance to the end cell.
pub fn a_star(grid: &Grid) -> BestFirstSteps {
    BestFirstSteps::new(grid, PathAlgorithm::AStar)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenEntry {
    coord: Coord,
    g: u32,
    h: u32,
}

impl OpenEntry {
    fn f(&self) -> u32 {
        self.g.saturating_add(self.h)
    }
}

/// Step generator shared by Dijkstra and A*.
///
/// The open set is a plain vector re-sorted before every pop. A better route
/// to a queued cell pushes a second entry instead of updating the first;
/// entries for cells that have already been expanded are discarded when they
/// surface. The sort is stable, so equal keys pop in insertion order.
#[derive(Debug, Clone)]
pub struct BestFirstSteps {
    core: SearchCore,
    open: Vec<OpenEntry>,
}

impl BestFirstSteps {
    fn new(grid: &Grid, algorithm: PathAlgorithm) -> Self {
        debug_assert!(matches!(
            algorithm,
            PathAlgorithm::Dijkstra | PathAlgorithm::AStar
        ));
        let core = SearchCore::new(grid, algorithm);
        let open = core
            .endpoints
            .and_then(|(start, _)| core.grid.cell(start))
            .map(|cell| OpenEntry {
                coord: cell.coord(),
                g: 0,
                h: cell.h_cost,
            })
            .into_iter()
            .collect();
        Self { core, open }
    }

    fn sort_open(&mut self) {
        match self.core.algorithm {
            PathAlgorithm::AStar => self.open.sort_by_key(|entry| (entry.f(), entry.h)),
            _ => self.open.sort_by_key(|entry| entry.g),
        }
    }

    fn pending(&self) -> Vec<FrontierEntry> {
        let heuristic = self.core.algorithm.uses_heuristic();
        self.core.frontier(self.open.iter().map(|entry| FrontierEntry {
            coord: entry.coord,
            cost: Some(if heuristic { entry.f() } else { entry.g }),
        }))
    }
}

impl Iterator for BestFirstSteps {
    type Item = PathfindingStep;

    fn next(&mut self) -> Option<PathfindingStep> {
        if self.core.finished {
            return None;
        }
        let Some(end) = self.core.end() else {
            return Some(self.core.no_path());
        };
        let heuristic = self.core.algorithm.uses_heuristic();

        while !self.open.is_empty() {
            self.sort_open();
            let entry = self.open.remove(0);
            self.core.operations += 1;
            if self.core.is_visited(entry.coord) {
                continue;
            }
            let current = entry.coord;
            self.core.visit(current);
            if current == end {
                let frontier = self.pending();
                return Some(self.core.found(end, frontier));
            }

            let g = self.core.g_cost(current);
            let mut relaxed = 0usize;
            for next in self.core.grid.neighbors(current) {
                self.core.operations += 1;
                let Some(cell) = self.core.grid.cell_mut(next) else {
                    continue;
                };
                if cell.is_visited {
                    continue;
                }
                let tentative = g.saturating_add(1);
                if tentative >= cell.g_cost.unwrap_or(u32::MAX) {
                    continue;
                }
                if cell.g_cost.is_none() && heuristic {
                    cell.h_cost = manhattan_distance(next, end);
                }
                cell.g_cost = Some(tentative);
                cell.parent = Some(current);
                cell.is_frontier = true;
                relaxed += 1;
                self.open.push(OpenEntry {
                    coord: next,
                    g: tentative,
                    h: cell.h_cost,
                });
            }
            self.sort_open();

            let frontier = self.pending();
            let operation = if heuristic {
                format!(
                    "Expanded {current} with g={g}, h={}, f={}; relaxed {relaxed} neighbours",
                    entry.h,
                    entry.f()
                )
            } else {
                format!("Expanded {current} at distance {g}; relaxed {relaxed} neighbours")
            };
            return Some(self.core.step(current, frontier, operation));
        }

        Some(self.core.no_path())
    }
}

impl PathfindingGenerator for BestFirstSteps {
    fn algorithm(&self) -> PathAlgorithm {
        self.core.algorithm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::create_grid;

    #[test]
    fn dijkstra_frontier_is_sorted_by_distance() {
        let grid = create_grid(4, 4, Coord::new(0, 0), Coord::new(3, 3), &[]);
        for step in dijkstra(&grid) {
            let costs: Vec<u32> = step.frontier.iter().filter_map(|entry| entry.cost).collect();
            assert!(costs.windows(2).all(|pair| pair[0] <= pair[1]));
        }
    }

    #[test]
    fn a_star_heads_straight_for_the_goal_on_open_ground() {
        let grid = create_grid(1, 6, Coord::new(0, 0), Coord::new(0, 5), &[]);
        let steps: Vec<_> = a_star(&grid).collect();
        let last = steps.last().expect("terminal");

        assert!(last.found_path());
        assert_eq!(last.nodes_visited, 6);
        assert_eq!(steps.len(), 6);
        assert_eq!(last.path_length, 6);
    }

    #[test]
    fn a_star_records_heuristic_on_reached_cells() {
        let grid = create_grid(3, 3, Coord::new(0, 0), Coord::new(2, 2), &[]);
        let first = a_star(&grid).next().expect("first step");
        let right = first.grid.cell(Coord::new(0, 1)).unwrap();
        assert_eq!(right.g_cost, Some(1));
        assert_eq!(right.h_cost, 3);
        assert_eq!(right.f_cost(), Some(4));
        assert!(first.frontier.iter().all(|entry| entry.cost == Some(4)));
    }

    fn coords(pairs: &[(usize, usize)]) -> Vec<Coord> {
        pairs.iter().map(|&(row, col)| Coord::new(row, col)).collect()
    }

    fn operation_counts(steps: &[PathfindingStep]) -> Vec<usize> {
        steps.iter().map(|step| step.operations_count).collect()
    }

    #[test]
    fn a_star_breaks_f_ties_by_smaller_h() {
        // (0,1) and (1,1) both have f = 2; the goal has h = 0 and wins.
        let grid = Grid::parse("S..\n.E.").expect("map");
        let steps: Vec<_> = a_star(&grid).collect();
        let last = steps.last().expect("terminal");

        assert_eq!(last.visited, coords(&[(0, 0), (1, 0), (1, 1)]));
        assert_eq!(operation_counts(&steps), vec![3, 6, 7]);
        assert_eq!(last.current, None);
    }

    #[test]
    fn dijkstra_pops_equal_distances_in_insertion_order() {
        // Down is pushed before right, so (1,0) leaves the open set first.
        let grid = Grid::parse("S..\n.E.").expect("map");
        let steps: Vec<_> = dijkstra(&grid).collect();
        let last = steps.last().expect("terminal");

        assert_eq!(last.visited, coords(&[(0, 0), (1, 0), (0, 1), (1, 1)]));
        assert_eq!(operation_counts(&steps), vec![3, 6, 10, 11]);
    }

    #[test]
    fn a_star_expansion_order_around_walls() {
        let grid = Grid::parse("S....\n.###.\n.....\n.#.#.\n....E").expect("map");
        let steps: Vec<_> = a_star(&grid).collect();
        let last = steps.last().expect("terminal");

        assert_eq!(
            last.visited,
            coords(&[
                (0, 0),
                (1, 0),
                (2, 0),
                (3, 0),
                (4, 0),
                (4, 1),
                (4, 2),
                (4, 3),
                (4, 4)
            ])
        );
        assert_eq!(operation_counts(&steps), vec![3, 6, 10, 13, 16, 19, 23, 26, 27]);
        assert_eq!(last.path_length, 9);

        let baseline = dijkstra(&grid).last().expect("terminal");
        assert_eq!(baseline.nodes_visited, 20);
        assert_eq!(baseline.operations_count, 62);
        assert_eq!(baseline.path_length, last.path_length);
    }

    #[test]
    fn a_star_improves_queued_cells_and_skips_stale_entries() {
        // (0,2) is first queued from (1,2) with g = 4, then improved to g = 2
        // from (0,1); the leftover g = 4 entry is popped and discarded later.
        let grid = Grid::parse("S...\n....\n..#.\n.#E.").expect("map");
        let steps: Vec<_> = a_star(&grid).collect();
        let last = steps.last().expect("terminal");

        assert_eq!(
            last.visited,
            coords(&[
                (0, 0),
                (1, 0),
                (2, 0),
                (3, 0),
                (2, 1),
                (1, 1),
                (1, 2),
                (0, 1),
                (0, 2),
                (1, 3),
                (2, 3),
                (3, 3),
                (3, 2)
            ])
        );
        assert_eq!(
            operation_counts(&steps),
            vec![3, 7, 11, 13, 16, 21, 25, 29, 33, 38, 41, 44, 45]
        );

        let improved = &steps[7];
        assert_eq!(improved.current, Some(Coord::new(0, 1)));
        let cell = improved.grid.cell(Coord::new(0, 2)).unwrap();
        assert_eq!(cell.g_cost, Some(2));
        assert_eq!(cell.parent, Some(Coord::new(0, 1)));
        let queued = improved
            .frontier
            .iter()
            .filter(|entry| entry.coord == Coord::new(0, 2))
            .count();
        assert_eq!(queued, 1, "frontier lists each cell once");

        // 13 expansions plus one stale pop; no step is yielded for the stale pop.
        assert_eq!(steps.len(), 13);
    }

    #[test]
    fn dijkstra_does_not_use_heuristic() {
        let grid = create_grid(3, 3, Coord::new(0, 0), Coord::new(2, 2), &[]);
        let last = dijkstra(&grid).last().expect("terminal");
        assert!(last.grid.cells().iter().all(|cell| cell.h_cost == 0));
        assert_eq!(last.path_length, 5);
    }
}
