//! Pathfinding step generators over a [`Grid`].
//!
//! This module provides:
//! - [`PathAlgorithm`] - Supported grid searches (BFS, DFS, Dijkstra, A*)
//! - [`PathfindingStep`] - One snapshot of search progress
//! - [`PathfindingGenerator`] - Iterator of steps that knows its algorithm
//! - [`select_generator`] - Strategy selection by algorithm identifier
//!
//! Every generator clones the grid it is given and owns its queue, stack or
//! open set, so separate runs never share state. A generator yields one step
//! per cell it expands and always finishes with exactly one terminal step
//! (`is_complete`), either with a path or without one.
//!
//! # Example
//!
//! ```
//! use algostep_lib::{create_grid, select_generator, Coord, PathAlgorithm};
//!
//! let grid = create_grid(3, 3, Coord::new(0, 0), Coord::new(2, 2), &[]);
//! let last = select_generator(PathAlgorithm::AStar, &grid).last().unwrap();
//! assert!(last.is_complete);
//! assert_eq!(last.path_length, 5);
//! ```

mod best_first;
mod bfs;
mod dfs;

pub use best_first::{a_star, dijkstra, BestFirstSteps};
pub use bfs::{bfs, BfsSteps};
pub use dfs::{dfs, DfsSteps};

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{suggest_names, Error, Result};
use crate::grid::{manhattan_distance, reconstruct_path, Coord, Grid};

/// Supported pathfinding algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathAlgorithm {
    /// Breadth-first search (FIFO queue).
    Bfs,
    /// Depth-first search (LIFO stack).
    Dfs,
    /// Dijkstra's algorithm (open set ordered by g).
    Dijkstra,
    /// A* search (open set ordered by f, then h).
    #[serde(rename = "a-star")]
    AStar,
}

impl PathAlgorithm {
    pub const ALL: [PathAlgorithm; 4] = [
        PathAlgorithm::Bfs,
        PathAlgorithm::Dfs,
        PathAlgorithm::Dijkstra,
        PathAlgorithm::AStar,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PathAlgorithm::Bfs => "bfs",
            PathAlgorithm::Dfs => "dfs",
            PathAlgorithm::Dijkstra => "dijkstra",
            PathAlgorithm::AStar => "a-star",
        }
    }

    /// Whether the algorithm guarantees a shortest path on unit-cost grids.
    pub fn is_optimal(self) -> bool {
        !matches!(self, PathAlgorithm::Dfs)
    }

    pub fn uses_heuristic(self) -> bool {
        matches!(self, PathAlgorithm::AStar)
    }
}

impl fmt::Display for PathAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PathAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bfs" | "breadth-first" => Ok(PathAlgorithm::Bfs),
            "dfs" | "depth-first" => Ok(PathAlgorithm::Dfs),
            "dijkstra" => Ok(PathAlgorithm::Dijkstra),
            "a-star" | "astar" | "a_star" | "a*" => Ok(PathAlgorithm::AStar),
            _ => {
                let names: Vec<&str> = Self::ALL.iter().map(|a| a.name()).collect();
                Err(Error::UnknownAlgorithm {
                    name: s.to_string(),
                    suggestions: suggest_names(s, &names, 3),
                })
            }
        }
    }
}

/// Where a run stands after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    Searching,
    Found,
    NoPath,
}

/// A pending open-set entry, with its ranking cost for priority searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrontierEntry {
    #[serde(flatten)]
    pub coord: Coord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<u32>,
}

/// One discrete event in a pathfinding run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathfindingStep {
    pub algorithm: PathAlgorithm,
    /// Grid snapshot; never changes after the step is yielded.
    pub grid: Grid,
    /// Cell expanded by this step; `None` on terminal steps.
    pub current: Option<Coord>,
    /// Open set in processing order, visited cells and duplicates removed.
    pub frontier: Vec<FrontierEntry>,
    /// Every cell expanded so far, in expansion order.
    pub visited: Vec<Coord>,
    /// Start-to-end path; only populated on the successful terminal step.
    pub path: Vec<Coord>,
    /// Learner-facing narration.
    pub operation: String,
    pub operations_count: usize,
    pub nodes_visited: usize,
    /// Number of cells on `path`.
    pub path_length: usize,
    pub outcome: StepOutcome,
    pub is_complete: bool,
}

impl PathfindingStep {
    pub fn found_path(&self) -> bool {
        self.outcome == StepOutcome::Found
    }
}

/// Iterator of pathfinding steps tagged with the algorithm that produces them.
pub trait PathfindingGenerator: Iterator<Item = PathfindingStep> {
    fn algorithm(&self) -> PathAlgorithm;
}

/// Select the generator for `algorithm`, running over a copy of `grid`.
pub fn select_generator(algorithm: PathAlgorithm, grid: &Grid) -> Box<dyn PathfindingGenerator> {
    match algorithm {
        PathAlgorithm::Bfs => Box::new(bfs(grid)),
        PathAlgorithm::Dfs => Box::new(dfs(grid)),
        PathAlgorithm::Dijkstra => Box::new(dijkstra(grid)),
        PathAlgorithm::AStar => Box::new(a_star(grid)),
    }
}

/// Bookkeeping shared by every grid search: the working grid, the visit
/// order, the operation counter and the terminal latch.
#[derive(Debug, Clone)]
struct SearchCore {
    algorithm: PathAlgorithm,
    grid: Grid,
    endpoints: Option<(Coord, Coord)>,
    visited: Vec<Coord>,
    operations: usize,
    finished: bool,
}

impl SearchCore {
    fn new(grid: &Grid, algorithm: PathAlgorithm) -> Self {
        let grid = grid.cleared();
        let endpoints = grid.start().zip(grid.end());
        tracing::debug!(
            %algorithm,
            rows = grid.rows(),
            cols = grid.cols(),
            has_endpoints = endpoints.is_some(),
            "starting pathfinding run"
        );
        let mut core = Self {
            algorithm,
            grid,
            endpoints,
            visited: Vec::new(),
            operations: 0,
            finished: false,
        };
        if let Some((start, end)) = endpoints {
            let heuristic = if algorithm.uses_heuristic() {
                manhattan_distance(start, end)
            } else {
                0
            };
            if let Some(cell) = core.grid.cell_mut(start) {
                cell.g_cost = Some(0);
                cell.h_cost = heuristic;
                cell.is_frontier = true;
            }
        }
        core
    }

    fn end(&self) -> Option<Coord> {
        self.endpoints.map(|(_, end)| end)
    }

    fn is_visited(&self, coord: Coord) -> bool {
        self.grid.cell(coord).map_or(true, |cell| cell.is_visited)
    }

    fn g_cost(&self, coord: Coord) -> u32 {
        self.grid
            .cell(coord)
            .and_then(|cell| cell.g_cost)
            .unwrap_or(u32::MAX)
    }

    fn visit(&mut self, coord: Coord) {
        if let Some(cell) = self.grid.cell_mut(coord) {
            cell.is_visited = true;
        }
        self.visited.push(coord);
        tracing::trace!(algorithm = %self.algorithm, %coord, "expanding cell");
    }

    /// Build a non-terminal step from the current working state.
    fn step(
        &self,
        current: Coord,
        frontier: Vec<FrontierEntry>,
        operation: String,
    ) -> PathfindingStep {
        PathfindingStep {
            algorithm: self.algorithm,
            grid: self.grid.clone(),
            current: Some(current),
            frontier,
            visited: self.visited.clone(),
            path: Vec::new(),
            operation,
            operations_count: self.operations,
            nodes_visited: self.visited.len(),
            path_length: 0,
            outcome: StepOutcome::Searching,
            is_complete: false,
        }
    }

    fn found(&mut self, end: Coord, frontier: Vec<FrontierEntry>) -> PathfindingStep {
        self.finished = true;
        let path = reconstruct_path(&self.grid, end);
        for &coord in &path {
            if let Some(cell) = self.grid.cell_mut(coord) {
                cell.is_path = true;
            }
        }
        let cost = self.g_cost(end);
        tracing::debug!(
            algorithm = %self.algorithm,
            nodes_visited = self.visited.len(),
            path_length = path.len(),
            "path found"
        );
        PathfindingStep {
            algorithm: self.algorithm,
            grid: self.grid.clone(),
            current: None,
            frontier,
            visited: self.visited.clone(),
            operation: format!(
                "Reached the goal at {end}: path of {} cells (cost {cost}) after visiting {} cells",
                path.len(),
                self.visited.len()
            ),
            operations_count: self.operations,
            nodes_visited: self.visited.len(),
            path_length: path.len(),
            path,
            outcome: StepOutcome::Found,
            is_complete: true,
        }
    }

    fn no_path(&mut self) -> PathfindingStep {
        self.finished = true;
        let operation = if self.endpoints.is_none() {
            "No path: the grid has no start or end cell".to_string()
        } else {
            format!(
                "No path exists: the frontier is empty after visiting {} cells",
                self.visited.len()
            )
        };
        tracing::debug!(
            algorithm = %self.algorithm,
            nodes_visited = self.visited.len(),
            "no path found"
        );
        PathfindingStep {
            algorithm: self.algorithm,
            grid: self.grid.clone(),
            current: None,
            frontier: Vec::new(),
            visited: self.visited.clone(),
            path: Vec::new(),
            operation,
            operations_count: self.operations,
            nodes_visited: self.visited.len(),
            path_length: 0,
            outcome: StepOutcome::NoPath,
            is_complete: true,
        }
    }

    /// Frontier view of pending entries: skip expanded cells and keep only
    /// the first entry per cell.
    fn frontier<I>(&self, pending: I) -> Vec<FrontierEntry>
    where
        I: IntoIterator<Item = FrontierEntry>,
    {
        let mut seen = HashSet::new();
        pending
            .into_iter()
            .filter(|entry| !self.is_visited(entry.coord) && seen.insert(entry.coord))
            .collect()
    }
}
