use std::fmt::Write;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::grid::Coord;
use crate::pathfinding::{PathAlgorithm, PathfindingStep, StepOutcome};
use crate::tree_steps::{HeapStep, TreeAlgorithm, TreeStep};

/// Presentation style for turning a summary into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    PlainText,
    Markdown,
}

/// Aggregate counters of a finished pathfinding run, as consumed by the
/// challenge checker and progress tracking.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RunSummary {
    pub algorithm: PathAlgorithm,
    pub outcome: StepOutcome,
    pub found: bool,
    pub steps: usize,
    pub nodes_visited: usize,
    pub path_length: usize,
    pub operations_count: usize,
    pub path: Vec<Coord>,
}

impl RunSummary {
    /// Summarise a run from its terminal step and the number of steps it took.
    pub fn from_step(step: &PathfindingStep, steps: usize) -> Self {
        Self {
            algorithm: step.algorithm,
            outcome: step.outcome,
            found: step.found_path(),
            steps,
            nodes_visited: step.nodes_visited,
            path_length: step.path_length,
            operations_count: step.operations_count,
            path: step.path.clone(),
        }
    }

    /// Drain `steps` and summarise the last one.
    pub fn from_run<I>(steps: I) -> Result<Self>
    where
        I: IntoIterator<Item = PathfindingStep>,
    {
        let mut count = 0usize;
        let mut last = None;
        for step in steps {
            count += 1;
            last = Some(step);
        }
        let last = last.ok_or(Error::EmptyRun)?;
        Ok(Self::from_step(&last, count))
    }

    pub fn render(&self, mode: RenderMode) -> String {
        match mode {
            RenderMode::PlainText => self.render_plain(),
            RenderMode::Markdown => self.render_markdown(),
        }
    }

    fn joined_path(&self) -> String {
        self.path
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    fn render_plain(&self) -> String {
        let mut buffer = String::new();
        let verdict = if self.found { "path found" } else { "no path" };
        let _ = writeln!(
            buffer,
            "{}: {verdict} ({} cells, {} visited, {} operations, {} steps)",
            self.algorithm, self.path_length, self.nodes_visited, self.operations_count, self.steps
        );
        if self.found {
            let _ = writeln!(buffer, "{}", self.joined_path());
        }
        buffer
    }

    fn render_markdown(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(buffer, "**{}**", self.algorithm);
        let _ = writeln!(buffer);
        let _ = writeln!(buffer, "| metric | value |");
        let _ = writeln!(buffer, "|---|---|");
        let _ = writeln!(buffer, "| found | {} |", self.found);
        let _ = writeln!(buffer, "| path length | {} |", self.path_length);
        let _ = writeln!(buffer, "| nodes visited | {} |", self.nodes_visited);
        let _ = writeln!(buffer, "| operations | {} |", self.operations_count);
        let _ = writeln!(buffer, "| steps | {} |", self.steps);
        if self.found {
            let _ = writeln!(buffer);
            let _ = writeln!(buffer, "`{}`", self.joined_path());
        }
        buffer
    }
}

/// Aggregate view of a finished tree or heap run.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TreeRunSummary {
    pub algorithm: TreeAlgorithm,
    pub steps: usize,
    pub comparisons: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swaps: Option<usize>,
    /// Traversal output, BST contents in order, or the final heap array.
    pub values: Vec<i64>,
    pub description: String,
}

impl TreeRunSummary {
    pub fn from_tree_step(algorithm: TreeAlgorithm, step: &TreeStep, steps: usize) -> Self {
        Self {
            algorithm,
            steps,
            comparisons: step.comparisons,
            swaps: None,
            values: step.output.clone(),
            description: step.description.clone(),
        }
    }

    pub fn from_heap_step(algorithm: TreeAlgorithm, step: &HeapStep, steps: usize) -> Self {
        Self {
            algorithm,
            steps,
            comparisons: step.comparisons,
            swaps: Some(step.swaps),
            values: step.array.clone(),
            description: step.description.clone(),
        }
    }

    pub fn render(&self, mode: RenderMode) -> String {
        let values = self
            .values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let swaps = self
            .swaps
            .map(|swaps| format!(", {swaps} swaps"))
            .unwrap_or_default();
        let mut buffer = String::new();
        match mode {
            RenderMode::PlainText => {
                let _ = writeln!(
                    buffer,
                    "{}: {} steps, {} comparisons{swaps}",
                    self.algorithm, self.steps, self.comparisons
                );
                let _ = writeln!(buffer, "[{values}]");
            }
            RenderMode::Markdown => {
                let _ = writeln!(
                    buffer,
                    "**{}** ({} steps, {} comparisons{swaps})",
                    self.algorithm, self.steps, self.comparisons
                );
                let _ = writeln!(buffer);
                let _ = writeln!(buffer, "`[{values}]`");
            }
        }
        buffer
    }
}
