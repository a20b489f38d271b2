//! Output formatting for run reports.
//!
//! Each command builds a serialisable report; [`OutputFormat`] turns it into
//! plain text, Markdown-flavoured rich text, or pretty JSON.

use std::fmt::Write;

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

use algostep_lib::{
    ChallengeOutcome, Grid, HeapStep, PathfindingStep, RenderMode, RunSummary, TreeRunSummary,
    TreeStep,
};

use crate::terminal::{star_gauge, supports_unicode, ColorPalette};

/// Presentation style selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with a colored grid.
    #[default]
    Text,
    /// Markdown-flavoured text.
    Rich,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    fn render_mode(self) -> RenderMode {
        match self {
            OutputFormat::Rich => RenderMode::Markdown,
            OutputFormat::Text | OutputFormat::Json => RenderMode::PlainText,
        }
    }

    pub fn render_path(self, report: &PathReport, palette: &ColorPalette) -> Result<String> {
        if self == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(report)?);
        }
        let mut buffer = String::new();
        for (index, step) in report.trace.iter().enumerate() {
            let _ = writeln!(buffer, "{:>4}: {}", index + 1, step.operation);
        }
        if !report.trace.is_empty() {
            buffer.push('\n');
        }
        buffer.push_str(&render_grid(&report.final_grid, palette));
        buffer.push('\n');
        buffer.push_str(&report.summary.render(self.render_mode()));
        Ok(buffer)
    }

    pub fn render_tree(self, report: &TreeReport) -> Result<String> {
        if self == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(report)?);
        }
        let mut buffer = String::new();
        let descriptions: Vec<&str> = match &report.trace {
            TreeSteps::Tree(steps) => steps.iter().map(|s| s.description.as_str()).collect(),
            TreeSteps::Heap(steps) => steps.iter().map(|s| s.description.as_str()).collect(),
        };
        for (index, description) in descriptions.iter().enumerate() {
            let _ = writeln!(buffer, "{:>4}: {description}", index + 1);
        }
        if !descriptions.is_empty() {
            buffer.push('\n');
        }
        buffer.push_str(&report.summary.render(self.render_mode()));
        Ok(buffer)
    }

    pub fn render_challenge(
        self,
        report: &ChallengeReport,
        palette: &ColorPalette,
    ) -> Result<String> {
        if self == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(report)?);
        }
        let outcome = &report.outcome;
        let mut buffer = String::new();
        let heading = match self {
            OutputFormat::Rich => format!("**{}**", report.title),
            _ => format!("{}{}{}", palette.white_bold, report.title, palette.reset),
        };
        let _ = writeln!(buffer, "{heading} ({})", outcome.challenge_id);
        buffer.push_str(&report.run.render(self.render_mode()));

        if outcome.completed {
            let _ = writeln!(buffer, "{}completed{}", palette.green, palette.reset);
        } else {
            let _ = writeln!(buffer, "{}not completed{}", palette.red, palette.reset);
        }
        for failure in &outcome.report.failures {
            let _ = writeln!(buffer, "  - {}{failure}{}", palette.red, palette.reset);
        }
        let _ = writeln!(
            buffer,
            "Stars: {}{}{} ({}/3)",
            palette.yellow,
            star_gauge(outcome.stars, 3, supports_unicode()),
            palette.reset,
            outcome.stars
        );
        Ok(buffer)
    }
}

/// Render a grid snapshot with per-glyph colors.
pub fn render_grid(grid: &Grid, palette: &ColorPalette) -> String {
    let mut buffer = String::new();
    for glyph in grid.render_ascii().chars() {
        let color = palette.for_glyph(glyph);
        if color.is_empty() {
            buffer.push(glyph);
        } else {
            let _ = write!(buffer, "{color}{glyph}{}", palette.reset);
        }
    }
    buffer
}

/// Everything the `path` command reports.
#[derive(Debug, Clone, Serialize)]
pub struct PathReport {
    #[serde(flatten)]
    pub summary: RunSummary,
    /// Final grid as ASCII rows.
    #[serde(skip)]
    pub final_grid: Grid,
    pub map: Vec<String>,
    /// Every step, when `--steps` was requested.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trace: Vec<PathfindingStep>,
}

impl PathReport {
    pub fn new(summary: RunSummary, final_grid: Grid, trace: Vec<PathfindingStep>) -> Self {
        let map = final_grid.render_ascii().lines().map(str::to_string).collect();
        Self {
            summary,
            final_grid,
            map,
            trace,
        }
    }
}

/// Recorded steps of a tree or heap run.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum TreeSteps {
    Tree(Vec<TreeStep>),
    Heap(Vec<HeapStep>),
}

impl TreeSteps {
    fn is_empty(&self) -> bool {
        match self {
            TreeSteps::Tree(steps) => steps.is_empty(),
            TreeSteps::Heap(steps) => steps.is_empty(),
        }
    }
}

/// Everything the `tree` command reports.
#[derive(Debug, Clone, Serialize)]
pub struct TreeReport {
    #[serde(flatten)]
    pub summary: TreeRunSummary,
    /// Every step, when `--steps` was requested.
    #[serde(skip_serializing_if = "TreeSteps::is_empty")]
    pub trace: TreeSteps,
}

/// Everything the `challenge` command reports.
#[derive(Debug, Clone, Serialize)]
pub struct ChallengeReport {
    pub title: String,
    pub outcome: ChallengeOutcome,
    pub run: RunSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use algostep_lib::{bfs, create_grid, Coord};

    fn report(with_steps: bool) -> PathReport {
        let grid = create_grid(1, 3, Coord::new(0, 0), Coord::new(0, 2), &[]);
        let steps: Vec<_> = bfs(&grid).collect();
        let last = steps.last().cloned().expect("terminal step");
        let summary = RunSummary::from_step(&last, steps.len());
        PathReport::new(summary, last.grid, if with_steps { steps } else { Vec::new() })
    }

    #[test]
    fn plain_grid_has_no_escape_codes() {
        let text = render_grid(&report(false).final_grid, &ColorPalette::plain());
        assert_eq!(text, "S*E\n");
    }

    #[test]
    fn colored_grid_wraps_glyphs() {
        let text = render_grid(&report(false).final_grid, &ColorPalette::colored());
        assert!(text.contains("\x1b["));
        assert!(text.contains('*'));
    }

    #[test]
    fn text_lists_steps_when_recorded() {
        let text = OutputFormat::Text
            .render_path(&report(true), &ColorPalette::plain())
            .unwrap();
        assert!(text.contains("   1: "));
        assert!(text.contains("bfs: path found"));
    }

    #[test]
    fn json_omits_steps_unless_requested() {
        let json = OutputFormat::Json
            .render_path(&report(false), &ColorPalette::plain())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["algorithm"], "bfs");
        assert_eq!(value["path_length"], 3);
        assert_eq!(value["map"][0], "S*E");
        assert_eq!(value["steps"], 3);
        assert!(value.get("trace").is_none());
    }
}
