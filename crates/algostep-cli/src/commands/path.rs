//! Path command handler: run a grid search and report its steps.

use anyhow::{Context, Result};
use clap::Args;

use algostep_lib::{select_generator, Grid, PathAlgorithm, PathfindingStep, RunSummary};

use crate::commands::GridArgs;
use crate::output::{OutputFormat, PathReport};
use crate::terminal::ColorPalette;

/// Arguments for the path command.
#[derive(Args, Debug, Clone)]
pub struct PathArgs {
    /// Search algorithm: bfs, dfs, dijkstra or a-star.
    #[arg(long, default_value = "a-star")]
    pub algorithm: PathAlgorithm,

    #[command(flatten)]
    pub grid: GridArgs,

    /// Print every step instead of only the final state.
    #[arg(long)]
    pub steps: bool,
}

/// Run `algorithm` over `grid`, keeping every step only when `keep_steps`.
pub fn run_search(
    algorithm: PathAlgorithm,
    grid: &Grid,
    keep_steps: bool,
) -> Result<(RunSummary, PathfindingStep, Vec<PathfindingStep>)> {
    let mut kept = Vec::new();
    let mut count = 0usize;
    let mut last = None;
    for step in select_generator(algorithm, grid) {
        count += 1;
        if keep_steps {
            kept.push(step.clone());
        }
        last = Some(step);
    }
    let last = last.context("search produced no steps")?;
    Ok((RunSummary::from_step(&last, count), last, kept))
}

/// Handle the path subcommand.
pub fn handle_path(args: &PathArgs, format: OutputFormat) -> Result<()> {
    let grid = args.grid.load()?;
    let (summary, last, steps) = run_search(args.algorithm, &grid, args.steps)?;
    tracing::info!(
        algorithm = %args.algorithm,
        found = summary.found,
        steps = summary.steps,
        "search finished"
    );

    let report = PathReport::new(summary, last.grid, steps);
    print!("{}", format.render_path(&report, &ColorPalette::detect())?);
    Ok(())
}
