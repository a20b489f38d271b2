//! Challenge command handler: run a search against a challenge file and
//! report the constraint check and star rating.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use algostep_lib::{evaluate_run, load_challenge, Grid, PathAlgorithm};

use crate::commands::path::run_search;
use crate::commands::GridArgs;
use crate::output::{ChallengeReport, OutputFormat};
use crate::terminal::ColorPalette;

/// Arguments for the challenge command.
#[derive(Args, Debug, Clone)]
pub struct ChallengeArgs {
    /// Challenge definition (JSON).
    #[arg(long)]
    pub file: PathBuf,

    /// Search algorithm to attempt the challenge with.
    #[arg(long)]
    pub algorithm: PathAlgorithm,

    /// Grid to run on; defaults to the map embedded in the challenge.
    #[command(flatten)]
    pub grid: GridArgs,
}

/// Load the challenge, run the search and evaluate the result.
pub fn run_challenge(args: &ChallengeArgs) -> Result<ChallengeReport> {
    let challenge = load_challenge(&args.file)
        .with_context(|| format!("failed to load challenge {}", args.file.display()))?;

    let grid: Grid = if !args.grid.is_empty() {
        args.grid.load()?
    } else {
        match challenge.grid() {
            Some(grid) => grid.with_context(|| {
                format!("challenge '{}' embeds an invalid map", challenge.id)
            })?,
            None => bail!(
                "challenge '{}' has no map; pass --map or --rows/--cols/--start/--end",
                challenge.id
            ),
        }
    };

    let (run, _, _) = run_search(args.algorithm, &grid, false)?;
    let outcome = evaluate_run(&challenge, &run);
    tracing::info!(
        challenge = %challenge.id,
        algorithm = %args.algorithm,
        completed = outcome.completed,
        stars = outcome.stars,
        "challenge evaluated"
    );
    Ok(ChallengeReport {
        title: challenge.title,
        outcome,
        run,
    })
}

/// Handle the challenge subcommand.
pub fn handle_challenge(args: &ChallengeArgs, format: OutputFormat) -> Result<()> {
    let report = run_challenge(args)?;
    print!(
        "{}",
        format.render_challenge(&report, &ColorPalette::detect())?
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const CHALLENGE: &str = r#"{
        "id": "short-hop",
        "title": "Short hop",
        "constraints": [
            { "type": "max_path_length", "limit": 3 }
        ],
        "optimal_path_length": 3,
        "optimal_nodes": 3
    }"#;

    fn write_challenge(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("challenge.json");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn challenge_without_map_needs_grid_args() {
        let dir = tempfile::tempdir().unwrap();
        let args = ChallengeArgs {
            file: write_challenge(&dir, CHALLENGE),
            algorithm: PathAlgorithm::Bfs,
            grid: GridArgs::default(),
        };
        let error = run_challenge(&args).expect_err("no map anywhere");
        assert!(error.to_string().contains("has no map"));
    }

    #[test]
    fn explicit_grid_overrides_missing_map() {
        let dir = tempfile::tempdir().unwrap();
        let map = dir.path().join("map.txt");
        fs::write(&map, "S.E\n").unwrap();
        let args = ChallengeArgs {
            file: write_challenge(&dir, CHALLENGE),
            algorithm: PathAlgorithm::Bfs,
            grid: GridArgs {
                map: Some(map),
                ..GridArgs::default()
            },
        };
        let report = run_challenge(&args).unwrap();
        assert!(report.outcome.completed);
        assert_eq!(report.outcome.stars, 3);
        assert_eq!(report.title, "Short hop");
    }
}
