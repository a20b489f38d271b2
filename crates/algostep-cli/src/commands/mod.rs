// Command handlers, one module per subcommand.
//
// main.rs parses arguments and dispatches here; handlers build a report and
// print it in the requested format.

pub mod challenge;
pub mod path;
pub mod tree;

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use algostep_lib::{create_grid, Coord, Error as LibError, Grid};

/// Where a grid comes from: an ASCII map file or explicit dimensions.
#[derive(Args, Debug, Clone, Default)]
pub struct GridArgs {
    /// ASCII map file (`S` start, `E` end, `#` wall, `.` floor).
    #[arg(long, conflicts_with_all = ["rows", "cols", "start", "end", "walls"])]
    pub map: Option<PathBuf>,
    /// Grid height.
    #[arg(long)]
    pub rows: Option<usize>,
    /// Grid width.
    #[arg(long)]
    pub cols: Option<usize>,
    /// Start cell as ROW,COL.
    #[arg(long)]
    pub start: Option<Coord>,
    /// End cell as ROW,COL.
    #[arg(long)]
    pub end: Option<Coord>,
    /// Wall cell as ROW,COL; repeat for more walls.
    #[arg(long = "wall", value_name = "ROW,COL")]
    pub walls: Vec<Coord>,
}

impl GridArgs {
    /// Whether any grid source was given at all.
    pub fn is_empty(&self) -> bool {
        self.map.is_none()
            && self.rows.is_none()
            && self.cols.is_none()
            && self.start.is_none()
            && self.end.is_none()
            && self.walls.is_empty()
    }

    /// Build the grid described by these arguments.
    pub fn load(&self) -> Result<Grid> {
        if let Some(path) = &self.map {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read map from {}", path.display()))?;
            let grid = Grid::parse(&text)
                .with_context(|| format!("failed to parse map {}", path.display()))?;
            tracing::debug!(
                path = %path.display(),
                rows = grid.rows(),
                cols = grid.cols(),
                "loaded map"
            );
            return Ok(grid);
        }

        let (Some(rows), Some(cols), Some(start), Some(end)) =
            (self.rows, self.cols, self.start, self.end)
        else {
            bail!("either --map or all of --rows, --cols, --start and --end are required");
        };
        if rows == 0 || cols == 0 {
            bail!("grid dimensions must be positive, got {rows}x{cols}");
        }
        for cell in [start, end] {
            if cell.row >= rows || cell.col >= cols {
                return Err(LibError::CellOutOfBounds {
                    row: cell.row,
                    col: cell.col,
                    rows,
                    cols,
                }
                .into());
            }
        }
        Ok(create_grid(rows, cols, start, end, &self.walls))
    }
}
