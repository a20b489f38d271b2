use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Diagonal movement is modelled but switched off; every generator moves in
/// four directions with unit cost, which keeps Manhattan distance admissible.
pub const ALLOW_DIAGONAL: bool = false;

/// Row/column address of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl FromStr for Coord {
    type Err = Error;

    /// Parse `row,col`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidValues {
            message: format!("expected ROW,COL but got '{s}'"),
        };
        let (row, col) = s.split_once(',').ok_or_else(invalid)?;
        let row = row.trim().parse().map_err(|_| invalid())?;
        let col = col.trim().parse().map_err(|_| invalid())?;
        Ok(Self { row, col })
    }
}

/// One cell of a traversal grid.
///
/// The structural flags (`is_obstacle`, `is_start`, `is_end`) are fixed when
/// the grid is built. The search flags only ever move from `false` to `true`
/// during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridCell {
    pub row: usize,
    pub col: usize,
    pub is_obstacle: bool,
    pub is_start: bool,
    pub is_end: bool,
    pub is_visited: bool,
    pub is_path: bool,
    pub is_frontier: bool,
    /// Distance from the start; `None` until the cell is reached.
    pub g_cost: Option<u32>,
    /// Heuristic estimate to the end cell, 0 for uninformed searches.
    pub h_cost: u32,
    /// Predecessor on the best known path.
    pub parent: Option<Coord>,
}

impl GridCell {
    fn new(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            is_obstacle: false,
            is_start: false,
            is_end: false,
            is_visited: false,
            is_path: false,
            is_frontier: false,
            g_cost: None,
            h_cost: 0,
            parent: None,
        }
    }

    pub fn coord(&self) -> Coord {
        Coord::new(self.row, self.col)
    }

    /// `g + h`, or `None` while the cell is unreached.
    pub fn f_cost(&self) -> Option<u32> {
        self.g_cost.map(|g| g.saturating_add(self.h_cost))
    }

    fn clear_search_state(&mut self) {
        self.is_visited = false;
        self.is_path = false;
        self.is_frontier = false;
        self.g_cost = None;
        self.h_cost = 0;
        self.parent = None;
    }
}

/// Rectangular traversal surface.
///
/// Cells live behind an `Arc` so that handing a snapshot to a step is cheap;
/// the first mutation after a snapshot copies the cells, leaving every
/// previously captured snapshot untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    start: Option<Coord>,
    end: Option<Coord>,
    cells: Arc<Vec<GridCell>>,
}

/// Build a `rows` x `cols` grid.
///
/// Obstacles on the start or end cell and coordinates outside the grid are
/// ignored. A start or end outside the grid leaves that endpoint unset, which
/// every generator reports as "no path".
pub fn create_grid(
    rows: usize,
    cols: usize,
    start: Coord,
    end: Coord,
    obstacles: &[Coord],
) -> Grid {
    let mut cells = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            cells.push(GridCell::new(row, col));
        }
    }

    let mut grid = Grid {
        rows,
        cols,
        start: None,
        end: None,
        cells: Arc::new(cells),
    };

    for &obstacle in obstacles {
        if let Some(cell) = grid.cell_mut(obstacle) {
            cell.is_obstacle = true;
        }
    }
    if let Some(cell) = grid.cell_mut(start) {
        cell.is_start = true;
        cell.is_obstacle = false;
        grid.start = Some(start);
    }
    if let Some(cell) = grid.cell_mut(end) {
        cell.is_end = true;
        cell.is_obstacle = false;
        grid.end = Some(end);
    }

    grid
}

impl Grid {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn start(&self) -> Option<Coord> {
        self.start
    }

    pub fn end(&self) -> Option<Coord> {
        self.end
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.row < self.rows && coord.col < self.cols
    }

    pub fn cell(&self, coord: Coord) -> Option<&GridCell> {
        if self.in_bounds(coord) {
            self.cells.get(coord.row * self.cols + coord.col)
        } else {
            None
        }
    }

    pub(crate) fn cell_mut(&mut self, coord: Coord) -> Option<&mut GridCell> {
        if self.in_bounds(coord) {
            let cols = self.cols;
            Arc::make_mut(&mut self.cells).get_mut(coord.row * cols + coord.col)
        } else {
            None
        }
    }

    /// Copy of this grid with every search field back at its identity value.
    pub fn cleared(&self) -> Grid {
        let mut grid = self.clone();
        if grid.cells.iter().any(|cell| {
            cell.is_visited || cell.is_path || cell.is_frontier || cell.g_cost.is_some()
        }) {
            Arc::make_mut(&mut grid.cells)
                .iter_mut()
                .for_each(GridCell::clear_search_state);
        }
        grid
    }

    /// Walkable cells adjacent to `coord`, in up, down, left, right order
    /// (diagonals follow when [`ALLOW_DIAGONAL`] is set).
    pub fn neighbors(&self, coord: Coord) -> Vec<Coord> {
        const DIRECTIONS: [(isize, isize); 8] = [
            (-1, 0),
            (1, 0),
            (0, -1),
            (0, 1),
            (-1, -1),
            (-1, 1),
            (1, -1),
            (1, 1),
        ];
        let count = if ALLOW_DIAGONAL { 8 } else { 4 };

        DIRECTIONS[..count]
            .iter()
            .filter_map(|&(dr, dc)| {
                let row = coord.row.checked_add_signed(dr)?;
                let col = coord.col.checked_add_signed(dc)?;
                let next = Coord::new(row, col);
                self.cell(next)
                    .filter(|cell| !cell.is_obstacle)
                    .map(|_| next)
            })
            .collect()
    }

    /// Parse an ASCII map: `S` start, `E` end, `#` obstacle, `.` open floor.
    ///
    /// Blank lines are skipped; every remaining row must have the same width.
    pub fn parse(map: &str) -> Result<Grid> {
        let mut rows: Vec<&str> = Vec::new();
        let mut line_numbers = Vec::new();
        for (index, line) in map.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            rows.push(line);
            line_numbers.push(index + 1);
        }

        let cols = rows.first().map(|row| row.chars().count()).unwrap_or(0);
        let mut start = None;
        let mut end = None;
        let mut obstacles = Vec::new();

        for (row_index, (row, &line)) in rows.iter().zip(&line_numbers).enumerate() {
            let width = row.chars().count();
            if width != cols {
                return Err(Error::InvalidMap {
                    line,
                    message: format!("expected {cols} columns but found {width}"),
                });
            }
            for (col_index, glyph) in row.chars().enumerate() {
                let coord = Coord::new(row_index, col_index);
                match glyph {
                    '.' => {}
                    '#' => obstacles.push(coord),
                    'S' if start.is_none() => start = Some(coord),
                    'E' if end.is_none() => end = Some(coord),
                    'S' | 'E' => {
                        return Err(Error::InvalidMap {
                            line,
                            message: format!("duplicate '{glyph}' marker"),
                        })
                    }
                    other => {
                        return Err(Error::InvalidMap {
                            line,
                            message: format!("unexpected character '{other}'"),
                        })
                    }
                }
            }
        }

        let start = start.ok_or(Error::MissingEndpoint { kind: "start" })?;
        let end = end.ok_or(Error::MissingEndpoint { kind: "end" })?;
        Ok(create_grid(rows.len(), cols, start, end, &obstacles))
    }

    /// Render the grid, including search state, one text line per row.
    ///
    /// Glyphs: `#` obstacle, `S`/`E` endpoints, `*` path, `o` visited,
    /// `+` frontier, `.` untouched floor.
    pub fn render_ascii(&self) -> String {
        let mut out = String::with_capacity(self.rows * (self.cols + 1));
        for row in self.cells.chunks(self.cols.max(1)) {
            for cell in row {
                out.push(cell_glyph(cell));
            }
            out.push('\n');
        }
        out
    }
}

impl FromStr for Grid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Grid::parse(s)
    }
}

pub(crate) fn cell_glyph(cell: &GridCell) -> char {
    if cell.is_obstacle {
        '#'
    } else if cell.is_start {
        'S'
    } else if cell.is_end {
        'E'
    } else if cell.is_path {
        '*'
    } else if cell.is_visited {
        'o'
    } else if cell.is_frontier {
        '+'
    } else {
        '.'
    }
}

/// Grid distance between two cells; admissible for 4-directional unit moves.
pub fn manhattan_distance(a: Coord, b: Coord) -> u32 {
    (a.row.abs_diff(b.row) + a.col.abs_diff(b.col)) as u32
}

/// Walk parent links back from `end` and return the path start-first.
///
/// A generator that honours its own invariants always produces an unbroken,
/// acyclic chain; a broken one is a bug and yields whatever could be walked.
pub fn reconstruct_path(grid: &Grid, end: Coord) -> Vec<Coord> {
    let mut path = vec![end];
    let mut current = end;
    let limit = grid.rows * grid.cols;
    while let Some(parent) = grid.cell(current).and_then(|cell| cell.parent) {
        if path.len() > limit {
            debug_assert!(false, "parent chain from {end} contains a cycle");
            break;
        }
        path.push(parent);
        current = parent;
    }
    debug_assert!(
        grid.cell(current).map_or(false, |cell| cell.is_start),
        "parent chain from {end} does not reach the start cell"
    );
    path.reverse();
    path
}
