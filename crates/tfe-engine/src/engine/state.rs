use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Tile face value (2, 4, 8, ...).
pub type Value = u32;
/// Cumulative and per-move score.
pub type Score = u64;

/// A direction to collapse/merge tiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All four directions, in a fixed order.
    pub fn all() -> [Direction; 4] {
        [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ]
    }

    /// Unit step toward the movement target, as `(row, col)` deltas.
    pub(crate) fn step(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

impl FromStr for Direction {
    type Err = EngineError;

    /// Accepts the full direction words and the w/a/s/d keys, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "w" => Ok(Direction::Up),
            "down" | "s" => Ok(Direction::Down),
            "left" | "a" => Ok(Direction::Left),
            "right" | "d" => Ok(Direction::Right),
            _ => Err(EngineError::UnknownDirection(s.to_string())),
        }
    }
}

/// One occupied cell: a power-of-two face value plus the move-scoped
/// merge latch.
///
/// `merged` is true for exactly one collapse pass after the tile was
/// produced by a merge; it blocks a second merge into the tile within the
/// same move and is cleared unconditionally before the pass returns, so
/// it is always false between moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tile {
    pub(crate) value: Value,
    pub(crate) merged: bool,
}

impl Tile {
    pub(crate) fn new(value: Value) -> Self {
        debug_assert!(value >= 2 && value.is_power_of_two());
        Tile {
            value,
            merged: false,
        }
    }

    /// The tile's face value.
    #[inline]
    pub fn value(&self) -> Value {
        self.value
    }

    /// True only between a merge and the end of the same move.
    #[inline]
    pub fn merged(&self) -> bool {
        self.merged
    }
}

/// Square grid of side N holding at most one tile per cell.
///
/// Cells are `Option<Tile>`: emptiness is `None`, never a zero value.
/// Coordinates are `(row, col)`, row increasing downward, col increasing
/// rightward, both zero-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    size: usize,
    cells: Vec<Option<Tile>>,
}

impl Board {
    /// An all-empty board of side `size`.
    pub fn empty(size: usize) -> Self {
        assert!(size >= 2, "board side must be at least 2");
        Board {
            size,
            cells: vec![None; size * size],
        }
    }

    /// Build a board from row-major face values, 0 meaning empty.
    ///
    /// Handy for drivers and tests; `values.len()` must be `size * size`.
    pub fn from_values(size: usize, values: &[Value]) -> Self {
        assert_eq!(values.len(), size * size, "expected size*size values");
        let mut board = Board::empty(size);
        for (idx, &value) in values.iter().enumerate() {
            if value != 0 {
                board.cells[idx] = Some(Tile::new(value));
            }
        }
        board
    }

    /// Row-major face values, 0 for empty cells. Inverse of `from_values`.
    pub fn values(&self) -> Vec<Value> {
        self.cells
            .iter()
            .map(|cell| cell.map_or(0, |tile| tile.value))
            .collect()
    }

    /// Board side length.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn idx(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.size && col < self.size);
        row * self.size + col
    }

    /// The tile at `(row, col)`, if any.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<Tile> {
        self.cells[self.idx(row, col)]
    }

    #[inline]
    pub(crate) fn set(&mut self, row: usize, col: usize, tile: Tile) {
        let idx = self.idx(row, col);
        self.cells[idx] = Some(tile);
    }

    /// Empty the cell at `(row, col)`.
    #[inline]
    pub(crate) fn clear(&mut self, row: usize, col: usize) {
        let idx = self.idx(row, col);
        self.cells[idx] = None;
    }

    /// Drop every merge latch. Runs at the end of each collapse pass.
    pub(crate) fn clear_merged(&mut self) {
        for cell in self.cells.iter_mut().flatten() {
            cell.merged = false;
        }
    }

    /// True when no cell is empty.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_some())
    }

    /// Count the empty cells.
    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_none()).count()
    }

    /// Highest face value on the board, 0 when empty.
    pub fn highest_tile(&self) -> Value {
        self.cells
            .iter()
            .flatten()
            .map(|tile| tile.value)
            .max()
            .unwrap_or(0)
    }

    /// Sum of all face values. Sliding and merging preserve this; only a
    /// spawn raises it.
    pub fn total_value(&self) -> u64 {
        self.cells
            .iter()
            .flatten()
            .map(|tile| tile.value as u64)
            .sum()
    }

    /// Iterate occupied cells as `(row, col, tile)` in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = (usize, usize, Tile)> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(idx, cell)| cell.map(|tile| (idx / size, idx % size, tile)))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let border: String = std::iter::repeat("+------")
            .take(self.size)
            .chain(std::iter::once("+"))
            .collect();
        writeln!(f, "{border}")?;
        for row in 0..self.size {
            write!(f, "|")?;
            for col in 0..self.size {
                match self.get(row, col) {
                    Some(tile) => write!(f, "{:^6}|", tile.value)?,
                    None => write!(f, "      |")?,
                }
            }
            writeln!(f)?;
            writeln!(f, "{border}")?;
        }
        Ok(())
    }
}

/// Post-move terminal state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Ongoing,
    Won,
    Lost,
}

impl Status {
    /// True for `Won` and `Lost`.
    #[inline]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Status::Ongoing)
    }
}

/// Everything a driver needs from one applied move: the settled board,
/// the points scored by this move's merges, whether anything actually
/// moved, and the post-move status.
#[derive(Debug, Clone, Serialize)]
pub struct MoveOutcome {
    pub board: Board,
    pub score_delta: Score,
    pub moved: bool,
    pub status: Status,
}
