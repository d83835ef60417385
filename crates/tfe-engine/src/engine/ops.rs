use log::trace;
use rand::Rng;

use super::state::{Board, Direction, Score, Status, Tile, Value};

/// Result of one collapse/merge pass. No spawn, no terminal evaluation;
/// `Session::apply_move` layers those on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShiftResult {
    /// True if any tile changed position or value.
    pub moved: bool,
    /// Sum of the doubled values produced by this pass's merges.
    pub points: Score,
}

/// Slide and merge every tile toward `direction`, in place.
///
/// Sources are visited starting from the side nearest the movement target
/// and proceeding away from it, so a tile settles before anything behind
/// it is resolved. A merge doubles the blocker, latches its merge flag for
/// the rest of the pass, and scores the doubled value. All merge latches
/// are dropped before returning.
pub fn shift(board: &mut Board, direction: Direction) -> ShiftResult {
    let mut result = ShiftResult::default();
    for (row, col) in scan_order(board.size(), direction) {
        let Some(tile) = board.get(row, col) else {
            continue;
        };
        let (dest_row, dest_col) = resolve_destination(board, row, col, direction, tile.value());
        if (dest_row, dest_col) == (row, col) {
            continue;
        }
        board.clear(row, col);
        match board.get(dest_row, dest_col) {
            None => board.set(dest_row, dest_col, tile),
            Some(blocker) => {
                // Destination resolution only ever lands on an empty cell
                // or an equal, unmerged blocker. Anything else means the
                // scan itself is broken: stop rather than corrupt the grid.
                assert!(
                    blocker.value() == tile.value() && !blocker.merged(),
                    "collapse pass sent ({row},{col}) onto an unmergeable tile at ({dest_row},{dest_col})"
                );
                let doubled = blocker.value() * 2;
                board.set(
                    dest_row,
                    dest_col,
                    Tile {
                        value: doubled,
                        merged: true,
                    },
                );
                result.points += doubled as Score;
            }
        }
        result.moved = true;
    }
    board.clear_merged();
    result
}

/// Source cells for one pass, ordered nearest-the-target-edge first.
///
/// One traversal shape serves all four directions: lines run across the
/// travel axis, and within each line the positions walk away from the
/// target edge. The cell already resting on that edge can never move and
/// is skipped.
fn scan_order(size: usize, direction: Direction) -> Vec<(usize, usize)> {
    let (row_step, col_step) = direction.step();
    let toward_zero = row_step < 0 || col_step < 0;
    let travel: Vec<usize> = if toward_zero {
        (1..size).collect()
    } else {
        (0..size - 1).rev().collect()
    };
    let mut order = Vec::with_capacity(size * (size - 1));
    for lane in 0..size {
        for &pos in &travel {
            order.push(if row_step != 0 { (pos, lane) } else { (lane, pos) });
        }
    }
    order
}

/// Where the tile at `(row, col)` comes to rest when travelling toward
/// `direction`.
///
/// Walks from the source toward the edge, skipping empty cells. The first
/// occupied cell is the blocker: an equal, unmerged blocker is the merge
/// target; any other blocker stops the tile on the cell just before it.
/// With no blocker the tile rests on the edge. Returns the source itself
/// when nothing between it and the edge lets it move.
fn resolve_destination(
    board: &Board,
    row: usize,
    col: usize,
    direction: Direction,
    value: Value,
) -> (usize, usize) {
    let (row_step, col_step) = direction.step();
    let size = board.size() as isize;
    let (mut row, mut col) = (row as isize, col as isize);
    let (mut dest_row, mut dest_col) = (row, col);
    loop {
        row += row_step;
        col += col_step;
        if row < 0 || col < 0 || row >= size || col >= size {
            break;
        }
        match board.get(row as usize, col as usize) {
            None => {
                dest_row = row;
                dest_col = col;
            }
            Some(blocker) => {
                if blocker.value() == value && !blocker.merged() {
                    dest_row = row;
                    dest_col = col;
                }
                break;
            }
        }
    }
    (dest_row as usize, dest_col as usize)
}

/// Drop one new tile on a uniformly random empty cell.
///
/// Rejection-samples `(row, col)` until the draw lands on an empty cell,
/// so the board must have at least one — callers guarantee that via the
/// terminal check. The face is 4 when an integer draw 1–100 falls within
/// `four_spawn_percent`, else 2. Returns the spawned value.
pub fn spawn_tile<R: Rng + ?Sized>(
    board: &mut Board,
    four_spawn_percent: u8,
    rng: &mut R,
) -> Value {
    assert!(!board.is_full(), "spawn_tile called on a full board");
    let size = board.size();
    let (row, col) = loop {
        let row = rng.gen_range(0..size);
        let col = rng.gen_range(0..size);
        if board.get(row, col).is_none() {
            break (row, col);
        }
    };
    let value: Value = if rng.gen_range(1..=100u32) <= u32::from(four_spawn_percent) {
        4
    } else {
        2
    };
    board.set(row, col, Tile::new(value));
    trace!("spawned {value} at ({row},{col})");
    value
}

/// Terminal state of a board: won at or above `winning_value`, lost when
/// full with no orthogonally-adjacent equal pair, ongoing otherwise.
///
/// The win check runs first, so a winning tile on a dead-locked board
/// still wins. Any empty cell rules out a loss before adjacency is even
/// considered.
pub fn evaluate_status(board: &Board, winning_value: Value) -> Status {
    if board.tiles().any(|(_, _, tile)| tile.value() >= winning_value) {
        return Status::Won;
    }
    if !board.is_full() {
        return Status::Ongoing;
    }
    if has_adjacent_equal_pair(board) {
        Status::Ongoing
    } else {
        Status::Lost
    }
}

/// True if any two orthogonal neighbours hold equal values. Checking each
/// cell against its right and down neighbours covers every pair once.
fn has_adjacent_equal_pair(board: &Board) -> bool {
    let size = board.size();
    for row in 0..size {
        for col in 0..size {
            let Some(tile) = board.get(row, col) else {
                continue;
            };
            if col + 1 < size
                && board
                    .get(row, col + 1)
                    .is_some_and(|right| right.value() == tile.value())
            {
                return true;
            }
            if row + 1 < size
                && board
                    .get(row + 1, col)
                    .is_some_and(|down| down.value() == tile.value())
            {
                return true;
            }
        }
    }
    false
}
