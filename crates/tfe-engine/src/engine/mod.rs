//! Engine module: grid board model, directional collapse/merge pass, and
//! the session state machine. Public API stays small and ergonomic.
//!
//! - `Board` is the N×N grid of optional tiles with useful methods.
//! - Free functions in `ops` cover the hot paths (shift, spawn, status).
//! - `Session` owns one game: board, cumulative score, status, RNG.

mod ops;
mod session;
pub mod state;

pub use session::Session;
pub use state::{Board, Direction, MoveOutcome, Score, Status, Tile, Value};

pub use ops::{evaluate_status, shift, spawn_tile, ShiftResult};
