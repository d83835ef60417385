//! tfe-engine: the rule engine of a sliding-tile merge puzzle.
//!
//! This crate provides:
//! - A `Board` grid of optional tiles with ergonomic accessors
//! - The directional collapse/merge pass (`engine::shift`), tile spawning
//!   and terminal detection as free functions over a board
//! - A `Session` state machine owning one game: board, cumulative score,
//!   win/lose status, and the RNG feeding spawns
//! - A `Rules` configuration type loadable from TOML
//!
//! Quick start:
//! ```
//! use tfe_engine::{Direction, Rules, Session, Status};
//!
//! // Deterministic game via a fixed seed
//! let mut session = Session::with_seed(Rules::default(), 42);
//! assert_eq!(session.status(), Status::Ongoing);
//!
//! let outcome = session.apply_move(Direction::Left);
//! assert_eq!(outcome.status, session.status());
//! assert_eq!(session.score(), outcome.score_delta);
//! ```
//!
//! The engine performs no I/O and owns no presentation state: a driver
//! feeds it `Direction` values and reads back `MoveOutcome` snapshots.
//! Prefer `Session::with_seed` when you need reproducibility.

pub mod config;
pub mod engine;
pub mod error;

pub use config::Rules;
pub use engine::{Board, Direction, MoveOutcome, Score, Session, Status, Tile, Value};
pub use error::EngineError;
