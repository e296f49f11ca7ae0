//! Zyro grid - the pure model behind the grid battle game.
//!
//! Two sides fight over a 10x10 board one cell at a time. Each turn picks
//! an empty cell at random, someone narrates who took it, and the winner's
//! mark goes on the board. A tie leaves the cell empty. The match ends when
//! every cell is owned.
//!
//! Everything here is synchronous and free of I/O. Randomness comes in
//! through an explicit `&mut impl Rng`.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod error;
mod record;
mod state;
mod types;
mod world;

pub use board::Board;
pub use error::GridError;
pub use record::{TurnOutcome, TurnRecord};
pub use state::{MatchState, Phase};
pub use types::{Coordinate, GRID_SIZE, Scores, Side, TOTAL_CELLS, Winner};
pub use world::WorldSetting;
