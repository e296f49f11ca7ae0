//! Match snapshots.
//!
//! A [`MatchState`] is a value: operations take a snapshot and hand back a
//! new one. The caller driving the match owns it and serializes access.

use crate::board::Board;
use crate::record::TurnRecord;
use crate::types::Scores;
use crate::world::WorldSetting;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Lifecycle phase of a match. There is no way back from `Over`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum Phase {
    /// Turns can still be resolved.
    Active,
    /// The board filled up; no further turns.
    Over,
}

/// Complete state of one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchState {
    /// Theme the match is narrated in.
    pub world_setting: WorldSetting,
    /// Resolved turns, oldest first.
    #[serde(default)]
    pub turn_history: Vec<TurnRecord>,
    /// The board.
    pub grid_state: Board,
    /// Number of resolved turns. Saturates at `u32::MAX`.
    #[serde(default)]
    pub current_turn: u32,
    /// Owned cells per side, as last reported.
    #[serde(default)]
    pub scores: Scores,
    /// Terminal flag.
    #[serde(default)]
    pub is_game_over: bool,
}

impl MatchState {
    /// Starts a match on an empty board.
    #[instrument(fields(world = %world_setting.name))]
    pub fn new(world_setting: WorldSetting) -> Self {
        debug!("Creating new match");
        Self {
            world_setting,
            turn_history: Vec::new(),
            grid_state: Board::new(),
            current_turn: 0,
            scores: Scores::default(),
            is_game_over: false,
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        if self.is_game_over {
            Phase::Over
        } else {
            Phase::Active
        }
    }

    /// Returns a copy flagged as concluded.
    pub fn concluded(&self) -> MatchState {
        let mut next = self.clone();
        next.is_game_over = true;
        next
    }

    /// Applies a resolved turn, returning the next snapshot.
    ///
    /// Places the winner's mark, recomputes scores from the board, appends
    /// the record, bumps the turn counter and recomputes the terminal flag.
    #[instrument(skip(self, record), fields(turn = self.current_turn, winner = %record.winner()))]
    pub fn apply_turn(&self, record: TurnRecord) -> MatchState {
        let grid_state = self
            .grid_state
            .apply_winner(record.grid_position(), record.winner());
        let scores = grid_state.compute_scores();
        let is_game_over = grid_state.is_terminal();

        let mut turn_history = self.turn_history.clone();
        turn_history.push(record);

        debug!(a = scores.a, b = scores.b, is_game_over, "Turn applied");

        MatchState {
            world_setting: self.world_setting.clone(),
            turn_history,
            grid_state,
            current_turn: self.current_turn.saturating_add(1),
            scores,
            is_game_over,
        }
    }
}
