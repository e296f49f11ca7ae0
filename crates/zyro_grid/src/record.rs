//! Turn outcomes and the immutable per-turn history entries.

use crate::types::{Coordinate, Winner};
use serde::{Deserialize, Serialize};

/// A validated narrative result for one contested cell.
///
/// Produced either by the narrative gateway or by the fallback narrator;
/// every field is guaranteed non-empty by whoever constructs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnOutcome {
    /// What side A did.
    pub player_a_action: String,
    /// What side B did in response.
    pub player_b_action: String,
    /// What happened as a result.
    pub outcome: String,
    /// Who took the cell.
    pub winner: Winner,
}

impl TurnOutcome {
    /// Creates a turn outcome.
    pub fn new(
        player_a_action: impl Into<String>,
        player_b_action: impl Into<String>,
        outcome: impl Into<String>,
        winner: Winner,
    ) -> Self {
        Self {
            player_a_action: player_a_action.into(),
            player_b_action: player_b_action.into(),
            outcome: outcome.into(),
            winner,
        }
    }

    /// Binds this outcome to the cell it was fought over.
    pub fn at(self, grid_position: Coordinate) -> TurnRecord {
        TurnRecord {
            player_a_action: self.player_a_action,
            player_b_action: self.player_b_action,
            outcome: self.outcome,
            winner: self.winner,
            grid_position,
        }
    }
}

/// One resolved turn. Appended to the history once and never changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnRecord {
    player_a_action: String,
    player_b_action: String,
    outcome: String,
    winner: Winner,
    grid_position: Coordinate,
}

impl TurnRecord {
    /// What side A did.
    pub fn player_a_action(&self) -> &str {
        &self.player_a_action
    }

    /// What side B did.
    pub fn player_b_action(&self) -> &str {
        &self.player_b_action
    }

    /// What happened.
    pub fn outcome(&self) -> &str {
        &self.outcome
    }

    /// Who took the cell.
    pub fn winner(&self) -> Winner {
        self.winner
    }

    /// The contested cell.
    pub fn grid_position(&self) -> Coordinate {
        self.grid_position
    }
}
