//! Turn resolution: pick a cell, narrate it, apply the result.
//!
//! A resolver holds no match state. Each call takes a snapshot and returns a
//! new one, so resolutions for different matches may run concurrently. At
//! most one resolution per match may be in flight; the caller serializes.

use crate::gateway::NarrativeGateway;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::{Mutex, PoisonError};
use tracing::{info, instrument, warn};
use zyro_grid::{MatchState, Phase, TurnRecord};

/// Reasons a turn could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ResolveError {
    /// The match was already over when the request arrived.
    #[display("Match already concluded")]
    MatchAlreadyOver,
    /// No empty cell was left although the match was not flagged over.
    ///
    /// Carries the input snapshot with the terminal flag set.
    #[display("Board is full")]
    BoardFull(Box<MatchState>),
}

impl std::error::Error for ResolveError {}

/// Drives single turns of a match through a [`NarrativeGateway`].
#[derive(Debug)]
pub struct TurnResolver<G> {
    gateway: G,
    rng: Mutex<StdRng>,
}

impl<G: NarrativeGateway> TurnResolver<G> {
    /// Creates a resolver with an entropy-seeded random source.
    pub fn new(gateway: G) -> Self {
        Self::with_rng(gateway, StdRng::from_entropy())
    }

    /// Creates a resolver whose cell picks are reproducible.
    pub fn with_seed(gateway: G, seed: u64) -> Self {
        Self::with_rng(gateway, StdRng::seed_from_u64(seed))
    }

    /// Creates a resolver with the given random source.
    pub fn with_rng(gateway: G, rng: StdRng) -> Self {
        Self {
            gateway,
            rng: Mutex::new(rng),
        }
    }

    /// Returns the gateway.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Resolves the next turn.
    ///
    /// Returns the new record and the next snapshot. The input is untouched;
    /// on error nothing has been applied.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::MatchAlreadyOver`] if the match is over. The gateway
    ///   is not consulted.
    /// - [`ResolveError::BoardFull`] if no empty cell remains.
    #[instrument(skip(self, state), fields(turn = state.current_turn, phase = %state.phase()))]
    pub async fn resolve_turn(
        &self,
        state: &MatchState,
    ) -> Result<(TurnRecord, MatchState), ResolveError> {
        if state.phase() == Phase::Over {
            warn!("Resolve requested on a concluded match");
            return Err(ResolveError::MatchAlreadyOver);
        }

        let picked = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            state.grid_state.find_open_cell(&mut *rng)
        };
        let Some(at) = picked else {
            warn!("No open cell on an active match, concluding it");
            return Err(ResolveError::BoardFull(Box::new(state.concluded())));
        };
        info!(%at, "Contesting cell");

        let outcome = self.gateway.generate(state, at).await;
        let record = outcome.at(at);
        let next = state.apply_turn(record.clone());

        info!(
            winner = %record.winner(),
            score_a = next.scores.a,
            score_b = next.scores.b,
            is_game_over = next.is_game_over,
            "Turn resolved"
        );
        Ok((record, next))
    }
}
