//! Narrative generation gateway.
//!
//! [`NarrativeGateway::generate`] never fails. [`LlmGateway`] tries the model
//! once and maps every [`GatewayFailure`] to the [`FallbackNarrator`] in a
//! single place.

use crate::envelope::extract_payload;
use crate::fallback::FallbackNarrator;
use crate::llm_client::{LlmClient, LlmError, LlmErrorKind};
use crate::prompt::{SYSTEM_PROMPT, build_prompt};
use crate::repair;
use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info, instrument, warn};
use zyro_grid::{Coordinate, MatchState, TurnOutcome};

/// Source of narrated turn outcomes.
#[async_trait]
pub trait NarrativeGateway: Send + Sync {
    /// Narrates the fight over `at`. Must always return a valid outcome.
    async fn generate(&self, state: &MatchState, at: Coordinate) -> TurnOutcome;
}

/// Why the model path could not produce an outcome.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum GatewayFailure {
    /// No API key configured.
    #[display("No API credential configured")]
    MissingCredential,
    /// The upstream call exceeded its time budget.
    #[display("Upstream call timed out")]
    Timeout,
    /// Connection or transfer failure.
    #[display("Upstream unreachable: {}", _0)]
    Network(String),
    /// The upstream answered with a non-success status.
    #[display("Upstream returned status {}", _0)]
    Status(u16),
    /// The response envelope held no usable payload.
    #[display("Unusable response envelope: {}", _0)]
    Envelope(String),
    /// The payload did not survive validation and repair.
    #[display("Model output failed validation")]
    MalformedOutput,
}

impl std::error::Error for GatewayFailure {}

impl From<LlmError> for GatewayFailure {
    fn from(err: LlmError) -> Self {
        match err.kind {
            LlmErrorKind::Timeout => GatewayFailure::Timeout,
            LlmErrorKind::Network => GatewayFailure::Network(err.message),
            LlmErrorKind::Status(code) => GatewayFailure::Status(code),
            LlmErrorKind::Envelope => GatewayFailure::Envelope(err.message),
        }
    }
}

/// Gateway backed by a chat completion model, with offline fallback.
#[derive(Debug)]
pub struct LlmGateway {
    client: Option<LlmClient>,
    narrator: FallbackNarrator,
    rng: Mutex<StdRng>,
}

impl LlmGateway {
    /// Creates a gateway. `None` means every turn is narrated offline.
    #[instrument(skip(client), fields(has_client = client.is_some()))]
    pub fn new(client: Option<LlmClient>) -> Self {
        Self::with_rng(client, StdRng::from_entropy())
    }

    /// Creates a gateway whose fallback draws are reproducible.
    pub fn with_seed(client: Option<LlmClient>, seed: u64) -> Self {
        Self::with_rng(client, StdRng::seed_from_u64(seed))
    }

    fn with_rng(client: Option<LlmClient>, rng: StdRng) -> Self {
        if client.is_none() {
            info!("No LLM client configured, narrating offline");
        }
        Self {
            client,
            narrator: FallbackNarrator::new(),
            rng: Mutex::new(rng),
        }
    }

    /// One attempt at a model-generated outcome.
    #[instrument(skip(self, state, at), fields(turn = state.current_turn, %at))]
    pub async fn try_generate(
        &self,
        state: &MatchState,
        at: Coordinate,
    ) -> Result<TurnOutcome, GatewayFailure> {
        let client = self.client.as_ref().ok_or(GatewayFailure::MissingCredential)?;

        let prompt = build_prompt(state, at);
        debug!(prompt_len = prompt.len(), "Built narrative prompt");

        let message = client.complete(SYSTEM_PROMPT, &prompt).await?;

        let (source, text) = extract_payload(&message)
            .ok_or_else(|| GatewayFailure::Envelope("Empty message payload".to_string()))?;

        let outcome = repair::validate(&text).ok_or(GatewayFailure::MalformedOutput)?;
        info!(%source, winner = %outcome.winner, "Model outcome accepted");
        Ok(outcome)
    }

    /// Offline outcome for the cell.
    pub fn fallback(&self, state: &MatchState, at: Coordinate) -> TurnOutcome {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        self.narrator.narrate(
            &state.world_setting,
            &state.turn_history,
            &state.grid_state,
            at,
            &mut *rng,
        )
    }
}

#[async_trait]
impl NarrativeGateway for LlmGateway {
    #[instrument(skip(self, state, at), fields(turn = state.current_turn, %at))]
    async fn generate(&self, state: &MatchState, at: Coordinate) -> TurnOutcome {
        match self.try_generate(state, at).await {
            Ok(outcome) => outcome,
            Err(failure) => {
                warn!(reason = %failure, "Narrating turn with fallback");
                self.fallback(state, at)
            }
        }
    }
}
