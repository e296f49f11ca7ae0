//! HTTP surface for turn resolution.

use crate::gateway::NarrativeGateway;
use crate::resolver::{ResolveError, TurnResolver};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use zyro_grid::{Board, MatchState, Scores, TurnRecord, WorldSetting};

/// Body returned by `POST /api/game/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTurnResponse {
    /// The turn just resolved.
    pub turn_result: TurnRecord,
    /// Board after the turn.
    pub new_grid_state: Board,
    /// Scores after the turn.
    pub new_scores: Scores,
    /// Terminal flag after the turn.
    pub is_game_over: bool,
}

impl From<(TurnRecord, MatchState)> for GenerateTurnResponse {
    fn from((turn_result, next): (TurnRecord, MatchState)) -> Self {
        Self {
            turn_result,
            new_grid_state: next.grid_state,
            new_scores: next.scores,
            is_game_over: next.is_game_over,
        }
    }
}

/// Body returned when a turn cannot be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRejection {
    /// Human-readable reason.
    pub error: String,
    /// Always true: both rejections mean the match is over.
    pub is_game_over: bool,
}

impl IntoResponse for ResolveError {
    fn into_response(self) -> Response {
        let body = ResolveRejection {
            error: self.to_string(),
            is_game_over: true,
        };
        (StatusCode::CONFLICT, Json(body)).into_response()
    }
}

/// Builds the application router.
pub fn router<G>(resolver: Arc<TurnResolver<G>>) -> Router
where
    G: NarrativeGateway + 'static,
{
    Router::new()
        .route("/api/game/generate", post(generate_turn::<G>))
        .route("/api/game/new", get(new_match))
        .route("/health", get(health))
        .with_state(resolver)
}

/// Binds `host:port` and serves until the process exits.
#[instrument(skip(resolver))]
pub async fn serve<G>(host: String, port: u16, resolver: Arc<TurnResolver<G>>) -> anyhow::Result<()>
where
    G: NarrativeGateway + 'static,
{
    let app = router(resolver);
    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    info!(addr = %listener.local_addr()?, "Server ready");

    axum::serve(listener, app).await?;
    Ok(())
}

#[instrument(skip_all)]
async fn generate_turn<G>(
    State(resolver): State<Arc<TurnResolver<G>>>,
    Json(state): Json<MatchState>,
) -> Result<Json<GenerateTurnResponse>, ResolveError>
where
    G: NarrativeGateway + 'static,
{
    info!(turn = state.current_turn, world = %state.world_setting.name, "Generate turn requested");
    match resolver.resolve_turn(&state).await {
        Ok(resolved) => Ok(Json(resolved.into())),
        Err(e) => {
            warn!(error = %e, "Turn rejected");
            Err(e)
        }
    }
}

#[instrument]
async fn new_match() -> Json<MatchState> {
    let day = chrono::Local::now().day();
    let world = WorldSetting::for_day(day);
    info!(day, world = %world.name, "Starting new match");
    Json(MatchState::new(world))
}

async fn health() -> &'static str {
    "ok"
}
