//! Prompt construction for the narrative model.

use zyro_grid::{Coordinate, MatchState, TurnRecord, Winner};

/// System prompt sent with every request.
pub const SYSTEM_PROMPT: &str = "\
You are a nihilistic, chaotic, and irreverent game narrator. Your purpose is to create absurd, unexpected narratives.
ONLY RESPOND WITH ONE JSON OBJECT IN THE FORMAT BELOW. DO NOT ADD ANY EXPLANATIONS OR COMMENTARY.

{
  \"playerAAction\": \"A detailed description of what Player A did\",
  \"playerBAction\": \"A detailed description of what Player B did in response\",
  \"outcome\": \"A description of what happened as a result\",
  \"winner\": \"A\" or \"B\" or \"Tie\"
}

Use the same language and style as the world setting description.
DO NOT INCLUDE ANY REASONING OR THOUGHTS ABOUT YOUR PROCESS. RETURN ONLY THE JSON OBJECT.";

/// Builds the user prompt describing the full match state and the contested cell.
pub fn build_prompt(state: &MatchState, at: Coordinate) -> String {
    let world = &state.world_setting;
    let rules = world.rules.as_deref().unwrap_or("No rules. Just chaos.");
    let scores = state.grid_state.compute_scores();

    format!(
        "You are narrating a pointless grid battle called ZYRO.

World Setting: {name}
{description}
Rules (mostly ignorable): {rules}

CURRENT GAME STATE
Turn #{turn}
Scores: Player A ({score_a}) vs Player B ({score_b})

THE GRID (A = Player A, B = Player B, . = unclaimed):
{grid}

Contested cell this turn: row {row}, column {col}

PREVIOUS TURNS ({count}):
{history}

YOUR JOB:
Generate this turn's actions and outcome. Keep them loosely tied to the world setting, but wildly exaggerated.

RESPOND ONLY WITH THIS JSON OBJECT AND NOTHING ELSE:
{{
  \"playerAAction\": \"What Player A did\",
  \"playerBAction\": \"What Player B did in response\",
  \"outcome\": \"What happened as a result\",
  \"winner\": \"A\" or \"B\" or \"Tie\"
}}

WINNER RULES:
1. \"winner\" MUST be EXACTLY \"A\", \"B\" or \"Tie\". Nothing else.
2. Most turns should have a clear winner: pick \"A\" or \"B\" about 85% of the time.
3. Only use \"Tie\" when the outcome is truly ambiguous.
4. Vary which player wins.

NO MARKDOWN. NO TEXT BEFORE OR AFTER THE JSON.",
        name = world.name,
        description = world.description,
        rules = rules,
        turn = state.current_turn.saturating_add(1),
        score_a = scores.a,
        score_b = scores.b,
        grid = state.grid_state.display(),
        row = at.row(),
        col = at.col(),
        count = state.turn_history.len(),
        history = render_history(&state.turn_history),
    )
}

/// Renders prior turns, one block per turn.
pub fn render_history(history: &[TurnRecord]) -> String {
    if history.is_empty() {
        return "No history yet.".to_string();
    }

    history
        .iter()
        .enumerate()
        .map(|(i, turn)| {
            let winner = match turn.winner() {
                Winner::Tie => "Nobody (tie)".to_string(),
                side => side.to_string(),
            };
            format!(
                "Turn {}:\nPlayer A: {}\nPlayer B: {}\nOutcome: {}\nWinner: {}\n",
                i + 1,
                turn.player_a_action(),
                turn.player_b_action(),
                turn.outcome(),
                winner
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
