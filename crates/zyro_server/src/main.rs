//! Zyro - unified CLI
//!
//! Serves turn resolution over HTTP or plays a whole match in the terminal.

use anyhow::{Result, anyhow};
use chrono::Datelike;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;
use zyro_grid::{MatchState, Winner, WorldSetting};
use zyro_server::cli::{Cli, Command};
use zyro_server::{LlmClient, LlmGateway, NarratorConfig, ResolveError, TurnResolver};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,zyro_server=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { host, port, config } => run_server(host, port, config).await,
        Command::Play {
            config,
            seed,
            world,
        } => run_play(config, seed, world).await,
    }
}

/// Builds the narrative gateway from configuration and environment.
#[instrument]
fn build_gateway(config: Option<PathBuf>, seed: Option<u64>) -> Result<LlmGateway> {
    let config = NarratorConfig::load(config.as_deref())?;
    let client = config.llm_config().map(LlmClient::new);

    Ok(match seed {
        Some(seed) => LlmGateway::with_seed(client, seed),
        None => LlmGateway::new(client),
    })
}

/// Run the HTTP turn resolution server
async fn run_server(host: String, port: u16, config: Option<PathBuf>) -> Result<()> {
    info!(%host, port, "Starting Zyro server");

    let gateway = build_gateway(config, None)?;
    let resolver = Arc::new(TurnResolver::new(gateway));

    zyro_server::serve(host, port, resolver).await
}

/// Play one match to completion and print every turn
#[instrument]
async fn run_play(config: Option<PathBuf>, seed: Option<u64>, world: Option<String>) -> Result<()> {
    let world = match world {
        Some(name) => WorldSetting::named(&name).ok_or_else(|| {
            let known: Vec<String> = WorldSetting::catalog().into_iter().map(|w| w.name).collect();
            anyhow!("Unknown world {:?}; choose one of: {}", name, known.join(", "))
        })?,
        None => WorldSetting::for_day(chrono::Local::now().day()),
    };

    let gateway = build_gateway(config, seed)?;
    let resolver = match seed {
        Some(seed) => TurnResolver::with_seed(gateway, seed),
        None => TurnResolver::new(gateway),
    };

    println!("{}", world.name);
    println!("{}\n", world.description);

    let mut state = MatchState::new(world);
    loop {
        match resolver.resolve_turn(&state).await {
            Ok((record, next)) => {
                let claimed = match record.winner() {
                    Winner::Tie => "nobody".to_string(),
                    side => format!("Player {}", side),
                };
                println!("Turn {} at {}", next.current_turn, record.grid_position());
                println!("  A: {}", record.player_a_action());
                println!("  B: {}", record.player_b_action());
                println!("  => {} ({} claims it)", record.outcome(), claimed);
                state = next;
            }
            Err(ResolveError::MatchAlreadyOver) => break,
            Err(ResolveError::BoardFull(concluded)) => {
                state = *concluded;
                break;
            }
        }
    }

    println!("\n{}", state.grid_state.display());
    println!(
        "Final score after {} turns: A {} - B {}",
        state.current_turn, state.scores.a, state.scores.b
    );
    info!(turns = state.current_turn, "Match complete");
    Ok(())
}
