//! Zyro server - turn resolution for the grid battle.
//!
//! Wires the pure model from `zyro_grid` to a chat completion endpoint:
//!
//! - [`TurnResolver`] picks an open cell and applies the narrated result.
//! - [`LlmGateway`] asks the model once, under a hard timeout, and falls back
//!   to the [`FallbackNarrator`] on any failure.
//! - [`repair`] turns messy model output into a [`TurnOutcome`] or nothing.
//! - [`server`] exposes the resolver over HTTP.
//!
//! [`TurnOutcome`]: zyro_grid::TurnOutcome

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod envelope;
pub mod fallback;
pub mod gateway;
pub mod llm_client;
pub mod prompt;
pub mod repair;
pub mod resolver;
pub mod server;

pub use config::{ConfigError, NarratorConfig};
pub use envelope::{PayloadSource, extract_payload};
pub use fallback::FallbackNarrator;
pub use gateway::{GatewayFailure, LlmGateway, NarrativeGateway};
pub use llm_client::{LlmClient, LlmConfig, LlmError, LlmErrorKind};
pub use resolver::{ResolveError, TurnResolver};
pub use server::{GenerateTurnResponse, ResolveRejection, router, serve};
