//! Evaluation adapters.
//!
//! Evaluation is best effort: [`EvalService::evaluate`] never fails, it
//! degrades to [`Evaluation::Unavailable`] and logs the cause.

pub mod lichess;
pub mod stockfish;

use std::sync::Arc;

use pgn_core::Evaluation;
use shakmaty::{fen::Fen, Chess, EnPassantMode, Position};
use tracing::warn;

use crate::config::{Config, EvalBackendKind};

#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("Position not in cloud database")]
    NotInCloud,

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Evaluation timed out")]
    Timeout,
}

pub enum Evaluator {
    Disabled,
    Lichess(lichess::LichessClient),
    Stockfish(stockfish::LocalEngine),
}

/// Shared handle to the configured evaluator.
#[derive(Clone)]
pub struct EvalService {
    backend: Arc<Evaluator>,
}

impl EvalService {
    pub fn new(backend: Evaluator) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    pub fn disabled() -> Self {
        Self::new(Evaluator::Disabled)
    }

    pub fn from_config(config: &Config) -> Self {
        let backend = match config.eval_backend {
            EvalBackendKind::None => Evaluator::Disabled,
            EvalBackendKind::Lichess => {
                match lichess::LichessClient::new(&config.lichess_api_url, config.eval_timeout()) {
                    Ok(client) => Evaluator::Lichess(client),
                    Err(e) => {
                        warn!("Failed to build Lichess client, evaluation disabled: {e}");
                        Evaluator::Disabled
                    }
                }
            }
            EvalBackendKind::Stockfish => Evaluator::Stockfish(stockfish::LocalEngine::new(
                &config.stockfish_path,
                config.engine_nodes,
                config.eval_timeout(),
            )),
        };
        Self::new(backend)
    }

    pub fn backend_name(&self) -> &'static str {
        match *self.backend {
            Evaluator::Disabled => "none",
            Evaluator::Lichess(_) => "lichess",
            Evaluator::Stockfish(_) => "stockfish",
        }
    }

    /// Evaluate `position`. Game-over positions are scored locally.
    pub async fn evaluate(&self, position: &Chess) -> Evaluation {
        if let Some(eval) = Evaluation::for_terminal(position) {
            return eval;
        }

        let fen = Fen::from_position(position, EnPassantMode::Legal).to_string();
        let result = match &*self.backend {
            Evaluator::Disabled => return Evaluation::Unavailable,
            Evaluator::Lichess(client) => client.cloud_eval(&fen).await,
            Evaluator::Stockfish(engine) => engine.evaluate(&fen, position.turn()).await,
        };

        match result {
            Ok(eval) => eval,
            Err(EvalError::NotInCloud) => {
                tracing::debug!(%fen, "No cloud evaluation");
                Evaluation::Unavailable
            }
            Err(e) => {
                warn!(backend = self.backend_name(), %fen, "Evaluation unavailable: {e}");
                Evaluation::Unavailable
            }
        }
    }

    pub async fn shutdown(&self) {
        if let Evaluator::Stockfish(engine) = &*self.backend {
            engine.shutdown().await;
        }
    }
}
