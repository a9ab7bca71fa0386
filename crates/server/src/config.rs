use std::env;
use std::time::Duration;

use pgn_core::BackRollback;

/// Which evaluation adapter serves `/eval`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EvalBackendKind {
    None,
    Lichess,
    Stockfish,
}

impl EvalBackendKind {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" | "off" | "" => Some(Self::None),
            "lichess" | "cloud" => Some(Self::Lichess),
            "stockfish" | "engine" => Some(Self::Stockfish),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub eval_backend: EvalBackendKind,
    pub lichess_api_url: String,
    pub stockfish_path: String,
    pub engine_nodes: u32,
    pub eval_timeout_ms: u64,
    pub max_upload_bytes: usize,
    pub session_ttl_secs: u64,
    pub back_rollback: BackRollback,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            eval_backend: EvalBackendKind::None,
            lichess_api_url: "https://lichess.org".to_string(),
            stockfish_path: "/usr/local/bin/stockfish".to_string(),
            engine_nodes: 100_000,
            eval_timeout_ms: 5_000,
            max_upload_bytes: 10 * 1024 * 1024,
            session_ttl_secs: 3_600, // 1 hour
            back_rollback: BackRollback::ToEnd,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            eval_backend: env::var("EVAL_BACKEND")
                .ok()
                .and_then(|v| EvalBackendKind::parse(&v))
                .unwrap_or(defaults.eval_backend),
            lichess_api_url: env::var("LICHESS_API_URL").unwrap_or(defaults.lichess_api_url),
            stockfish_path: env::var("STOCKFISH_PATH").unwrap_or(defaults.stockfish_path),
            engine_nodes: env::var("ENGINE_NODES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.engine_nodes),
            eval_timeout_ms: env::var("EVAL_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.eval_timeout_ms),
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_upload_bytes),
            session_ttl_secs: env::var("SESSION_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.session_ttl_secs),
            back_rollback: env::var("BACK_ROLLBACK")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.back_rollback),
        }
    }

    pub fn eval_timeout(&self) -> Duration {
        Duration::from_millis(self.eval_timeout_ms)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}
