//! Local Stockfish engine over UCI (async I/O)

use std::process::Stdio;
use std::time::Duration;

use pgn_core::Evaluation;
use shakmaty::Color;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::EvalError;

/// Raw engine score, from the side to move's perspective.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineScore {
    pub cp: Option<i32>,
    pub mate: Option<i32>,
    /// Best move in UCI notation
    pub best_move: String,
}

/// A running Stockfish process.
pub struct StockfishEngine {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl StockfishEngine {
    /// Spawn a new Stockfish process and initialize UCI
    pub async fn new(path: &str) -> Result<Self, EvalError> {
        let mut process = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| EvalError::Engine(format!("Failed to spawn Stockfish: {e}")))?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| EvalError::Engine("Stockfish stdin unavailable".into()))?;
        let stdout = process
            .stdout
            .take()
            .ok_or_else(|| EvalError::Engine("Stockfish stdout unavailable".into()))?;

        let mut engine = Self {
            process,
            stdin,
            stdout: BufReader::new(stdout),
        };

        engine.send("uci").await?;
        engine.wait_for("uciok").await?;

        engine.send("setoption name Threads value 1").await?;
        engine.send("setoption name Hash value 64").await?;
        engine.send("setoption name UCI_AnalyseMode value true").await?;
        engine.send("isready").await?;
        engine.wait_for("readyok").await?;

        Ok(engine)
    }

    async fn send(&mut self, cmd: &str) -> Result<(), EvalError> {
        debug!(cmd, "SF <");
        self.stdin
            .write_all(format!("{cmd}\n").as_bytes())
            .await
            .map_err(|e| EvalError::Engine(format!("Failed to write to Stockfish: {e}")))?;
        self.stdin
            .flush()
            .await
            .map_err(|e| EvalError::Engine(format!("Failed to flush stdin: {e}")))?;
        Ok(())
    }

    /// Read one line; EOF means the engine exited.
    async fn read_line(&mut self, line: &mut String) -> Result<(), EvalError> {
        line.clear();
        let n = self
            .stdout
            .read_line(line)
            .await
            .map_err(|e| EvalError::Engine(format!("Failed to read from Stockfish: {e}")))?;
        if n == 0 {
            return Err(EvalError::Engine("Stockfish exited".into()));
        }
        Ok(())
    }

    async fn wait_for(&mut self, expected: &str) -> Result<(), EvalError> {
        let mut line = String::new();
        loop {
            self.read_line(&mut line).await?;
            let trimmed = line.trim();
            debug!(line = trimmed, "SF >");
            if trimmed == expected {
                return Ok(());
            }
        }
    }

    /// Search `fen` for `nodes` nodes and return the final score.
    pub async fn evaluate(&mut self, fen: &str, nodes: u32) -> Result<EngineScore, EvalError> {
        self.send(&format!("position fen {fen}")).await?;
        self.send(&format!("go nodes {nodes}")).await?;

        let mut score = EngineScore::default();
        let mut line = String::new();
        loop {
            self.read_line(&mut line).await?;
            let trimmed = line.trim();

            if trimmed.starts_with("info") && trimmed.contains(" score ") {
                if let Some(cp) = parse_cp(trimmed) {
                    score.cp = Some(cp);
                    score.mate = None;
                }
                if let Some(mate) = parse_mate(trimmed) {
                    score.mate = Some(mate);
                    score.cp = None;
                }
            } else if trimmed.starts_with("bestmove") {
                if let Some(mv) = trimmed.split_whitespace().nth(1) {
                    score.best_move = mv.to_string();
                }
                break;
            }
        }

        Ok(score)
    }

    /// Send quit command and wait for process to exit
    pub async fn quit(&mut self) {
        let _ = self.send("quit").await;
        let _ = self.process.wait().await;
    }
}

impl Drop for StockfishEngine {
    fn drop(&mut self) {
        // Best-effort synchronous kill in drop
        let _ = self.process.start_kill();
    }
}

/// Lazily spawned engine shared by all sessions; one search at a time.
pub struct LocalEngine {
    path: String,
    nodes: u32,
    timeout: Duration,
    engine: Mutex<Option<StockfishEngine>>,
}

impl LocalEngine {
    pub fn new(path: &str, nodes: u32, timeout: Duration) -> Self {
        Self {
            path: path.to_string(),
            nodes,
            timeout,
            engine: Mutex::new(None),
        }
    }

    /// Evaluate `fen`, respawning the engine if a previous search failed.
    /// Any failure or timeout discards the process so that stale output is
    /// never read by the next search.
    pub async fn evaluate(&self, fen: &str, turn: Color) -> Result<Evaluation, EvalError> {
        let mut guard = self.engine.lock().await;

        let search = async {
            if guard.is_none() {
                info!(path = %self.path, "Starting Stockfish");
                *guard = Some(StockfishEngine::new(&self.path).await?);
            }
            match guard.as_mut() {
                Some(engine) => engine.evaluate(fen, self.nodes).await,
                None => Err(EvalError::Engine("Stockfish not running".into())),
            }
        };

        let result = match tokio::time::timeout(self.timeout, search).await {
            Ok(r) => r,
            Err(_) => Err(EvalError::Timeout),
        };

        match result {
            Ok(score) => {
                debug!(best_move = %score.best_move, cp = ?score.cp, mate = ?score.mate, "Search finished");
                Ok(Evaluation::from_side_to_move(score.cp, score.mate, turn))
            }
            Err(e) => {
                warn!("Discarding Stockfish process: {e}");
                *guard = None;
                Err(e)
            }
        }
    }

    pub async fn shutdown(&self) {
        if let Some(mut engine) = self.engine.lock().await.take() {
            engine.quit().await;
        }
    }
}

fn parse_score(line: &str, kind: &str) -> Option<i32> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    for (i, part) in parts.iter().enumerate() {
        if *part == kind && i + 1 < parts.len() {
            return parts[i + 1].parse().ok();
        }
    }
    None
}

/// Parse centipawn score from info line
fn parse_cp(line: &str) -> Option<i32> {
    parse_score(line, "cp")
}

/// Parse mate score from info line
fn parse_mate(line: &str) -> Option<i32> {
    parse_score(line, "mate")
}
