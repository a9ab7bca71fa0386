//! Per-user viewer sessions.
//!
//! A [`Session`] is the whole state of one viewer: the loaded games, the move
//! cursor and display options. Handlers receive it explicitly through
//! [`SessionStore::with_session`]; every view is derived from it from scratch.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use pgn_core::board_svg::{self, RenderOptions};
use pgn_core::{
    loader, project, render, render_played, BackRollback, Cursor, CursorError, GameCollection,
    GameSummary, LoadError, ProjectError, Projection, Step, TranscriptEntry,
};
use serde::Serialize;
use shakmaty::Chess;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;

/// "current half-move index / total half-moves".
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Readout {
    pub move_index: usize,
    pub total: usize,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LastMoveView {
    pub san: String,
    pub uci: String,
    pub from: Option<String>,
    pub to: String,
    pub caption: String,
}

/// Everything a client needs to draw the viewer after an interaction.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub game_count: usize,
    pub source_name: Option<String>,
    pub game_index: usize,
    pub current_game: Option<GameSummary>,
    pub readout: Readout,
    pub fen: String,
    pub last_move: Option<LastMoveView>,
    pub moves: Vec<TranscriptEntry>,
    pub show_origin: bool,
}

pub struct Session {
    id: Uuid,
    games: GameCollection,
    cursor: Cursor,
    show_origin: bool,
    source_name: Option<String>,
    last_seen: DateTime<Utc>,
}

impl Session {
    pub fn new(id: Uuid, rollback: BackRollback) -> Self {
        Self {
            id,
            games: GameCollection::default(),
            cursor: Cursor::new(rollback),
            show_origin: true,
            source_name: None,
            last_seen: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn games(&self) -> &GameCollection {
        &self.games
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn show_origin(&self) -> bool {
        self.show_origin
    }

    pub fn set_show_origin(&mut self, show: bool) {
        self.show_origin = show;
    }

    /// Replace the collection with the games in `bytes` and reset the cursor.
    /// On failure the session is left exactly as it was.
    pub fn load(&mut self, bytes: &[u8], source_name: Option<String>) -> Result<usize, LoadError> {
        let games = loader::load_pgn(bytes)?;
        Ok(self.install(games, source_name))
    }

    /// Swap in an already parsed collection and reset the cursor.
    pub fn install(&mut self, games: GameCollection, source_name: Option<String>) -> usize {
        let count = games.len();

        self.games = games;
        self.cursor.reset();
        self.source_name = source_name;

        info!(session = %self.id, games = count, "Loaded PGN");
        count
    }

    pub fn select_game(&mut self, index: usize) -> Result<(), CursorError> {
        self.cursor.select_game(&self.games, index)
    }

    pub fn step(&mut self, step: Step) {
        self.cursor.apply(&self.games, step);
    }

    /// Position at the cursor; the standard setup while nothing is loaded.
    pub fn projection(&self) -> Result<Projection, ProjectError> {
        match self.games.get(self.cursor.game_index()) {
            Some(game) => project(game, self.cursor.move_index()),
            None => Ok(Projection {
                position: Chess::default(),
                ply: 0,
                last_move: None,
            }),
        }
    }

    pub fn transcript(&self, played_only: bool) -> Vec<TranscriptEntry> {
        let Some(game) = self.games.get(self.cursor.game_index()) else {
            return Vec::new();
        };
        let move_index = self.cursor.move_index();
        if played_only {
            render_played(game, move_index).collect()
        } else {
            render(game, move_index).collect()
        }
    }

    pub fn readout(&self) -> Readout {
        let move_index = self.cursor.move_index();
        let total = self.games.move_count(self.cursor.game_index());
        Readout {
            move_index,
            total,
            text: format!("{move_index} / {total}"),
        }
    }

    pub fn board_svg(&self) -> Result<String, ProjectError> {
        let options = RenderOptions {
            show_origin: self.show_origin,
            ..RenderOptions::default()
        };
        Ok(board_svg::render_svg(&self.projection()?, options))
    }

    pub fn view(&self) -> Result<SessionView, ProjectError> {
        let projection = self.projection()?;
        let last_move = projection.last_move.as_ref().map(|m| LastMoveView {
            san: m.san.clone(),
            uci: m.uci.clone(),
            from: m.from.map(|sq| sq.to_string()),
            to: m.to.to_string(),
            caption: m.caption(),
        });

        Ok(SessionView {
            session_id: self.id,
            game_count: self.games.len(),
            source_name: self.source_name.clone(),
            game_index: self.cursor.game_index(),
            current_game: self.games.summary(self.cursor.game_index()),
            readout: self.readout(),
            fen: projection.fen(),
            last_move,
            moves: self.transcript(false),
            show_origin: self.show_origin,
        })
    }
}

/// In-memory session registry shared by all handlers.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<Uuid, Session>>>,
    ttl: chrono::Duration,
    rollback: BackRollback,
}

impl SessionStore {
    pub fn new(ttl: Duration, rollback: BackRollback) -> Self {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            ttl,
            rollback,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, Session>> {
        // Every mutation leaves sessions in a valid state, so a poisoned lock is still usable.
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn sweep(&self, sessions: &mut HashMap<Uuid, Session>) {
        let Some(cutoff) = Utc::now().checked_sub_signed(self.ttl) else {
            return;
        };
        let before = sessions.len();
        sessions.retain(|_, s| s.last_seen >= cutoff);
        let expired = before - sessions.len();
        if expired > 0 {
            info!(expired, "Expired idle sessions");
        }
    }

    pub fn create(&self) -> Result<SessionView, AppError> {
        let id = Uuid::new_v4();
        let session = Session::new(id, self.rollback);
        let view = session.view()?;

        let mut sessions = self.lock();
        self.sweep(&mut sessions);
        sessions.insert(id, session);
        info!(session = %id, active = sessions.len(), "Created session");

        Ok(view)
    }

    /// Run `f` against the session `id`. The lock is held for the duration of
    /// `f`, which must not block.
    pub fn with_session<T>(&self, id: Uuid, f: impl FnOnce(&mut Session) -> T) -> Result<T, AppError> {
        let mut sessions = self.lock();
        self.sweep(&mut sessions);
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Session not found".into()))?;
        session.last_seen = Utc::now();
        Ok(f(session))
    }

    pub fn contains(&self, id: Uuid) -> bool {
        let mut sessions = self.lock();
        self.sweep(&mut sessions);
        sessions.contains_key(&id)
    }

    pub fn remove(&self, id: Uuid) -> bool {
        self.lock().remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
