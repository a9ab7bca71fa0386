use serde::Serialize;
use shakmaty::{Chess, Move};

/// Longest event name shown in a game selector label.
const LABEL_EVENT_MAX_CHARS: usize = 40;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GameHeaders {
    pub white: String,
    pub black: String,
    pub event: String,
    pub site: Option<String>,
    pub date: Option<String>,
    pub result: Option<String>,
}

impl Default for GameHeaders {
    fn default() -> Self {
        Self {
            white: "?".to_string(),
            black: "?".to_string(),
            event: String::new(),
            site: None,
            date: None,
            result: None,
        }
    }
}

/// A single game as loaded from a PGN file. Immutable after loading.
#[derive(Debug, Clone)]
pub struct GameRecord {
    pub headers: GameHeaders,
    /// Position the mainline starts from (standard setup unless a FEN tag was given).
    pub initial: Chess,
    /// Mainline moves, each legal in the position reached by its predecessors.
    pub moves: Vec<Move>,
}

impl GameRecord {
    pub fn new(headers: GameHeaders, moves: Vec<Move>) -> Self {
        Self {
            headers,
            initial: Chess::default(),
            moves,
        }
    }

    pub fn move_count(&self) -> usize {
        self.moves.len()
    }
}

/// One row of the game selection surface.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GameSummary {
    pub index: usize,
    pub white: String,
    pub black: String,
    pub event: String,
    pub half_moves: usize,
    pub label: String,
}

/// Ordered list of games, in file order.
#[derive(Debug, Clone, Default)]
pub struct GameCollection {
    games: Vec<GameRecord>,
}

impl GameCollection {
    pub fn new(games: Vec<GameRecord>) -> Self {
        Self { games }
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&GameRecord> {
        self.games.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameRecord> {
        self.games.iter()
    }

    /// Half-move count of the game at `index`, or 0 when there is no such game.
    pub fn move_count(&self, index: usize) -> usize {
        self.games.get(index).map_or(0, GameRecord::move_count)
    }

    pub fn summary(&self, index: usize) -> Option<GameSummary> {
        let game = self.games.get(index)?;
        let h = &game.headers;
        Some(GameSummary {
            index,
            white: h.white.clone(),
            black: h.black.clone(),
            event: h.event.clone(),
            half_moves: game.move_count(),
            label: selector_label(index, h),
        })
    }

    pub fn summaries(&self) -> Vec<GameSummary> {
        (0..self.games.len())
            .filter_map(|i| self.summary(i))
            .collect()
    }
}

fn selector_label(index: usize, headers: &GameHeaders) -> String {
    let event: String = headers.event.chars().take(LABEL_EVENT_MAX_CHARS).collect();
    format!("{}. {} – {} ({})", index + 1, headers.white, headers.black, event)
}
