//! PGN loading: streams a file of concatenated games into a [`GameCollection`].
//!
//! Only the mainline is kept; variations are skipped and comments ignored.
//! A game whose movetext contains an illegal or unparseable move keeps the
//! moves before it.

use std::io::Read;
use std::ops::ControlFlow;

use pgn_reader::{RawTag, Reader, SanPlus, Skip, Visitor};
use shakmaty::{fen::Fen, CastlingMode, Chess, Move, Position};
use tracing::{debug, warn};

use crate::error::LoadError;
use crate::game::{GameCollection, GameHeaders, GameRecord};

/// Tags collected during header parsing.
#[derive(Default)]
struct GameTags {
    headers: GameHeaders,
    fen: Option<String>,
    tag_count: usize,
}

/// State during movetext parsing.
struct Mainline {
    headers: GameHeaders,
    tag_count: usize,
    initial: Chess,
    pos: Chess,
    moves: Vec<Move>,
    truncated: bool,
}

/// Visitor that turns each PGN game into a [`GameRecord`].
struct RecordBuilder {
    /// Number of games seen so far, used in log lines.
    game_no: usize,
}

impl RecordBuilder {
    fn new() -> Self {
        Self { game_no: 0 }
    }

    fn starting_position(&self, fen: Option<&str>) -> Option<Chess> {
        let Some(fen) = fen else {
            return Some(Chess::default());
        };
        let parsed: Fen = match fen.parse() {
            Ok(f) => f,
            Err(e) => {
                warn!(game = self.game_no, "Invalid FEN tag {fen:?}: {e}");
                return None;
            }
        };
        match parsed.into_position(CastlingMode::Standard) {
            Ok(pos) => Some(pos),
            Err(e) => {
                warn!(game = self.game_no, "Illegal FEN position {fen:?}: {e}");
                None
            }
        }
    }
}

impl Visitor for RecordBuilder {
    type Tags = GameTags;
    type Movetext = Mainline;
    type Output = Option<GameRecord>;

    fn begin_tags(&mut self) -> ControlFlow<Self::Output, GameTags> {
        self.game_no += 1;
        ControlFlow::Continue(GameTags::default())
    }

    fn tag(&mut self, tags: &mut GameTags, name: &[u8], value: RawTag<'_>) -> ControlFlow<Self::Output> {
        tags.tag_count += 1;
        let value = value.decode_utf8_lossy().into_owned();
        let h = &mut tags.headers;
        match name {
            b"White" => h.white = value,
            b"Black" => h.black = value,
            b"Event" => h.event = value,
            b"Site" => h.site = Some(value),
            b"Date" => h.date = Some(value),
            b"Result" => h.result = Some(value),
            b"FEN" => tags.fen = Some(value),
            _ => {}
        }
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, tags: GameTags) -> ControlFlow<Self::Output, Mainline> {
        // A game with an unusable FEN tag cannot be replayed; drop it.
        let Some(initial) = self.starting_position(tags.fen.as_deref()) else {
            return ControlFlow::Break(None);
        };

        ControlFlow::Continue(Mainline {
            headers: tags.headers,
            tag_count: tags.tag_count,
            pos: initial.clone(),
            initial,
            moves: Vec::new(),
            truncated: false,
        })
    }

    fn begin_variation(&mut self, _: &mut Mainline) -> ControlFlow<Self::Output, Skip> {
        ControlFlow::Continue(Skip(true))
    }

    fn san(&mut self, line: &mut Mainline, san_plus: SanPlus) -> ControlFlow<Self::Output> {
        if line.truncated {
            return ControlFlow::Continue(());
        }

        match san_plus.san.to_move(&line.pos) {
            Ok(mv) => {
                line.pos.play_unchecked(mv.clone());
                line.moves.push(mv);
            }
            Err(e) => {
                warn!(
                    game = self.game_no,
                    ply = line.moves.len() + 1,
                    "Illegal move {san_plus}: {e}; keeping mainline up to here"
                );
                line.truncated = true;
            }
        }

        ControlFlow::Continue(())
    }

    fn end_game(&mut self, line: Mainline) -> Self::Output {
        if line.tag_count == 0 && line.moves.is_empty() {
            debug!(game = self.game_no, "Skipping empty game");
            return None;
        }

        Some(GameRecord {
            headers: line.headers,
            initial: line.initial,
            moves: line.moves,
        })
    }
}

/// Parse every game in `source`.
///
/// Input that yields no games (empty, whitespace, or unparseable text) returns
/// [`LoadError::NoGamesFound`].
pub fn load_games<R: Read>(source: R) -> Result<GameCollection, LoadError> {
    let mut reader = Reader::new(source);
    let mut builder = RecordBuilder::new();
    let mut games = Vec::new();

    while let Some(parsed) = reader.read_game(&mut builder)? {
        if let Some(game) = parsed {
            games.push(game);
        }
    }

    if games.is_empty() {
        return Err(LoadError::NoGamesFound);
    }

    debug!(games = games.len(), "Parsed PGN");
    Ok(GameCollection::new(games))
}

/// Convenience wrapper over [`load_games`] for an in-memory upload.
pub fn load_pgn(bytes: &[u8]) -> Result<GameCollection, LoadError> {
    load_games(bytes)
}
