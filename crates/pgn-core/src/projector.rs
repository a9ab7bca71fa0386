//! Board projector: the position reached after the first N half-moves of a game.

use shakmaty::{fen::Fen, san::SanPlus, uci::UciMove, CastlingMode, Chess, EnPassantMode, Position, Square};

use crate::error::ProjectError;
use crate::game::GameRecord;

/// The most recently played move of a projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastMove {
    /// Origin square; `None` only for drops, which standard chess never has.
    pub from: Option<Square>,
    /// Destination square (the king's target square for castling).
    pub to: Square,
    pub san: String,
    pub uci: String,
}

impl LastMove {
    fn new(uci: UciMove, san: SanPlus) -> Self {
        let (from, to) = match uci {
            UciMove::Normal { from, to, .. } => (Some(from), to),
            UciMove::Put { to, .. } => (None, to),
            // Never produced from a legal move.
            UciMove::Null => (None, Square::A1),
        };
        Self {
            from,
            to,
            san: san.to_string(),
            uci: uci.to_string(),
        }
    }

    /// One-line description, e.g. `Nf3 • g1 → f3`.
    pub fn caption(&self) -> String {
        match self.from {
            Some(from) => format!("{} • {} → {}", self.san, from, self.to),
            None => format!("{} • {}", self.san, self.to),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Projection {
    pub position: Chess,
    /// Number of half-moves applied.
    pub ply: usize,
    pub last_move: Option<LastMove>,
}

impl Projection {
    pub fn fen(&self) -> String {
        Fen::from_position(&self.position, EnPassantMode::Legal).to_string()
    }
}

/// Replay `game.moves[..move_index]` from the game's initial position.
pub fn project(game: &GameRecord, move_index: usize) -> Result<Projection, ProjectError> {
    let count = game.move_count();
    if move_index > count {
        return Err(ProjectError::MoveIndexOutOfRange {
            index: move_index,
            count,
        });
    }

    let mut pos = game.initial.clone();
    let mut last_move = None;

    for (ply, mv) in game.moves[..move_index].iter().enumerate() {
        if ply + 1 == move_index {
            let uci = mv.to_uci(CastlingMode::Standard);
            let san = SanPlus::from_move_and_play_unchecked(&mut pos, mv.clone());
            last_move = Some(LastMove::new(uci, san));
        } else {
            pos.play_unchecked(mv.clone());
        }
    }

    Ok(Projection {
        position: pos,
        ply: move_index,
        last_move,
    })
}
