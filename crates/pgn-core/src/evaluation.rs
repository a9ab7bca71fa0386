//! Position evaluation as shown to the user.
//!
//! Scores are always from White's point of view.

use std::fmt;

use serde::Serialize;
use shakmaty::{Chess, Color, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Evaluation {
    /// Signed centipawns; positive favors White.
    Centipawns { cp: i32 },
    /// Mate in `moves`; positive when White mates, negative when Black mates,
    /// 0 when the side to move is already checkmated.
    Mate { moves: i32 },
    Unavailable,
}

impl Evaluation {
    /// Convert an engine score given from the side to move's perspective.
    /// `mate` wins over `cp` when both are present.
    pub fn from_side_to_move(cp: Option<i32>, mate: Option<i32>, turn: Color) -> Self {
        let sign = match turn {
            Color::White => 1,
            Color::Black => -1,
        };
        match (mate, cp) {
            (Some(m), _) => Evaluation::Mate { moves: m * sign },
            (None, Some(c)) => Evaluation::Centipawns { cp: c * sign },
            (None, None) => Evaluation::Unavailable,
        }
    }

    /// Evaluation of a game-over position, without asking any engine.
    pub fn for_terminal(pos: &Chess) -> Option<Self> {
        if pos.is_checkmate() {
            Some(Evaluation::Mate { moves: 0 })
        } else if pos.is_stalemate() || pos.is_insufficient_material() {
            Some(Evaluation::Centipawns { cp: 0 })
        } else {
            None
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, Evaluation::Unavailable)
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Evaluation::Centipawns { cp } => write!(f, "{:+.2}", f64::from(cp) / 100.0),
            Evaluation::Mate { moves: 0 } => f.write_str("checkmate"),
            Evaluation::Mate { moves } if moves > 0 => write!(f, "mate in {moves} (White)"),
            Evaluation::Mate { moves } => write!(f, "mate in {} (Black)", -moves),
            Evaluation::Unavailable => f.write_str("evaluation unavailable"),
        }
    }
}
