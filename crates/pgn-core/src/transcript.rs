//! Move list renderer.
//!
//! Produces the annotated mainline transcript for a cursor position. SAN is
//! regenerated on every call by replaying the game; nothing is cached.

use std::fmt;
use std::iter::Take;
use std::slice;

use serde::Serialize;
use shakmaty::{san::SanPlus, Chess, Color, Move, Position};

use crate::game::GameRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    White,
    Black,
}

impl From<Color> for Side {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Side::White,
            Color::Black => Side::Black,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptEntry {
    /// 0-based half-move index in the mainline.
    pub ply: usize,
    pub move_number: u32,
    pub side: Side,
    pub san: String,
    /// Set on the most recently played move.
    pub current: bool,
}

impl fmt::Display for TranscriptEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.side {
            Side::White => write!(f, "{}. {}", self.move_number, self.san),
            Side::Black => write!(f, "{}...{}", self.move_number, self.san),
        }
    }
}

/// Lazy transcript over a game's mainline. Clone it to restart from the
/// same point.
#[derive(Debug, Clone)]
pub struct Transcript<'a> {
    moves: slice::Iter<'a, Move>,
    pos: Chess,
    ply: usize,
    current: Option<usize>,
}

impl Iterator for Transcript<'_> {
    type Item = TranscriptEntry;

    fn next(&mut self) -> Option<TranscriptEntry> {
        let mv = self.moves.next()?;
        let move_number = self.pos.fullmoves().get();
        let side = Side::from(self.pos.turn());
        let san = SanPlus::from_move_and_play_unchecked(&mut self.pos, mv.clone());

        let entry = TranscriptEntry {
            ply: self.ply,
            move_number,
            side,
            san: san.to_string(),
            current: self.current == Some(self.ply),
        };
        self.ply += 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.moves.size_hint()
    }
}

impl ExactSizeIterator for Transcript<'_> {}

/// Full mainline transcript with the entry at `move_index - 1` marked current.
pub fn render(game: &GameRecord, move_index: usize) -> Transcript<'_> {
    Transcript {
        moves: game.moves.iter(),
        pos: game.initial.clone(),
        ply: 0,
        current: move_index.checked_sub(1),
    }
}

/// Only the moves already played at `move_index`.
pub fn render_played(game: &GameRecord, move_index: usize) -> Take<Transcript<'_>> {
    render(game, move_index).take(move_index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_pgn;

    fn game(pgn: &str) -> GameRecord {
        load_pgn(pgn.as_bytes()).unwrap().get(0).unwrap().clone()
    }

    #[test]
    fn test_render_marks_current_and_numbers() {
        let g = game("1. e4 e5 2. Nf3 *");
        let entries: Vec<_> = render(&g, 2).collect();

        assert_eq!(entries.len(), 3);
        assert_eq!(
            entries.iter().map(|e| e.move_number).collect::<Vec<_>>(),
            vec![1, 1, 2]
        );
        assert_eq!(entries[1].to_string(), "1...e5");
        assert!(entries[1].current);
        assert!(!entries[0].current && !entries[2].current);
        assert_eq!(entries[0].to_string(), "1. e4");
        assert_eq!(entries[2].to_string(), "2. Nf3");
    }

    #[test]
    fn test_render_at_start_has_no_current() {
        let g = game("1. e4 e5 *");
        assert!(render(&g, 0).all(|e| !e.current));
    }

    #[test]
    fn test_render_is_restartable() {
        let g = game("1. d4 d5 2. c4 *");
        let transcript = render(&g, 1);
        let first: Vec<_> = transcript.clone().collect();
        let second: Vec<_> = transcript.collect();
        assert_eq!(first, second);
        assert_eq!(render(&g, 1).len(), 3);
    }

    #[test]
    fn test_render_played_stops_at_cursor() {
        let g = game("1. d4 d5 2. c4 c6 *");
        let played: Vec<String> = render_played(&g, 3).map(|e| e.to_string()).collect();
        assert_eq!(played, vec!["1. d4", "1...d5", "2. c4"]);
    }

    #[test]
    fn test_render_from_fen_with_black_to_move() {
        let pgn = r#"[SetUp "1"]
[FEN "4k3/8/8/8/8/8/4P3/4K3 b - - 0 30"]

30... Kd7 31. e4 *"#;
        let g = game(pgn);
        let entries: Vec<String> = render(&g, 0).map(|e| e.to_string()).collect();
        assert_eq!(entries, vec!["30...Kd7", "31. e4"]);
    }
}
