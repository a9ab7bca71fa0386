//! Error types for loading, navigating and projecting games.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("No games found in file")]
    NoGamesFound,

    #[error("Failed to read PGN: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CursorError {
    #[error("Game index {index} out of range (collection has {count} games)")]
    GameIndexOutOfRange { index: usize, count: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProjectError {
    #[error("Move index {index} out of range (game has {count} half-moves)")]
    MoveIndexOutOfRange { index: usize, count: usize },
}
