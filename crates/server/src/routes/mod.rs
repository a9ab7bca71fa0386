pub mod board;
pub mod eval;
pub mod games;
pub mod health;
pub mod navigation;
pub mod pgn;
pub mod sessions;
