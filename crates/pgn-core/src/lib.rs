//! Game records, PGN loading, and the move cursor with the views derived from it.

pub mod board_svg;
pub mod cursor;
pub mod error;
pub mod evaluation;
pub mod game;
pub mod loader;
pub mod projector;
pub mod transcript;

pub use cursor::{BackRollback, Cursor, MoveCounts, Step};
pub use error::{CursorError, LoadError, ProjectError};
pub use evaluation::Evaluation;
pub use game::{GameCollection, GameHeaders, GameRecord, GameSummary};
pub use projector::{project, LastMove, Projection};
pub use transcript::{render, render_played, Side, TranscriptEntry};
