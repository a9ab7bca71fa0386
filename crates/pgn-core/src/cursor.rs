//! Move cursor: which game, which half-move is being viewed.
//!
//! All transitions keep `game_index < game_count` (or 0 for an empty
//! collection) and `move_index <= move_count(game_index)`. Transitions at a
//! boundary are no-ops.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CursorError;
use crate::game::GameCollection;

/// Shape of a game collection as far as the cursor is concerned.
pub trait MoveCounts {
    fn game_count(&self) -> usize;
    fn move_count(&self, game_index: usize) -> usize;
}

impl MoveCounts for GameCollection {
    fn game_count(&self) -> usize {
        self.len()
    }

    fn move_count(&self, game_index: usize) -> usize {
        GameCollection::move_count(self, game_index)
    }
}

/// A plain list of per-game half-move counts.
impl MoveCounts for [usize] {
    fn game_count(&self) -> usize {
        self.len()
    }

    fn move_count(&self, game_index: usize) -> usize {
        self.get(game_index).copied().unwrap_or(0)
    }
}

/// Where `step_back` lands when it rolls over into the previous game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackRollback {
    /// Final position of the previous game.
    #[default]
    ToEnd,
    /// Initial position of the previous game.
    ToStart,
}

impl FromStr for BackRollback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "end" | "to_end" => Ok(Self::ToEnd),
            "start" | "to_start" => Ok(Self::ToStart),
            other => Err(format!("Unknown rollback policy: {other}")),
        }
    }
}

/// A navigation button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    First,
    Back,
    Forward,
    Last,
}

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" => Ok(Self::First),
            "back" => Ok(Self::Back),
            "forward" => Ok(Self::Forward),
            "last" => Ok(Self::Last),
            other => Err(format!("Unknown navigation action: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Cursor {
    game_index: usize,
    move_index: usize,
    #[serde(skip)]
    rollback: BackRollback,
}

impl Cursor {
    pub fn new(rollback: BackRollback) -> Self {
        Self {
            game_index: 0,
            move_index: 0,
            rollback,
        }
    }

    pub fn game_index(&self) -> usize {
        self.game_index
    }

    pub fn move_index(&self) -> usize {
        self.move_index
    }

    /// `(game_index, move_index)`.
    pub fn position(&self) -> (usize, usize) {
        (self.game_index, self.move_index)
    }

    pub fn rollback(&self) -> BackRollback {
        self.rollback
    }

    /// Back to the first game's initial position, e.g. after a new file loads.
    pub fn reset(&mut self) {
        self.game_index = 0;
        self.move_index = 0;
    }

    pub fn select_game<C: MoveCounts + ?Sized>(&mut self, games: &C, index: usize) -> Result<(), CursorError> {
        let count = games.game_count();
        if index >= count {
            return Err(CursorError::GameIndexOutOfRange { index, count });
        }
        self.game_index = index;
        self.move_index = 0;
        Ok(())
    }

    pub fn step_first(&mut self) {
        self.move_index = 0;
    }

    pub fn step_back<C: MoveCounts + ?Sized>(&mut self, games: &C) {
        if self.move_index > 0 {
            self.move_index -= 1;
        } else if self.game_index > 0 {
            self.game_index -= 1;
            self.move_index = match self.rollback {
                BackRollback::ToEnd => games.move_count(self.game_index),
                BackRollback::ToStart => 0,
            };
        }
    }

    pub fn step_forward<C: MoveCounts + ?Sized>(&mut self, games: &C) {
        if self.move_index < games.move_count(self.game_index) {
            self.move_index += 1;
        } else if self.game_index + 1 < games.game_count() {
            self.game_index += 1;
            self.move_index = 0;
        }
    }

    pub fn step_last<C: MoveCounts + ?Sized>(&mut self, games: &C) {
        self.move_index = games.move_count(self.game_index);
    }

    pub fn apply<C: MoveCounts + ?Sized>(&mut self, games: &C, step: Step) {
        let before = self.position();
        match step {
            Step::First => self.step_first(),
            Step::Back => self.step_back(games),
            Step::Forward => self.step_forward(games),
            Step::Last => self.step_last(games),
        }
        debug!(?step, ?before, after = ?self.position(), "Cursor step");
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.game_index, self.move_index)
    }
}
