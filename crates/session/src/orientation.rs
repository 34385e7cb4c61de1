//! Which side is drawn at the bottom of the board.

use chess_core::Color;
use serde::Serialize;

use crate::session::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Orientation {
    bottom: Color,
}

impl Default for Orientation {
    fn default() -> Self {
        Self {
            bottom: Color::White,
        }
    }
}

impl Orientation {
    pub fn new(bottom: Color) -> Self {
        Self { bottom }
    }

    pub fn bottom(&self) -> Color {
        self.bottom
    }

    pub fn set(&mut self, bottom: Color) {
        self.bottom = bottom;
    }

    pub fn rotate(&mut self) {
        self.bottom = self.bottom.other();
    }

    /// After an accepted move: two players on one board each see their own
    /// side on their turn; against the computer the board stays put.
    pub fn after_move(&mut self, mode: Mode, mover: Color) {
        if mode == Mode::LocalTwoPlayer {
            self.bottom = mover.other();
        }
    }

    /// Orientation for a fresh game.
    pub fn for_new_game(mode: Mode, player_color: Color) -> Self {
        match mode {
            Mode::VsComputer => Self::new(player_color),
            Mode::LocalTwoPlayer | Mode::Unset => Self::new(Color::White),
        }
    }
}
