use chess_core::{Color, RulesEngine};
use serde::Serialize;

use crate::history::MoveHistory;
use crate::orientation::Orientation;
use crate::session::{Mode, Session, Status};

/// Everything the presentation layer draws, as a detached snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub fen: String,
    pub orientation: Orientation,
    pub mode: Mode,
    /// Only meaningful against the computer.
    pub player_color: Option<Color>,
    pub turn: Color,
    pub status: Status,
    pub history: MoveHistory,
    pub computer_thinking: bool,
}

impl SessionView {
    pub fn capture<R: RulesEngine>(session: &Session<R>) -> Self {
        let mode = session.mode();
        Self {
            fen: session.game().fen(),
            orientation: session.orientation(),
            mode,
            player_color: (mode == Mode::VsComputer).then(|| session.player_color()),
            turn: session.turn(),
            status: session.status().clone(),
            history: session.history().clone(),
            computer_thinking: session.pending_computer_move().is_some(),
        }
    }

    /// "Checkmate!", "Draw!" or "Game Over!" once the game has ended.
    pub fn banner(&self) -> Option<&'static str> {
        self.status.banner()
    }

    /// Mode panel text, e.g. "Playing with Computer" / "Playing as: Black".
    pub fn mode_description(&self) -> Vec<String> {
        let mut lines = vec![self.mode.to_string()];
        if let Some(color) = self.player_color {
            lines.push(format!("Playing as: {color}"));
        }
        lines
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
