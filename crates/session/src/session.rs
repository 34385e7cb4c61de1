//! The session state machine: mode, player colour, status, history and
//! orientation, with every change routed through one of its operations.

use std::fmt;
use std::str::FromStr;

use chess_core::{
    Color, Engine, Game, MoveRequest, MoveResult, RulesEngine, Square, StandardRules, Termination,
};
use random_engine::RandomEngine;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::computer::{ComputerPlayer, ComputerTicket};
use crate::config::SessionConfig;
use crate::effects::{Celebration, LogCelebration};
use crate::error::SessionError;
use crate::history::MoveHistory;
use crate::orientation::Orientation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Unset,
    #[serde(alias = "friend")]
    LocalTwoPlayer,
    #[serde(alias = "computer")]
    VsComputer,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Unset => write!(f, "No mode selected"),
            Mode::LocalTwoPlayer => write!(f, "Playing with Friend"),
            Mode::VsComputer => write!(f, "Playing with Computer"),
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "friend" | "local" | "local_two_player" | "two_player" => Ok(Mode::LocalTwoPlayer),
            "computer" | "cpu" | "vs_computer" => Ok(Mode::VsComputer),
            "unset" | "none" => Ok(Mode::Unset),
            other => Err(format!("unknown mode '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum Status {
    Idle,
    Active,
    Over(Termination),
}

impl Status {
    pub fn is_over(&self) -> bool {
        matches!(self, Status::Over(_))
    }

    /// Overlay text shown when the game has ended.
    pub fn banner(&self) -> Option<&'static str> {
        match self {
            Status::Over(Termination::Checkmate { .. }) => Some("Checkmate!"),
            Status::Over(Termination::Draw(_)) => Some("Draw!"),
            Status::Over(Termination::Other(_)) => Some("Game Over!"),
            Status::Idle | Status::Active => None,
        }
    }
}

/// What an accepted move did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub notation: String,
    pub mover: Color,
    pub status: Status,
    /// Set when the move handed the turn to the computer.
    pub computer: Option<ComputerTicket>,
}

pub struct Session<R = StandardRules> {
    rules: R,
    game: Game,
    mode: Mode,
    player_color: Color,
    status: Status,
    history: MoveHistory,
    orientation: Orientation,
    computer: ComputerPlayer,
    celebration: Box<dyn Celebration>,
}

impl<R: fmt::Debug> fmt::Debug for Session<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("rules", &self.rules)
            .field("fen", &self.game.fen())
            .field("mode", &self.mode)
            .field("player_color", &self.player_color)
            .field("status", &self.status)
            .field("history", &self.history)
            .field("orientation", &self.orientation)
            .field("computer", &self.computer)
            .finish()
    }
}

impl Session<StandardRules> {
    /// Standard rules and a random-move opponent, configured from `config`.
    /// If `config.mode` is set the session starts in that mode.
    pub fn new(config: &SessionConfig) -> Self {
        let engine = match config.seed {
            Some(seed) => RandomEngine::seeded(seed),
            None => RandomEngine::new(),
        };
        let mut session = Self::with_parts(StandardRules, Box::new(engine), config);
        if let Some(mode) = config.mode {
            session.select_mode(mode);
        }
        session
    }
}

impl<R: RulesEngine> Session<R> {
    /// A session in the idle state.
    pub fn with_parts(rules: R, engine: Box<dyn Engine>, config: &SessionConfig) -> Self {
        let game = rules.new_game();
        Self {
            rules,
            game,
            mode: Mode::Unset,
            player_color: config.player_color,
            status: Status::Idle,
            history: MoveHistory::new(),
            orientation: Orientation::default(),
            computer: ComputerPlayer::new(engine, config.computer_delay()),
            celebration: Box::new(LogCelebration),
        }
    }

    pub fn with_celebration(mut self, celebration: Box<dyn Celebration>) -> Self {
        self.celebration = celebration;
        self
    }

    // ---------------------------------------------------------------------
    // Read access for the presentation layer
    // ---------------------------------------------------------------------

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The human's colour against the computer. Meaningless in two-player mode.
    pub fn player_color(&self) -> Color {
        self.player_color
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Side to move, always as the rules engine reports it for the current game.
    pub fn turn(&self) -> Color {
        self.rules.turn(&self.game)
    }

    pub fn pending_computer_move(&self) -> Option<ComputerTicket> {
        self.computer.pending()
    }

    pub fn computer_name(&self) -> &str {
        self.computer.name()
    }

    pub fn is_computer_turn(&self) -> bool {
        self.mode == Mode::VsComputer && self.turn() != self.player_color
    }

    // ---------------------------------------------------------------------
    // Operations
    // ---------------------------------------------------------------------

    /// Switch mode and start a fresh game, discarding any game in progress.
    /// Selecting [`Mode::Unset`] returns the session to idle.
    pub fn select_mode(&mut self, mode: Mode) -> Option<ComputerTicket> {
        self.computer.cancel();
        info!(from = ?self.mode, to = ?mode, "mode selected");
        self.mode = mode;
        self.new_game()
    }

    /// Choose the human's colour against the computer; starts a fresh game
    /// with that side at the bottom.
    pub fn select_player_color(
        &mut self,
        color: Color,
    ) -> Result<Option<ComputerTicket>, SessionError> {
        if self.mode != Mode::VsComputer {
            return Err(SessionError::InvalidOperationForMode {
                operation: "select_player_color",
                mode: self.mode,
            });
        }
        self.computer.cancel();
        info!(%color, "player color selected");
        self.player_color = color;
        Ok(self.new_game())
    }

    /// Fresh game in the current mode and colour.
    pub fn reset(&mut self) -> Option<ComputerTicket> {
        self.computer.cancel();
        info!(mode = ?self.mode, "game reset");
        self.new_game()
    }

    /// Flip the board. Never touches the game itself.
    pub fn rotate(&mut self) {
        self.orientation.rotate();
        debug!(bottom = %self.orientation.bottom(), "board rotated");
    }

    /// Human move from `from` to `to`; promotions become queens.
    pub fn attempt_move(&mut self, from: Square, to: Square) -> Result<MoveOutcome, SessionError> {
        self.attempt(MoveRequest::new(from, to))
    }

    /// Human move given as text squares, e.g. `("e2", "e4")`.
    pub fn attempt_move_str(&mut self, from: &str, to: &str) -> Result<MoveOutcome, SessionError> {
        let from = from
            .parse()
            .map_err(|_| SessionError::InvalidSquare(from.to_string()))?;
        let to = to
            .parse()
            .map_err(|_| SessionError::InvalidSquare(to.to_string()))?;
        self.attempt_move(from, to)
    }

    /// Human move. On any error nothing about the session has changed.
    pub fn attempt(&mut self, request: MoveRequest) -> Result<MoveOutcome, SessionError> {
        if self.status != Status::Active {
            return Err(SessionError::GameNotActive);
        }
        if self.is_computer_turn() {
            return Err(SessionError::NotHumanTurn);
        }

        let result = self.rules.apply_move(&self.game, request).map_err(|rejected| {
            debug!(%request, "move rejected");
            SessionError::from(rejected)
        })?;
        Ok(self.commit(result))
    }

    /// Play the computer's move for `ticket`. Stale tickets (cancelled by a
    /// reset, mode or colour change, or already played) are refused.
    /// `Ok(None)` when the computer has no legal move. If the strategy picks
    /// an illegal move the error is returned and `ticket` stays pending.
    pub fn play_computer_move(
        &mut self,
        ticket: ComputerTicket,
    ) -> Result<Option<MoveOutcome>, SessionError> {
        if !self.computer.redeem(ticket) {
            debug!(%ticket, "stale computer move dropped");
            return Err(SessionError::StaleComputerMove { ticket: ticket.id });
        }
        if self.status != Status::Active || !self.is_computer_turn() {
            return Err(SessionError::StaleComputerMove { ticket: ticket.id });
        }

        let Some(mv) = self.computer.choose_move(&self.rules, &self.game) else {
            return Ok(None);
        };

        let request = mv.request();
        let result = match self.rules.apply_move(&self.game, request) {
            Ok(result) => result,
            Err(rejected) => {
                warn!(engine = self.computer.name(), %request, %ticket, "engine chose an illegal move");
                // Still the computer's turn: keep the ticket so the move can be retried.
                self.computer.restore(ticket);
                return Err(rejected.into());
            }
        };
        Ok(Some(self.commit(result)))
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    /// Shared tail of every accepted move, human or computer.
    fn commit(&mut self, result: MoveResult) -> MoveOutcome {
        let mover = self.turn();
        self.game = result.game;
        self.history.push(result.notation.clone());
        self.orientation.after_move(self.mode, mover);
        info!(%mover, notation = %result.notation, ply = self.history.len(), "move applied");

        // Exactly one terminal check per applied move.
        if let Some(termination) = self.rules.terminal(&self.game) {
            info!(?termination, "game over");
            self.celebration.celebrate(&termination);
            self.status = Status::Over(termination);
        }

        MoveOutcome {
            notation: result.notation,
            mover,
            status: self.status.clone(),
            computer: self.arm_if_computer_turn(),
        }
    }

    fn new_game(&mut self) -> Option<ComputerTicket> {
        self.game = self.rules.new_game();
        self.history.clear();
        self.computer.new_game();
        self.orientation = Orientation::for_new_game(self.mode, self.player_color);
        self.status = match self.mode {
            Mode::Unset => Status::Idle,
            Mode::LocalTwoPlayer | Mode::VsComputer => Status::Active,
        };
        self.arm_if_computer_turn()
    }

    fn arm_if_computer_turn(&mut self) -> Option<ComputerTicket> {
        (self.status == Status::Active && self.is_computer_turn()).then(|| self.computer.arm())
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
