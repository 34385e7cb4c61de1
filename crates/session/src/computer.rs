//! The computer side: a pluggable move strategy plus the cancelable
//! "move after a delay" handle.

use std::fmt;
use std::time::Duration;

use chess_core::{Engine, Game, Move, PieceKind, RulesEngine};
use tracing::debug;

/// Handle for one armed computer move. Only the most recently armed ticket
/// is honoured; cancelling or re-arming makes every older ticket stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComputerTicket {
    pub id: u64,
    /// How long the presentation layer should wait before playing it.
    pub delay: Duration,
}

impl fmt::Display for ComputerTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.id)
    }
}

pub struct ComputerPlayer {
    engine: Box<dyn Engine>,
    delay: Duration,
    pending: Option<ComputerTicket>,
    next_id: u64,
}

impl fmt::Debug for ComputerPlayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComputerPlayer")
            .field("engine", &self.engine.name())
            .field("delay", &self.delay)
            .field("pending", &self.pending)
            .finish()
    }
}

impl ComputerPlayer {
    pub fn new(engine: Box<dyn Engine>, delay: Duration) -> Self {
        Self {
            engine,
            delay,
            pending: None,
            next_id: 1,
        }
    }

    pub fn name(&self) -> &str {
        self.engine.name()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn pending(&self) -> Option<ComputerTicket> {
        self.pending
    }

    /// Arm a new move, replacing any pending one.
    pub fn arm(&mut self) -> ComputerTicket {
        let ticket = ComputerTicket {
            id: self.next_id,
            delay: self.delay,
        };
        self.next_id += 1;
        if let Some(old) = self.pending.replace(ticket) {
            debug!(%old, new = %ticket, "computer move re-armed");
        } else {
            debug!(%ticket, delay_ms = ticket.delay.as_millis() as u64, "computer move armed");
        }
        ticket
    }

    pub fn cancel(&mut self) -> Option<ComputerTicket> {
        let cancelled = self.pending.take();
        if let Some(ticket) = cancelled {
            debug!(%ticket, "computer move cancelled");
        }
        cancelled
    }

    /// Consume `ticket` if it is the pending one.
    pub fn redeem(&mut self, ticket: ComputerTicket) -> bool {
        if self.pending.is_some_and(|p| p.id == ticket.id) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Put back a redeemed ticket whose move was refused. Ignored if another
    /// move has been armed since.
    pub fn restore(&mut self, ticket: ComputerTicket) {
        if self.pending.is_none() {
            debug!(%ticket, "computer move restored");
            self.pending = Some(ticket);
        }
    }

    /// Ask the rules engine for the legal moves of `game` and let the
    /// strategy pick one. Pawns promote to queens, as for the human.
    /// `None` when there is nothing to play.
    pub fn choose_move<R: RulesEngine + ?Sized>(&mut self, rules: &R, game: &Game) -> Option<Move> {
        let mut legal = rules.legal_moves(game);
        legal.retain(|m| m.promo.is_none_or(|p| p == PieceKind::Queen));
        if legal.is_empty() {
            debug!("computer has no legal moves");
            return None;
        }
        self.engine.choose_move(game, &legal)
    }

    pub fn new_game(&mut self) {
        self.engine.new_game();
    }
}
