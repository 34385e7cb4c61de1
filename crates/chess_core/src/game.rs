//! The authoritative game record owned by the rules engine.

use crate::board::{FenError, Position};
use crate::types::{Color, Move};

/// A position together with the hashes of every position reached since the
/// game began. Callers only ever read it; new `Game`s come out of
/// [`RulesEngine::apply_move`](crate::RulesEngine::apply_move).
#[derive(Clone, Debug)]
pub struct Game {
    position: Position,
    seen: Vec<u64>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    pub fn new() -> Self {
        Self::from_position(Position::startpos())
    }

    pub fn from_position(position: Position) -> Self {
        let seen = vec![position.position_hash()];
        Self { position, seen }
    }

    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Position::from_fen(fen).map(Self::from_position)
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn turn(&self) -> Color {
        self.position.side_to_move
    }

    pub fn fen(&self) -> String {
        self.position.to_fen()
    }

    /// Half-moves played since this game was created.
    pub fn ply(&self) -> usize {
        self.seen.len() - 1
    }

    /// How many times the current position has occurred, itself included.
    pub fn repetitions(&self) -> usize {
        let current = self.position.position_hash();
        self.seen.iter().filter(|&&h| h == current).count()
    }

    /// Successor game after a move already known to be legal.
    pub(crate) fn successor(&self, mv: Move) -> Self {
        let mut position = self.position.clone();
        position.make_move(mv);
        let mut seen = self.seen.clone();
        seen.push(position.position_hash());
        Self { position, seen }
    }
}
