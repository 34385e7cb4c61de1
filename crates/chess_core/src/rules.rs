//! The rules-engine contract the session layer consumes, and the standard
//! chess implementation of it.

use serde::Serialize;
use thiserror::Error;

use crate::game::Game;
use crate::movegen::legal_moves;
use crate::notation::san;
use crate::types::{Color, Move, MoveRequest, PieceKind};

/// A move the engine accepted.
#[derive(Debug, Clone)]
pub struct MoveResult {
    /// SAN of the applied move, e.g. `"Nf3"` or `"Qh4#"`.
    pub notation: String,
    /// The move as resolved against the legal-move set.
    pub applied: Move,
    pub game: Game,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejected {
    #[error("illegal move {request}")]
    IllegalMove { request: MoveRequest },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawReason {
    Stalemate,
    InsufficientMaterial,
    ThreefoldRepetition,
    FiftyMoveRule,
}

/// Why a game cannot continue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    Checkmate { winner: Color },
    Draw(DrawReason),
    /// Any stop condition an engine reports that is neither mate nor a draw.
    Other(String),
}

/// What the session needs from a chess rules implementation. Every method
/// takes the game by shared reference; `apply_move` returns a new game and
/// leaves its input untouched, so a rejected move cannot change anything.
pub trait RulesEngine {
    fn new_game(&self) -> Game;

    fn legal_moves(&self, game: &Game) -> Vec<Move>;

    fn apply_move(&self, game: &Game, request: MoveRequest) -> Result<MoveResult, Rejected>;

    fn turn(&self, game: &Game) -> Color;

    /// `None` while the game can go on.
    fn terminal(&self, game: &Game) -> Option<Termination>;
}

/// Standard chess rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardRules;

impl RulesEngine for StandardRules {
    fn new_game(&self) -> Game {
        Game::new()
    }

    fn legal_moves(&self, game: &Game) -> Vec<Move> {
        legal_moves(game.position())
    }

    fn apply_move(&self, game: &Game, request: MoveRequest) -> Result<MoveResult, Rejected> {
        let from = request.from.index();
        let to = request.to.index();
        let promotion = request.promotion.unwrap_or(PieceKind::Queen);

        let mv = self
            .legal_moves(game)
            .into_iter()
            .find(|m| m.from == from && m.to == to && m.promo.is_none_or(|p| p == promotion))
            .ok_or(Rejected::IllegalMove { request })?;

        Ok(MoveResult {
            notation: san(game.position(), mv),
            applied: mv,
            game: game.successor(mv),
        })
    }

    fn turn(&self, game: &Game) -> Color {
        game.turn()
    }

    fn terminal(&self, game: &Game) -> Option<Termination> {
        let pos = game.position();
        if self.legal_moves(game).is_empty() {
            return Some(if pos.in_check(pos.side_to_move) {
                Termination::Checkmate {
                    winner: pos.side_to_move.other(),
                }
            } else {
                Termination::Draw(DrawReason::Stalemate)
            });
        }
        if pos.is_insufficient_material() {
            return Some(Termination::Draw(DrawReason::InsufficientMaterial));
        }
        if game.repetitions() >= 3 {
            return Some(Termination::Draw(DrawReason::ThreefoldRepetition));
        }
        if pos.is_fifty_move_draw() {
            return Some(Termination::Draw(DrawReason::FiftyMoveRule));
        }
        None
    }
}

#[cfg(test)]
#[path = "rules_tests.rs"]
mod rules_tests;
