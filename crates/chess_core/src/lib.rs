//! Chess rules engine: board representation, legal move generation, SAN,
//! terminal-state classification, and the [`RulesEngine`] contract consumed
//! by the session layer.

pub mod board;
pub mod game;
pub mod movegen;
pub mod notation;
pub mod perft;
pub mod rules;
pub mod types;
pub mod zobrist;

pub use board::*;
pub use game::Game;
pub use movegen::*;
pub use notation::*;
pub use perft::{perft, perft_divide};
pub use rules::*;
pub use types::*;
pub use zobrist::ZOBRIST;

// =============================================================================
// Engine trait: move selection strategy for the computer side
// =============================================================================

/// Trait implemented by anything that can pick a move for the computer.
///
/// The caller supplies the legal-move set it got from the rules engine, so an
/// implementation only decides *which* legal move to play. Stronger engines
/// can look at `game` to search; a random mover can ignore it.
pub trait Engine: Send {
    /// Pick one of `legal`, or `None` when there is nothing to play.
    fn choose_move(&mut self, game: &Game, legal: &[Move]) -> Option<Move>;

    /// Returns the engine's name, for logs and the presentation layer
    fn name(&self) -> &str;

    /// Reset internal state for a new game
    fn new_game(&mut self) {}
}
