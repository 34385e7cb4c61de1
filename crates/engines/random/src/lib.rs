//! Random Move Chess Engine
//!
//! The computer opponent: picks uniformly at random from the legal moves the
//! rules engine hands it. It is deliberately not a real player.

use chess_core::{Engine, Game, Move};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{thread_rng, SeedableRng};


#[derive(Debug)]
enum Source {
    Thread,
    Seeded(StdRng),
}

/// A chess engine that plays random legal moves.
#[derive(Debug)]
pub struct RandomEngine {
    source: Source,
}

impl Default for RandomEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomEngine {
    /// Draws from the thread-local generator.
    pub fn new() -> Self {
        Self {
            source: Source::Thread,
        }
    }

    /// Reproducible sequence of choices for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            source: Source::Seeded(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Engine for RandomEngine {
    fn choose_move(&mut self, _game: &Game, legal: &[Move]) -> Option<Move> {
        match &mut self.source {
            Source::Thread => legal.choose(&mut thread_rng()).copied(),
            Source::Seeded(rng) => legal.choose(rng).copied(),
        }
    }

    fn name(&self) -> &str {
        "Random v1.0"
    }
}
