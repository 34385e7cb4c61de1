//! Zobrist hashing used to recognise repeated positions.
//!
//! Two positions hash equal when they agree on piece placement, side to move,
//! castling rights and en-passant file, which is exactly the FIDE notion of
//! "the same position" for threefold repetition.

use crate::board::Position;
use crate::types::{Color, Piece};

/// Random keys, one per (piece, square) plus the non-placement state.
pub struct ZobristKeys {
    /// Indexed by [color * 6 + kind][square]
    pieces: [[u64; 64]; 12],
    pub side_to_move: u64,
    /// [wk, wq, bk, bq]
    castling: [u64; 4],
    en_passant_file: [u64; 8],
}

/// splitmix64 step; good enough spread for a fixed compile-time table.
const fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

impl ZobristKeys {
    pub const fn generate(seed: u64) -> Self {
        let mut state = seed;

        let mut pieces = [[0u64; 64]; 12];
        let mut p = 0;
        while p < 12 {
            let mut sq = 0;
            while sq < 64 {
                pieces[p][sq] = splitmix64(&mut state);
                sq += 1;
            }
            p += 1;
        }

        let side_to_move = splitmix64(&mut state);

        let mut castling = [0u64; 4];
        let mut i = 0;
        while i < 4 {
            castling[i] = splitmix64(&mut state);
            i += 1;
        }

        let mut en_passant_file = [0u64; 8];
        let mut i = 0;
        while i < 8 {
            en_passant_file[i] = splitmix64(&mut state);
            i += 1;
        }

        ZobristKeys {
            pieces,
            side_to_move,
            castling,
            en_passant_file,
        }
    }

    #[inline]
    pub fn piece_key(&self, piece: Piece, sq: u8) -> u64 {
        self.pieces[piece.color.idx() * 6 + piece.kind.idx()][sq as usize]
    }

    /// 0=wk, 1=wq, 2=bk, 3=bq
    #[inline]
    pub fn castling_key(&self, index: usize) -> u64 {
        self.castling[index]
    }

    #[inline]
    pub fn ep_key(&self, file: u8) -> u64 {
        self.en_passant_file[file as usize]
    }

    pub fn hash(&self, pos: &Position) -> u64 {
        let mut h = 0u64;
        for (i, pc) in pos.board.iter().enumerate() {
            if let Some(pc) = pc {
                h ^= self.piece_key(*pc, i as u8);
            }
        }
        if pos.side_to_move == Color::Black {
            h ^= self.side_to_move;
        }
        let rights = [
            pos.castling.wk,
            pos.castling.wq,
            pos.castling.bk,
            pos.castling.bq,
        ];
        for (i, _) in rights.iter().enumerate().filter(|(_, held)| **held) {
            h ^= self.castling_key(i);
        }
        if let Some(ep) = pos.en_passant {
            h ^= self.ep_key(ep % 8);
        }
        h
    }
}

pub static ZOBRIST: ZobristKeys = ZobristKeys::generate(0x5EED_C0DE_CAFE_F00D);

#[cfg(test)]
#[path = "zobrist_tests.rs"]
mod zobrist_tests;
