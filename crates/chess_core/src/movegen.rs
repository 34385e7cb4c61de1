use crate::board::{DIAGONALS, KING_DELTAS, KNIGHT_DELTAS, ORTHOGONALS, Position};
use crate::types::*;

const PROMOTION_PIECES: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

/// Generate all legal moves, returning a freshly allocated vector.
pub fn legal_moves(pos: &Position) -> Vec<Move> {
    let mut tmp = pos.clone();
    let mut out = Vec::with_capacity(64);
    legal_moves_into(&mut tmp, &mut out);
    out
}

/// Generate all legal moves into the provided buffer, reusing it across calls.
/// `pos` is used as scratch space and is restored before returning.
pub fn legal_moves_into(pos: &mut Position, out: &mut Vec<Move>) {
    out.clear();
    pseudo_moves(pos, out);

    let mover = pos.side_to_move;
    out.retain(|&mv| {
        let undo = pos.make_move(mv);
        let illegal = pos.in_check(mover);
        pos.unmake_move(mv, undo);
        !illegal
    });
}

fn pseudo_moves(pos: &Position, out: &mut Vec<Move>) {
    for from in 0..64u8 {
        let Some(pc) = pos.piece_at(from) else {
            continue;
        };
        if pc.color != pos.side_to_move {
            continue;
        }
        match pc.kind {
            PieceKind::Pawn => gen_pawn(pos, from, pc.color, out),
            PieceKind::Knight => gen_steps(pos, from, pc.color, &KNIGHT_DELTAS, out),
            PieceKind::Bishop => gen_slider(pos, from, pc.color, &DIAGONALS, out),
            PieceKind::Rook => gen_slider(pos, from, pc.color, &ORTHOGONALS, out),
            PieceKind::Queen => {
                gen_slider(pos, from, pc.color, &DIAGONALS, out);
                gen_slider(pos, from, pc.color, &ORTHOGONALS, out);
            }
            PieceKind::King => {
                gen_steps(pos, from, pc.color, &KING_DELTAS, out);
                gen_castle(pos, from, pc.color, out);
            }
        }
    }
}

fn push_pawn_move(from: u8, to: u8, promo_rank: i8, out: &mut Vec<Move>) {
    if rank_of(to) == promo_rank {
        for pk in PROMOTION_PIECES {
            let mut mv = Move::new(from, to);
            mv.promo = Some(pk);
            out.push(mv);
        }
    } else {
        out.push(Move::new(from, to));
    }
}

fn gen_pawn(pos: &Position, from: u8, c: Color, out: &mut Vec<Move>) {
    let f = file_of(from);
    let r = rank_of(from);

    let (dir, start_rank, promo_rank): (i8, i8, i8) = match c {
        Color::White => (1, 1, 7),
        Color::Black => (-1, 6, 0),
    };

    if let Some(to) = sq(f, r + dir)
        && pos.piece_at(to).is_none()
    {
        push_pawn_move(from, to, promo_rank, out);

        if r == start_rank
            && let Some(to2) = sq(f, r + 2 * dir)
            && pos.piece_at(to2).is_none()
        {
            out.push(Move::new(from, to2));
        }
    }

    for df in [-1, 1] {
        let Some(to) = sq(f + df, r + dir) else {
            continue;
        };
        match pos.piece_at(to) {
            Some(target) if target.color != c => push_pawn_move(from, to, promo_rank, out),
            None if pos.en_passant == Some(to) => {
                let mut mv = Move::new(from, to);
                mv.is_en_passant = true;
                out.push(mv);
            }
            _ => {}
        }
    }
}

/// Single-step movers: knight and king.
fn gen_steps(pos: &Position, from: u8, c: Color, deltas: &[(i8, i8)], out: &mut Vec<Move>) {
    let f = file_of(from);
    let r = rank_of(from);
    for (df, dr) in deltas {
        if let Some(to) = sq(f + df, r + dr) {
            match pos.piece_at(to) {
                Some(pc) if pc.color == c => {}
                _ => out.push(Move::new(from, to)),
            }
        }
    }
}

fn gen_slider(pos: &Position, from: u8, c: Color, dirs: &[(i8, i8)], out: &mut Vec<Move>) {
    let f0 = file_of(from);
    let r0 = rank_of(from);
    for (df, dr) in dirs {
        let mut f = f0 + df;
        let mut r = r0 + dr;
        while let Some(to) = sq(f, r) {
            match pos.piece_at(to) {
                None => out.push(Move::new(from, to)),
                Some(pc) if pc.color != c => {
                    out.push(Move::new(from, to));
                    break;
                }
                _ => break,
            }
            f += df;
            r += dr;
        }
    }
}

struct Castle {
    to: u8,
    /// Squares between king and rook
    empty: &'static [u8],
    /// Squares the king passes over or lands on
    crossed: [u8; 2],
}

const WHITE_KINGSIDE: Castle = Castle {
    to: 6,
    empty: &[5, 6],
    crossed: [5, 6],
};
const WHITE_QUEENSIDE: Castle = Castle {
    to: 2,
    empty: &[1, 2, 3],
    crossed: [3, 2],
};
const BLACK_KINGSIDE: Castle = Castle {
    to: 62,
    empty: &[61, 62],
    crossed: [61, 62],
};
const BLACK_QUEENSIDE: Castle = Castle {
    to: 58,
    empty: &[57, 58, 59],
    crossed: [59, 58],
};

fn gen_castle(pos: &Position, from: u8, c: Color, out: &mut Vec<Move>) {
    let (home, options) = match c {
        Color::White => (
            4u8,
            [
                (pos.castling.wk, &WHITE_KINGSIDE),
                (pos.castling.wq, &WHITE_QUEENSIDE),
            ],
        ),
        Color::Black => (
            60u8,
            [
                (pos.castling.bk, &BLACK_KINGSIDE),
                (pos.castling.bq, &BLACK_QUEENSIDE),
            ],
        ),
    };
    // Can't castle out of check either.
    if from != home || pos.in_check(c) {
        return;
    }

    let enemy = c.other();
    for (allowed, castle) in options {
        if !allowed
            || castle.empty.iter().any(|&s| pos.piece_at(s).is_some())
            || castle.crossed.iter().any(|&s| pos.is_square_attacked(s, enemy))
        {
            continue;
        }
        let mut mv = Move::new(from, castle.to);
        mv.is_castle = true;
        out.push(mv);
    }
}

#[cfg(test)]
#[path = "movegen_tests.rs"]
mod movegen_tests;
