//! Move notation: SAN for the move history and coordinate (UCI-style) text
//! for move input.

use crate::board::Position;
use crate::movegen::{legal_moves, legal_moves_into};
use crate::types::*;

/// Standard Algebraic Notation for a legal move in `pos`, including the
/// `+`/`#` suffix.
pub fn san(pos: &Position, mv: Move) -> String {
    let mut san = san_body(pos, mv);

    let mut after = pos.clone();
    after.make_move(mv);
    let mover = pos.side_to_move;
    if after.in_check(mover.other()) {
        let mut replies = Vec::new();
        legal_moves_into(&mut after, &mut replies);
        san.push(if replies.is_empty() { '#' } else { '+' });
    }
    san
}

fn san_body(pos: &Position, mv: Move) -> String {
    let Some(piece) = pos.piece_at(mv.from) else {
        return format!("{}{}", sq_to_coord(mv.from), sq_to_coord(mv.to));
    };

    if mv.is_castle {
        return if mv.to > mv.from { "O-O" } else { "O-O-O" }.to_string();
    }

    let mut san = String::new();
    let is_capture = pos.piece_at(mv.to).is_some() || mv.is_en_passant;

    if piece.kind == PieceKind::Pawn {
        if is_capture {
            san.push((b'a' + (mv.from % 8)) as char);
        }
    } else {
        san.push(piece.kind.letter());
        san.push_str(&disambiguation(pos, mv, piece.kind));
    }

    if is_capture {
        san.push('x');
    }
    san.push_str(&sq_to_coord(mv.to));

    if let Some(promo) = mv.promo {
        san.push('=');
        san.push(promo.letter());
    }
    san
}

/// File, rank, or both, whichever is needed to tell `mv` apart from other
/// same-kind pieces that can reach the same square.
fn disambiguation(pos: &Position, mv: Move, kind: PieceKind) -> String {
    let rivals: Vec<u8> = legal_moves(pos)
        .into_iter()
        .filter(|m| m.to == mv.to && m.from != mv.from)
        .filter(|m| pos.piece_at(m.from).is_some_and(|p| p.kind == kind))
        .map(|m| m.from)
        .collect();

    if rivals.is_empty() {
        return String::new();
    }

    let coord = sq_to_coord(mv.from);
    let shares_file = rivals.iter().any(|&s| file_of(s) == file_of(mv.from));
    let shares_rank = rivals.iter().any(|&s| rank_of(s) == rank_of(mv.from));
    match (shares_file, shares_rank) {
        (false, _) => coord[..1].to_string(),
        (true, false) => coord[1..].to_string(),
        (true, true) => coord,
    }
}

pub fn move_to_uci(mv: Move) -> String {
    mv.request().to_string()
}

/// Parse `e2e4` / `e7e8q` against the legal moves of `pos`, so castle and
/// en-passant flags come out right. A missing promotion letter means queen.
pub fn parse_uci_move(pos: &Position, txt: &str) -> Option<Move> {
    let txt = txt.trim();
    if txt.len() < 4 || !txt.is_ascii() {
        return None;
    }
    let from = coord_to_sq(&txt[0..2])?;
    let to = coord_to_sq(&txt[2..4])?;
    let promo = match txt.as_bytes().get(4).map(u8::to_ascii_lowercase) {
        None => None,
        Some(b'q') => Some(PieceKind::Queen),
        Some(b'r') => Some(PieceKind::Rook),
        Some(b'b') => Some(PieceKind::Bishop),
        Some(b'n') => Some(PieceKind::Knight),
        Some(_) => return None,
    };

    legal_moves(pos).into_iter().find(|m| {
        m.from == from && m.to == to && (m.promo.is_none() || m.promo == promo.or(Some(PieceKind::Queen)))
    })
}

#[cfg(test)]
#[path = "notation_tests.rs"]
mod notation_tests;
