use crate::{board::Position, movegen::legal_moves_into, notation::move_to_uci, types::Move};

/// Counts leaf nodes of the legal move tree `depth` plies deep.
pub fn perft(pos: &mut Position, depth: u8) -> u64 {
    let mut layers = vec![Vec::with_capacity(64); depth as usize];
    count(pos, &mut layers[..])
}

/// Per-root-move node counts, for comparing against a reference engine.
pub fn perft_divide(pos: &mut Position, depth: u8) -> Vec<(String, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    let mut roots = Vec::new();
    legal_moves_into(pos, &mut roots);
    let mut layers = vec![Vec::with_capacity(64); depth as usize - 1];

    roots
        .into_iter()
        .map(|mv| {
            let undo = pos.make_move(mv);
            let nodes = count(pos, &mut layers[..]);
            pos.unmake_move(mv, undo);
            (move_to_uci(mv), nodes)
        })
        .collect()
}

/// One scratch buffer per remaining ply; the slice length is the depth.
fn count(pos: &mut Position, layers: &mut [Vec<Move>]) -> u64 {
    let Some((buf, rest)) = layers.split_first_mut() else {
        return 1;
    };

    legal_moves_into(pos, buf);
    if rest.is_empty() {
        return buf.len() as u64;
    }

    let mut nodes = 0u64;
    for mv in buf.iter().copied() {
        let undo = pos.make_move(mv);
        nodes += count(pos, rest);
        pos.unmake_move(mv, undo);
    }
    nodes
}
