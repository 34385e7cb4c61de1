use rayon::prelude::*;

use chess_core::{Position, perft, perft_divide};

const FULL_PERFT_ENV: &str = "FULL_PERFT";
const NODE_LIMIT: u64 = 250_000;

/// Reference counts from the chessprogramming.org perft suite.
const CASES: &[(&str, &[(u8, u64)])] = &[
    (
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        &[(1, 20), (2, 400), (3, 8_902), (4, 197_281)],
    ),
    (
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        &[(1, 48), (2, 2_039), (3, 97_862)],
    ),
    (
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        &[(1, 14), (2, 191), (3, 2_812), (4, 43_238)],
    ),
    (
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        &[(1, 6), (2, 264), (3, 9_467)],
    ),
    (
        "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        &[(1, 44), (2, 1_486), (3, 62_379)],
    ),
];

#[test]
fn perft_reference_positions() {
    let full = std::env::var(FULL_PERFT_ENV).is_ok();

    CASES.par_iter().for_each(|(fen, depths)| {
        for &(depth, expected) in depths.iter() {
            if !full && expected > NODE_LIMIT {
                continue;
            }
            let mut pos = Position::from_fen(fen).expect("reference FEN parses");
            let got = perft(&mut pos, depth);
            assert_eq!(
                got, expected,
                "perft mismatch for '{fen}' at depth {depth}"
            );
        }
    });
}

#[test]
fn divide_sums_to_perft() {
    let mut pos = Position::startpos();
    let divided = perft_divide(&mut pos, 3);
    assert_eq!(divided.len(), 20);
    assert_eq!(divided.iter().map(|(_, n)| n).sum::<u64>(), 8_902);
    assert!(divided.contains(&("e2e4".to_string(), 600)));
}

#[test]
fn perft_depth_zero_is_one() {
    let mut pos = Position::startpos();
    assert_eq!(perft(&mut pos, 0), 1);
}
