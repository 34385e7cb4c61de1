use super::*;

fn play(pos: &mut Position, uci: &str) -> String {
    let mv = parse_uci_move(pos, uci).unwrap_or_else(|| panic!("{uci} should be legal"));
    let text = san(pos, mv);
    pos.make_move(mv);
    text
}

#[test]
fn pawn_and_piece_moves() {
    let mut pos = Position::startpos();
    assert_eq!(play(&mut pos, "e2e4"), "e4");
    assert_eq!(play(&mut pos, "e7e5"), "e5");
    assert_eq!(play(&mut pos, "g1f3"), "Nf3");
    assert_eq!(play(&mut pos, "b8c6"), "Nc6");
    assert_eq!(play(&mut pos, "f1b5"), "Bb5");
    assert_eq!(play(&mut pos, "a7a6"), "a6");
    assert_eq!(play(&mut pos, "b5c6"), "Bxc6");
    assert_eq!(play(&mut pos, "d7c6"), "dxc6");
    assert_eq!(play(&mut pos, "e1g1"), "O-O");
}

#[test]
fn fools_mate_ends_with_hash() {
    let mut pos = Position::startpos();
    let moves: Vec<String> = ["f2f3", "e7e5", "g2g4", "d8h4"]
        .iter()
        .map(|m| play(&mut pos, m))
        .collect();
    assert_eq!(moves, ["f3", "e5", "g4", "Qh4#"]);
}

#[test]
fn check_gets_plus() {
    let mut pos = Position::startpos();
    for m in ["e2e4", "f7f6"] {
        play(&mut pos, m);
    }
    assert_eq!(play(&mut pos, "d1h5"), "Qh5+");
}

#[test]
fn knights_are_disambiguated_by_file() {
    // Knights on b1 and f1 can both reach d2
    let mut pos = Position::from_fen("4k3/8/8/8/8/8/8/1N2KN2 w - - 0 1").unwrap();
    assert_eq!(play(&mut pos, "b1d2"), "Nbd2");
}

#[test]
fn rooks_are_disambiguated_by_rank() {
    // Rooks on a1 and a5 can both reach a3
    let mut pos = Position::from_fen("4k3/8/8/R7/8/8/8/R3K3 w - - 0 1").unwrap();
    assert_eq!(play(&mut pos, "a1a3"), "R1a3");
}

#[test]
fn promotion_defaults_to_queen() {
    let mut pos = Position::from_fen("8/4P3/8/8/8/8/k7/4K3 w - - 0 1").unwrap();
    assert_eq!(play(&mut pos, "e7e8"), "e8=Q");

    let mut pos = Position::from_fen("8/4P3/8/8/8/8/k7/4K3 w - - 0 1").unwrap();
    assert_eq!(play(&mut pos, "e7e8n"), "e8=N");
}

#[test]
fn uci_round_trip_text() {
    let pos = Position::startpos();
    let mv = parse_uci_move(&pos, "g1f3").unwrap();
    assert_eq!(move_to_uci(mv), "g1f3");
    assert!(parse_uci_move(&pos, "e2e5").is_none());
    assert!(parse_uci_move(&pos, "zz").is_none());
}
