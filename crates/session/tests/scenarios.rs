//! End-to-end play through the public session API.

use chess_core::{Color, RulesEngine, StandardRules, Termination};
use chess_session::{Mode, Session, SessionConfig, SessionError, SessionView, Status};

fn session(mode: Mode) -> Session {
    let mut session = Session::new(&SessionConfig {
        seed: Some(11),
        ..SessionConfig::default()
    });
    session.select_mode(mode);
    session
}

#[test]
fn friends_trade_king_pawns() {
    let mut session = session(Mode::LocalTwoPlayer);

    session.attempt_move_str("e2", "e4").unwrap();
    assert_eq!(session.orientation().bottom(), Color::Black);
    session.attempt_move_str("e7", "e5").unwrap();

    assert_eq!(session.history().as_slice(), ["e4", "e5"]);
    assert_eq!(session.turn(), Color::White);
    assert_eq!(session.orientation().bottom(), Color::White);
    assert_eq!(session.history().to_string(), "1. e4 e5");
}

#[test]
fn computer_opens_for_black_player() {
    let mut session = session(Mode::VsComputer);
    let ticket = session
        .select_player_color(Color::Black)
        .unwrap()
        .expect("computer to move first");

    let outcome = session.play_computer_move(ticket).unwrap().unwrap();
    assert_eq!(outcome.mover, Color::White);
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.turn(), Color::Black);
    assert_eq!(session.orientation().bottom(), Color::Black);
    assert_eq!(session.pending_computer_move(), None);
}

#[test]
fn fools_mate_ends_the_game() {
    let mut session = session(Mode::LocalTwoPlayer);
    for (from, to) in [("f2", "f3"), ("e7", "e5"), ("g2", "g4")] {
        session.attempt_move_str(from, to).unwrap();
    }
    let mate = session.attempt_move_str("d8", "h4").unwrap();

    assert_eq!(mate.notation, "Qh4#");
    let over = Status::Over(Termination::Checkmate {
        winner: Color::Black,
    });
    assert_eq!(session.status(), &over);
    assert_eq!(session.status().banner(), Some("Checkmate!"));
    assert_eq!(
        session.attempt_move_str("a2", "a3"),
        Err(SessionError::GameNotActive)
    );

    // Reset starts over in the same mode
    session.reset();
    assert_eq!(session.status(), &Status::Active);
    assert!(session.history().is_empty());
}

#[test]
fn illegal_move_leaves_everything_alone() {
    let mut session = session(Mode::LocalTwoPlayer);
    let before = SessionView::capture(&session);

    let err = session.attempt_move_str("e2", "e5").unwrap_err();
    assert_eq!(err.to_string(), "illegal move e2e5");
    assert_eq!(SessionView::capture(&session), before);
}

#[test]
fn computer_game_plays_to_completion() {
    let mut session = session(Mode::VsComputer);
    let mut ticket = session.select_player_color(Color::Black).unwrap();

    // Let the computer play both sides by answering with its own choices.
    let mut plies = 0;
    while let Some(t) = ticket {
        let Some(outcome) = session.play_computer_move(t).unwrap() else {
            break;
        };
        plies += 1;
        if outcome.status.is_over() || plies >= 40 {
            break;
        }
        // Human side: play the first legal move the rules engine offers.
        assert_eq!(session.turn(), Color::Black);
        let reply = StandardRules
            .legal_moves(session.game())
            .first()
            .map(|mv| mv.request())
            .expect("black has a move");
        let outcome = session.attempt(reply).unwrap();
        plies += 1;
        ticket = outcome.computer;
    }

    assert_eq!(session.history().len(), plies);
    assert!(session.history().turns().count() >= plies / 2);
}

#[test]
fn view_serializes_for_clients() {
    let mut session = session(Mode::VsComputer);
    session.attempt_move_str("d2", "d4").unwrap();
    let view = SessionView::capture(&session);

    assert!(view.computer_thinking);
    assert_eq!(
        view.mode_description(),
        ["Playing with Computer", "Playing as: White"]
    );
    let json: serde_json::Value = serde_json::from_str(&view.to_json().unwrap()).unwrap();
    assert_eq!(json["history"][0], "d4");
    assert_eq!(json["mode"], "vs_computer");
    assert_eq!(json["status"]["state"], "active");
    assert_eq!(json["turn"], "black");
}
