//! Timing behaviour of the driver, run on a paused clock.

use std::time::Duration;

use chess_core::{Color, Engine, Game, Move, MoveRequest, Square, StandardRules};
use chess_session::{Mode, Session, SessionConfig, SessionDriver, SessionError};
use tokio::time::{Instant, sleep, timeout};

const DELAY: Duration = Duration::from_millis(300);

fn session() -> Session {
    Session::new(&SessionConfig {
        seed: Some(5),
        ..SessionConfig::default()
    })
}

fn request(from: &str, to: &str) -> MoveRequest {
    MoveRequest::new(from.parse::<Square>().unwrap(), to.parse::<Square>().unwrap())
}

#[tokio::test(start_paused = true)]
async fn computer_opens_after_delay() {
    let (handle, _task) = SessionDriver::spawn(session());
    handle.select_mode(Mode::VsComputer).await.unwrap();
    handle.select_player_color(Color::Black).await.unwrap();

    let start = Instant::now();
    let view = handle.view();
    assert!(view.computer_thinking);
    assert!(view.history.is_empty());

    let mut views = handle.subscribe();
    let view = views
        .wait_for(|v| v.history.len() == 1)
        .await
        .unwrap()
        .clone();
    assert!(start.elapsed() >= DELAY);
    assert_eq!(view.turn, Color::Black);
    assert!(!view.computer_thinking);
}

#[tokio::test(start_paused = true)]
async fn mode_change_cancels_pending_computer_move() {
    let (handle, _task) = SessionDriver::spawn(session());
    handle.select_mode(Mode::VsComputer).await.unwrap();
    handle.select_player_color(Color::Black).await.unwrap();

    sleep(Duration::from_millis(100)).await;
    handle.select_mode(Mode::LocalTwoPlayer).await.unwrap();
    sleep(Duration::from_secs(2)).await;

    let view = handle.view();
    assert!(view.history.is_empty());
    assert_eq!(view.turn, Color::White);
    assert!(!view.computer_thinking);
}

#[tokio::test(start_paused = true)]
async fn reset_restarts_the_delay() {
    let (handle, _task) = SessionDriver::spawn(session());
    handle.select_mode(Mode::VsComputer).await.unwrap();
    handle.select_player_color(Color::Black).await.unwrap();

    sleep(Duration::from_millis(100)).await;
    handle.reset().await.unwrap();
    let reset_at = Instant::now();

    sleep(Duration::from_millis(250)).await;
    assert!(handle.view().history.is_empty(), "old timer must not fire");

    let mut views = handle.subscribe();
    views.wait_for(|v| v.history.len() == 1).await.unwrap();
    assert!(reset_at.elapsed() >= DELAY);
}

#[tokio::test(start_paused = true)]
async fn human_move_gets_a_reply() {
    let (handle, _task) = SessionDriver::spawn(session());
    handle.select_mode(Mode::VsComputer).await.unwrap();

    let outcome = handle.attempt_move(request("e2", "e4")).await.unwrap();
    assert_eq!(outcome.notation, "e4");
    assert!(outcome.computer.is_some());

    // The computer's turn: humans are turned away until it has moved.
    assert_eq!(
        handle.attempt_move(request("e7", "e5")).await,
        Err(SessionError::NotHumanTurn)
    );

    let mut views = handle.subscribe();
    let view = views
        .wait_for(|v| v.history.len() == 2)
        .await
        .unwrap()
        .clone();
    assert_eq!(view.turn, Color::White);
    assert_eq!(view.orientation.bottom(), Color::White);
}

#[tokio::test(start_paused = true)]
async fn rejected_event_reports_error() {
    let (handle, _task) = SessionDriver::spawn(session());
    handle.select_mode(Mode::LocalTwoPlayer).await.unwrap();

    assert!(matches!(
        handle.select_player_color(Color::Black).await,
        Err(SessionError::InvalidOperationForMode { .. })
    ));
    assert!(matches!(
        handle.attempt_move(request("e2", "e5")).await,
        Err(SessionError::IllegalMove { .. })
    ));
    assert!(handle.view().history.is_empty());
}

#[tokio::test(start_paused = true)]
async fn shutdown_returns_the_session() {
    let (handle, task) = SessionDriver::spawn(session());
    handle.select_mode(Mode::LocalTwoPlayer).await.unwrap();
    handle.attempt_move(request("g1", "f3")).await.unwrap();
    handle.rotate().await.unwrap();

    handle.shutdown();
    let session = timeout(Duration::from_secs(1), task).await.unwrap().unwrap();
    assert_eq!(session.history().as_slice(), ["Nf3"]);
    // Flipped by the move, then rotated back
    assert_eq!(session.orientation().bottom(), Color::White);

    assert_eq!(handle.reset().await, Err(SessionError::Closed));
}

#[tokio::test(start_paused = true)]
async fn dropping_every_handle_stops_the_loop() {
    let (handle, task) = SessionDriver::spawn(session());
    handle.select_mode(Mode::VsComputer).await.unwrap();
    handle.select_player_color(Color::Black).await.unwrap();
    drop(handle);

    let session = timeout(Duration::from_secs(1), task).await.unwrap().unwrap();
    assert_eq!(session.mode(), Mode::VsComputer);
}

/// Misfires once with a move that is never legal, then plays the first legal move.
struct MisfiringEngine {
    misfired: bool,
}

impl Engine for MisfiringEngine {
    fn choose_move(&mut self, _game: &Game, legal: &[Move]) -> Option<Move> {
        if !self.misfired {
            self.misfired = true;
            return Some(Move::new(0, 56));
        }
        legal.first().copied()
    }

    fn name(&self) -> &str {
        "misfiring"
    }
}

#[tokio::test(start_paused = true)]
async fn refused_computer_move_is_retried() {
    let session = Session::with_parts(
        StandardRules,
        Box::new(MisfiringEngine { misfired: false }),
        &SessionConfig::default(),
    );
    let (handle, _task) = SessionDriver::spawn(session);
    handle.select_mode(Mode::VsComputer).await.unwrap();
    handle.select_player_color(Color::Black).await.unwrap();
    let start = Instant::now();

    let mut views = handle.subscribe();
    views.wait_for(|v| v.history.len() == 1).await.unwrap();
    assert!(start.elapsed() >= DELAY * 2);

    let outcome = handle.attempt_move(request("e7", "e5")).await.unwrap();
    assert_eq!(outcome.mover, Color::Black);
}
