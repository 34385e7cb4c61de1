//! Single-threaded event loop around a [`Session`].
//!
//! Commands are drained from one queue and handled to completion one at a
//! time. The computer's thinking delay is a timer task that posts back into
//! the same queue, so it can never interleave with a human event. Its abort
//! handle is dropped by every reset, mode or colour change, and the ticket
//! check in [`Session::play_computer_move`] catches anything already queued.

use chess_core::{Color, MoveRequest, RulesEngine};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, warn};

use crate::computer::ComputerTicket;
use crate::error::SessionError;
use crate::session::{Mode, MoveOutcome, Session};
use crate::view::SessionView;

/// External events the presentation layer can send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    SelectMode(Mode),
    SelectPlayerColor(Color),
    AttemptMove(MoveRequest),
    Rotate,
    Reset,
}

impl Event {
    /// Events that start a new game and so must cancel the computer first.
    fn restarts_game(&self) -> bool {
        matches!(
            self,
            Event::SelectMode(_) | Event::SelectPlayerColor(_) | Event::Reset
        )
    }
}

pub type Reply = Result<Option<MoveOutcome>, SessionError>;

enum Command {
    Event(Event, oneshot::Sender<Reply>),
    ComputerMoveDue(ComputerTicket),
    Shutdown,
}

/// Owns the session and runs the loop. Create with [`SessionDriver::new`],
/// then `run` it (or use [`SessionDriver::spawn`]).
pub struct SessionDriver<R> {
    session: Session<R>,
    rx: mpsc::UnboundedReceiver<Command>,
    // Weak, so the loop ends once every handle is dropped.
    tx: mpsc::WeakUnboundedSender<Command>,
    timer: Option<AbortHandle>,
    views: watch::Sender<SessionView>,
}

/// Cheap, cloneable front door to a running [`SessionDriver`].
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<Command>,
    views: watch::Receiver<SessionView>,
}

impl<R> SessionDriver<R>
where
    R: RulesEngine + Send + 'static,
{
    pub fn new(session: Session<R>) -> (Self, SessionHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (views, view_rx) = watch::channel(SessionView::capture(&session));
        let driver = Self {
            session,
            rx,
            tx: tx.downgrade(),
            timer: None,
            views,
        };
        let handle = SessionHandle { tx, views: view_rx };
        (driver, handle)
    }

    /// Spawn the loop on the current runtime.
    pub fn spawn(session: Session<R>) -> (SessionHandle, JoinHandle<Session<R>>) {
        let (driver, handle) = Self::new(session);
        (handle, tokio::spawn(driver.run()))
    }

    /// Process commands until shutdown or until every handle is gone.
    /// Returns the session for inspection.
    pub async fn run(mut self) -> Session<R> {
        // A session configured to start against the computer may already be armed.
        if let Some(ticket) = self.session.pending_computer_move() {
            self.schedule(ticket);
        }

        while let Some(command) = self.rx.recv().await {
            match command {
                Command::Event(event, reply) => {
                    let result = self.handle(event);
                    // The caller may have stopped waiting; that's fine.
                    let _ = reply.send(result);
                }
                Command::ComputerMoveDue(ticket) => self.computer_move_due(ticket),
                Command::Shutdown => break,
            }
            self.publish();
        }

        self.cancel_timer();
        self.session
    }

    fn handle(&mut self, event: Event) -> Reply {
        if event.restarts_game() {
            self.cancel_timer();
        }

        let (outcome, ticket) = match event {
            Event::SelectMode(mode) => (None, self.session.select_mode(mode)),
            Event::SelectPlayerColor(color) => (None, self.session.select_player_color(color)?),
            Event::Reset => (None, self.session.reset()),
            Event::Rotate => {
                self.session.rotate();
                (None, None)
            }
            Event::AttemptMove(request) => {
                let outcome = self.session.attempt(request)?;
                let ticket = outcome.computer;
                (Some(outcome), ticket)
            }
        };

        if let Some(ticket) = ticket {
            self.schedule(ticket);
        }
        Ok(outcome)
    }

    fn computer_move_due(&mut self, ticket: ComputerTicket) {
        self.timer = None;
        match self.session.play_computer_move(ticket) {
            Ok(Some(outcome)) => {
                if let Some(next) = outcome.computer {
                    self.schedule(next);
                }
            }
            Ok(None) => debug!(%ticket, "computer had nothing to play"),
            Err(SessionError::StaleComputerMove { .. }) => {
                debug!(%ticket, "ignoring stale computer move")
            }
            Err(error) => {
                warn!(%ticket, %error, "computer move failed");
                // A refused move leaves the ticket pending; try again after the delay.
                if let Some(pending) = self.session.pending_computer_move() {
                    self.schedule(pending);
                }
            }
        }
    }

    fn schedule(&mut self, ticket: ComputerTicket) {
        self.cancel_timer();
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(ticket.delay).await;
            if let Some(tx) = tx.upgrade() {
                let _ = tx.send(Command::ComputerMoveDue(ticket));
            }
        });
        self.timer = Some(task.abort_handle());
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    /// Notify subscribers only when something visible changed.
    fn publish(&self) {
        let next = SessionView::capture(&self.session);
        self.views.send_if_modified(|view| {
            if *view == next {
                return false;
            }
            *view = next;
            true
        });
    }
}

impl SessionHandle {
    /// Send `event` and wait for the loop to handle it.
    pub async fn dispatch(&self, event: Event) -> Reply {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Command::Event(event, reply_tx))
            .map_err(|_| SessionError::Closed)?;
        reply_rx.await.map_err(|_| SessionError::Closed)?
    }

    pub async fn select_mode(&self, mode: Mode) -> Result<(), SessionError> {
        self.dispatch(Event::SelectMode(mode)).await.map(|_| ())
    }

    pub async fn select_player_color(&self, color: Color) -> Result<(), SessionError> {
        self.dispatch(Event::SelectPlayerColor(color)).await.map(|_| ())
    }

    pub async fn reset(&self) -> Result<(), SessionError> {
        self.dispatch(Event::Reset).await.map(|_| ())
    }

    pub async fn rotate(&self) -> Result<(), SessionError> {
        self.dispatch(Event::Rotate).await.map(|_| ())
    }

    pub async fn attempt_move(&self, request: MoveRequest) -> Result<MoveOutcome, SessionError> {
        match self.dispatch(Event::AttemptMove(request)).await? {
            Some(outcome) => Ok(outcome),
            None => Err(SessionError::Closed),
        }
    }

    /// Latest published state.
    pub fn view(&self) -> SessionView {
        self.views.borrow().clone()
    }

    /// Receiver that is notified after every processed command.
    pub fn subscribe(&self) -> watch::Receiver<SessionView> {
        self.views.clone()
    }

    /// Stop the loop after the commands already queued.
    pub fn shutdown(&self) {
        let _ = self.tx.send(Command::Shutdown);
    }
}
