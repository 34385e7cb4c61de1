use chess_core::Termination;
use tracing::debug;

/// Fire-and-forget hook run once when a game ends, e.g. confetti in a GUI.
pub trait Celebration: Send {
    fn celebrate(&mut self, termination: &Termination);
}

/// Default hook. The session already logs the result, so this only traces.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogCelebration;

impl Celebration for LogCelebration {
    fn celebrate(&mut self, termination: &Termination) {
        debug!(?termination, "no celebration configured");
    }
}

