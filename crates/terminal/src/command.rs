//! Line-oriented commands typed at the prompt.

use chess_core::{Color, MoveRequest, Square};
use chess_session::{Event, Mode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Event(Event),
    Show,
    Json,
    History,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  mode friend|computer   start a new game in that mode
  color white|black      choose your side against the computer
  move e2 e4             move a piece (also: e2e4); pawns promote to queens
  rotate                 flip the board
  reset                  start over in the current mode
  show | json | history  print the board, the state as JSON, or the moves
  help | quit";

impl Input {
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(Input::Show);
        };
        let args: Vec<&str> = words.collect();

        let input = match (head.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("mode", [mode]) => Input::Event(Event::SelectMode(mode.parse::<Mode>()?)),
            ("color" | "colour", [color]) => {
                Input::Event(Event::SelectPlayerColor(color.parse::<Color>()?))
            }
            ("move" | "m", [from, to]) => Input::Event(Event::AttemptMove(parse_squares(from, to)?)),
            ("move" | "m", [joined]) => Input::Event(Event::AttemptMove(parse_joined(joined)?)),
            ("rotate" | "flip", []) => Input::Event(Event::Rotate),
            ("reset" | "new", []) => Input::Event(Event::Reset),
            ("show" | "board", []) => Input::Show,
            ("json" | "state", []) => Input::Json,
            ("history" | "moves", []) => Input::History,
            ("help" | "?", []) => Input::Help,
            ("quit" | "exit" | "q", []) => Input::Quit,
            // Bare coordinates, e.g. "e2e4"
            (joined, []) if joined.len() >= 4 => Input::Event(Event::AttemptMove(parse_joined(joined)?)),
            _ => return Err(format!("unrecognised command '{}', try 'help'", line.trim())),
        };
        Ok(input)
    }
}

fn parse_square(text: &str) -> Result<Square, String> {
    text.parse().map_err(|_| format!("'{text}' is not a square"))
}

/// Promotion is left unset so the rules engine makes it a queen.
fn parse_squares(from: &str, to: &str) -> Result<MoveRequest, String> {
    Ok(MoveRequest::new(parse_square(from)?, parse_square(to)?))
}

fn parse_joined(text: &str) -> Result<MoveRequest, String> {
    if !text.is_ascii() || text.len() != 4 {
        return Err(format!("'{text}' is not a move"));
    }
    parse_squares(&text[..2], &text[2..])
}
