//! Text board rendering

use std::fmt;

use chess_core::{Color, FenError, Piece, PieceKind, Position};
use chess_session::SessionView;

/// Renders a position with `bottom` nearest the player.
pub struct BoardView<'a> {
    position: &'a Position,
    bottom: Color,
}

impl<'a> BoardView<'a> {
    pub fn new(position: &'a Position, bottom: Color) -> Self {
        Self { position, bottom }
    }
}

impl fmt::Display for BoardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flipped = self.bottom == Color::Black;

        for rank in 0..8u8 {
            let display_rank = if flipped { rank } else { 7 - rank };
            write!(f, "{} ", display_rank + 1)?;

            for file in 0..8u8 {
                let display_file = if flipped { 7 - file } else { file };
                let sq = display_rank * 8 + display_file;
                let glyph = match self.position.piece_at(sq) {
                    Some(piece) => piece_char(piece),
                    None if (display_rank + display_file) % 2 == 0 => '·',
                    None => ' ',
                };
                write!(f, " {glyph}")?;
            }
            writeln!(f)?;
        }

        let files: String = if flipped {
            "hgfedcba".chars().flat_map(|c| [' ', c]).collect()
        } else {
            "abcdefgh".chars().flat_map(|c| [' ', c]).collect()
        };
        write!(f, "  {files}")
    }
}

pub fn piece_char(piece: Piece) -> char {
    match (piece.color, piece.kind) {
        (Color::White, PieceKind::King) => '♔',
        (Color::White, PieceKind::Queen) => '♕',
        (Color::White, PieceKind::Rook) => '♖',
        (Color::White, PieceKind::Bishop) => '♗',
        (Color::White, PieceKind::Knight) => '♘',
        (Color::White, PieceKind::Pawn) => '♙',
        (Color::Black, PieceKind::King) => '♚',
        (Color::Black, PieceKind::Queen) => '♛',
        (Color::Black, PieceKind::Rook) => '♜',
        (Color::Black, PieceKind::Bishop) => '♝',
        (Color::Black, PieceKind::Knight) => '♞',
        (Color::Black, PieceKind::Pawn) => '♟',
    }
}

/// Full screen for one view: board, mode panel, history and banner.
pub fn render(view: &SessionView) -> Result<String, FenError> {
    let position = Position::from_fen(&view.fen)?;
    let mut out = BoardView::new(&position, view.orientation.bottom()).to_string();
    out.push('\n');

    for line in view.mode_description() {
        out.push_str(&line);
        out.push('\n');
    }
    if !view.history.is_empty() {
        out.push_str(&format!("Moves: {}\n", view.history));
    }
    match view.banner() {
        Some(banner) => out.push_str(&format!("*** {banner} ***\n")),
        None if view.computer_thinking => out.push_str("Computer is thinking...\n"),
        None => out.push_str(&format!("{} to move\n", view.turn)),
    }
    Ok(out)
}
