//! Append-only record of the moves played in the current game.

use std::fmt;

use serde::Serialize;

/// SAN of every applied move, in order. Only a new game clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MoveHistory {
    moves: Vec<String>,
}

/// One numbered line of the score sheet: White's move and Black's reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Turn<'a> {
    pub number: usize,
    pub white: &'a str,
    pub black: Option<&'a str>,
}

impl MoveHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notation: impl Into<String>) {
        self.moves.push(notation.into());
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn last(&self) -> Option<&str> {
        self.moves.last().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.moves
    }

    /// Moves paired into numbered turns, starting at 1.
    pub fn turns(&self) -> impl Iterator<Item = Turn<'_>> {
        self.moves.chunks(2).enumerate().map(|(i, pair)| Turn {
            number: i + 1,
            white: &pair[0],
            black: pair.get(1).map(String::as_str),
        })
    }
}

/// Renders as `1. e4 e5 2. Nf3`.
impl fmt::Display for MoveHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, turn) in self.turns().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}. {}", turn.number, turn.white)?;
            if let Some(black) = turn.black {
                write!(f, " {black}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(moves: &[&str]) -> MoveHistory {
        let mut h = MoveHistory::new();
        for m in moves {
            h.push(*m);
        }
        h
    }

    #[test]
    fn pairs_moves_into_turns() {
        let h = history(&["e4", "e5", "Nf3"]);
        let turns: Vec<_> = h.turns().collect();
        assert_eq!(
            turns,
            vec![
                Turn {
                    number: 1,
                    white: "e4",
                    black: Some("e5")
                },
                Turn {
                    number: 2,
                    white: "Nf3",
                    black: None
                },
            ]
        );
    }

    #[test]
    fn renders_score_sheet() {
        assert_eq!(history(&[]).to_string(), "");
        assert_eq!(history(&["e4"]).to_string(), "1. e4");
        assert_eq!(
            history(&["f3", "e5", "g4", "Qh4#"]).to_string(),
            "1. f3 e5 2. g4 Qh4#"
        );
    }

    #[test]
    fn clear_empties_the_log() {
        let mut h = history(&["e4", "e5"]);
        assert_eq!(h.last(), Some("e5"));
        h.clear();
        assert!(h.is_empty());
        assert_eq!(h.last(), None);
    }

    #[test]
    fn serializes_as_plain_list() {
        let h = history(&["e4", "e5"]);
        assert_eq!(serde_json::to_string(&h).unwrap(), r#"["e4","e5"]"#);
    }
}
