//! Outcome and capture bookkeeping types

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::board::{Color, Piece};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    White,
    Black,
    Draw,
}

impl Winner {
    pub fn side(color: Color) -> Self {
        match color {
            Color::White => Winner::White,
            Color::Black => Winner::Black,
        }
    }

    /// Score from white's point of view: 1, 0 or 0.5.
    pub fn white_result(self) -> f64 {
        match self {
            Winner::White => 1.0,
            Winner::Black => 0.0,
            Winner::Draw => 0.5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Winner::White => "white",
            Winner::Black => "black",
            Winner::Draw => "draw",
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pieces taken, listed under the side that captured them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedPieces {
    pub white: Vec<Piece>,
    pub black: Vec<Piece>,
}

impl CapturedPieces {
    pub fn by(&self, color: Color) -> &[Piece] {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    pub fn push(&mut self, captor: Color, piece: Piece) {
        match captor {
            Color::White => self.white.push(piece),
            Color::Black => self.black.push(piece),
        }
    }

    /// Material won by `captor`.
    pub fn score(&self, captor: Color) -> i32 {
        self.by(captor).iter().map(|p| p.kind.value()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::PieceKind;

    #[test]
    fn test_material_score() {
        let mut captured = CapturedPieces::default();
        captured.push(Color::White, Piece::new(PieceKind::Queen, Color::Black));
        captured.push(Color::White, Piece::new(PieceKind::Pawn, Color::Black));
        captured.push(Color::Black, Piece::new(PieceKind::Knight, Color::White));
        assert_eq!(captured.score(Color::White), 10);
        assert_eq!(captured.score(Color::Black), 3);
    }
}
