//! The 8x8 grid

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Color, Piece, PieceKind, Square};
use crate::error::{Error, Result};

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Cells own their pieces; cloning the board is a deep copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [[Option<Piece>; 8]; 8],
}

impl Board {
    pub fn empty() -> Self {
        Self {
            cells: [[None; 8]; 8],
        }
    }

    /// Standard starting position.
    pub fn standard() -> Self {
        let mut board = Self::empty();
        for (col, kind) in BACK_RANK.iter().enumerate() {
            board.cells[0][col] = Some(Piece::new(*kind, Color::Black));
            board.cells[1][col] = Some(Piece::new(PieceKind::Pawn, Color::Black));
            board.cells[6][col] = Some(Piece::new(PieceKind::Pawn, Color::White));
            board.cells[7][col] = Some(Piece::new(*kind, Color::White));
        }
        board
    }

    /// Builds a board from the placement field of a FEN string (any further
    /// fields are ignored). Kings and rooks away from their home squares are
    /// marked as moved so they cannot castle.
    pub fn from_placement(fen: &str) -> Result<Self> {
        let placement = fen.split_whitespace().next().unwrap_or("");
        let rows: Vec<&str> = placement.split('/').collect();
        if rows.len() != 8 {
            return Err(Error::Notation(format!("expected 8 ranks in '{}'", placement)));
        }

        let mut board = Self::empty();
        for (row, text) in rows.iter().enumerate() {
            let mut col = 0usize;
            for c in text.chars() {
                if let Some(skip) = c.to_digit(10) {
                    col += skip as usize;
                    continue;
                }
                let mut piece = Piece::from_letter(c)
                    .ok_or_else(|| Error::Notation(format!("bad piece letter '{}'", c)))?;
                if col >= 8 {
                    return Err(Error::Notation(format!("rank '{}' is too long", text)));
                }
                piece.has_moved = !is_home_square(&piece, row as u8, col as u8);
                board.cells[row][col] = Some(piece);
                col += 1;
            }
            if col != 8 {
                return Err(Error::Notation(format!("rank '{}' does not span 8 files", text)));
            }
        }

        for color in [Color::White, Color::Black] {
            let kings = board
                .pieces()
                .filter(|(_, p)| p.is(PieceKind::King, color))
                .count();
            if kings != 1 {
                return Err(Error::Notation(format!("{} has {} kings", color, kings)));
            }
        }
        Ok(board)
    }

    pub fn get(&self, sq: Square) -> Option<&Piece> {
        self.cells[sq.row as usize][sq.col as usize].as_ref()
    }

    pub fn get_mut(&mut self, sq: Square) -> Option<&mut Piece> {
        self.cells[sq.row as usize][sq.col as usize].as_mut()
    }

    pub fn is_empty(&self, sq: Square) -> bool {
        self.get(sq).is_none()
    }

    /// Puts `piece` on `sq` and returns the previous occupant.
    pub fn replace(&mut self, sq: Square, piece: Option<Piece>) -> Option<Piece> {
        std::mem::replace(&mut self.cells[sq.row as usize][sq.col as usize], piece)
    }

    pub fn take(&mut self, sq: Square) -> Option<Piece> {
        self.replace(sq, None)
    }

    pub fn put(&mut self, sq: Square, piece: Piece) {
        self.replace(sq, Some(piece));
    }

    /// Occupied squares in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, &Piece)> + '_ {
        Square::all().filter_map(move |sq| self.get(sq).map(|p| (sq, p)))
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces()
            .find(|(_, p)| p.is(PieceKind::King, color))
            .map(|(sq, _)| sq)
    }

    pub fn rows(&self) -> &[[Option<Piece>; 8]; 8] {
        &self.cells
    }

    pub fn piece_count(&self) -> usize {
        self.pieces().count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

fn is_home_square(piece: &Piece, row: u8, col: u8) -> bool {
    let back = piece.color.back_rank();
    match piece.kind {
        PieceKind::King => row == back && col == 4,
        PieceKind::Rook => row == back && (col == 0 || col == 7),
        _ => true,
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, cells) in self.cells.iter().enumerate() {
            write!(f, "{} ", 8 - row)?;
            for cell in cells {
                let c = cell.map(|p| p.letter()).unwrap_or('.');
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        write!(f, "  abcdefgh")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_layout() {
        let board = Board::standard();
        assert_eq!(board.piece_count(), 32);
        let e1 = "e1".parse().unwrap();
        assert!(board.get(e1).unwrap().is(PieceKind::King, Color::White));
        let d8 = "d8".parse().unwrap();
        assert!(board.get(d8).unwrap().is(PieceKind::Queen, Color::Black));
        assert_eq!(board.king_square(Color::Black), Some("e8".parse().unwrap()));
    }

    #[test]
    fn test_from_placement_matches_standard() {
        let board =
            Board::from_placement("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
                .unwrap();
        assert_eq!(board, Board::standard());
    }

    #[test]
    fn test_from_placement_marks_displaced_king() {
        let board = Board::from_placement("8/8/8/8/8/8/8/R3K1k1").unwrap();
        let king = board.get("e1".parse().unwrap()).unwrap();
        assert!(!king.has_moved);
        let black_king = board.get("g1".parse().unwrap()).unwrap();
        assert!(black_king.has_moved);
    }

    #[test]
    fn test_from_placement_rejects_missing_king() {
        assert!(Board::from_placement("8/8/8/8/8/8/8/4K3").is_err());
        assert!(Board::from_placement("8/8/8").is_err());
    }

    #[test]
    fn test_clone_is_deep() {
        let mut board = Board::standard();
        let snapshot = board.clone();
        board.get_mut("a1".parse().unwrap()).unwrap().has_moved = true;
        assert!(!snapshot.get("a1".parse().unwrap()).unwrap().has_moved);
    }
}
