//! Per-piece movement geometry, path blocking and castling preconditions

use crate::board::{Board, Color, Move, Piece, PieceKind, Square};

/// Read-only view of a position for legality queries.
///
/// `last_move` is only consulted for en passant.
#[derive(Debug, Clone, Copy)]
pub struct Rules<'a> {
    board: &'a Board,
    last_move: Option<Move>,
}

impl<'a> Rules<'a> {
    pub fn new(board: &'a Board, last_move: Option<Move>) -> Self {
        Self { board, last_move }
    }

    pub fn board(&self) -> &'a Board {
        self.board
    }

    /// Geometric legality of `piece` going `from` -> `to`. Does not consider
    /// whether the mover's own king is left in check.
    ///
    /// `allow_castle` is false when computing attacks, so castling never
    /// depends on itself.
    pub fn is_legal_geometry(
        &self,
        piece: &Piece,
        from: Square,
        to: Square,
        allow_castle: bool,
    ) -> bool {
        if from == to {
            return false;
        }
        if let Some(target) = self.board.get(to) {
            if target.color == piece.color {
                return false;
            }
        }

        let dr = to.row as i32 - from.row as i32;
        let dc = to.col as i32 - from.col as i32;

        match piece.kind {
            PieceKind::Pawn => self.pawn_move(piece, from, to, dr, dc),
            PieceKind::Knight => {
                (dr.abs() == 2 && dc.abs() == 1) || (dr.abs() == 1 && dc.abs() == 2)
            }
            PieceKind::Bishop => dr.abs() == dc.abs() && !self.is_path_blocked(from, to),
            PieceKind::Rook => (dr == 0 || dc == 0) && !self.is_path_blocked(from, to),
            PieceKind::Queen => {
                (dr == 0 || dc == 0 || dr.abs() == dc.abs()) && !self.is_path_blocked(from, to)
            }
            PieceKind::King => {
                if dr.abs() <= 1 && dc.abs() <= 1 {
                    return true;
                }
                allow_castle && dr == 0 && dc.abs() == 2 && self.can_castle(piece, from, dc > 0)
            }
        }
    }

    fn pawn_move(&self, piece: &Piece, from: Square, to: Square, dr: i32, dc: i32) -> bool {
        let dir = piece.color.pawn_direction();
        let target = self.board.get(to);

        if dc == 0 && dr == dir {
            return target.is_none();
        }
        if dc == 0 && dr == 2 * dir {
            let between = Square::at((from.row as i32 + dir) as u8, from.col);
            return from.row == piece.color.pawn_start_row()
                && target.is_none()
                && self.board.is_empty(between);
        }
        if dc.abs() == 1 && dr == dir {
            return match target {
                Some(t) => t.color != piece.color,
                None => self.is_en_passant(piece, from, to),
            };
        }
        false
    }

    /// True when a diagonal pawn step onto an empty square captures the pawn
    /// that advanced two squares on the immediately preceding move.
    pub fn is_en_passant(&self, piece: &Piece, from: Square, to: Square) -> bool {
        let Some(last) = self.last_move else {
            return false;
        };
        if piece.kind != PieceKind::Pawn || !self.board.is_empty(to) {
            return false;
        }
        let victim_sq = Square::at(from.row, to.col);
        let victim_is_enemy_pawn = self
            .board
            .get(victim_sq)
            .is_some_and(|v| v.kind == PieceKind::Pawn && v.color != piece.color);

        last.to == victim_sq && last.row_delta().abs() == 2 && victim_is_enemy_pawn
    }

    fn can_castle(&self, king: &Piece, from: Square, kingside: bool) -> bool {
        let row = king.color.back_rank();
        if king.has_moved || from.row != row || from.col != 4 {
            return false;
        }
        if self.is_square_under_attack(from, king.color) {
            return false;
        }

        let (rook_col, step) = if kingside { (7u8, 1i32) } else { (0u8, -1i32) };
        let rook_sq = Square::at(row, rook_col);
        let rook_ok = self
            .board
            .get(rook_sq)
            .is_some_and(|r| r.is(PieceKind::Rook, king.color) && !r.has_moved);
        if !rook_ok || self.is_path_blocked(from, rook_sq) {
            return false;
        }

        let pass = Square::at(row, (4 + step) as u8);
        let dest = Square::at(row, (4 + 2 * step) as u8);
        !self.is_square_under_attack(pass, king.color)
            && !self.is_square_under_attack(dest, king.color)
    }

    /// Whether any square strictly between `from` and `to` is occupied.
    /// Only meaningful for squares sharing a rank, file or diagonal.
    pub fn is_path_blocked(&self, from: Square, to: Square) -> bool {
        let dr = (to.row as i32 - from.row as i32).signum();
        let dc = (to.col as i32 - from.col as i32).signum();
        let mut r = from.row as i32 + dr;
        let mut c = from.col as i32 + dc;
        while (r, c) != (to.row as i32, to.col as i32) {
            if !self.board.is_empty(Square::at(r as u8, c as u8)) {
                return true;
            }
            r += dr;
            c += dc;
        }
        false
    }

    /// Whether a piece of the color opposing `defender` could move onto `sq`.
    /// Pawns only attack diagonally forward.
    pub fn is_square_under_attack(&self, sq: Square, defender: Color) -> bool {
        let attacker = defender.opposite();
        self.board
            .pieces()
            .filter(|(_, p)| p.color == attacker)
            .any(|(from, piece)| match piece.kind {
                PieceKind::Pawn => {
                    from.row as i32 + attacker.pawn_direction() == sq.row as i32
                        && (from.col as i32 - sq.col as i32).abs() == 1
                }
                _ => self.is_legal_geometry(piece, from, sq, false),
            })
    }
}
