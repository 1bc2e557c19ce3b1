//! Check detection and full legality via simulate-and-restore

use std::ops::Deref;

use super::Rules;
use crate::board::{Board, Color, Move, Piece, Square};

/// A move applied to the board for evaluation only. The board is restored
/// exactly when the guard is dropped, on every exit path.
///
/// En passant lifts the captured pawn too, so pins along the rank are seen.
pub struct SimulatedMove<'a> {
    board: &'a mut Board,
    mv: Move,
    displaced: Option<Piece>,
    victim: Option<(Square, Piece)>,
}

impl<'a> SimulatedMove<'a> {
    pub fn new(board: &'a mut Board, last_move: Option<Move>, mv: Move) -> Self {
        let en_passant = {
            let view: &Board = board;
            view.get(mv.from)
                .is_some_and(|p| Rules::new(view, last_move).is_en_passant(p, mv.from, mv.to))
        };
        let victim = if en_passant {
            let sq = Square::at(mv.from.row, mv.to.col);
            board.take(sq).map(|p| (sq, p))
        } else {
            None
        };

        let moving = board.take(mv.from);
        let displaced = board.replace(mv.to, moving);
        Self {
            board,
            mv,
            displaced,
            victim,
        }
    }
}

impl Deref for SimulatedMove<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl Drop for SimulatedMove<'_> {
    fn drop(&mut self) {
        let moving = self.board.replace(self.mv.to, self.displaced.take());
        self.board.replace(self.mv.from, moving);
        if let Some((sq, piece)) = self.victim.take() {
            self.board.put(sq, piece);
        }
    }
}

/// Whether `color`'s king is attacked. A board without that king is never in check.
pub fn king_in_check(board: &Board, color: Color) -> bool {
    board
        .king_square(color)
        .is_some_and(|k| Rules::new(board, None).is_square_under_attack(k, color))
}

/// Whether playing `mv` keeps the mover's own king out of check.
pub fn is_move_safe(board: &mut Board, last_move: Option<Move>, mv: Move) -> bool {
    let Some(color) = board.get(mv.from).map(|p| p.color) else {
        return false;
    };
    let sim = SimulatedMove::new(board, last_move, mv);
    !king_in_check(&sim, color)
}

fn geometric_moves(board: &Board, last_move: Option<Move>, from: Square) -> Vec<Move> {
    let Some(piece) = board.get(from) else {
        return Vec::new();
    };
    let rules = Rules::new(board, last_move);
    Square::all()
        .filter(|&to| rules.is_legal_geometry(piece, from, to, true))
        .map(|to| Move::new(from, to))
        .collect()
}

/// Every destination of the piece on `from` that is geometrically legal and
/// does not leave its king in check, in row-major order.
pub fn legal_destinations(board: &mut Board, last_move: Option<Move>, from: Square) -> Vec<Square> {
    geometric_moves(board, last_move, from)
        .into_iter()
        .filter(|mv| is_move_safe(board, last_move, *mv))
        .map(|mv| mv.to)
        .collect()
}

/// All legal moves for `color`.
pub fn legal_moves(board: &mut Board, last_move: Option<Move>, color: Color) -> Vec<Move> {
    let origins: Vec<Square> = board
        .pieces()
        .filter(|(_, p)| p.color == color)
        .map(|(sq, _)| sq)
        .collect();

    let mut moves = Vec::new();
    for from in origins {
        for mv in geometric_moves(board, last_move, from) {
            if is_move_safe(board, last_move, mv) {
                moves.push(mv);
            }
        }
    }
    moves
}

/// Stops at the first legal move found.
pub fn has_any_legal_move(board: &mut Board, last_move: Option<Move>, color: Color) -> bool {
    let origins: Vec<Square> = board
        .pieces()
        .filter(|(_, p)| p.color == color)
        .map(|(sq, _)| sq)
        .collect();

    origins.into_iter().any(|from| {
        geometric_moves(board, last_move, from)
            .into_iter()
            .any(|mv| is_move_safe(board, last_move, mv))
    })
}
