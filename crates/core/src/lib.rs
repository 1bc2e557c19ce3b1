//! Chess Duel Core Library
//!
//! Rules engine for two-seat chess: board model, legality and check
//! detection, move execution with undo, a heuristic computer opponent and
//! ELO tracking for the two seats.

pub mod ai;
pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod rating;
pub mod rules;
pub mod storage;

pub use ai::{AiPlayer, AiScheduler, Difficulty};
pub use board::{Board, Color, Move, Piece, PieceKind, Square};
pub use config::EngineConfig;
pub use error::{Error, Result};
pub use game::{Game, GameEvent, MoveOutcome, MoveQuality, SelectOutcome, Winner};
pub use rating::{EloChange, RatingRecord, SessionContext};
pub use storage::{Database, MemoryStore, RatingStore};

/// Basic position information
#[derive(Debug)]
pub struct PositionInfo {
    pub piece_count: u32,
    pub legal_move_count: u32,
    pub side_to_move: Color,
    pub is_check: bool,
    pub is_checkmate: bool,
    pub is_stalemate: bool,
}

/// Summarises the position of a game for its side to move
pub fn analyze_position(game: &mut Game) -> PositionInfo {
    let side_to_move = game.turn();
    let piece_count = game.board().piece_count() as u32;
    let legal_move_count = game.all_legal_moves(side_to_move).len() as u32;
    let is_check = game.king_in_check(side_to_move);

    PositionInfo {
        piece_count,
        legal_move_count,
        side_to_move,
        is_check,
        is_checkmate: is_check && legal_move_count == 0,
        is_stalemate: !is_check && legal_move_count == 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_position() {
        let mut game = Game::new();
        let info = analyze_position(&mut game);

        assert_eq!(info.piece_count, 32);
        assert_eq!(info.side_to_move, Color::White);
        // 16 pawn moves + 4 knight moves
        assert_eq!(info.legal_move_count, 20);
        assert!(!info.is_check);
        assert!(!info.is_checkmate);
        assert!(!info.is_stalemate);
    }
}
