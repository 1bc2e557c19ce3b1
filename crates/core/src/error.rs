//! Error types for chess-duel-core

use thiserror::Error;

use crate::board::{Color, PieceKind, Square};

#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("square ({row}, {col}) is off the board")]
    InvalidSquare { row: i32, col: i32 },

    #[error("no piece on {0}")]
    EmptySquare(Square),

    #[error("{found} piece moved while {expected} is to move")]
    NotYourTurn { expected: Color, found: Color },

    #[error("game is already over")]
    GameOver,

    #[error("cannot promote to {0:?}")]
    InvalidPromotion(PieceKind),

    #[error("bad coordinate notation: {0}")]
    Notation(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
