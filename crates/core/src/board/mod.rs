//! Board model: pieces, squares and the 8x8 grid

mod grid;
mod piece;
mod square;

pub use grid::Board;
pub use piece::{Color, Piece, PieceKind};
pub use square::{Move, Square};
