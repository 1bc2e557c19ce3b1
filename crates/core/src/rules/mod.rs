//! Move legality, attack detection and terminal-state detection

mod check;
mod geometry;

pub use check::{
    has_any_legal_move, is_move_safe, king_in_check, legal_destinations, legal_moves,
    SimulatedMove,
};
pub use geometry::Rules;
