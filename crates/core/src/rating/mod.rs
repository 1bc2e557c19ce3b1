//! ELO ratings and the per-session profile context

mod elo;
mod session;

pub use elo::{
    expected_score, rating_changes, EloChange, EloSnapshot, RatingRecord, DEFAULT_RATING, K_FACTOR,
};
pub use session::SessionContext;
