//! Single-ply heuristic opponent and its think-delay scheduling

mod scheduler;
mod selector;

pub use scheduler::AiScheduler;
pub use selector::{AiPlayer, Difficulty, ScoredMove};
