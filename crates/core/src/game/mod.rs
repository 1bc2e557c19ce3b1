//! Game state, move execution, undo history and selection

mod clock;
mod events;
mod history;
mod quality;
mod state;
mod types;

pub use clock::GameClock;
pub use events::{GameEvent, SoundCue};
pub use history::{History, HistorySnapshot};
pub use quality::{classify, MoveQuality, QualityInput};
pub use state::{Game, GameView, MoveOutcome, SelectOutcome};
pub use types::{CapturedPieces, Winner};
