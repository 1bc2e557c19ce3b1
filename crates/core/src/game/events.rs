//! Outbound signals raised by the move executor

use serde::{Deserialize, Serialize};

use super::{MoveQuality, Winner};
use crate::board::{Color, Move};

/// Which sound a host should play after a move. Playback is the host's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCue {
    Move,
    Capture,
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    MoveCompleted {
        mv: Move,
        notation: String,
        quality: MoveQuality,
        sound: SoundCue,
    },
    /// Raised after every applied move once the turn has flipped.
    TurnChanged { to_move: Color },
    /// Raised once per transition from no winner to a winner.
    GameEnded { winner: Winner },
}
