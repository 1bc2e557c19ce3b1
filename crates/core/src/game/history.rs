//! Undo stack of deep-copied positions

use serde::{Deserialize, Serialize};

use super::{CapturedPieces, MoveQuality};
use crate::board::{Board, Color, Move};

/// State after a move. Holds its own copies, never references live state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub board: Board,
    pub captured: CapturedPieces,
    pub turn: Color,
    pub is_check: bool,
    pub last_move: Option<Move>,
    /// Empty for the seed entry.
    pub notation: String,
    pub quality: Option<MoveQuality>,
}

impl HistorySnapshot {
    pub fn initial(board: Board) -> Self {
        Self {
            board,
            captured: CapturedPieces::default(),
            turn: Color::White,
            is_check: false,
            last_move: None,
            notation: String::new(),
            quality: None,
        }
    }
}

/// Never empty: the first entry is the starting position and cannot be popped.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<HistorySnapshot>,
}

impl History {
    pub fn seeded(initial: HistorySnapshot) -> Self {
        Self {
            snapshots: vec![initial],
        }
    }

    pub fn push(&mut self, snapshot: HistorySnapshot) {
        self.snapshots.push(snapshot);
    }

    /// Drops the newest entry and returns the one now on top, or `None` if
    /// only the seed is left.
    pub fn pop(&mut self) -> Option<&HistorySnapshot> {
        if self.snapshots.len() <= 1 {
            return None;
        }
        self.snapshots.pop();
        self.snapshots.last()
    }

    pub fn top(&self) -> &HistorySnapshot {
        &self.snapshots[self.snapshots.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistorySnapshot> {
        self.snapshots.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_is_never_popped() {
        let mut history = History::seeded(HistorySnapshot::initial(Board::standard()));
        assert!(history.pop().is_none());
        assert_eq!(history.len(), 1);

        let mut next = HistorySnapshot::initial(Board::empty());
        next.turn = Color::Black;
        history.push(next);
        assert_eq!(history.top().turn, Color::Black);
        let top = history.pop().unwrap();
        assert_eq!(top.turn, Color::White);
        assert_eq!(history.len(), 1);
    }
}
