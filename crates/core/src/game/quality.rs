//! Move quality tags, informational only

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveQuality {
    Best,
    Good,
    Normal,
    Bad,
    Worst,
}

impl MoveQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoveQuality::Best => "best",
            MoveQuality::Good => "good",
            MoveQuality::Normal => "normal",
            MoveQuality::Bad => "bad",
            MoveQuality::Worst => "worst",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MoveQuality::Best => "Best move",
            MoveQuality::Good => "Good move",
            MoveQuality::Normal => "Normal move",
            MoveQuality::Bad => "Bad move",
            MoveQuality::Worst => "Blunder",
        }
    }
}

/// Facts about a just-played move, measured after turn has flipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct QualityInput {
    pub ended_game: bool,
    /// Destination is attacked by the opponent.
    pub threatened: bool,
    pub gives_check: bool,
    pub moved_value: i32,
    /// Zero for en passant and quiet moves.
    pub captured_value: i32,
}

/// Pieces worth at least `heavy_piece_value` left hanging are the worst kind.
pub fn classify(input: &QualityInput, heavy_piece_value: i32) -> MoveQuality {
    if input.ended_game {
        return MoveQuality::Best;
    }
    match input {
        i if i.threatened && i.moved_value > i.captured_value => {
            if i.moved_value >= heavy_piece_value {
                MoveQuality::Worst
            } else {
                MoveQuality::Bad
            }
        }
        i if i.gives_check => MoveQuality::Good,
        i if i.captured_value > i.moved_value => MoveQuality::Best,
        i if i.captured_value > 0 => MoveQuality::Good,
        _ => MoveQuality::Normal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_is_best() {
        let input = QualityInput {
            ended_game: true,
            threatened: true,
            moved_value: 9,
            ..Default::default()
        };
        assert_eq!(classify(&input, 5), MoveQuality::Best);
    }

    #[test]
    fn test_hanging_piece_thresholds() {
        let queen = QualityInput {
            threatened: true,
            moved_value: 9,
            ..Default::default()
        };
        assert_eq!(classify(&queen, 5), MoveQuality::Worst);

        let knight = QualityInput {
            threatened: true,
            moved_value: 3,
            gives_check: true,
            ..Default::default()
        };
        assert_eq!(classify(&knight, 5), MoveQuality::Bad);
        assert_eq!(classify(&knight, 3), MoveQuality::Worst);
    }

    #[test]
    fn test_captures_and_checks() {
        let trade_up = QualityInput {
            moved_value: 3,
            captured_value: 5,
            threatened: true,
            ..Default::default()
        };
        assert_eq!(classify(&trade_up, 5), MoveQuality::Best);

        let even = QualityInput {
            moved_value: 3,
            captured_value: 3,
            ..Default::default()
        };
        assert_eq!(classify(&even, 5), MoveQuality::Good);

        let check = QualityInput {
            moved_value: 5,
            gives_check: true,
            ..Default::default()
        };
        assert_eq!(classify(&check, 5), MoveQuality::Good);
        assert_eq!(classify(&QualityInput::default(), 5), MoveQuality::Normal);
    }
}
