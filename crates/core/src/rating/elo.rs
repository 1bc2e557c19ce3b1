//! Standard ELO update with K = 32

use serde::{Deserialize, Serialize};

use crate::game::Winner;

pub const K_FACTOR: f64 = 32.0;
pub const DEFAULT_RATING: i32 = 1200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EloSnapshot {
    pub white: i32,
    pub black: i32,
}

/// Rating deltas produced by one finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EloChange {
    pub white: i32,
    pub black: i32,
}

/// Ratings of the two seats for one profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingRecord {
    pub white_elo: i32,
    pub black_elo: i32,
    /// Oldest first; starts with the initial ratings.
    pub elo_history: Vec<EloSnapshot>,
}

impl Default for RatingRecord {
    fn default() -> Self {
        Self {
            white_elo: DEFAULT_RATING,
            black_elo: DEFAULT_RATING,
            elo_history: vec![EloSnapshot {
                white: DEFAULT_RATING,
                black: DEFAULT_RATING,
            }],
        }
    }
}

impl RatingRecord {
    /// Applies a finished game and appends the new ratings to the history.
    pub fn apply(&mut self, winner: Winner) -> EloChange {
        let change = rating_changes(self.white_elo, self.black_elo, winner);
        self.white_elo += change.white;
        self.black_elo += change.black;
        self.elo_history.push(EloSnapshot {
            white: self.white_elo,
            black: self.black_elo,
        });
        change
    }

    pub fn games_rated(&self) -> usize {
        self.elo_history.len().saturating_sub(1)
    }
}

/// Probability-like expected score of `rating` against `opponent`.
pub fn expected_score(rating: i32, opponent: i32) -> f64 {
    1.0 / (1.0 + 10f64.powf(f64::from(opponent - rating) / 400.0))
}

pub fn rating_changes(white_elo: i32, black_elo: i32, winner: Winner) -> EloChange {
    let expected_white = expected_score(white_elo, black_elo);
    let expected_black = expected_score(black_elo, white_elo);
    let white_result = winner.white_result();

    EloChange {
        white: round_half_up(K_FACTOR * (white_result - expected_white)),
        black: round_half_up(K_FACTOR * ((1.0 - white_result) - expected_black)),
    }
}

// halves round toward positive infinity
fn round_half_up(x: f64) -> i32 {
    (x + 0.5).floor() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_white_win() {
        let mut record = RatingRecord::default();
        let change = record.apply(Winner::White);
        assert_eq!(change, EloChange { white: 16, black: -16 });
        assert_eq!(record.white_elo, 1216);
        assert_eq!(record.black_elo, 1184);
        assert_eq!(record.elo_history.len(), 2);
        assert_eq!(record.elo_history[1], EloSnapshot { white: 1216, black: 1184 });
        assert_eq!(record.games_rated(), 1);
    }

    #[test]
    fn test_even_draw_changes_nothing() {
        let mut record = RatingRecord::default();
        let change = record.apply(Winner::Draw);
        assert_eq!(change, EloChange { white: 0, black: 0 });
        assert_eq!(record.elo_history.len(), 2);
    }

    #[test]
    fn test_upset_moves_more() {
        // 1400 white loses to 1200 black
        let change = rating_changes(1400, 1200, Winner::Black);
        assert_eq!(change.white, -24);
        assert_eq!(change.black, 24);

        let favourite = rating_changes(1400, 1200, Winner::White);
        assert_eq!(favourite.white, 8);
        assert_eq!(favourite.black, -8);
    }

    #[test]
    fn test_expected_scores_sum_to_one() {
        let a = expected_score(1500, 1320);
        let b = expected_score(1320, 1500);
        assert!((a + b - 1.0).abs() < 1e-12);
        assert!((expected_score(1200, 1200) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_record_json_shape() {
        let json = serde_json::to_string(&RatingRecord::default()).unwrap();
        assert_eq!(
            json,
            r#"{"whiteElo":1200,"blackElo":1200,"eloHistory":[{"white":1200,"black":1200}]}"#
        );
    }
}
