//! Move scoring and difficulty-based selection

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::board::{Color, Move, PieceKind};
use crate::config::AiConfig;
use crate::error::{Error, Result};
use crate::game::{Game, MoveOutcome};
use crate::rules::{self, Rules, SimulatedMove};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Uniform over every legal move.
    Easy,
    /// Uniform over the better half.
    Medium,
    /// Uniform over the top three.
    Hard,
    /// Always the top move.
    Expert,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        }
    }

    /// How many of the ranked moves are eligible for a random pick.
    pub fn pool_size(self, available: usize) -> usize {
        match self {
            Difficulty::Easy => available,
            Difficulty::Medium => available.div_ceil(2),
            Difficulty::Hard => available.min(3),
            Difficulty::Expert => available.min(1),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "expert" | "professional" => Ok(Difficulty::Expert),
            other => Err(Error::Config(format!("unknown difficulty '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredMove {
    pub mv: Move,
    pub score: f64,
}

/// Computer opponent bound to one color.
#[derive(Debug, Clone)]
pub struct AiPlayer {
    color: Color,
    difficulty: Difficulty,
    enabled: bool,
    jitter: f64,
}

impl AiPlayer {
    pub fn new(color: Color, difficulty: Difficulty) -> Self {
        Self {
            color,
            difficulty,
            enabled: true,
            jitter: AiConfig::default().jitter,
        }
    }

    pub fn from_config(config: &AiConfig) -> Self {
        Self {
            color: config.color,
            difficulty: config.difficulty,
            enabled: config.enabled,
            jitter: config.jitter,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// True when it is this player's turn in a live game.
    pub fn should_move(&self, game: &Game) -> bool {
        self.enabled && game.turn() == self.color && !game.is_over()
    }

    /// Scores every legal move for this color, best first.
    ///
    /// Captures earn ten times the victim's value. Above the easiest level a
    /// move onto a square the opponent attacks loses ten times the mover's
    /// value. A small random jitter breaks ties.
    pub fn rank_moves<R: Rng + ?Sized>(&self, game: &mut Game, rng: &mut R) -> Vec<ScoredMove> {
        let (board, last_move) = game.position_mut();
        let moves = rules::legal_moves(board, last_move, self.color);

        let mut scored = Vec::with_capacity(moves.len());
        for mv in moves {
            let Some(piece) = board.get(mv.from).copied() else {
                continue;
            };
            let mut score = board
                .get(mv.to)
                .map_or(0.0, |t| f64::from(t.kind.value() * 10));

            if self.difficulty != Difficulty::Easy {
                let sim = SimulatedMove::new(board, last_move, mv);
                if Rules::new(&sim, last_move).is_square_under_attack(mv.to, self.color) {
                    score -= f64::from(piece.kind.value() * 10);
                }
            }

            score += rng.random::<f64>() * self.jitter;
            scored.push(ScoredMove { mv, score });
        }

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored
    }

    pub fn choose_move<R: Rng + ?Sized>(&self, game: &mut Game, rng: &mut R) -> Option<ScoredMove> {
        let ranked = self.rank_moves(game, rng);
        let pool = self.difficulty.pool_size(ranked.len());
        if pool == 0 {
            return None;
        }
        let pick = ranked[rng.random_range(0..pool)];
        debug!(
            candidates = ranked.len(),
            pool,
            chosen = %pick.mv,
            score = pick.score,
            "ai picked move"
        );
        Some(pick)
    }

    /// Chooses and plays a move if it is this player's turn. Pawns reaching
    /// the last rank become queens.
    pub fn play<R: Rng + ?Sized>(&self, game: &mut Game, rng: &mut R) -> Result<Option<MoveOutcome>> {
        if !self.should_move(game) {
            return Ok(None);
        }
        let Some(choice) = self.choose_move(game, rng) else {
            return Ok(None);
        };

        let mv = choice.mv;
        let promotion = game
            .board()
            .get(mv.from)
            .filter(|p| p.kind == PieceKind::Pawn && mv.to.row == self.color.promotion_row())
            .map(|_| PieceKind::Queen);
        game.perform_move(mv.from, mv.to, promotion).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Square};
    use crate::config::EngineConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn game_from(fen: &str, turn: Color) -> Game {
        let board = Board::from_placement(fen).unwrap();
        Game::from_board(board, turn, &EngineConfig::default())
    }

    #[test]
    fn test_pool_sizes() {
        assert_eq!(Difficulty::Easy.pool_size(20), 20);
        assert_eq!(Difficulty::Medium.pool_size(5), 3);
        assert_eq!(Difficulty::Hard.pool_size(2), 2);
        assert_eq!(Difficulty::Hard.pool_size(20), 3);
        assert_eq!(Difficulty::Expert.pool_size(20), 1);
        assert_eq!(Difficulty::Expert.pool_size(0), 0);
    }

    #[test]
    fn test_expert_takes_free_queen() {
        let mut game = game_from("4k3/8/8/3q4/8/8/3R4/4K3", Color::White);
        let ai = AiPlayer::new(Color::White, Difficulty::Expert);
        let mut rng = StdRng::seed_from_u64(7);
        let pick = ai.choose_move(&mut game, &mut rng).unwrap();
        assert_eq!(pick.mv, Move::new(sq("d2"), sq("d5")));
        assert!(pick.score >= 90.0);
    }

    #[test]
    fn test_expert_avoids_defended_square() {
        // Taking the pawn on d5 loses the rook to the pawn on e6.
        let mut game = game_from("4k3/8/4p3/3p4/8/8/3R4/4K3", Color::White);
        let ai = AiPlayer::new(Color::White, Difficulty::Expert);
        let mut rng = StdRng::seed_from_u64(1);
        let ranked = ai.rank_moves(&mut game, &mut rng);
        let capture = ranked
            .iter()
            .find(|m| m.mv == Move::new(sq("d2"), sq("d5")))
            .unwrap();
        assert!(capture.score < 0.0);
        assert_ne!(ranked[0].mv, capture.mv);
    }

    #[test]
    fn test_ranking_leaves_board_untouched() {
        let mut game = Game::new();
        let before = game.board().clone();
        let ai = AiPlayer::new(Color::White, Difficulty::Hard);
        let mut rng = StdRng::seed_from_u64(3);
        let ranked = ai.rank_moves(&mut game, &mut rng);
        assert_eq!(ranked.len(), 20);
        assert_eq!(game.board(), &before);
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_only_moves_on_its_turn() {
        let mut game = Game::new();
        let ai = AiPlayer::new(Color::Black, Difficulty::Medium);
        let mut rng = StdRng::seed_from_u64(11);
        assert!(ai.play(&mut game, &mut rng).unwrap().is_none());

        game.perform_move(sq("e2"), sq("e4"), None).unwrap();
        let outcome = ai.play(&mut game, &mut rng).unwrap().unwrap();
        assert_eq!(game.turn(), Color::White);
        assert_eq!(game.notation().len(), 2);
        assert_eq!(game.notation()[1], outcome.notation);
    }

    #[test]
    fn test_disabled_player_waits() {
        let mut game = Game::new();
        let mut ai = AiPlayer::new(Color::White, Difficulty::Easy);
        ai.set_enabled(false);
        assert!(!ai.should_move(&game));
        let mut rng = StdRng::seed_from_u64(5);
        assert!(ai.play(&mut game, &mut rng).unwrap().is_none());
    }

    #[test]
    fn test_auto_promotes_to_queen() {
        let mut game = game_from("7k/8/8/8/8/8/p7/1R2K3", Color::Black);
        let ai = AiPlayer::new(Color::Black, Difficulty::Expert);
        let mut rng = StdRng::seed_from_u64(2);
        let outcome = ai.play(&mut game, &mut rng).unwrap().unwrap();
        assert_eq!(outcome.mv, Move::new(sq("a2"), sq("b1")));
        let piece = game.board().get(sq("b1")).unwrap();
        assert!(piece.is(PieceKind::Queen, Color::Black));
    }

    #[test]
    fn test_parse_difficulty() {
        assert_eq!("Hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!("professional".parse::<Difficulty>().unwrap(), Difficulty::Expert);
        assert!("impossible".parse::<Difficulty>().is_err());
    }
}
