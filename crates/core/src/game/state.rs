//! The game state machine: selection, move execution, terminal detection, undo

use serde::Serialize;
use tracing::{debug, info, warn};

use super::{
    classify, CapturedPieces, GameClock, GameEvent, History, HistorySnapshot, MoveQuality,
    QualityInput, SoundCue, Winner,
};
use crate::board::{Board, Color, Move, Piece, PieceKind, Square};
use crate::config::{EngineConfig, QualityConfig};
use crate::error::{Error, Result};
use crate::rules::{self, Rules};

/// What `perform_move` did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveOutcome {
    pub mv: Move,
    pub notation: String,
    /// Includes pawns taken en passant.
    pub captured: Option<Piece>,
    pub quality: MoveQuality,
    pub sound: SoundCue,
    pub check: bool,
    pub winner: Option<Winner>,
}

/// Result of a click on the board.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectOutcome {
    Selected { square: Square, targets: Vec<Square> },
    Deselected,
    /// A pawn reached the last rank; finish with `Game::promote`.
    PromotionPending(Move),
    Moved(MoveOutcome),
    Ignored,
}

/// Serializable picture of the game for hosts.
#[derive(Debug, Clone, Serialize)]
pub struct GameView {
    pub board: Board,
    pub turn: Color,
    pub selected: Option<Square>,
    pub legal_targets: Vec<String>,
    pub pending_promotion: Option<Move>,
    pub is_check: bool,
    pub winner: Option<Winner>,
    pub last_move: Option<Move>,
    pub captured: CapturedPieces,
    pub white_score: i32,
    pub black_score: i32,
    pub notation: Vec<String>,
    pub qualities: Vec<Option<MoveQuality>>,
    pub ranked: bool,
    pub elapsed: String,
}

pub struct Game {
    board: Board,
    turn: Color,
    selected: Option<Square>,
    legal_targets: Vec<Square>,
    pending_promotion: Option<Move>,
    check: bool,
    winner: Option<Winner>,
    last_move: Option<Move>,
    captured: CapturedPieces,
    notation: Vec<String>,
    history: History,
    ranked: bool,
    clock: GameClock,
    quality: QualityConfig,
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new() -> Self {
        Self::with_config(&EngineConfig::default())
    }

    pub fn with_config(config: &EngineConfig) -> Self {
        Self::from_board(Board::standard(), Color::White, config)
    }

    /// Starts from an arbitrary position, e.g. one built with
    /// `Board::from_placement`. Both kings must be present.
    pub fn from_board(board: Board, turn: Color, config: &EngineConfig) -> Self {
        let check = rules::king_in_check(&board, turn);
        let seed = HistorySnapshot {
            turn,
            is_check: check,
            ..HistorySnapshot::initial(board.clone())
        };
        Self {
            board,
            turn,
            selected: None,
            legal_targets: Vec::new(),
            pending_promotion: None,
            check,
            winner: None,
            last_move: None,
            captured: CapturedPieces::default(),
            notation: Vec::new(),
            history: History::seeded(seed),
            ranked: config.ranked,
            clock: GameClock::start(),
            quality: config.quality.clone(),
            events: Vec::new(),
        }
    }

    /// Back to the starting position. Ranked mode is kept.
    pub fn reset(&mut self) {
        let board = Board::standard();
        self.history = History::seeded(HistorySnapshot::initial(board.clone()));
        self.board = board;
        self.turn = Color::White;
        self.clear_selection();
        self.check = false;
        self.winner = None;
        self.last_move = None;
        self.captured = CapturedPieces::default();
        self.notation.clear();
        self.clock = GameClock::start();
        self.events.clear();
        debug!("game reset");
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    pub fn legal_targets(&self) -> &[Square] {
        &self.legal_targets
    }

    /// Current targets as "row,col" strings.
    pub fn legal_target_keys(&self) -> Vec<String> {
        self.legal_targets.iter().map(|sq| sq.key()).collect()
    }

    pub fn pending_promotion(&self) -> Option<Move> {
        self.pending_promotion
    }

    pub fn is_check(&self) -> bool {
        self.check
    }

    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    pub fn captured(&self) -> &CapturedPieces {
        &self.captured
    }

    pub fn score(&self, color: Color) -> i32 {
        self.captured.score(color)
    }

    pub fn notation(&self) -> &[String] {
        &self.notation
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn is_ranked(&self) -> bool {
        self.ranked
    }

    pub fn set_ranked(&mut self, ranked: bool) {
        self.ranked = ranked;
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    /// Takes the events raised since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn position_mut(&mut self) -> (&mut Board, Option<Move>) {
        (&mut self.board, self.last_move)
    }

    pub fn rules(&self) -> Rules<'_> {
        Rules::new(&self.board, self.last_move)
    }

    pub fn king_in_check(&self, color: Color) -> bool {
        rules::king_in_check(&self.board, color)
    }

    pub fn has_any_legal_move(&mut self, color: Color) -> bool {
        rules::has_any_legal_move(&mut self.board, self.last_move, color)
    }

    pub fn legal_destinations(&mut self, from: Square) -> Vec<Square> {
        rules::legal_destinations(&mut self.board, self.last_move, from)
    }

    pub fn all_legal_moves(&mut self, color: Color) -> Vec<Move> {
        rules::legal_moves(&mut self.board, self.last_move, color)
    }

    /// Click handling: select an own piece, move to a highlighted target,
    /// switch selection, or deselect. Misclicks are never errors; only
    /// coordinates off the board are.
    pub fn select_or_move(&mut self, row: i32, col: i32) -> Result<SelectOutcome> {
        let sq = Square::new(row, col)?;
        if self.winner.is_some() || self.pending_promotion.is_some() {
            return Ok(SelectOutcome::Ignored);
        }

        let clicked_own = self.board.get(sq).is_some_and(|p| p.color == self.turn);
        match self.selected {
            Some(sel) if sel == sq => {
                self.clear_selection();
                Ok(SelectOutcome::Deselected)
            }
            _ if clicked_own => Ok(self.select(sq)),
            Some(sel) if self.legal_targets.contains(&sq) => {
                let is_pawn = self
                    .board
                    .get(sel)
                    .is_some_and(|p| p.kind == PieceKind::Pawn);
                if is_pawn && (sq.row == 0 || sq.row == 7) {
                    let mv = Move::new(sel, sq);
                    self.pending_promotion = Some(mv);
                    return Ok(SelectOutcome::PromotionPending(mv));
                }
                self.perform_move(sel, sq, None).map(SelectOutcome::Moved)
            }
            Some(_) => {
                self.clear_selection();
                Ok(SelectOutcome::Deselected)
            }
            None => Ok(SelectOutcome::Ignored),
        }
    }

    fn select(&mut self, sq: Square) -> SelectOutcome {
        self.selected = Some(sq);
        self.legal_targets = rules::legal_destinations(&mut self.board, self.last_move, sq);
        SelectOutcome::Selected {
            square: sq,
            targets: self.legal_targets.clone(),
        }
    }

    fn clear_selection(&mut self) {
        self.selected = None;
        self.legal_targets.clear();
        self.pending_promotion = None;
    }

    /// Completes a pending promotion. Returns `None` if nothing was pending.
    pub fn promote(&mut self, kind: PieceKind) -> Result<Option<MoveOutcome>> {
        if !kind.is_promotion_target() {
            return Err(Error::InvalidPromotion(kind));
        }
        match self.pending_promotion.take() {
            Some(mv) => self.perform_move(mv.from, mv.to, Some(kind)).map(Some),
            None => Ok(None),
        }
    }

    pub fn cancel_promotion(&mut self) {
        self.clear_selection();
    }

    /// Applies a move that the caller has already validated.
    ///
    /// Legality is not re-checked here. Moving from an empty square, moving
    /// the wrong color, moving after the game ended or asking for a pawn or
    /// king promotion are rejected as contract violations.
    pub fn perform_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<MoveOutcome> {
        if self.winner.is_some() {
            warn!(%from, %to, "move submitted after game end");
            return Err(Error::GameOver);
        }
        let found = self.board.get(from).map(|p| p.color).ok_or(Error::EmptySquare(from))?;
        if found != self.turn {
            warn!(%from, %to, %found, "move submitted out of turn");
            return Err(Error::NotYourTurn {
                expected: self.turn,
                found,
            });
        }
        if let Some(kind) = promotion.filter(|k| !k.is_promotion_target()) {
            return Err(Error::InvalidPromotion(kind));
        }

        let mv = Move::new(from, to);
        let notation = mv.notation();
        self.notation.push(notation.clone());

        let mover = self.turn;
        let Some(mut piece) = self.board.take(from) else {
            return Err(Error::EmptySquare(from));
        };
        let moved_value = piece.kind.value();

        let target = self.board.take(to);
        let captured_value = target.map_or(0, |p| p.kind.value());
        let mut captured = target;
        if let Some(t) = target {
            self.captured.push(mover, t);
        }

        if piece.kind == PieceKind::Pawn && mv.col_delta().abs() == 1 && target.is_none() {
            if let Some(victim) = self.board.take(Square::at(from.row, to.col)) {
                self.captured.push(mover, victim);
                captured = Some(victim);
            }
        }

        if piece.kind == PieceKind::King && mv.col_delta().abs() == 2 {
            let (rook_from, rook_to) = if to.col == 6 { (7, 5) } else { (0, 3) };
            if let Some(mut rook) = self.board.take(Square::at(to.row, rook_from)) {
                rook.has_moved = true;
                self.board.put(Square::at(to.row, rook_to), rook);
            }
        }

        self.last_move = Some(mv);
        piece.has_moved = true;
        if let Some(kind) = promotion {
            piece.kind = kind;
        }
        self.board.put(to, piece);

        self.clear_selection();
        self.turn = mover.opposite();
        self.check = rules::king_in_check(&self.board, self.turn);
        if !rules::has_any_legal_move(&mut self.board, self.last_move, self.turn) {
            self.winner = Some(if self.check {
                Winner::side(mover)
            } else {
                Winner::Draw
            });
            self.clock.stop();
        }

        let threatened = self.rules().is_square_under_attack(to, mover);
        let quality = classify(
            &QualityInput {
                ended_game: self.winner.is_some(),
                threatened,
                gives_check: self.check,
                moved_value,
                captured_value,
            },
            self.quality.heavy_piece_value,
        );
        let sound = match (self.winner, captured) {
            (Some(_), _) => SoundCue::GameOver,
            (None, Some(_)) => SoundCue::Capture,
            (None, None) => SoundCue::Move,
        };

        self.history.push(HistorySnapshot {
            board: self.board.clone(),
            captured: self.captured.clone(),
            turn: self.turn,
            is_check: self.check,
            last_move: self.last_move,
            notation: notation.clone(),
            quality: Some(quality),
        });

        debug!(%notation, quality = quality.as_str(), check = self.check, "move applied");

        self.events.push(GameEvent::MoveCompleted {
            mv,
            notation: notation.clone(),
            quality,
            sound,
        });
        self.events.push(GameEvent::TurnChanged { to_move: self.turn });
        if let Some(winner) = self.winner {
            info!(%winner, moves = self.notation.len(), "game over");
            self.events.push(GameEvent::GameEnded { winner });
        }

        Ok(MoveOutcome {
            mv,
            notation,
            captured,
            quality,
            sound,
            check: self.check,
            winner: self.winner,
        })
    }

    /// Steps back one move. Returns false when only the starting position
    /// is left. An undone terminal position is no longer terminal.
    pub fn undo(&mut self) -> bool {
        let Some(top) = self.history.pop() else {
            return false;
        };
        self.board = top.board.clone();
        self.captured = top.captured.clone();
        self.turn = top.turn;
        self.check = top.is_check;
        self.last_move = top.last_move;
        self.notation.pop();
        self.winner = None;
        self.clear_selection();
        self.clock.resume();
        debug!(remaining = self.notation.len(), "move undone");
        true
    }

    pub fn view(&self) -> GameView {
        GameView {
            board: self.board.clone(),
            turn: self.turn,
            selected: self.selected,
            legal_targets: self.legal_target_keys(),
            pending_promotion: self.pending_promotion,
            is_check: self.check,
            winner: self.winner,
            last_move: self.last_move,
            captured: self.captured.clone(),
            white_score: self.score(Color::White),
            black_score: self.score(Color::Black),
            notation: self.notation.clone(),
            qualities: self.history.iter().skip(1).map(|s| s.quality).collect(),
            ranked: self.ranked,
            elapsed: self.clock.formatted(),
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
