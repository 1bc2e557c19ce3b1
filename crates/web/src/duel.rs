//! The single shared game hosted by the server, with its computer opponent
//! and rating session.

use std::sync::Arc;

use tracing::{debug, error, info};

use chess_duel_core::{
    AiPlayer, AiScheduler, Database, EngineConfig, Game, GameEvent, MoveOutcome, PieceKind,
    RatingStore, Result, SelectOutcome, SessionContext,
};

use crate::AppState;

pub struct Duel {
    pub game: Game,
    pub ai: AiPlayer,
    pub session: SessionContext,
    pub last_outcome: Option<MoveOutcome>,
    scheduler: AiScheduler,
    /// Bumped on every reset and undo; AI moves scheduled under an older
    /// generation are dropped.
    generation: u64,
}

impl Duel {
    pub fn new(config: &EngineConfig, session: SessionContext) -> Self {
        Self {
            game: Game::with_config(config),
            ai: AiPlayer::from_config(&config.ai),
            session,
            last_outcome: None,
            scheduler: AiScheduler::new(config.ai.think_delay()),
            generation: 0,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn ai_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// True while the computer owns the side to move; human input is refused.
    pub fn ai_to_move(&self) -> bool {
        self.ai.should_move(&self.game)
    }

    pub fn select(&mut self, row: i32, col: i32) -> Result<SelectOutcome> {
        if self.ai_to_move() {
            debug!(row, col, "click ignored while the ai is to move");
            return Ok(SelectOutcome::Ignored);
        }
        let outcome = self.game.select_or_move(row, col)?;
        if let SelectOutcome::Moved(moved) = &outcome {
            self.last_outcome = Some(moved.clone());
        }
        Ok(outcome)
    }

    pub fn promote(&mut self, kind: PieceKind) -> Result<Option<MoveOutcome>> {
        if self.ai_to_move() {
            return Ok(None);
        }
        let moved = self.game.promote(kind)?;
        if let Some(moved) = &moved {
            self.last_outcome = Some(moved.clone());
        }
        Ok(moved)
    }

    /// Drops any pending AI move.
    pub fn invalidate(&mut self) {
        self.scheduler.cancel();
        self.generation += 1;
    }

    pub fn reset(&mut self) {
        self.invalidate();
        self.game.reset();
        self.session.clear_last_change();
        self.last_outcome = None;
        info!(generation = self.generation, "new game");
    }

    /// Takes back one ply. Nothing changes, pending AI move included, when
    /// there is nothing to take back.
    pub fn undo(&mut self) -> bool {
        let undone = self.game.undo();
        if undone {
            self.invalidate();
            self.last_outcome = None;
        }
        undone
    }

    /// Feeds pending game events to the rating session. Returns true when
    /// the turn changed.
    pub fn settle<S: RatingStore + ?Sized>(&mut self, store: &mut S) -> Result<bool> {
        let events = self.game.drain_events();
        let mut turn_changed = false;
        for event in &events {
            match event {
                GameEvent::MoveCompleted { notation, quality, sound, .. } => {
                    debug!(%notation, quality = quality.as_str(), ?sound, "move completed");
                }
                GameEvent::TurnChanged { to_move } => {
                    debug!(%to_move, "turn changed");
                    turn_changed = true;
                }
                GameEvent::GameEnded { winner } => {
                    info!(%winner, "game ended");
                }
            }
        }
        self.session.handle_events(&events, self.game.is_ranked(), store)?;
        Ok(turn_changed)
    }

    /// Plays the computer's move right away if it is its turn.
    pub fn play_ai<S: RatingStore + ?Sized>(&mut self, store: &mut S) -> Result<Option<MoveOutcome>> {
        let mut rng = rand::rng();
        let outcome = self.ai.play(&mut self.game, &mut rng)?;
        if let Some(outcome) = &outcome {
            info!(
                notation = %outcome.notation,
                difficulty = %self.ai.difficulty(),
                "ai moved"
            );
            self.last_outcome = Some(outcome.clone());
        }
        self.settle(store)?;
        Ok(outcome)
    }
}

/// Schedules the computer's reply after the think delay if it is its turn.
/// The move is discarded if the game was reset or undone in the meantime.
pub fn schedule_ai(state: &Arc<AppState>, duel: &mut Duel) {
    if !duel.ai.should_move(&duel.game) {
        return;
    }

    let generation = duel.generation;
    let state = Arc::clone(state);
    debug!(generation, "ai move scheduled");
    duel.scheduler.schedule(async move {
        let mut duel = state.duel.lock().await;
        if duel.generation != generation {
            debug!(generation, current = duel.generation, "stale ai move dropped");
            return;
        }
        let mut db = state.db.lock().await;
        if let Err(err) = duel.play_ai(&mut *db) {
            error!(error = %err, "ai move failed");
        }
    });
}

/// Post-action bookkeeping shared by every handler that may have moved.
pub fn after_action(state: &Arc<AppState>, duel: &mut Duel, db: &mut Database) -> Result<()> {
    duel.settle(db)?;
    schedule_ai(state, duel);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_duel_core::{Color, MemoryStore, Move, Winner};

    fn play(duel: &mut Duel, store: &mut MemoryStore, moves: &[&str]) {
        for text in moves {
            let mv: Move = text.parse().unwrap();
            duel.game.perform_move(mv.from, mv.to, None).unwrap();
            duel.settle(store).unwrap();
        }
    }

    #[test]
    fn test_settle_updates_ratings_on_mate() {
        let mut store = MemoryStore::default();
        let mut duel = Duel::new(&EngineConfig::default(), SessionContext::new());
        play(&mut duel, &mut store, &["f2-f3", "e7-e5", "g2-g4", "d8-h4"]);

        assert_eq!(duel.game.winner(), Some(Winner::Black));
        let change = duel.session.last_change().unwrap();
        assert_eq!((change.white, change.black), (-16, 16));
        assert_eq!(duel.session.record().black_elo, 1216);
    }

    #[test]
    fn test_reset_and_undo_bump_generation() {
        let mut store = MemoryStore::default();
        let mut duel = Duel::new(&EngineConfig::default(), SessionContext::new());
        play(&mut duel, &mut store, &["e2-e4"]);

        assert!(duel.undo());
        assert_eq!(duel.generation(), 1);
        assert!(!duel.undo());
        assert_eq!(duel.generation(), 1);

        duel.reset();
        assert_eq!(duel.generation(), 2);
        assert_eq!(duel.game.turn(), Color::White);
        assert!(duel.session.last_change().is_none());
    }

    #[test]
    fn test_play_ai_only_on_its_turn() {
        let mut store = MemoryStore::default();
        let mut config = EngineConfig::default();
        config.ai.enabled = true;
        let mut duel = Duel::new(&config, SessionContext::new());

        assert!(duel.play_ai(&mut store).unwrap().is_none());
        play(&mut duel, &mut store, &["e2-e4"]);
        let outcome = duel.play_ai(&mut store).unwrap().unwrap();
        assert_eq!(duel.game.turn(), Color::White);
        assert_eq!(duel.last_outcome, Some(outcome));
    }

    #[test]
    fn test_human_input_refused_on_ai_turn() {
        let mut store = MemoryStore::default();
        let mut config = EngineConfig::default();
        config.ai.enabled = true;
        let mut duel = Duel::new(&config, SessionContext::new());
        play(&mut duel, &mut store, &["e2-e4"]);

        assert!(duel.ai_to_move());
        // e7 pawn belongs to the computer
        assert!(matches!(duel.select(1, 4).unwrap(), SelectOutcome::Ignored));
        assert!(duel.game.selected().is_none());
        assert!(duel.promote(PieceKind::Queen).unwrap().is_none());
        assert_eq!(duel.game.notation().len(), 1);
    }

    fn shared(config: &EngineConfig) -> Arc<AppState> {
        Arc::new(AppState {
            duel: tokio::sync::Mutex::new(Duel::new(config, SessionContext::new())),
            db: tokio::sync::Mutex::new(Database::open_in_memory().unwrap()),
            relay: crate::relay::Relay::new(4),
        })
    }

    #[tokio::test]
    async fn test_undo_at_start_keeps_pending_ai_move() {
        let mut config = EngineConfig::default();
        config.ai.enabled = true;
        config.ai.color = Color::White;
        config.ai.think_delay_ms = 10;
        let state = shared(&config);

        {
            let mut duel = state.duel.lock().await;
            duel.reset();
            schedule_ai(&state, &mut duel);
            assert!(duel.ai_pending());

            assert!(!duel.undo());
            assert!(duel.ai_pending());
            assert_eq!(duel.generation(), 1);
        }

        tokio::time::sleep(std::time::Duration::from_millis(300)).await;
        let duel = state.duel.lock().await;
        assert_eq!(duel.game.notation().len(), 1);
        assert_eq!(duel.game.turn(), Color::Black);
    }
}
