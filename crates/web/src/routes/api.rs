//! JSON endpoints for scripted clients

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use chess_duel_core::game::GameView;
use chess_duel_core::{Color, Difficulty, EloChange, MoveOutcome, PieceKind, Square};

use crate::duel::{after_action, Duel};
use crate::error::AppError;
use crate::AppState;

#[derive(Serialize)]
pub struct AiView {
    pub enabled: bool,
    pub color: Color,
    pub difficulty: Difficulty,
    pub thinking: bool,
}

#[derive(Serialize)]
pub struct RatingView {
    pub profile: Option<String>,
    pub white_elo: i32,
    pub black_elo: i32,
    pub games_rated: usize,
    pub last_change: Option<EloChange>,
}

#[derive(Serialize)]
pub struct StateResponse {
    pub game: GameView,
    pub ai: AiView,
    pub rating: RatingView,
}

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub from: String,
    pub to: String,
    pub promotion: Option<String>,
}

#[derive(Serialize)]
pub struct MoveResponse {
    pub outcome: MoveOutcome,
    pub state: StateResponse,
}

fn snapshot(duel: &Duel) -> StateResponse {
    let record = duel.session.record();
    StateResponse {
        game: duel.game.view(),
        ai: AiView {
            enabled: duel.ai.is_enabled(),
            color: duel.ai.color(),
            difficulty: duel.ai.difficulty(),
            thinking: duel.ai_pending(),
        },
        rating: RatingView {
            profile: duel.session.profile().map(str::to_string),
            white_elo: record.white_elo,
            black_elo: record.black_elo,
            games_rated: record.games_rated(),
            last_change: duel.session.last_change(),
        },
    }
}

pub async fn state(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    let duel = state.duel.lock().await;
    Json(snapshot(&duel))
}

/// Validates a coordinate move against the legal moves before applying it.
/// A pawn reaching the last rank without a promotion piece becomes a queen.
pub fn apply_move(duel: &mut Duel, request: &MoveRequest) -> Result<MoveOutcome, AppError> {
    let from: Square = request.from.parse()?;
    let to: Square = request.to.parse()?;
    let promotion = request
        .promotion
        .as_deref()
        .map(str::parse::<PieceKind>)
        .transpose()?;

    if duel.game.is_over() {
        return Err(chess_duel_core::Error::GameOver.into());
    }
    if duel.ai_to_move() {
        return Err(AppError::AiToMove(duel.game.turn()));
    }
    let game = &mut duel.game;
    let piece = game
        .board()
        .get(from)
        .copied()
        .ok_or(chess_duel_core::Error::EmptySquare(from))?;
    if piece.color != game.turn() {
        return Err(chess_duel_core::Error::NotYourTurn {
            expected: game.turn(),
            found: piece.color,
        }
        .into());
    }
    if !game.legal_destinations(from).contains(&to) {
        return Err(AppError::IllegalMove(format!("{}-{} is not legal", from, to)));
    }

    let promotion = match (piece.kind, to.row == piece.color.promotion_row()) {
        (PieceKind::Pawn, true) => Some(promotion.unwrap_or(PieceKind::Queen)),
        _ => None,
    };
    let outcome = game.perform_move(from, to, promotion)?;
    duel.last_outcome = Some(outcome.clone());
    Ok(outcome)
}

pub async fn make_move(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MoveRequest>,
) -> Result<Json<MoveResponse>, AppError> {
    let mut duel = state.duel.lock().await;
    let outcome = apply_move(&mut duel, &request)?;
    let mut db = state.db.lock().await;
    after_action(&state, &mut duel, &mut db)?;
    Ok(Json(MoveResponse {
        outcome,
        state: snapshot(&duel),
    }))
}
