use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};

use chess_duel_core::{Color, Difficulty, Game, PieceKind, Square};

use crate::duel::{after_action, schedule_ai};
use crate::error::AppError;
use crate::AppState;

pub mod api;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub title: String,
    pub rows: Vec<Vec<SquareView>>,
    pub turn: String,
    pub status: String,
    pub is_check: bool,
    pub promoting: bool,
    pub white_captured: String,
    pub black_captured: String,
    pub white_score: i32,
    pub black_score: i32,
    pub moves: Vec<MoveRow>,
    pub last_quality: Option<QualityView>,
    pub sound: Option<String>,
    pub elapsed: String,
    pub ranked: bool,
    pub ai_enabled: bool,
    pub ai_thinking: bool,
    pub difficulties: Vec<DifficultyOption>,
    pub profile: Option<String>,
    pub white_elo: i32,
    pub black_elo: i32,
    pub elo_change: Option<String>,
    pub games_rated: usize,
    pub leaderboard: Vec<ProfileRow>,
}

pub struct SquareView {
    pub row: u8,
    pub col: u8,
    pub glyph: String,
    pub light: bool,
    pub selected: bool,
    pub target: bool,
    pub last: bool,
}

pub struct QualityView {
    pub class: &'static str,
    pub label: &'static str,
}

pub struct MoveRow {
    pub number: usize,
    pub white: String,
    pub black: String,
}

pub struct DifficultyOption {
    pub value: String,
    pub selected: bool,
}

pub struct ProfileRow {
    pub name: String,
    pub white_elo: i32,
    pub black_elo: i32,
    pub games: usize,
    pub updated: String,
}

#[derive(Deserialize)]
pub struct SelectForm {
    pub row: i32,
    pub col: i32,
}

#[derive(Deserialize)]
pub struct PromoteForm {
    pub piece: String,
}

#[derive(Deserialize)]
pub struct SettingsForm {
    /// Checkboxes are only sent when ticked.
    pub ai_enabled: Option<String>,
    pub ranked: Option<String>,
    pub difficulty: String,
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub name: String,
}

fn board_rows(game: &Game) -> Vec<Vec<SquareView>> {
    let last = game.last_move();
    let mut rows: Vec<Vec<SquareView>> = Vec::with_capacity(8);
    for sq in Square::all() {
        if sq.col == 0 {
            rows.push(Vec::with_capacity(8));
        }
        let view = SquareView {
            row: sq.row,
            col: sq.col,
            glyph: game.board().get(sq).map(|p| p.glyph().to_string()).unwrap_or_default(),
            light: sq.is_light(),
            selected: game.selected() == Some(sq),
            target: game.legal_targets().contains(&sq),
            last: last.is_some_and(|m| m.from == sq || m.to == sq),
        };
        if let Some(row) = rows.last_mut() {
            row.push(view);
        }
    }
    rows
}

fn move_rows(game: &Game) -> Vec<MoveRow> {
    let labelled: Vec<String> = game
        .history()
        .iter()
        .skip(1)
        .map(|s| match s.quality {
            Some(q) => format!("{} ({})", s.notation, q.as_str()),
            None => s.notation.clone(),
        })
        .collect();

    labelled
        .chunks(2)
        .enumerate()
        .map(|(i, pair)| MoveRow {
            number: i + 1,
            white: pair[0].clone(),
            black: pair.get(1).cloned().unwrap_or_default(),
        })
        .collect()
}

fn status_line(game: &Game) -> String {
    match game.winner() {
        Some(chess_duel_core::Winner::Draw) => "Stalemate: draw".to_string(),
        Some(winner) => format!("Checkmate: {} wins", winner),
        None if game.is_check() => format!("{} to move, in check", game.turn()),
        None => format!("{} to move", game.turn()),
    }
}

fn glyphs(game: &Game, captor: Color) -> String {
    game.captured().by(captor).iter().map(|p| p.glyph()).collect()
}

fn render<T: Template>(template: T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            error!(error = %err, "template rendering failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "template error").into_response()
        }
    }
}

pub async fn index(State(state): State<Arc<AppState>>) -> Response {
    let duel = state.duel.lock().await;
    let db = state.db.lock().await;

    let leaderboard = db
        .list_profiles()
        .unwrap_or_default()
        .into_iter()
        .map(|p| {
            let updated = chrono::DateTime::from_timestamp(p.updated_at as i64, 0)
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default();
            ProfileRow {
                games: p.games_rated(),
                name: p.name,
                white_elo: p.record.white_elo,
                black_elo: p.record.black_elo,
                updated,
            }
        })
        .collect();

    let game = &duel.game;
    let record = duel.session.record();
    let template = IndexTemplate {
        title: "Chess Duel".to_string(),
        rows: board_rows(game),
        turn: game.turn().to_string(),
        status: status_line(game),
        is_check: game.is_check(),
        promoting: game.pending_promotion().is_some(),
        white_captured: glyphs(game, Color::White),
        black_captured: glyphs(game, Color::Black),
        white_score: game.score(Color::White),
        black_score: game.score(Color::Black),
        moves: move_rows(game),
        last_quality: duel.last_outcome.as_ref().map(|o| QualityView {
            class: o.quality.as_str(),
            label: o.quality.display_name(),
        }),
        sound: duel.last_outcome.as_ref().map(|o| format!("{:?}", o.sound).to_lowercase()),
        elapsed: game.clock().formatted(),
        ranked: game.is_ranked(),
        ai_enabled: duel.ai.is_enabled(),
        ai_thinking: duel.ai_pending(),
        difficulties: [
            Difficulty::Easy,
            Difficulty::Medium,
            Difficulty::Hard,
            Difficulty::Expert,
        ]
        .into_iter()
        .map(|d| DifficultyOption {
            value: d.to_string(),
            selected: d == duel.ai.difficulty(),
        })
        .collect(),
        profile: duel.session.profile().map(str::to_string),
        white_elo: record.white_elo,
        black_elo: record.black_elo,
        elo_change: duel
            .session
            .last_change()
            .map(|c| format!("white {:+}, black {:+}", c.white, c.black)),
        games_rated: record.games_rated(),
        leaderboard,
    };
    render(template)
}

pub async fn select(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SelectForm>,
) -> Result<Redirect, AppError> {
    let mut duel = state.duel.lock().await;
    duel.select(form.row, form.col)?;
    let mut db = state.db.lock().await;
    after_action(&state, &mut duel, &mut db)?;
    Ok(Redirect::to("/"))
}

pub async fn promote(
    State(state): State<Arc<AppState>>,
    Form(form): Form<PromoteForm>,
) -> Result<Redirect, AppError> {
    let kind: PieceKind = form.piece.parse()?;
    let mut duel = state.duel.lock().await;
    duel.promote(kind)?;
    let mut db = state.db.lock().await;
    after_action(&state, &mut duel, &mut db)?;
    Ok(Redirect::to("/"))
}

pub async fn cancel_promotion(State(state): State<Arc<AppState>>) -> Redirect {
    state.duel.lock().await.game.cancel_promotion();
    Redirect::to("/")
}

pub async fn undo(State(state): State<Arc<AppState>>) -> Redirect {
    let mut duel = state.duel.lock().await;
    if duel.undo() {
        info!(moves = duel.game.notation().len(), "move taken back");
        schedule_ai(&state, &mut duel);
    }
    Redirect::to("/")
}

pub async fn reset(State(state): State<Arc<AppState>>) -> Redirect {
    let mut duel = state.duel.lock().await;
    duel.reset();
    schedule_ai(&state, &mut duel);
    Redirect::to("/")
}

pub async fn settings(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SettingsForm>,
) -> Result<Redirect, AppError> {
    let difficulty: Difficulty = form
        .difficulty
        .parse()
        .map_err(|_| AppError::BadRequest(format!("unknown difficulty '{}'", form.difficulty)))?;

    let mut duel = state.duel.lock().await;
    let enabled = form.ai_enabled.is_some();
    duel.ai.set_difficulty(difficulty);
    duel.ai.set_enabled(enabled);
    duel.game.set_ranked(form.ranked.is_some());
    info!(enabled, %difficulty, ranked = form.ranked.is_some(), "settings changed");

    if enabled {
        schedule_ai(&state, &mut duel);
    } else {
        duel.invalidate();
    }
    Ok(Redirect::to("/"))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Result<Redirect, AppError> {
    let mut duel = state.duel.lock().await;
    let mut db = state.db.lock().await;
    if duel.session.login(&form.name, &mut *db)? {
        info!(profile = form.name.trim(), "logged in");
    }
    Ok(Redirect::to("/"))
}

pub async fn logout(State(state): State<Arc<AppState>>) -> Result<Redirect, AppError> {
    let mut duel = state.duel.lock().await;
    let mut db = state.db.lock().await;
    duel.session.logout(&mut *db)?;
    Ok(Redirect::to("/"))
}

pub async fn health() -> &'static str {
    "OK"
}
