use axum::{
    routing::{get, post},
    Router,
};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use chess_duel_core::{Database, SessionContext};

mod config;
mod duel;
mod error;
mod relay;
mod routes;

use config::ServerConfig;
use duel::{schedule_ai, Duel};
use relay::Relay;

pub struct AppState {
    pub duel: Mutex<Duel>,
    pub db: Mutex<Database>,
    pub relay: Relay,
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/select", post(routes::select))
        .route("/promote", post(routes::promote))
        .route("/promote/cancel", post(routes::cancel_promotion))
        .route("/undo", post(routes::undo))
        .route("/reset", post(routes::reset))
        .route("/settings", post(routes::settings))
        .route("/login", post(routes::login))
        .route("/logout", post(routes::logout))
        .route("/api/state", get(routes::api::state))
        .route("/api/move", post(routes::api::make_move))
        .route("/health", get(routes::health))
        .route("/relay", get(relay::relay))
        .nest_service("/static", ServeDir::new("crates/web/static"))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "server stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;

    let mut db = Database::open(&config.db_path)?;
    let session = SessionContext::restore(&mut db)?;
    if let Some(profile) = session.profile() {
        info!(profile, "restored last profile");
    }

    let state = Arc::new(AppState {
        duel: Mutex::new(Duel::new(&config.engine, session)),
        db: Mutex::new(db),
        relay: Relay::new(64),
    });
    {
        let mut duel = state.duel.lock().await;
        schedule_ai(&state, &mut duel);
    }

    let listener = tokio::net::TcpListener::bind(&config.addr).await?;
    info!(addr = %config.addr, db = %config.db_path.display(), "server running");

    axum::serve(listener, app(state)).await?;
    Ok(())
}
