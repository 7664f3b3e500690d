use axum::{
  extract::{State, WebSocketUpgrade},
  http::Method,
  response::IntoResponse,
  routing::get,
  Json, Router,
};
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

mod config;
mod game;
mod protocol;
mod transport;

use config::Config;
use game::session::SessionStats;

#[derive(Clone)]
struct AppState {
  sessions: DashMap<String, Arc<SessionStats>>,
  config: Config,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
  ok: bool,
  #[serde(rename = "activeGames")]
  active_games: usize,
  #[serde(rename = "bestScore")]
  best_score: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let config = Config::from_env();
  tracing::info!(
    trap_chance = config.game.trap_chance,
    bait_chance = config.game.bait_chance,
    seeded = config.game.seed.is_some(),
    "game config loaded"
  );

  let state = Arc::new(AppState {
    sessions: DashMap::new(),
    config,
  });

  let cors = CorsLayer::new()
    .allow_origin(Any)
    .allow_methods([Method::GET])
    .allow_headers(Any);

  let app: Router = Router::new()
    .route("/api/health", get(health))
    .route("/api/play", get(ws_handler))
    .layer(cors)
    .with_state(state);

  let address = format!("0.0.0.0:{}", config.port);
  tracing::info!("listening on {address}");

  let listener = tokio::net::TcpListener::bind(&address).await?;
  axum::serve(listener, app).await?;

  Ok(())
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let best_score = state
    .sessions
    .iter()
    .map(|entry| entry.value().best_score())
    .max()
    .unwrap_or(0);
  Json(HealthResponse {
    ok: true,
    active_games: state.sessions.len(),
    best_score,
  })
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  ws.on_upgrade(move |socket| play(socket, state))
}

async fn play(socket: axum::extract::ws::WebSocket, state: Arc<AppState>) {
  let session_id = uuid::Uuid::new_v4().to_string();
  let stats = Arc::new(SessionStats::default());
  state.sessions.insert(session_id.clone(), Arc::clone(&stats));
  tracing::info!(session_id = %session_id, "session opened");

  transport::ws_session::handle_socket(socket, state.config.game, Arc::clone(&stats)).await;

  state.sessions.remove(&session_id);
  tracing::info!(
    session_id = %session_id,
    games = stats.games_finished(),
    best_score = stats.best_score(),
    "session closed"
  );
}
