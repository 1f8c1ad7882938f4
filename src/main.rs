//! QCM · Multiple-Choice Quiz Backend
//!
//! - Axum HTTP API (register/login, quiz blocks, leaderboard)
//! - Semicolon-delimited question bank + JSON player/leaderboard persistence
//! - Static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT          : u16 (default 3000)
//!   QCM_CONFIG_PATH  : path to TOML config (paths, block size, optional question bank)
//!   LOG_LEVEL    : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT      : "pretty" (default) or "json"

mod telemetry;
mod util;
mod error;
mod domain;
mod config;
mod questions;
mod auth;
mod store;
mod session;
mod leaderboard;
mod state;
mod protocol;
mod logic;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::config::load_config_from_env;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{JsonFileStore, LeaderboardStore, MemoryStore, PlayerStore};

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Load TOML config if provided, otherwise defaults.
  let cfg = load_config_from_env();

  // Pick the persistence backend: JSON files, or pure in-memory when the
  // players file path is left empty.
  let (player_store, leaderboard_store): (Arc<dyn PlayerStore>, Arc<dyn LeaderboardStore>) =
    if cfg.storage.players_file.is_empty() {
      info!(target: "qcm_backend", "Empty players_file path; scores will not survive restarts");
      let mem = Arc::new(MemoryStore::default());
      (mem.clone(), mem)
    } else {
      let disk = Arc::new(JsonFileStore::new(
        &cfg.storage.players_file,
        &cfg.storage.leaderboard_file,
      ));
      (disk.clone(), disk)
    };

  // Build shared application state (question pool, player registry, sessions).
  let state = Arc::new(AppState::new(cfg, player_store, leaderboard_store).await?);

  // Build the HTTP router with routes, CORS and tracing layers.
  let app = build_router(state.clone());

  // Read port from env or default to 3000.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "qcm_backend", %addr, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}
