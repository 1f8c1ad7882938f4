//! Core operations shared by the HTTP handlers.
//!
//! This includes:
//!   - registration and credential checks (token issue/revoke)
//!   - block lifecycle: start, current question, answer, completion persistence
//!   - leaderboard view and the per-player home summary
//!
//! Persistence runs inside the write-lock section, so racing requests for the
//! same player serialize instead of losing updates. A store failure after a
//! completed block is logged and the in-memory state stands; the next
//! completed block retries the write.

use tracing::{debug, error, info, instrument};

use crate::auth::{hash_password, verify_password};
use crate::domain::{LeaderboardEntry, Player, Question};
use crate::error::QuizError;
use crate::leaderboard::rank;
use crate::protocol::HomeOut;
use crate::session::{AnswerOutcome, BlockStart};
use crate::state::AppState;
use crate::store::ScoreRecord;
use crate::util::{clean_pseudo, trunc_for_log};

/// Register a new player and persist the record.
#[instrument(level = "info", skip(state, password), fields(pseudo = %pseudo))]
pub async fn register(state: &AppState, pseudo: &str, password: &str) -> Result<(), QuizError> {
  let Some(pseudo) = clean_pseudo(pseudo) else {
    return Err(QuizError::InvalidRegistration("pseudo must be 1-50 characters".into()));
  };
  if password.is_empty() {
    return Err(QuizError::InvalidRegistration("password must not be empty".into()));
  }

  let mut players = state.players.write().await;
  if players.get(&pseudo).is_some() {
    return Err(QuizError::DuplicateRegistration(pseudo));
  }
  let player = Player::new(pseudo.clone(), hash_password(password));
  state.player_store.save_player(&player).await?;
  players.insert_new(player);
  info!(target: "qcm_backend", %pseudo, "Player registered");
  Ok(())
}

/// Check credentials and issue a session token. A fresh login replaces any
/// previous token for the same player.
#[instrument(level = "info", skip(state, password), fields(pseudo = %pseudo))]
pub async fn authenticate(state: &AppState, pseudo: &str, password: &str) -> Result<String, QuizError> {
  let pseudo = pseudo.trim();
  let ok = {
    let players = state.players.read().await;
    players
      .get(pseudo)
      .map(|p| verify_password(&p.password_hash, password))
      .unwrap_or(false)
  };
  if !ok {
    return Err(QuizError::InvalidCredential);
  }

  let token = state.sessions.write().await.issue(pseudo);
  info!(target: "qcm_backend", %pseudo, "Login ok, session issued");
  Ok(token)
}

/// Drop the session behind `token`. Returns `false` for an unknown token.
#[instrument(level = "info", skip(state, token))]
pub async fn logout(state: &AppState, token: &str) -> bool {
  state.sessions.write().await.remove(token)
}

/// Start a quiz block for the session behind `token`.
#[instrument(level = "info", skip(state, token))]
pub async fn start_block(
  state: &AppState,
  token: &str,
  requested: Option<usize>,
) -> Result<BlockStart, QuizError> {
  let count = requested.unwrap_or(state.block_size).max(1);

  let mut sessions = state.sessions.write().await;
  let session = sessions.get_mut(token).ok_or(QuizError::SessionNotActive)?;
  let players = state.players.read().await;
  let player = players
    .get(&session.player_name)
    .ok_or(QuizError::SessionNotActive)?;

  let outcome = session.start(player, &state.pool, count)?;
  match &outcome {
    BlockStart::Started(total) => {
      info!(target: "quiz", pseudo = %session.player_name, total, "Block started");
    }
    BlockStart::AllAnswered => {
      info!(target: "quiz", pseudo = %session.player_name, "No unanswered questions remain");
    }
  }
  Ok(outcome)
}

/// The current question of an in-progress block, with its position.
/// `Ok(None)` means the block is not (or no longer) presenting anything.
#[instrument(level = "debug", skip(state, token))]
pub async fn current_question(
  state: &AppState,
  token: &str,
) -> Result<Option<(Question, usize, usize)>, QuizError> {
  let sessions = state.sessions.read().await;
  let session = sessions.get(token).ok_or(QuizError::SessionNotActive)?;
  Ok(session
    .current_question()
    .map(|q| (q, session.index(), session.total())))
}

/// Grade one answer. On block completion, persists the player and rewrites
/// the leaderboard snapshot.
#[instrument(level = "info", skip(state, token, choice))]
pub async fn submit_answer(
  state: &AppState,
  token: &str,
  choice: &str,
) -> Result<AnswerOutcome, QuizError> {
  // Lock order: sessions before players (see state.rs).
  let mut sessions = state.sessions.write().await;
  let session = sessions.get_mut(token).ok_or(QuizError::SessionNotActive)?;
  let mut players = state.players.write().await;
  let player = players
    .get_mut(&session.player_name)
    .ok_or(QuizError::SessionNotActive)?;

  let outcome = session.submit_answer(player, choice)?;
  debug!(target: "quiz", pseudo = %player.name, choice = %trunc_for_log(choice, 64), correct = outcome.correct, "Answer graded");

  if outcome.finished {
    info!(target: "quiz", pseudo = %player.name, score = outcome.running_score, total = outcome.total, "Block completed");
    let player_snapshot = player.clone();
    let board: Vec<ScoreRecord> = players
      .in_order()
      .iter()
      .map(|p| ScoreRecord { name: p.name.clone(), score: p.score })
      .collect();
    if let Err(e) = state.player_store.save_player(&player_snapshot).await {
      error!(target: "qcm_backend", pseudo = %player_snapshot.name, error = %e, "Failed to persist player after block");
    }
    if let Err(e) = state.leaderboard_store.save_scores(&board).await {
      error!(target: "qcm_backend", error = %e, "Failed to persist leaderboard snapshot");
    }
  }

  Ok(outcome)
}

/// Ranked leaderboard, truncated to the configured limit.
#[instrument(level = "debug", skip(state))]
pub async fn leaderboard_view(state: &AppState) -> Vec<LeaderboardEntry> {
  let players = state.players.read().await;
  let mut entries = rank(&players.in_order());
  entries.truncate(state.leaderboard_limit);
  entries
}

/// Per-player home summary: own totals, remaining question count, and the
/// leaderboard top.
#[instrument(level = "debug", skip(state, token))]
pub async fn home_summary(state: &AppState, token: &str) -> Result<HomeOut, QuizError> {
  let player_name = {
    let sessions = state.sessions.read().await;
    sessions
      .get(token)
      .map(|s| s.player_name.clone())
      .ok_or(QuizError::SessionNotActive)?
  };

  let players = state.players.read().await;
  let player = players.get(&player_name).ok_or(QuizError::SessionNotActive)?;
  let remaining = state
    .pool
    .iter()
    .filter(|q| !player.answered.contains(&q.id))
    .count();
  let mut top = rank(&players.in_order());
  top.truncate(state.leaderboard_limit);

  Ok(HomeOut {
    pseudo: player.name.clone(),
    score: player.score,
    total_answered: player.total_answered(),
    remaining,
    top,
  })
}
