//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented; logs include parameters and basic result info.

use std::sync::Arc;

use axum::{
  extract::{Query, State},
  response::IntoResponse,
  Json,
};
use tracing::{info, instrument};

use crate::error::QuizError;
use crate::logic;
use crate::protocol::*;
use crate::session::BlockStart;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse {
  Json(HealthOut { ok: true })
}

#[instrument(level = "info", skip(state, body), fields(pseudo = %body.pseudo))]
pub async fn http_post_register(
  State(state): State<Arc<AppState>>,
  Json(body): Json<RegisterIn>,
) -> Result<Json<RegisterOut>, QuizError> {
  logic::register(&state, &body.pseudo, &body.password).await?;
  Ok(Json(RegisterOut { ok: true }))
}

#[instrument(level = "info", skip(state, body), fields(pseudo = %body.pseudo))]
pub async fn http_post_login(
  State(state): State<Arc<AppState>>,
  Json(body): Json<LoginIn>,
) -> Result<Json<LoginOut>, QuizError> {
  let token = logic::authenticate(&state, &body.pseudo, &body.password).await?;
  Ok(Json(LoginOut { token, pseudo: body.pseudo.trim().to_string() }))
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_post_logout(
  State(state): State<Arc<AppState>>,
  Json(body): Json<LogoutIn>,
) -> Json<LogoutOut> {
  let ok = logic::logout(&state, &body.token).await;
  Json(LogoutOut { ok })
}

#[instrument(level = "info", skip(state, body), fields(count = ?body.count))]
pub async fn http_post_start(
  State(state): State<Arc<AppState>>,
  Json(body): Json<StartIn>,
) -> Result<Json<StartOut>, QuizError> {
  let out = match logic::start_block(&state, &body.token, body.count).await? {
    BlockStart::Started(total) => StartOut::Started { total },
    BlockStart::AllAnswered => StartOut::AllAnswered,
  };
  Ok(Json(out))
}

#[instrument(level = "info", skip(state, q))]
pub async fn http_get_question(
  State(state): State<Arc<AppState>>,
  Query(q): Query<QuestionQuery>,
) -> Result<Json<Option<QuestionOut>>, QuizError> {
  let out = logic::current_question(&state, &q.token)
    .await?
    .map(|(question, index, total)| to_question_out(&question, index, total));
  Ok(Json(out))
}

#[instrument(level = "info", skip(state, body), fields(choice_len = body.choice.len()))]
pub async fn http_post_answer(
  State(state): State<Arc<AppState>>,
  Json(body): Json<AnswerIn>,
) -> Result<Json<AnswerOut>, QuizError> {
  let outcome = logic::submit_answer(&state, &body.token, &body.choice).await?;
  info!(target: "quiz", correct = outcome.correct, finished = outcome.finished, "HTTP answer graded");
  Ok(Json(AnswerOut {
    correct: outcome.correct,
    correct_choice: outcome.correct_choice,
    score: outcome.running_score,
    index: outcome.index,
    total: outcome.total,
    finished: outcome.finished,
  }))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_leaderboard(
  State(state): State<Arc<AppState>>,
) -> Json<LeaderboardOut> {
  let entries = logic::leaderboard_view(&state).await;
  Json(LeaderboardOut { entries })
}

#[instrument(level = "info", skip(state, q))]
pub async fn http_get_home(
  State(state): State<Arc<AppState>>,
  Query(q): Query<HomeQuery>,
) -> Result<Json<HomeOut>, QuizError> {
  let summary = logic::home_summary(&state, &q.token).await?;
  Ok(Json(summary))
}
