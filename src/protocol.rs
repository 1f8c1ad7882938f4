//! Public protocol structs for the HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{LeaderboardEntry, Question};

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

//
// Accounts
//

#[derive(Deserialize)]
pub struct RegisterIn {
    pub pseudo: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct RegisterOut {
    pub ok: bool,
}

#[derive(Deserialize)]
pub struct LoginIn {
    pub pseudo: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginOut {
    pub token: String,
    pub pseudo: String,
}

#[derive(Deserialize)]
pub struct LogoutIn {
    pub token: String,
}

#[derive(Serialize)]
pub struct LogoutOut {
    pub ok: bool,
}

//
// Quiz block
//

#[derive(Deserialize)]
pub struct StartIn {
    pub token: String,
    /// Block size override; the configured size applies when absent.
    #[serde(default)]
    pub count: Option<usize>,
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StartOut {
    Started { total: usize },
    AllAnswered,
}

#[derive(Debug, Deserialize)]
pub struct QuestionQuery {
    pub token: String,
}

/// DTO for question delivery. The correct choice is never revealed here;
/// choices arrive pre-shuffled for this presentation.
#[derive(Serialize)]
pub struct QuestionOut {
    pub id: u32,
    pub text: String,
    pub choices: Vec<String>,
    pub index: usize,
    pub total: usize,
}

/// Convert an internal `Question` to the public DTO.
pub fn to_question_out(q: &Question, index: usize, total: usize) -> QuestionOut {
    QuestionOut {
        id: q.id,
        text: q.text.clone(),
        choices: q.choices.clone(),
        index,
        total,
    }
}

#[derive(Deserialize)]
pub struct AnswerIn {
    pub token: String,
    pub choice: String,
}

#[derive(Serialize)]
pub struct AnswerOut {
    pub correct: bool,
    /// Revealed after grading so the client can highlight the right choice.
    pub correct_choice: String,
    pub score: u32,
    pub index: usize,
    pub total: usize,
    pub finished: bool,
}

//
// Leaderboard / home
//

#[derive(Serialize)]
pub struct LeaderboardOut {
    pub entries: Vec<LeaderboardEntry>,
}

#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    pub token: String,
}

/// Per-player home summary: own progress plus the leaderboard top.
#[derive(Serialize)]
pub struct HomeOut {
    pub pseudo: String,
    pub score: u32,
    pub total_answered: u32,
    pub remaining: usize,
    pub top: Vec<LeaderboardEntry>,
}
