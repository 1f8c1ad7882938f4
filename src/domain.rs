//! Domain models used by the backend: questions, players, and leaderboard entries.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A single multiple-choice question, immutable once loaded.
///
/// `correct` always equals one of `choices` and is matched by VALUE only;
/// presentation order of the choices is shuffled every time the question is
/// served, so no positional convention survives loading.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Question {
  pub id: u32,
  pub text: String,
  pub choices: Vec<String>,
  pub correct: String,
}

/// A registered player. `score` and `answered` only ever grow.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
  pub name: String,
  /// Opaque salted-hash credential, see `auth`.
  pub password_hash: String,
  /// Cumulative number of correctly answered questions.
  pub score: u32,
  /// Ids of every question this player has already been shown.
  pub answered: BTreeSet<u32>,
}

impl Player {
  pub fn new(name: String, password_hash: String) -> Self {
    Self { name, password_hash, score: 0, answered: BTreeSet::new() }
  }

  pub fn total_answered(&self) -> u32 {
    self.answered.len() as u32
  }
}

/// Derived, read-only leaderboard projection. Recomputed on demand from
/// player records; never persisted as independent truth.
#[derive(Clone, Debug, Serialize)]
pub struct LeaderboardEntry {
  pub name: String,
  pub score: u32,
  pub total_answered: u32,
  pub percentage: f32,
}

impl LeaderboardEntry {
  pub fn for_player(p: &Player) -> Self {
    let total = p.total_answered();
    let percentage = if total > 0 {
      p.score as f32 / total as f32 * 100.0
    } else {
      0.0
    };
    Self { name: p.name.clone(), score: p.score, total_answered: total, percentage }
  }
}
