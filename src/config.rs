//! Loading server configuration (paths, block size, optional question bank)
//! from TOML.
//!
//! See `QuizConfig` for the expected schema. Every section is optional and
//! falls back to defaults, so a missing or broken config file never stops
//! the server from coming up.

use serde::Deserialize;
use tracing::{error, info};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct QuizConfig {
  #[serde(default)]
  pub quiz: QuizCfg,
  #[serde(default)]
  pub storage: StorageCfg,
  #[serde(default)]
  pub questions: Vec<QuestionCfg>,
}

/// Quiz behavior knobs.
#[derive(Clone, Debug, Deserialize)]
pub struct QuizCfg {
  /// Path of the semicolon-delimited question file.
  #[serde(default = "default_question_file")]
  pub question_file: String,
  /// How many questions one block asks for.
  #[serde(default = "default_block_size")]
  pub block_size: usize,
  /// How many entries the leaderboard endpoints return.
  #[serde(default = "default_leaderboard_limit")]
  pub leaderboard_limit: usize,
}

/// Persistence file locations. Leave `players_file` empty to run fully
/// in-memory (nothing survives a restart).
#[derive(Clone, Debug, Deserialize)]
pub struct StorageCfg {
  #[serde(default = "default_players_file")]
  pub players_file: String,
  #[serde(default = "default_leaderboard_file")]
  pub leaderboard_file: String,
}

/// Question entry accepted in TOML configuration, merged after the file bank.
/// `wrong` must hold exactly 3 entries; anything else is skipped at startup.
#[derive(Clone, Debug, Deserialize)]
pub struct QuestionCfg {
  pub text: String,
  pub correct: String,
  pub wrong: Vec<String>,
}

fn default_question_file() -> String { "questions.txt".into() }
fn default_block_size() -> usize { 20 }
fn default_leaderboard_limit() -> usize { 10 }
fn default_players_file() -> String { "data/players.json".into() }
fn default_leaderboard_file() -> String { "data/leaderboard.json".into() }

impl Default for QuizCfg {
  fn default() -> Self {
    Self {
      question_file: default_question_file(),
      block_size: default_block_size(),
      leaderboard_limit: default_leaderboard_limit(),
    }
  }
}

impl Default for StorageCfg {
  fn default() -> Self {
    Self {
      players_file: default_players_file(),
      leaderboard_file: default_leaderboard_file(),
    }
  }
}

/// Attempt to load `QuizConfig` from QCM_CONFIG_PATH.
/// On a missing variable or any parsing/IO error, returns the defaults.
pub fn load_config_from_env() -> QuizConfig {
  let Ok(path) = std::env::var("QCM_CONFIG_PATH") else {
    return QuizConfig::default();
  };
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<QuizConfig>(&s) {
      Ok(cfg) => {
        info!(target: "qcm_backend", %path, "Loaded config (TOML)");
        cfg
      }
      Err(e) => {
        error!(target: "qcm_backend", %path, error = %e, "Failed to parse TOML config; using defaults");
        QuizConfig::default()
      }
    },
    Err(e) => {
      error!(target: "qcm_backend", %path, error = %e, "Failed to read TOML config file; using defaults");
      QuizConfig::default()
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_are_sane() {
    let cfg = QuizConfig::default();
    assert_eq!(cfg.quiz.block_size, 20);
    assert_eq!(cfg.quiz.leaderboard_limit, 10);
    assert!(!cfg.storage.players_file.is_empty());
    assert!(cfg.questions.is_empty());
  }

  #[test]
  fn parses_a_partial_config() {
    let cfg: QuizConfig = toml::from_str(
      r#"
[quiz]
block_size = 5

[[questions]]
text = "Capital of France?"
correct = "Paris"
wrong = ["Lyon", "Marseille", "Lille"]
"#,
    )
    .unwrap();
    assert_eq!(cfg.quiz.block_size, 5);
    // Untouched sections keep their defaults.
    assert_eq!(cfg.quiz.question_file, "questions.txt");
    assert_eq!(cfg.questions.len(), 1);
    assert_eq!(cfg.questions[0].wrong.len(), 3);
  }
}
