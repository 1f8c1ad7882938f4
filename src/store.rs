//! Player and leaderboard persistence behind repository interfaces.
//!
//! The session logic never touches files directly; it talks to the injected
//! `PlayerStore` / `LeaderboardStore` traits. Two implementations:
//!   - `JsonFileStore`: JSON files on disk (players + ranked score snapshot)
//!   - `MemoryStore`: process-local, used for tests and persistence-less runs
//!
//! The on-disk records mirror the historical flat-file layout: players as
//! `{pseudo, password, score, asked_questions}`, the leaderboard as
//! `{name, score}` entries re-sorted on every save.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use crate::domain::Player;
use crate::error::QuizError;

/// On-disk player record.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub pseudo: String,
    pub password: String,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub asked_questions: Vec<u32>,
}

impl From<&Player> for PlayerRecord {
    fn from(p: &Player) -> Self {
        Self {
            pseudo: p.name.clone(),
            password: p.password_hash.clone(),
            score: p.score,
            // BTreeSet iteration gives a sorted, duplicate-free array.
            asked_questions: p.answered.iter().copied().collect(),
        }
    }
}

impl From<PlayerRecord> for Player {
    fn from(r: PlayerRecord) -> Self {
        Self {
            name: r.pseudo,
            password_hash: r.password,
            score: r.score,
            answered: r.asked_questions.into_iter().collect(),
        }
    }
}

/// One persisted leaderboard line.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub name: String,
    pub score: u32,
}

#[async_trait]
pub trait PlayerStore: Send + Sync {
    /// Load every persisted player, in stored (registration) order.
    async fn load_players(&self) -> Result<Vec<Player>, QuizError>;
    /// Insert or update one player record.
    async fn save_player(&self, player: &Player) -> Result<(), QuizError>;
}

#[async_trait]
pub trait LeaderboardStore: Send + Sync {
    /// Load the persisted score snapshot.
    async fn load_scores(&self) -> Result<Vec<ScoreRecord>, QuizError>;
    /// Replace the score snapshot; entries are re-sorted (score descending)
    /// before they hit the disk.
    async fn save_scores(&self, scores: &[ScoreRecord]) -> Result<(), QuizError>;
}

// ---------------------------------------------------------------------------
// JSON files
// ---------------------------------------------------------------------------

/// JSON-file backend. A single mutex serializes writes so two completing
/// blocks cannot interleave a read-modify-write on the players file.
pub struct JsonFileStore {
    players_path: PathBuf,
    leaderboard_path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(players_path: &str, leaderboard_path: &str) -> Self {
        Self {
            players_path: PathBuf::from(players_path),
            leaderboard_path: PathBuf::from(leaderboard_path),
            write_lock: Mutex::new(()),
        }
    }

    /// Read a JSON array from `path`; a missing file is an empty list.
    fn read_list<T: for<'de> Deserialize<'de>>(path: &PathBuf) -> Result<Vec<T>, QuizError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_list<T: Serialize>(path: &PathBuf, items: &[T]) -> Result<(), QuizError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(items)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

#[async_trait]
impl PlayerStore for JsonFileStore {
    #[instrument(level = "debug", skip(self))]
    async fn load_players(&self) -> Result<Vec<Player>, QuizError> {
        let records: Vec<PlayerRecord> = Self::read_list(&self.players_path)?;
        Ok(records.into_iter().map(Player::from).collect())
    }

    #[instrument(level = "debug", skip(self, player), fields(pseudo = %player.name))]
    async fn save_player(&self, player: &Player) -> Result<(), QuizError> {
        let _guard = self.write_lock.lock().await;
        let mut records: Vec<PlayerRecord> = Self::read_list(&self.players_path)?;
        match records.iter_mut().find(|r| r.pseudo == player.name) {
            Some(existing) => *existing = PlayerRecord::from(player),
            None => records.push(PlayerRecord::from(player)),
        }
        Self::write_list(&self.players_path, &records)?;
        debug!(target: "qcm_backend", pseudo = %player.name, "Player record saved");
        Ok(())
    }
}

#[async_trait]
impl LeaderboardStore for JsonFileStore {
    #[instrument(level = "debug", skip(self))]
    async fn load_scores(&self) -> Result<Vec<ScoreRecord>, QuizError> {
        Self::read_list(&self.leaderboard_path)
    }

    #[instrument(level = "debug", skip(self, scores), fields(count = scores.len()))]
    async fn save_scores(&self, scores: &[ScoreRecord]) -> Result<(), QuizError> {
        let _guard = self.write_lock.lock().await;
        let mut sorted: Vec<ScoreRecord> = scores.to_vec();
        sorted.sort_by(|a, b| b.score.cmp(&a.score));
        Self::write_list(&self.leaderboard_path, &sorted)
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Keeps everything in process memory. Registration order is preserved so the
/// hydrated registry ranks ties the same way the file store does.
#[derive(Default)]
pub struct MemoryStore {
    players: Mutex<(Vec<String>, HashMap<String, Player>)>,
    scores: Mutex<Vec<ScoreRecord>>,
}

#[async_trait]
impl PlayerStore for MemoryStore {
    async fn load_players(&self) -> Result<Vec<Player>, QuizError> {
        let guard = self.players.lock().await;
        let (order, by_name) = &*guard;
        Ok(order.iter().filter_map(|n| by_name.get(n).cloned()).collect())
    }

    async fn save_player(&self, player: &Player) -> Result<(), QuizError> {
        let mut guard = self.players.lock().await;
        let (order, by_name) = &mut *guard;
        if !by_name.contains_key(&player.name) {
            order.push(player.name.clone());
        }
        by_name.insert(player.name.clone(), player.clone());
        Ok(())
    }
}

#[async_trait]
impl LeaderboardStore for MemoryStore {
    async fn load_scores(&self) -> Result<Vec<ScoreRecord>, QuizError> {
        Ok(self.scores.lock().await.clone())
    }

    async fn save_scores(&self, scores: &[ScoreRecord]) -> Result<(), QuizError> {
        let mut sorted: Vec<ScoreRecord> = scores.to_vec();
        sorted.sort_by(|a, b| b.score.cmp(&a.score));
        *self.scores.lock().await = sorted;
        Ok(())
    }
}
