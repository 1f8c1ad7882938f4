//! Application state: question pool, player registry, session map, stores.
//!
//! This module owns:
//!   - the parsed question pool (file bank + config bank, stable ids)
//!   - the in-memory player registry, hydrated from the player store
//!   - active quiz sessions keyed by token, one per player identity
//!   - the injected persistence interfaces
//!
//! Lock order: when both maps are needed, take `sessions` before `players`.
//! Every read-modify-write happens under the map's write lock, which
//! serializes racing requests for the same player.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::config::QuizConfig;
use crate::domain::{Player, Question};
use crate::error::QuizError;
use crate::questions::load_questions;
use crate::session::QuizSession;
use crate::store::{LeaderboardStore, PlayerStore};

/// Player registry preserving registration order, so leaderboard ties keep
/// the order players signed up in.
#[derive(Default)]
pub struct PlayerRegistry {
    by_name: HashMap<String, Player>,
    order: Vec<String>,
}

impl PlayerRegistry {
    pub fn from_players(players: Vec<Player>) -> Self {
        let mut reg = Self::default();
        for p in players {
            reg.insert_new(p);
        }
        reg
    }

    /// Insert a player; returns `false` (and changes nothing) when the name
    /// is already taken.
    pub fn insert_new(&mut self, player: Player) -> bool {
        if self.by_name.contains_key(&player.name) {
            return false;
        }
        self.order.push(player.name.clone());
        self.by_name.insert(player.name.clone(), player);
        true
    }

    pub fn get(&self, name: &str) -> Option<&Player> {
        self.by_name.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Player> {
        self.by_name.get_mut(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Cloned players in registration order.
    pub fn in_order(&self) -> Vec<Player> {
        self.order
            .iter()
            .filter_map(|n| self.by_name.get(n).cloned())
            .collect()
    }
}

/// Active sessions: token -> session, plus a token index per player so a
/// fresh login invalidates the previous one.
#[derive(Default)]
pub struct SessionRegistry {
    by_token: HashMap<String, QuizSession>,
    token_by_player: HashMap<String, String>,
}

impl SessionRegistry {
    /// Issue a new token for `player_name`, dropping any previous session.
    pub fn issue(&mut self, player_name: &str) -> String {
        if let Some(old) = self.token_by_player.remove(player_name) {
            self.by_token.remove(&old);
        }
        let token = Uuid::new_v4().to_string();
        self.by_token
            .insert(token.clone(), QuizSession::new(player_name.to_string()));
        self.token_by_player
            .insert(player_name.to_string(), token.clone());
        token
    }

    pub fn get(&self, token: &str) -> Option<&QuizSession> {
        self.by_token.get(token)
    }

    pub fn get_mut(&mut self, token: &str) -> Option<&mut QuizSession> {
        self.by_token.get_mut(token)
    }

    /// Drop a session by token; returns `true` when one existed.
    pub fn remove(&mut self, token: &str) -> bool {
        match self.by_token.remove(token) {
            Some(session) => {
                self.token_by_player.remove(&session.player_name);
                true
            }
            None => false,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<Vec<Question>>,
    pub players: Arc<RwLock<PlayerRegistry>>,
    pub sessions: Arc<RwLock<SessionRegistry>>,
    pub player_store: Arc<dyn PlayerStore>,
    pub leaderboard_store: Arc<dyn LeaderboardStore>,
    pub block_size: usize,
    pub leaderboard_limit: usize,
}

impl AppState {
    /// Build state: load the question banks and hydrate players from the store.
    #[instrument(level = "info", skip_all)]
    pub async fn new(
        cfg: QuizConfig,
        player_store: Arc<dyn PlayerStore>,
        leaderboard_store: Arc<dyn LeaderboardStore>,
    ) -> Result<Self, QuizError> {
        // File bank first; a missing file leaves the config bank as the only
        // source rather than stopping startup.
        let mut pool = match load_questions(&cfg.quiz.question_file) {
            Ok(qs) => qs,
            Err(e) => {
                error!(target: "quiz", path = %cfg.quiz.question_file, error = %e, "Failed to read question file; continuing with config bank only");
                Vec::new()
            }
        };
        let file_count = pool.len();

        // Config bank entries continue the id sequence so both banks stay
        // stable for an unchanged source.
        for qc in &cfg.questions {
            if qc.wrong.len() != 3 {
                error!(target: "quiz", text = %qc.text, wrong = qc.wrong.len(), "Skipping bank item: need exactly 3 wrong choices.");
                continue;
            }
            let mut choices = Vec::with_capacity(4);
            choices.push(qc.correct.clone());
            choices.extend(qc.wrong.iter().cloned());
            pool.push(Question {
                id: pool.len() as u32,
                text: qc.text.clone(),
                choices,
                correct: qc.correct.clone(),
            });
        }
        info!(target: "quiz", from_file = file_count, from_config = pool.len() - file_count, total = pool.len(), "Startup question inventory");

        // Hydrate the player registry and log what persistence already holds.
        let players = PlayerRegistry::from_players(player_store.load_players().await?);
        let snapshot = leaderboard_store.load_scores().await?;
        info!(target: "qcm_backend", players = players.len(), snapshot_entries = snapshot.len(), "Startup player inventory");

        Ok(Self {
            pool: Arc::new(pool),
            players: Arc::new(RwLock::new(players)),
            sessions: Arc::new(RwLock::new(SessionRegistry::default())),
            player_store,
            leaderboard_store,
            block_size: cfg.quiz.block_size.max(1),
            leaderboard_limit: cfg.quiz.leaderboard_limit.max(1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(name: &str) -> Player {
        Player::new(name.into(), "hash".into())
    }

    #[test]
    fn registry_rejects_duplicate_names() {
        let mut reg = PlayerRegistry::default();
        assert!(reg.insert_new(player("ana")));
        assert!(!reg.insert_new(player("ana")));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn registry_keeps_registration_order() {
        let mut reg = PlayerRegistry::default();
        for name in ["c", "a", "b"] {
            reg.insert_new(player(name));
        }
        let names: Vec<String> = reg.in_order().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn login_invalidates_the_previous_token() {
        let mut sessions = SessionRegistry::default();
        let first = sessions.issue("ana");
        let second = sessions.issue("ana");
        assert_ne!(first, second);
        assert!(sessions.get(&first).is_none());
        assert!(sessions.get(&second).is_some());
    }

    #[test]
    fn remove_clears_both_indices() {
        let mut sessions = SessionRegistry::default();
        let token = sessions.issue("ana");
        assert!(sessions.remove(&token));
        assert!(!sessions.remove(&token));
        // A later login works from a clean slate.
        let again = sessions.issue("ana");
        assert!(sessions.get(&again).is_some());
    }
}
