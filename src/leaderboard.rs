//! Leaderboard aggregation and answer validation.
//!
//! `rank` is a full recompute over the player records on every call; with the
//! data volumes involved there is nothing to cache. Ordering is score
//! descending, and ties keep the input (registration) order because the sort
//! is stable and no secondary key exists.

use crate::domain::{LeaderboardEntry, Player};

/// Exact string comparison of the selected choice against the correct one.
/// No partial credit, no case or whitespace normalization.
pub fn is_correct(selected: &str, correct: &str) -> bool {
    selected == correct
}

/// Rank players by score, descending; ties keep input order.
pub fn rank(players: &[Player]) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> =
        players.iter().map(LeaderboardEntry::for_player).collect();
    // Vec::sort_by is stable, which is exactly the tie-break we want.
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(name: &str, score: u32) -> Player {
        let mut p = Player::new(name.into(), "hash".into());
        p.score = score;
        // Pretend each point came from one answered question.
        p.answered = (0..score).collect();
        p
    }

    #[test]
    fn ranks_by_score_descending_with_stable_ties() {
        let players = vec![player("a", 10), player("b", 20), player("c", 10)];
        let ranked = rank(&players);
        let names: Vec<&str> = ranked.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn rank_of_empty_input_is_empty() {
        assert!(rank(&[]).is_empty());
    }

    #[test]
    fn is_correct_is_exact_match_only() {
        assert!(is_correct("4", "4"));
        assert!(!is_correct("4 ", "4"));
        assert!(!is_correct("four", "4"));
        assert!(!is_correct("A", "a"));
    }
}
