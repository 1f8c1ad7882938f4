//! Quiz session state machine: block selection, answer grading, completion.
//!
//! A session walks `NotStarted -> InProgress -> Completed` and can be
//! restarted for another block once completed. A block is a random subset
//! (without replacement) of the questions the player has not answered yet.
//! Each question is visited exactly once: submitting an answer advances the
//! cursor, so an accepted answer can never be replayed.

use rand::seq::SliceRandom;
use serde::Serialize;

use crate::domain::{Player, Question};
use crate::error::QuizError;
use crate::leaderboard::is_correct;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    NotStarted,
    InProgress,
    Completed,
}

/// Outcome of starting a block.
#[derive(Debug, PartialEq, Eq)]
pub enum BlockStart {
    /// A block of this many questions is now in progress.
    Started(usize),
    /// The player has already answered every question in the pool.
    /// Not a fault; the session stays out of `InProgress` and the player
    /// record is untouched.
    AllAnswered,
}

/// Result of one graded answer.
#[derive(Clone, Debug, Serialize)]
pub struct AnswerOutcome {
    pub correct: bool,
    /// Revealed so the client can highlight the right choice.
    pub correct_choice: String,
    pub running_score: u32,
    pub index: usize,
    pub total: usize,
    pub finished: bool,
}

/// Per-player quiz state, created at login and keyed by session token.
#[derive(Clone, Debug)]
pub struct QuizSession {
    pub player_name: String,
    questions: Vec<Question>,
    index: usize,
    running_score: u32,
    phase: SessionPhase,
}

impl QuizSession {
    pub fn new(player_name: String) -> Self {
        Self {
            player_name,
            questions: Vec::new(),
            index: 0,
            running_score: 0,
            phase: SessionPhase::NotStarted,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn running_score(&self) -> u32 {
        self.running_score
    }

    /// Start a block of at most `requested` questions drawn from `pool`,
    /// skipping everything the player has already answered. Selection is
    /// uniform and without replacement; block size is
    /// `min(requested, unanswered)`. Rejected while a block is `InProgress`.
    pub fn start(
        &mut self,
        player: &Player,
        pool: &[Question],
        requested: usize,
    ) -> Result<BlockStart, QuizError> {
        if self.phase == SessionPhase::InProgress {
            return Err(QuizError::SessionAlreadyActive);
        }

        let mut available: Vec<Question> = pool
            .iter()
            .filter(|q| !player.answered.contains(&q.id))
            .cloned()
            .collect();
        available.shuffle(&mut rand::thread_rng());
        available.truncate(requested.min(available.len()));
        if available.is_empty() {
            return Ok(BlockStart::AllAnswered);
        }

        let total = available.len();
        self.questions = available;
        self.index = 0;
        self.running_score = 0;
        self.phase = SessionPhase::InProgress;
        Ok(BlockStart::Started(total))
    }

    /// The question under the cursor, with choices shuffled for this
    /// presentation. `None` outside `InProgress`.
    pub fn current_question(&self) -> Option<Question> {
        if self.phase != SessionPhase::InProgress {
            return None;
        }
        self.questions.get(self.index).map(|q| {
            let mut shown = q.clone();
            shown.choices.shuffle(&mut rand::thread_rng());
            shown
        })
    }

    /// Grade `selected` against the current question, record the question id
    /// on the player, and advance the cursor. Transitions to `Completed` when
    /// the block is exhausted, bumping the player's cumulative score.
    ///
    /// Only valid in `InProgress`; the index advance makes resubmitting an
    /// already-graded question impossible.
    pub fn submit_answer(
        &mut self,
        player: &mut Player,
        selected: &str,
    ) -> Result<AnswerOutcome, QuizError> {
        if self.phase != SessionPhase::InProgress {
            return Err(QuizError::SessionNotActive);
        }
        let question = self
            .questions
            .get(self.index)
            .ok_or(QuizError::SessionNotActive)?;

        let correct = is_correct(selected, &question.correct);
        if correct {
            self.running_score += 1;
        }
        // Set insert: recording the same id twice can never double-count.
        player.answered.insert(question.id);
        let correct_choice = question.correct.clone();

        self.index += 1;
        let finished = self.index == self.questions.len();
        if finished {
            self.phase = SessionPhase::Completed;
            player.score += self.running_score;
        }

        Ok(AnswerOutcome {
            correct,
            correct_choice,
            running_score: self.running_score,
            index: self.index,
            total: self.questions.len(),
            finished,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(n: u32) -> Vec<Question> {
        (0..n)
            .map(|i| Question {
                id: i,
                text: format!("q{i}"),
                choices: vec!["right".into(), "w1".into(), "w2".into(), "w3".into()],
                correct: "right".into(),
            })
            .collect()
    }

    fn fresh_player() -> Player {
        Player::new("ana".into(), "hash".into())
    }

    #[test]
    fn block_is_bounded_and_without_replacement() {
        let pool = pool(5);
        let player = fresh_player();
        let mut s = QuizSession::new(player.name.clone());
        assert_eq!(s.start(&player, &pool, 3).unwrap(), BlockStart::Started(3));
        assert_eq!(s.total(), 3);
        let mut ids: Vec<u32> = s.questions.iter().map(|q| q.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn block_never_exceeds_unanswered_count() {
        let pool = pool(4);
        let mut player = fresh_player();
        player.answered.extend([0, 1]);
        let mut s = QuizSession::new(player.name.clone());
        assert_eq!(s.start(&player, &pool, 10).unwrap(), BlockStart::Started(2));
        for q in &s.questions {
            assert!(!player.answered.contains(&q.id));
        }
    }

    #[test]
    fn all_answered_leaves_the_player_untouched() {
        let pool = pool(3);
        let mut player = fresh_player();
        player.answered.extend([0, 1, 2]);
        player.score = 2;
        let mut s = QuizSession::new(player.name.clone());
        assert_eq!(s.start(&player, &pool, 5).unwrap(), BlockStart::AllAnswered);
        assert_eq!(s.phase(), SessionPhase::NotStarted);
        assert_eq!(player.score, 2);
        assert_eq!(player.answered.len(), 3);
    }

    #[test]
    fn start_is_rejected_while_a_block_is_in_progress() {
        let pool = pool(4);
        let player = fresh_player();
        let mut s = QuizSession::new(player.name.clone());
        s.start(&player, &pool, 2).unwrap();
        assert!(matches!(
            s.start(&player, &pool, 2),
            Err(QuizError::SessionAlreadyActive)
        ));
    }

    #[test]
    fn completing_a_block_scores_and_transitions_once() {
        let pool = pool(3);
        let mut player = fresh_player();
        let mut s = QuizSession::new(player.name.clone());
        s.start(&player, &pool, 3).unwrap();

        // Answer everything correctly.
        for i in 1..=3usize {
            let out = s.submit_answer(&mut player, "right").unwrap();
            assert!(out.correct);
            assert_eq!(out.index, i);
            assert_eq!(out.finished, i == 3);
        }

        assert_eq!(s.phase(), SessionPhase::Completed);
        assert_eq!(s.index(), 3);
        assert_eq!(s.running_score(), 3);
        assert_eq!(player.score, 3);
        assert_eq!(player.answered.len(), 3);

        // A fourth submission is not possible.
        assert!(matches!(
            s.submit_answer(&mut player, "right"),
            Err(QuizError::SessionNotActive)
        ));
    }

    #[test]
    fn wrong_answers_advance_without_scoring() {
        let pool = pool(2);
        let mut player = fresh_player();
        let mut s = QuizSession::new(player.name.clone());
        s.start(&player, &pool, 2).unwrap();

        let out = s.submit_answer(&mut player, "w1").unwrap();
        assert!(!out.correct);
        assert_eq!(out.correct_choice, "right");
        assert_eq!(out.running_score, 0);

        let out = s.submit_answer(&mut player, "right").unwrap();
        assert!(out.finished);
        assert_eq!(out.running_score, 1);
        assert!(out.running_score as usize <= out.total);
        assert_eq!(player.score, 1);
        // Wrong answers still land in the answered set.
        assert_eq!(player.answered.len(), 2);
    }

    #[test]
    fn invariant_score_le_index_le_total() {
        let pool = pool(4);
        let mut player = fresh_player();
        let mut s = QuizSession::new(player.name.clone());
        s.start(&player, &pool, 4).unwrap();
        for answer in ["right", "w1", "right", "w2"] {
            assert!(s.running_score() as usize <= s.index());
            assert!(s.index() <= s.total());
            s.submit_answer(&mut player, answer).unwrap();
        }
        assert_eq!(s.running_score(), 2);
        assert_eq!(s.index(), s.total());
    }

    #[test]
    fn current_question_shuffles_choices_but_keeps_the_question() {
        let pool = pool(1);
        let player = fresh_player();
        let mut s = QuizSession::new(player.name.clone());
        s.start(&player, &pool, 1).unwrap();

        let first = s.current_question().unwrap();
        let second = s.current_question().unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.choices.len(), 4);
        let mut sorted_a = first.choices.clone();
        let mut sorted_b = second.choices.clone();
        sorted_a.sort();
        sorted_b.sort();
        assert_eq!(sorted_a, sorted_b);
        assert!(first.choices.contains(&first.correct));
    }

    #[test]
    fn a_completed_session_can_start_another_block() {
        let pool = pool(4);
        let mut player = fresh_player();
        let mut s = QuizSession::new(player.name.clone());
        s.start(&player, &pool, 2).unwrap();
        s.submit_answer(&mut player, "right").unwrap();
        s.submit_answer(&mut player, "right").unwrap();
        assert_eq!(s.phase(), SessionPhase::Completed);

        assert_eq!(s.start(&player, &pool, 10).unwrap(), BlockStart::Started(2));
        // The new block only holds questions the first one did not cover.
        for q in &s.questions {
            assert!(!player.answered.contains(&q.id));
        }
    }
}
