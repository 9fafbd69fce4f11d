use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Progress of one browser session through one quiz attempt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuizSession {
    pub question_ids: Vec<i64>,
    pub current_index: usize,
    pub score: usize,
    pub answers: HashMap<i64, i64>,
    pub wrong_question_ids: Vec<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct,
    Incorrect,
    /// The submitted question is not the one currently shown.
    Stale,
}

impl QuizSession {
    pub fn new(question_ids: Vec<i64>) -> Self {
        Self {
            question_ids,
            ..Self::default()
        }
    }

    pub fn total(&self) -> usize {
        self.question_ids.len()
    }

    pub fn is_finished(&self) -> bool {
        self.current_index >= self.question_ids.len()
    }

    pub fn current_question_id(&self) -> Option<i64> {
        self.question_ids.get(self.current_index).copied()
    }

    pub fn answer(&mut self, question_id: i64, option_id: i64, is_correct: bool) -> AnswerOutcome {
        if self.current_question_id() != Some(question_id) {
            return AnswerOutcome::Stale;
        }

        self.answers.insert(question_id, option_id);
        self.current_index += 1;

        if is_correct {
            self.score += 1;
            AnswerOutcome::Correct
        } else {
            if !self.wrong_question_ids.contains(&question_id) {
                self.wrong_question_ids.push(question_id);
            }
            AnswerOutcome::Incorrect
        }
    }

    /// A fresh attempt over the questions answered wrongly in this one.
    pub fn retry_wrong(&self) -> Option<QuizSession> {
        if self.wrong_question_ids.is_empty() {
            return None;
        }
        Some(QuizSession::new(self.wrong_question_ids.clone()))
    }
}
