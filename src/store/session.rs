use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::models::{NormalizedQuestion, QuizResult};

/// Lifecycle of one quiz run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No quiz running. Questions may or may not be loaded.
    #[default]
    Idle,
    /// Answering questions.
    InProgress,
    /// Submitted; results are available.
    Completed,
}

/// In-memory state of the session. Only a slice of it is persisted.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub player_name: String,
    pub is_name_set: bool,
    pub questions: Vec<NormalizedQuestion>,
    pub current_index: usize,
    /// Answer picked on the current screen. Cleared on navigation; use the
    /// answers map to show earlier choices.
    pub selected_answer: Option<String>,
    /// Chosen answer text keyed by question id.
    pub answers: HashMap<usize, String>,
    pub phase: Phase,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub history: Vec<QuizResult>,
}

impl SessionState {
    pub fn current_question(&self) -> Option<&NormalizedQuestion> {
        self.questions.get(self.current_index)
    }

    pub fn is_last_question(&self) -> bool {
        self.current_index + 1 >= self.questions.len()
    }

    /// Number of questions whose recorded answer matches the correct one.
    /// Unanswered questions never count.
    pub fn score(&self) -> usize {
        self.questions
            .iter()
            .filter(|question| {
                self.answers
                    .get(&question.id)
                    .is_some_and(|answer| question.is_correct(answer))
            })
            .count()
    }

    /// Seconds between start and end, or 0 when the quiz never started.
    pub fn time_taken(&self) -> f64 {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => (end - start).num_milliseconds().max(0) as f64 / 1000.0,
            _ => 0.0,
        }
    }

    /// Time from start to end, or to `now` while the quiz is running.
    pub fn elapsed(&self, now: DateTime<Utc>) -> Option<chrono::Duration> {
        let start = self.start_time?;
        let end = self.end_time.unwrap_or(now);
        Some((end - start).max(chrono::Duration::zero()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, QuestionType};

    fn question(id: usize, correct: &str) -> NormalizedQuestion {
        NormalizedQuestion {
            id,
            category: "General Knowledge".to_string(),
            question_type: QuestionType::Boolean,
            difficulty: Difficulty::Easy,
            question: format!("Question {id}"),
            correct_answer: correct.to_string(),
            incorrect_answers: vec!["Nope".to_string()],
            all_answers: vec![correct.to_string(), "Nope".to_string()],
        }
    }

    #[test]
    fn test_score_counts_exact_matches_only() {
        let mut state = SessionState {
            questions: vec![question(0, "True"), question(1, "False"), question(2, "True")],
            ..SessionState::default()
        };
        state.answers.insert(0, "True".to_string());
        state.answers.insert(1, "false".to_string());

        assert_eq!(state.score(), 1);
    }

    #[test]
    fn test_time_taken() {
        let start = Utc::now();
        let state = SessionState {
            start_time: Some(start),
            end_time: Some(start + chrono::Duration::milliseconds(2500)),
            ..SessionState::default()
        };
        assert_eq!(state.time_taken(), 2.5);
        assert_eq!(SessionState::default().time_taken(), 0.0);
    }

    #[test]
    fn test_elapsed() {
        let start = Utc::now();
        let mut state = SessionState {
            start_time: Some(start),
            ..SessionState::default()
        };
        let later = start + chrono::Duration::seconds(42);
        assert_eq!(state.elapsed(later), Some(chrono::Duration::seconds(42)));
        assert_eq!(state.elapsed(start - chrono::Duration::seconds(1)), Some(chrono::Duration::zero()));

        state.end_time = Some(start + chrono::Duration::seconds(10));
        assert_eq!(state.elapsed(later), Some(chrono::Duration::seconds(10)));
        assert_eq!(SessionState::default().elapsed(later), None);
    }
}
