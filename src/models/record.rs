//! Records persisted between runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Marker value of `last_completed_question` when no quiz is in progress.
pub const NO_PROGRESS: i64 = -1;

/// The player's identity and resume marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    pub name: String,
    pub last_completed_question: i64,
    pub score: usize,
}

impl PlayerRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            last_completed_question: NO_PROGRESS,
            score: 0,
        }
    }

    /// Index to re-enter the quiz at, if a quiz was left in progress.
    pub fn resume_index(&self) -> Option<usize> {
        usize::try_from(self.last_completed_question)
            .ok()
            .map(|last| last + 1)
    }
}

/// One finished quiz. Only ever appended to the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub player_name: String,
    pub score: usize,
    pub total_questions: usize,
    /// Seconds between start and submission.
    pub time_taken: f64,
    pub date: DateTime<Utc>,
}

impl QuizResult {
    pub fn percentage(&self) -> f64 {
        if self.total_questions > 0 {
            (self.score as f64 / self.total_questions as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Durable slice of the session used to rehydrate it on the next launch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub player_name: String,
    pub is_name_set: bool,
    pub quiz_history: Vec<QuizResult>,
}
