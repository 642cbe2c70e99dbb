//! Quiz session store.
//!
//! Owns the session state machine (`Idle -> InProgress -> Completed`) and
//! writes the durable parts of it through an injected [`Storage`] port.
//! Transitions whose guard does not hold are ignored and reported as
//! [`Transition::Ignored`]; they never panic or error.

mod session;
pub mod storage;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::models::{NormalizedQuestion, PlayerRecord, QuizResult, SessionSnapshot, NO_PROGRESS};

pub use session::{Phase, SessionState};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};

use storage::{read_json, write_json, PLAYER_DATA_KEY, QUIZ_HISTORY_KEY, SESSION_KEY};

/// Outcome of a state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Applied,
    /// The guard did not hold and nothing changed.
    Ignored,
}

impl Transition {
    pub fn is_applied(&self) -> bool {
        matches!(self, Transition::Applied)
    }
}

/// Identifies one question request. Only the most recently issued token is
/// accepted by [`SessionStore::accept_questions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

pub struct SessionStore<S: Storage> {
    state: SessionState,
    storage: S,
    /// Index restored by `load_saved_progress`, waiting for `resume_quiz`.
    pending_resume: Option<usize>,
    request_generation: u64,
}

impl<S: Storage> SessionStore<S> {
    /// Create a store and rehydrate name and history from storage.
    pub fn open(storage: S) -> Self {
        let mut state = SessionState::default();
        if let Some(snapshot) = read_json::<SessionSnapshot>(&storage, SESSION_KEY) {
            state.player_name = snapshot.player_name;
            state.is_name_set = snapshot.is_name_set;
            state.history = snapshot.quiz_history;
        }

        Self {
            state,
            storage,
            pending_resume: None,
            request_generation: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn player_name(&self) -> &str {
        &self.state.player_name
    }

    pub fn is_name_set(&self) -> bool {
        self.state.is_name_set
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn questions(&self) -> &[NormalizedQuestion] {
        &self.state.questions
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    pub fn current_question(&self) -> Option<&NormalizedQuestion> {
        self.state.current_question()
    }

    pub fn selected_answer(&self) -> Option<&str> {
        self.state.selected_answer.as_deref()
    }

    pub fn answer_for(&self, question_id: usize) -> Option<&str> {
        self.state.answers.get(&question_id).map(String::as_str)
    }

    /// Answer to highlight for the current question, taken from the answers
    /// map so that earlier choices show up after navigating back.
    pub fn displayed_answer(&self) -> Option<&str> {
        self.current_question()
            .and_then(|question| self.answer_for(question.id))
    }

    pub fn answered_count(&self) -> usize {
        self.state
            .questions
            .iter()
            .filter(|q| self.state.answers.contains_key(&q.id))
            .count()
    }

    pub fn all_answered(&self) -> bool {
        !self.state.questions.is_empty() && self.answered_count() == self.state.questions.len()
    }

    pub fn history(&self) -> &[QuizResult] {
        &self.state.history
    }

    /// Most recent results first. Trimming is for display only; storage
    /// keeps the full history.
    pub fn recent_history(&self, limit: usize) -> impl Iterator<Item = &QuizResult> {
        self.state.history.iter().rev().take(limit)
    }

    pub fn last_result(&self) -> Option<&QuizResult> {
        self.state.history.last()
    }

    pub fn has_pending_resume(&self) -> bool {
        self.pending_resume.is_some()
    }

    /// Time spent on the current quiz, still running until it is submitted.
    pub fn elapsed(&self) -> Option<chrono::Duration> {
        self.state.elapsed(Utc::now())
    }

    /// Start a fresh record for `name`. Any progress restored for the
    /// previous record is dropped with it.
    pub fn set_player_name(&mut self, name: &str) -> Transition {
        self.state.player_name = name.to_string();
        self.state.is_name_set = true;
        self.pending_resume = None;

        write_json(&mut self.storage, PLAYER_DATA_KEY, &PlayerRecord::new(name));
        self.persist_snapshot();

        info!(player = name, "player name set");
        Transition::Applied
    }

    /// Replace the question list. A restored resume index is clamped to the
    /// new list.
    pub fn set_questions(&mut self, questions: Vec<NormalizedQuestion>) -> Transition {
        self.state.questions = questions;

        if let Some(index) = self.pending_resume {
            let clamped = clamp_index(index, self.state.questions.len());
            if clamped != index {
                warn!(index, clamped, "resume index out of range for new questions");
            }
            self.pending_resume = Some(clamped);
            self.state.current_index = clamped;
        }

        Transition::Applied
    }

    /// Issue a token for a new question request. Any earlier token becomes
    /// stale.
    pub fn begin_request(&mut self) -> RequestToken {
        self.request_generation += 1;
        RequestToken(self.request_generation)
    }

    /// Install the result of a question request if it belongs to the latest
    /// request.
    pub fn accept_questions(
        &mut self,
        token: RequestToken,
        questions: Vec<NormalizedQuestion>,
    ) -> Transition {
        if token.0 != self.request_generation {
            debug!(?token, latest = self.request_generation, "dropping stale questions");
            return Transition::Ignored;
        }
        self.set_questions(questions)
    }

    /// Returns true if `token` is still the latest request.
    pub fn is_current_request(&self, token: RequestToken) -> bool {
        token.0 == self.request_generation
    }

    pub fn start_quiz(&mut self) -> Transition {
        if self.state.questions.is_empty() {
            warn!("starting a quiz without questions");
        }

        self.state.phase = Phase::InProgress;
        self.state.current_index = 0;
        self.state.selected_answer = None;
        self.state.answers.clear();
        self.state.start_time = Some(Utc::now());
        self.state.end_time = None;
        self.pending_resume = None;

        info!(questions = self.state.questions.len(), "quiz started");
        Transition::Applied
    }

    /// Continue a quiz found by `load_saved_progress` at the restored index.
    /// Answers given before the restart are not kept.
    pub fn resume_quiz(&mut self) -> Transition {
        let Some(index) = self.pending_resume.take() else {
            return Transition::Ignored;
        };

        self.state.phase = Phase::InProgress;
        self.state.current_index = clamp_index(index, self.state.questions.len());
        self.state.selected_answer = None;
        self.state.answers.clear();
        self.state.start_time = Some(Utc::now());
        self.state.end_time = None;

        info!(index = self.state.current_index, "quiz resumed");
        Transition::Applied
    }

    pub fn select_answer(&mut self, answer: &str) -> Transition {
        if self.state.phase != Phase::InProgress {
            return Transition::Ignored;
        }
        let Some(question_id) = self.current_question().map(|q| q.id) else {
            return Transition::Ignored;
        };

        self.state.selected_answer = Some(answer.to_string());
        self.state.answers.insert(question_id, answer.to_string());
        Transition::Applied
    }

    /// Move forward and record the index being left as the resume marker.
    pub fn go_to_next_question(&mut self) -> Transition {
        let left = self.state.current_index;
        if left + 1 >= self.state.questions.len() {
            return Transition::Ignored;
        }

        self.state.current_index = left + 1;
        self.state.selected_answer = None;

        self.update_player_record(|record| {
            record.last_completed_question = left as i64;
        });
        Transition::Applied
    }

    /// Move back. The resume marker only tracks forward progress and is
    /// left untouched.
    pub fn go_to_previous_question(&mut self) -> Transition {
        if self.state.current_index == 0 {
            return Transition::Ignored;
        }

        self.state.current_index -= 1;
        self.state.selected_answer = None;
        Transition::Applied
    }

    /// Score the quiz, append the result to the history and clear the resume
    /// marker. Unanswered questions count as wrong.
    pub fn submit_quiz(&mut self) -> Transition {
        if self.state.phase != Phase::InProgress {
            return Transition::Ignored;
        }

        let end_time = Utc::now();
        self.state.end_time = Some(end_time);
        self.state.phase = Phase::Completed;

        let score = self.state.score();
        let result = QuizResult {
            player_name: self.state.player_name.clone(),
            score,
            total_questions: self.state.questions.len(),
            time_taken: self.state.time_taken(),
            date: end_time,
        };
        info!(
            player = %result.player_name,
            score,
            total = result.total_questions,
            seconds = result.time_taken,
            "quiz submitted"
        );

        self.update_player_record(|record| {
            record.last_completed_question = NO_PROGRESS;
            record.score = score;
        });

        let mut stored: Vec<QuizResult> =
            read_json(&self.storage, QUIZ_HISTORY_KEY).unwrap_or_default();
        stored.push(result.clone());
        write_json(&mut self.storage, QUIZ_HISTORY_KEY, &stored);

        self.state.history.push(result);
        self.persist_snapshot();
        Transition::Applied
    }

    /// Back to the pre-quiz shape. Player identity and history are kept.
    pub fn reset_quiz(&mut self) -> Transition {
        self.state.current_index = 0;
        self.state.selected_answer = None;
        self.state.answers.clear();
        self.state.phase = Phase::Idle;
        self.state.start_time = None;
        self.state.end_time = None;
        self.pending_resume = None;
        Transition::Applied
    }

    /// Restore the player and resume marker from storage. Returns true when
    /// a quiz was left in progress; its next index becomes the current one.
    pub fn load_saved_progress(&mut self) -> bool {
        if let Some(record) = read_json::<PlayerRecord>(&self.storage, PLAYER_DATA_KEY) {
            if !record.name.is_empty() {
                self.state.player_name = record.name.clone();
                self.state.is_name_set = true;
            }

            if let Some(index) = record.resume_index() {
                debug!(index, "found quiz in progress");
                self.state.current_index = index;
                self.pending_resume = Some(index);
                return true;
            }
        }

        if let Some(history) = read_json::<Vec<QuizResult>>(&self.storage, QUIZ_HISTORY_KEY) {
            self.state.history = history;
        }
        false
    }

    /// Only an existing record is updated. Records are created by
    /// `set_player_name`.
    fn update_player_record(&mut self, update: impl FnOnce(&mut PlayerRecord)) {
        let Some(mut record) = read_json::<PlayerRecord>(&self.storage, PLAYER_DATA_KEY) else {
            debug!("no player record to update");
            return;
        };
        update(&mut record);
        write_json(&mut self.storage, PLAYER_DATA_KEY, &record);
    }

    fn persist_snapshot(&mut self) {
        let snapshot = SessionSnapshot {
            player_name: self.state.player_name.clone(),
            is_name_set: self.state.is_name_set,
            quiz_history: self.state.history.clone(),
        };
        write_json(&mut self.storage, SESSION_KEY, &snapshot);
    }
}

fn clamp_index(index: usize, len: usize) -> usize {
    index.min(len.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, QuestionType};

    fn questions(count: usize) -> Vec<NormalizedQuestion> {
        (0..count)
            .map(|id| NormalizedQuestion {
                id,
                category: "History".to_string(),
                question_type: QuestionType::Multiple,
                difficulty: Difficulty::Medium,
                question: format!("Question {id}"),
                correct_answer: format!("right {id}"),
                incorrect_answers: vec![format!("wrong {id}"), format!("other {id}")],
                all_answers: vec![
                    format!("wrong {id}"),
                    format!("right {id}"),
                    format!("other {id}"),
                ],
            })
            .collect()
    }

    fn started(count: usize) -> SessionStore<MemoryStorage> {
        let mut store = SessionStore::open(MemoryStorage::new());
        store.set_player_name("Ana");
        store.set_questions(questions(count));
        store.start_quiz();
        store
    }

    fn stored_record(store: &SessionStore<MemoryStorage>) -> PlayerRecord {
        read_json(store.storage(), PLAYER_DATA_KEY).unwrap()
    }

    #[test]
    fn test_navigation_bounds() {
        let mut store = started(3);
        assert_eq!(store.go_to_previous_question(), Transition::Ignored);
        assert_eq!(store.current_index(), 0);

        store.go_to_next_question();
        store.go_to_next_question();
        assert_eq!(store.current_index(), 2);
        assert_eq!(store.go_to_next_question(), Transition::Ignored);
        assert_eq!(store.current_index(), 2);
    }

    #[test]
    fn test_resume_marker_tracks_forward_progress() {
        let mut store = started(5);
        store.go_to_next_question();
        assert_eq!(stored_record(&store).last_completed_question, 0);

        store.go_to_next_question();
        store.go_to_previous_question();
        assert_eq!(store.current_index(), 1);
        assert_eq!(stored_record(&store).last_completed_question, 1);
    }

    #[test]
    fn test_select_answer_overwrites() {
        let mut store = started(2);
        store.select_answer("wrong 0");
        store.select_answer("right 0");
        assert_eq!(store.answer_for(0), Some("right 0"));
        assert_eq!(store.selected_answer(), Some("right 0"));
    }

    #[test]
    fn test_navigation_clears_selection_but_keeps_answers() {
        let mut store = started(2);
        store.select_answer("right 0");
        store.go_to_next_question();
        assert_eq!(store.selected_answer(), None);
        assert_eq!(store.displayed_answer(), None);

        store.go_to_previous_question();
        assert_eq!(store.selected_answer(), None);
        assert_eq!(store.displayed_answer(), Some("right 0"));
    }

    #[test]
    fn test_select_answer_requires_running_quiz() {
        let mut store = SessionStore::open(MemoryStorage::new());
        store.set_questions(questions(2));
        assert_eq!(store.select_answer("right 0"), Transition::Ignored);
        assert!(store.state().answers.is_empty());
    }

    #[test]
    fn test_submit_scores_and_clears_marker() {
        let mut store = started(3);
        store.select_answer("right 0");
        store.go_to_next_question();
        store.select_answer("wrong 1");

        assert!(store.submit_quiz().is_applied());
        assert_eq!(store.phase(), Phase::Completed);

        let result = store.last_result().unwrap();
        assert_eq!(result.score, 1);
        assert_eq!(result.total_questions, 3);
        assert_eq!(result.player_name, "Ana");

        let record = stored_record(&store);
        assert_eq!(record.last_completed_question, NO_PROGRESS);
        assert_eq!(record.score, 1);

        assert_eq!(store.submit_quiz(), Transition::Ignored);
        assert_eq!(store.history().len(), 1);
    }

    #[test]
    fn test_reset_keeps_identity_and_history() {
        let mut store = started(2);
        store.select_answer("right 0");
        store.submit_quiz();
        store.reset_quiz();

        assert_eq!(store.phase(), Phase::Idle);
        assert_eq!(store.current_index(), 0);
        assert!(store.state().answers.is_empty());
        assert!(store.state().start_time.is_none());
        assert_eq!(store.player_name(), "Ana");
        assert_eq!(store.history().len(), 1);
    }

    #[test]
    fn test_stale_request_is_ignored() {
        let mut store = SessionStore::open(MemoryStorage::new());
        let first = store.begin_request();
        let second = store.begin_request();

        assert_eq!(store.accept_questions(first, questions(5)), Transition::Ignored);
        assert!(store.questions().is_empty());
        assert!(store.accept_questions(second, questions(2)).is_applied());
        assert_eq!(store.questions().len(), 2);
    }

    #[test]
    fn test_resume_clamps_to_new_batch() {
        let mut storage = MemoryStorage::new();
        storage
            .set(
                PLAYER_DATA_KEY,
                r#"{"name":"Ana","lastCompletedQuestion":7,"score":0}"#,
            )
            .unwrap();

        let mut store = SessionStore::open(storage);
        assert!(store.load_saved_progress());
        assert_eq!(store.current_index(), 8);

        store.set_questions(questions(4));
        assert_eq!(store.current_index(), 3);
        assert!(store.resume_quiz().is_applied());
        assert_eq!(store.phase(), Phase::InProgress);
        assert_eq!(store.current_index(), 3);
        assert_eq!(store.resume_quiz(), Transition::Ignored);
    }

    #[test]
    fn test_resume_without_progress_is_ignored() {
        let mut store = SessionStore::open(MemoryStorage::new());
        store.set_questions(questions(3));
        assert_eq!(store.resume_quiz(), Transition::Ignored);
        assert_eq!(store.phase(), Phase::Idle);
    }

    #[test]
    fn test_malformed_record_means_no_progress() {
        let mut storage = MemoryStorage::new();
        storage.set(PLAYER_DATA_KEY, "garbage").unwrap();

        let mut store = SessionStore::open(storage);
        assert!(!store.load_saved_progress());
        assert!(!store.is_name_set());
    }

    #[test]
    fn test_progress_without_player_writes_no_record() {
        let mut store = SessionStore::open(MemoryStorage::new());
        store.set_questions(questions(3));
        store.start_quiz();
        assert!(store.go_to_next_question().is_applied());
        store.submit_quiz();

        assert_eq!(store.storage().get(PLAYER_DATA_KEY).unwrap(), None);
        let mut reopened = SessionStore::open(store.storage().clone());
        assert!(!reopened.load_saved_progress());
        assert!(!reopened.is_name_set());
    }

    #[test]
    fn test_new_name_drops_restored_progress() {
        let mut storage = MemoryStorage::new();
        storage
            .set(
                PLAYER_DATA_KEY,
                r#"{"name":"Ana","lastCompletedQuestion":2,"score":0}"#,
            )
            .unwrap();

        let mut store = SessionStore::open(storage);
        assert!(store.load_saved_progress());
        assert!(store.has_pending_resume());

        store.set_player_name("Ben");
        assert!(!store.has_pending_resume());
        store.set_questions(questions(5));
        assert_eq!(store.resume_quiz(), Transition::Ignored);
        assert_eq!(stored_record(&store).last_completed_question, NO_PROGRESS);
    }

    #[test]
    fn test_elapsed_follows_quiz_lifecycle() {
        let mut store = SessionStore::open(MemoryStorage::new());
        assert!(store.elapsed().is_none());

        store.set_questions(questions(1));
        store.start_quiz();
        assert!(store.elapsed().unwrap() >= chrono::Duration::zero());

        store.submit_quiz();
        let frozen = store.elapsed().unwrap();
        assert_eq!(store.elapsed(), Some(frozen));

        store.reset_quiz();
        assert!(store.elapsed().is_none());
    }

    #[test]
    fn test_snapshot_rehydrates_on_open() {
        let mut store = started(1);
        store.select_answer("right 0");
        store.submit_quiz();

        let reopened = SessionStore::open(store.storage().clone());
        assert_eq!(reopened.player_name(), "Ana");
        assert!(reopened.is_name_set());
        assert_eq!(reopened.history().len(), 1);
        assert!(reopened.questions().is_empty());
    }
}
