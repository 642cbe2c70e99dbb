use rand::rngs::StdRng;
use rand::SeedableRng;

use trivia_quiz::models::{
    Difficulty, NormalizedQuestion, PlayerRecord, QuestionType, QuizResult, RawQuestion,
    TriviaResponse,
};
use trivia_quiz::pipeline::{normalize_response, normalize_with_rng, FetchError, SourceError};
use trivia_quiz::store::storage::{PLAYER_DATA_KEY, QUIZ_HISTORY_KEY};
use trivia_quiz::{FileStorage, MemoryStorage, Phase, SessionStore, Storage, Transition};

fn raw(question: &str, correct: &str, incorrect: &[&str]) -> RawQuestion {
    RawQuestion {
        category: "Geography".to_string(),
        question_type: QuestionType::Multiple,
        difficulty: Difficulty::Easy,
        question: question.to_string(),
        correct_answer: correct.to_string(),
        incorrect_answers: incorrect.iter().map(|s| s.to_string()).collect(),
    }
}

fn batch(count: usize) -> Vec<NormalizedQuestion> {
    let raw: Vec<RawQuestion> = (0..count)
        .map(|i| {
            raw(
                &format!("Capital #{i}?"),
                &format!("Correct {i}"),
                &["Wrong A", "Wrong B", "Wrong C"],
            )
        })
        .collect();
    normalize_with_rng(raw, &mut StdRng::seed_from_u64(3))
}

fn stored_record<S: Storage>(store: &SessionStore<S>) -> PlayerRecord {
    let raw = store.storage().get(PLAYER_DATA_KEY).unwrap().unwrap();
    serde_json::from_str(&raw).unwrap()
}

fn stored_history<S: Storage>(store: &SessionStore<S>) -> Vec<QuizResult> {
    let raw = store.storage().get(QUIZ_HISTORY_KEY).unwrap().unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn test_three_question_quiz_scores_two() {
    let mut store = SessionStore::open(MemoryStorage::new());
    store.set_player_name("Ana");
    store.set_questions(batch(3));
    store.start_quiz();

    store.select_answer("Correct 0");
    store.go_to_next_question();
    store.select_answer("Wrong B");
    store.go_to_next_question();
    store.select_answer("Correct 2");

    assert_eq!(store.submit_quiz(), Transition::Applied);

    let result = store.last_result().unwrap();
    assert_eq!(result.score, 2);
    assert_eq!(result.total_questions, 3);
    assert!(result.time_taken >= 0.0);
    assert_eq!(stored_history(&store), vec![result.clone()]);
}

#[test]
fn test_name_then_load_in_fresh_session() {
    let mut store = SessionStore::open(MemoryStorage::new());
    store.set_player_name("Ana");

    assert!(!store.load_saved_progress());
    assert_eq!(store.player_name(), "Ana");
    assert!(store.is_name_set());
}

#[test]
fn test_resume_marker_after_three_advances() {
    let mut store = SessionStore::open(MemoryStorage::new());
    store.set_player_name("Ana");
    store.set_questions(batch(5));
    store.start_quiz();

    for _ in 0..3 {
        store.go_to_next_question();
    }

    assert_eq!(store.current_index(), 3);
    assert_eq!(stored_record(&store).last_completed_question, 2);
}

#[test]
fn test_no_results_code_is_a_source_error() {
    let response: TriviaResponse =
        serde_json::from_str(r#"{"response_code": 1, "results": []}"#).unwrap();

    let err = FetchError::from(normalize_response(response).unwrap_err());
    assert!(matches!(err, FetchError::Source(SourceError::NoResults)));
    assert!(err.to_string().contains("no results for given filters"));
}

#[test]
fn test_history_is_append_only() {
    let mut store = SessionStore::open(MemoryStorage::new());
    store.set_player_name("Ana");

    for round in 0..3 {
        store.set_questions(batch(2));
        store.start_quiz();
        if round > 0 {
            store.select_answer("Correct 0");
        }
        let before: Vec<QuizResult> = store.history().to_vec();

        store.submit_quiz();

        assert_eq!(store.history().len(), before.len() + 1);
        assert_eq!(&store.history()[..before.len()], before.as_slice());
        store.reset_quiz();
    }

    assert_eq!(stored_history(&store).len(), 3);
    let recent: Vec<usize> = store.recent_history(2).map(|r| r.score).collect();
    assert_eq!(recent, vec![1, 1]);
}

#[test]
fn test_unanswered_quiz_scores_zero() {
    let mut store = SessionStore::open(MemoryStorage::new());
    store.set_questions(batch(4));
    store.start_quiz();
    store.submit_quiz();

    assert_eq!(store.phase(), Phase::Completed);
    assert_eq!(store.last_result().unwrap().score, 0);
}

#[test]
fn test_progress_survives_restart_on_disk() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut store = SessionStore::open(FileStorage::open(dir.path()).unwrap());
        store.set_player_name("Ana");
        store.set_questions(batch(5));
        store.start_quiz();
        store.go_to_next_question();
        store.go_to_next_question();
        store.go_to_previous_question();
    }

    let mut store = SessionStore::open(FileStorage::open(dir.path()).unwrap());
    assert!(store.is_name_set());
    assert!(store.load_saved_progress());
    assert_eq!(store.current_index(), 2);

    store.set_questions(batch(5));
    assert_eq!(store.resume_quiz(), Transition::Applied);
    assert_eq!(store.current_index(), 2);
    assert_eq!(store.phase(), Phase::InProgress);
}
