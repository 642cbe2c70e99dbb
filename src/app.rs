use tracing::{debug, warn};

use crate::models::{
    Difficulty, NormalizedQuestion, QuestionType, QuizParams, CATEGORIES, MAX_AMOUNT, MIN_AMOUNT,
};
use crate::pipeline::FetchError;
use crate::store::{FileStorage, RequestToken, SessionStore, Storage};

const NAME_MAX_LENGTH: usize = 24;

/// Past results listed on the results screen.
pub const HISTORY_PREVIEW: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Welcome,
    Loading,
    Quiz,
    Results,
}

/// Focusable items of the welcome form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Amount,
    Category,
    Difficulty,
    QuestionType,
    /// Only offered when a quiz was left in progress.
    Continue,
}

const FIELDS: [Field; 6] = [
    Field::Name,
    Field::Amount,
    Field::Category,
    Field::Difficulty,
    Field::QuestionType,
    Field::Continue,
];

/// A question request for the event loop to run.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub token: RequestToken,
    pub params: QuizParams,
}

pub struct App<S: Storage = FileStorage> {
    pub screen: Screen,
    store: SessionStore<S>,
    params: QuizParams,
    name_input: String,
    focus: Field,
    resuming: bool,
    cursor: usize,
    confirm_submit: bool,
    notice: Option<String>,
    history_scroll: usize,
}

impl<S: Storage> App<S> {
    /// Build the app and look for a quiz left in progress.
    pub fn new(mut store: SessionStore<S>, params: QuizParams) -> Self {
        store.load_saved_progress();
        let name_input = store.player_name().to_string();

        Self {
            screen: Screen::Welcome,
            store,
            params,
            name_input,
            focus: Field::Name,
            resuming: false,
            cursor: 0,
            confirm_submit: false,
            notice: None,
            history_scroll: 0,
        }
    }

    pub fn store(&self) -> &SessionStore<S> {
        &self.store
    }

    pub fn params(&self) -> &QuizParams {
        &self.params
    }

    pub fn name_input(&self) -> &str {
        &self.name_input
    }

    pub fn focus(&self) -> Field {
        self.focus
    }

    /// A quiz left in progress can be continued.
    pub fn has_saved_progress(&self) -> bool {
        self.store.has_pending_resume()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_confirming_submit(&self) -> bool {
        self.confirm_submit
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn history_scroll(&self) -> usize {
        self.history_scroll
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    pub fn focus_next(&mut self) {
        self.focus = self.step_focus(true);
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.step_focus(false);
    }

    fn step_focus(&self, forward: bool) -> Field {
        let available: Vec<Field> = FIELDS
            .iter()
            .copied()
            .filter(|field| *field != Field::Continue || self.has_saved_progress())
            .collect();
        cycle(&available, &self.focus, forward)
    }

    pub fn name_input_push(&mut self, c: char) {
        if self.focus == Field::Name && self.name_input.chars().count() < NAME_MAX_LENGTH {
            self.name_input.push(c);
        }
    }

    pub fn name_input_pop(&mut self) {
        if self.focus == Field::Name {
            self.name_input.pop();
        }
    }

    /// Change the focused setting by one step in either direction.
    pub fn adjust_field(&mut self, forward: bool) {
        match self.focus {
            Field::Amount => {
                self.params.amount = if forward {
                    (self.params.amount + 1).min(MAX_AMOUNT)
                } else {
                    self.params.amount.saturating_sub(1).max(MIN_AMOUNT)
                };
            }
            Field::Category => {
                let options: Vec<Option<u32>> = std::iter::once(None)
                    .chain(CATEGORIES.iter().map(|c| Some(c.id)))
                    .collect();
                self.params.category = cycle(&options, &self.params.category, forward);
            }
            Field::Difficulty => {
                let options = [
                    None,
                    Some(Difficulty::Easy),
                    Some(Difficulty::Medium),
                    Some(Difficulty::Hard),
                ];
                self.params.difficulty = cycle(&options, &self.params.difficulty, forward);
            }
            Field::QuestionType => {
                let options = [
                    None,
                    Some(QuestionType::Multiple),
                    Some(QuestionType::Boolean),
                ];
                self.params.question_type = cycle(&options, &self.params.question_type, forward);
            }
            Field::Name | Field::Continue => {}
        }
    }

    /// Validate the name and ask for a fresh batch.
    pub fn start_new_quiz(&mut self) -> Option<FetchRequest> {
        let name = self.name_input.trim().to_string();
        if name.is_empty() {
            self.notice = Some("Please enter your name to start the quiz".to_string());
            return None;
        }

        if !self.store.is_name_set() || self.store.player_name() != name {
            self.store.set_player_name(&name);
        }
        self.resuming = false;
        Some(self.request_questions())
    }

    /// Ask for a batch to continue the quiz left in progress.
    pub fn continue_quiz(&mut self) -> Option<FetchRequest> {
        if !self.has_saved_progress() {
            return None;
        }
        self.resuming = true;
        Some(self.request_questions())
    }

    fn request_questions(&mut self) -> FetchRequest {
        let token = self.store.begin_request();
        self.screen = Screen::Loading;
        self.notice = None;
        debug!(?token, params = ?self.params, "requesting questions");

        FetchRequest {
            token,
            params: self.params.clone(),
        }
    }

    /// Give up waiting. A late response is dropped as stale.
    pub fn cancel_loading(&mut self) {
        self.store.begin_request();
        self.resuming = false;
        self.screen = Screen::Welcome;
    }

    pub fn on_questions(
        &mut self,
        token: RequestToken,
        result: Result<Vec<NormalizedQuestion>, FetchError>,
    ) {
        if !self.store.is_current_request(token) {
            debug!(?token, "ignoring response to an old request");
            return;
        }

        match result {
            Ok(questions) if questions.is_empty() => {
                self.notice = Some("The trivia source returned no questions".to_string());
                self.screen = Screen::Welcome;
            }
            Ok(questions) => {
                self.store.accept_questions(token, questions);
                let resumed = self.resuming && self.store.resume_quiz().is_applied();
                if !resumed {
                    self.store.start_quiz();
                }

                self.resuming = false;
                self.confirm_submit = false;
                self.screen = Screen::Quiz;
                self.sync_cursor();
            }
            Err(err) => {
                warn!(%err, "could not load questions");
                self.notice = Some(format!("Error loading questions: {err}"));
                self.resuming = false;
                self.screen = Screen::Welcome;
            }
        }
    }

    pub fn move_cursor_down(&mut self) {
        let count = self.answer_count();
        if count > 0 {
            self.cursor = (self.cursor + 1) % count;
        }
    }

    pub fn move_cursor_up(&mut self) {
        let count = self.answer_count();
        if count > 0 {
            self.cursor = (self.cursor + count - 1) % count;
        }
    }

    fn answer_count(&self) -> usize {
        self.store
            .current_question()
            .map_or(0, |question| question.all_answers.len())
    }

    /// Record the answer under the cursor.
    pub fn choose_answer(&mut self) {
        let Some(answer) = self
            .store
            .current_question()
            .and_then(|question| question.all_answers.get(self.cursor))
            .cloned()
        else {
            return;
        };
        self.store.select_answer(&answer);
    }

    /// Advance, or ask for confirmation on the last question.
    pub fn next_question(&mut self) {
        if self.store.state().is_last_question() {
            self.confirm_submit = true;
            return;
        }
        if self.store.go_to_next_question().is_applied() {
            self.sync_cursor();
        }
    }

    pub fn previous_question(&mut self) {
        self.confirm_submit = false;
        if self.store.go_to_previous_question().is_applied() {
            self.sync_cursor();
        }
    }

    /// Submit shortcut; only offered once every question has an answer.
    pub fn request_submit(&mut self) {
        if self.store.all_answered() {
            self.confirm_submit = true;
        } else {
            self.notice = Some("Answer every question before submitting".to_string());
        }
    }

    pub fn answer_confirmation(&mut self, confirmed: bool) {
        self.confirm_submit = false;
        if confirmed && self.store.submit_quiz().is_applied() {
            self.history_scroll = 0;
            self.screen = Screen::Results;
        }
    }

    /// Back to the welcome screen. Progress made so far can be continued.
    pub fn leave_quiz(&mut self) {
        self.confirm_submit = false;
        self.focus = if self.store.load_saved_progress() {
            Field::Continue
        } else {
            Field::Name
        };
        self.screen = Screen::Welcome;
    }

    pub fn restart(&mut self) {
        self.store.reset_quiz();
        self.focus = Field::Name;
        self.history_scroll = 0;
        self.screen = Screen::Welcome;
    }

    pub fn scroll_history_down(&mut self) {
        let listed = self.store.history().len().min(HISTORY_PREVIEW);
        let max_scroll = listed.saturating_sub(1);
        self.history_scroll = (self.history_scroll + 1).min(max_scroll);
    }

    pub fn scroll_history_up(&mut self) {
        self.history_scroll = self.history_scroll.saturating_sub(1);
    }

    /// Put the cursor on the recorded answer of the current question.
    fn sync_cursor(&mut self) {
        self.cursor = self
            .store
            .current_question()
            .zip(self.store.displayed_answer())
            .and_then(|(question, answer)| question.all_answers.iter().position(|a| a == answer))
            .unwrap_or(0);
    }
}

fn cycle<T: PartialEq + Clone>(options: &[T], current: &T, forward: bool) -> T {
    let position = options.iter().position(|o| o == current).unwrap_or(0);
    let next = if forward {
        (position + 1) % options.len()
    } else {
        (position + options.len() - 1) % options.len()
    };
    options[next].clone()
}
