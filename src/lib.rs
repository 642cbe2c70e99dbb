//! # trivia-quiz
//!
//! A terminal trivia quiz backed by the Open Trivia Database.
//!
//! The crate is split in two layers:
//!
//! - [`pipeline`]: fetches a batch of questions and normalizes it (decoded
//!   text, ids, shuffled answers).
//! - [`store`]: the quiz session state machine and its persistence through a
//!   [`Storage`] port.
//!
//! On top of those, [`TriviaQuiz`] runs a ratatui front end.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use trivia_quiz::{Config, QuizError, TriviaQuiz};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     let quiz = TriviaQuiz::from_config(&Config::default())?;
//!     quiz.run().await
//! }
//! ```

mod app;
pub mod config;
pub mod models;
pub mod pipeline;
pub mod store;
mod ui;

use std::io::{self, Stdout};
use std::panic;
use std::time::Duration;

use crossterm::ExecutableCommand;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

pub use app::{App, Field, FetchRequest, Screen};
pub use config::Config;
pub use models::{NormalizedQuestion, QuizParams, QuizResult};
pub use pipeline::{FetchError, SourceError, TransportError, TriviaClient};
pub use store::{
    FileStorage, MemoryStorage, Phase, RequestToken, SessionStore, Storage, StorageError,
    Transition,
};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Error type for quiz operations.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("{0}")]
    Fetch(#[from] FetchError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

type FetchOutcome = (RequestToken, Result<Vec<NormalizedQuestion>, FetchError>);

/// A quiz instance that can be run in the terminal.
pub struct TriviaQuiz {
    app: App<FileStorage>,
    client: TriviaClient,
}

impl TriviaQuiz {
    pub fn new(app: App<FileStorage>, client: TriviaClient) -> Self {
        Self { app, client }
    }

    /// Open the store in the configured data directory and build the client.
    pub fn from_config(config: &Config) -> Result<Self, QuizError> {
        let storage = FileStorage::open(config.data_dir())?;
        let store = SessionStore::open(storage);
        let client = TriviaClient::new(config.api_url.clone(), config.request_timeout)
            .map_err(FetchError::from)?;

        Ok(Self::new(App::new(store, config.params.clone()), client))
    }

    pub fn app(&self) -> &App<FileStorage> {
        &self.app
    }

    /// Take over the terminal until the player quits.
    pub async fn run(mut self) -> Result<(), QuizError> {
        let mut screen = ScreenSession::enter()?;
        let result = run_event_loop(&mut screen.terminal, &mut self.app, &self.client).await;
        drop(screen);
        info!("quiz closed");
        result
    }
}

/// Raw mode on the alternate screen for as long as the value lives. The
/// terminal is put back on drop and on panic.
struct ScreenSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl ScreenSession {
    fn enter() -> Result<Self, QuizError> {
        let default_hook = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            leave_screen();
            error!(%info, "panicked");
            default_hook(info);
        }));

        enable_raw_mode()?;
        io::stdout().execute(EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        Ok(Self { terminal })
    }
}

impl Drop for ScreenSession {
    fn drop(&mut self) {
        leave_screen();
    }
}

fn leave_screen() {
    let restored = disable_raw_mode().and_then(|()| {
        io::stdout().execute(LeaveAlternateScreen)?;
        Ok(())
    });
    if let Err(err) = restored {
        error!(%err, "could not restore the terminal");
    }
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App<FileStorage>,
    client: &TriviaClient,
) -> Result<(), QuizError> {
    let (tx, mut rx) = mpsc::unbounded_channel::<FetchOutcome>();

    loop {
        while let Ok((token, result)) = rx.try_recv() {
            app.on_questions(token, result);
        }

        terminal.draw(|frame| ui::render(frame, app))?;

        if !event::poll(POLL_INTERVAL)? {
            tokio::task::yield_now().await;
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match handle_input(app, key) {
            Control::Continue => {}
            Control::Quit => break,
            Control::Fetch(request) => spawn_fetch(client.clone(), request, tx.clone()),
        }
    }

    Ok(())
}

/// Run one question request in the background. The result is sent back with
/// its token so stale responses can be told apart.
fn spawn_fetch(client: TriviaClient, request: FetchRequest, tx: mpsc::UnboundedSender<FetchOutcome>) {
    tokio::spawn(async move {
        let result = client.fetch_and_normalize(&request.params).await;
        if tx.send((request.token, result)).is_err() {
            debug!("event loop closed before questions arrived");
        }
    });
}

enum Control {
    Continue,
    Quit,
    Fetch(FetchRequest),
}

fn handle_input<S: Storage>(app: &mut App<S>, key: KeyEvent) -> Control {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Control::Quit;
    }

    match app.screen {
        Screen::Welcome => handle_welcome_input(app, key.code),
        Screen::Loading => handle_loading_input(app, key.code),
        Screen::Quiz => handle_quiz_input(app, key.code),
        Screen::Results => handle_result_input(app, key.code),
    }
}

fn handle_welcome_input<S: Storage>(app: &mut App<S>, key: KeyCode) -> Control {
    app.clear_notice();
    match key {
        KeyCode::Esc => return Control::Quit,
        KeyCode::Tab | KeyCode::Down => app.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.focus_previous(),
        KeyCode::Right => app.adjust_field(true),
        KeyCode::Left => app.adjust_field(false),
        KeyCode::Backspace => app.name_input_pop(),
        KeyCode::Char(c) => app.name_input_push(c),
        KeyCode::Enter => {
            let request = if app.focus() == Field::Continue {
                app.continue_quiz()
            } else {
                app.start_new_quiz()
            };
            if let Some(request) = request {
                return Control::Fetch(request);
            }
        }
        _ => {}
    }
    Control::Continue
}

fn handle_loading_input<S: Storage>(app: &mut App<S>, key: KeyCode) -> Control {
    if key == KeyCode::Esc {
        app.cancel_loading();
    }
    Control::Continue
}

fn handle_quiz_input<S: Storage>(app: &mut App<S>, key: KeyCode) -> Control {
    if app.is_confirming_submit() {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.answer_confirmation(true),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.answer_confirmation(false),
            _ => {}
        }
        return Control::Continue;
    }

    app.clear_notice();
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.move_cursor_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_cursor_down(),
        KeyCode::Enter | KeyCode::Char(' ') => app.choose_answer(),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('n') => app.next_question(),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('p') => app.previous_question(),
        KeyCode::Char('s') | KeyCode::Char('S') => app.request_submit(),
        KeyCode::Esc => app.leave_quiz(),
        _ => {}
    }
    Control::Continue
}

fn handle_result_input<S: Storage>(app: &mut App<S>, key: KeyCode) -> Control {
    match key {
        KeyCode::Down | KeyCode::Char('j') => app.scroll_history_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_history_up(),
        KeyCode::Char('r') | KeyCode::Char('R') => app.restart(),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Control::Quit,
        _ => {}
    }
    Control::Continue
}
