use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use trivia_quiz::config::Config;
use trivia_quiz::models::{Difficulty, QuestionType, QuizParams, CATEGORIES, DEFAULT_AMOUNT};
use trivia_quiz::{FileStorage, QuizError, SessionStore, TriviaQuiz};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory for the player record, history and log
    #[arg(long, env = "TRIVIA_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Trivia source endpoint
    #[arg(long, env = "TRIVIA_API_URL", global = true)]
    api_url: Option<String>,

    /// Log file (defaults to trivia-quiz.log in the data directory)
    #[arg(long, env = "TRIVIA_LOG", global = true)]
    log_file: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a quiz (default)
    Play(PlayArgs),
    /// Show past results
    History {
        /// Number of results to show, newest first
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// List the available categories
    Categories,
}

#[derive(ClapArgs, Debug, Default)]
struct PlayArgs {
    /// Number of questions (1-50)
    #[arg(short, long, default_value_t = DEFAULT_AMOUNT)]
    amount: u32,

    /// Category id, see `categories`
    #[arg(short, long)]
    category: Option<u32>,

    #[arg(short, long, value_enum)]
    difficulty: Option<DifficultyArg>,

    /// Question type
    #[arg(short = 't', long = "type", value_enum)]
    question_type: Option<TypeArg>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DifficultyArg {
    Easy,
    Medium,
    Hard,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum TypeArg {
    Multiple,
    Boolean,
}

impl From<PlayArgs> for QuizParams {
    fn from(args: PlayArgs) -> Self {
        QuizParams {
            amount: args.amount,
            category: args.category,
            difficulty: args.difficulty.map(|d| match d {
                DifficultyArg::Easy => Difficulty::Easy,
                DifficultyArg::Medium => Difficulty::Medium,
                DifficultyArg::Hard => Difficulty::Hard,
            }),
            question_type: args.question_type.map(|t| match t {
                TypeArg::Multiple => QuestionType::Multiple,
                TypeArg::Boolean => QuestionType::Boolean,
            }),
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let command = args.command.unwrap_or(Command::Play(PlayArgs {
        amount: DEFAULT_AMOUNT,
        ..PlayArgs::default()
    }));

    let mut config = Config::new(args.data_dir)
        .with_api_url(args.api_url)
        .with_log_file(args.log_file)
        .with_timeout(args.timeout);

    if let Err(e) = init_logging(&config.log_file) {
        eprintln!("Could not open log file {}: {}", config.log_file.display(), e);
    }

    let result = match command {
        Command::Play(play) => {
            config = config.with_params(play.into());
            play_quiz(&config).await
        }
        Command::History { limit } => print_history(&config, limit),
        Command::Categories => {
            print_categories();
            Ok(())
        }
    };

    if let Err(e) = result {
        tracing::error!(%e, "exiting with error");
        eprintln!("Error running quiz: {}", e);
        std::process::exit(1);
    }
}

/// Log to a file; the terminal belongs to the TUI.
fn init_logging(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "trivia_quiz=info".to_owned());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

async fn play_quiz(config: &Config) -> Result<(), QuizError> {
    tracing::info!(data_dir = %config.data_dir.display(), api_url = %config.api_url, "starting quiz");
    TriviaQuiz::from_config(config)?.run().await
}

fn print_history(config: &Config, limit: usize) -> Result<(), QuizError> {
    let mut store = SessionStore::open(FileStorage::open(config.data_dir())?);
    let in_progress = store.load_saved_progress();

    if store.history().is_empty() {
        println!("No quizzes played yet.");
    }
    for result in store.recent_history(limit) {
        println!(
            "{}  {:<16} {:>3}/{:<3} ({:>3.0}%)  {:.0}s",
            result.date.format("%Y-%m-%d %H:%M"),
            result.player_name,
            result.score,
            result.total_questions,
            result.percentage(),
            result.time_taken,
        );
    }
    if in_progress {
        println!(
            "{} has a quiz in progress at question {}.",
            store.player_name(),
            store.current_index() + 1
        );
    }
    Ok(())
}

fn print_categories() {
    for category in CATEGORIES {
        println!("{:>3}  {}", category.id, category.name);
    }
}
