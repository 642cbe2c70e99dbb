//! Runtime configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories_next::ProjectDirs;

use crate::models::{QuizParams, MAX_AMOUNT, MIN_AMOUNT};
use crate::pipeline::DEFAULT_API_URL;

const APP_NAME: &str = "trivia-quiz";
const LOG_FILE_NAME: &str = "trivia-quiz.log";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct Config {
    /// Trivia source endpoint.
    pub api_url: String,
    /// Directory holding the player record and history.
    pub data_dir: PathBuf,
    pub log_file: PathBuf,
    pub request_timeout: Duration,
    /// Initial values of the quiz settings form.
    pub params: QuizParams,
}

impl Config {
    pub fn new(data_dir: Option<PathBuf>) -> Self {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);
        let log_file = data_dir.join(LOG_FILE_NAME);

        Self {
            api_url: DEFAULT_API_URL.to_string(),
            data_dir,
            log_file,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            params: QuizParams::default(),
        }
    }

    pub fn with_api_url(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url {
            self.api_url = url;
        }
        self
    }

    pub fn with_log_file(mut self, log_file: Option<PathBuf>) -> Self {
        if let Some(path) = log_file {
            self.log_file = path;
        }
        self
    }

    pub fn with_timeout(mut self, secs: Option<u64>) -> Self {
        if let Some(secs) = secs {
            self.request_timeout = Duration::from_secs(secs);
        }
        self
    }

    pub fn with_params(mut self, mut params: QuizParams) -> Self {
        params.amount = params.amount.clamp(MIN_AMOUNT, MAX_AMOUNT);
        self.params = params;
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Platform data directory, or `./.trivia-quiz` when none can be found.
pub fn default_data_dir() -> PathBuf {
    ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(format!(".{APP_NAME}")))
}
