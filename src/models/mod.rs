mod params;
mod question;
mod record;

pub use params::{
    category_name, Category, QuizParams, CATEGORIES, DEFAULT_AMOUNT, MAX_AMOUNT, MIN_AMOUNT,
};
pub use question::{Difficulty, NormalizedQuestion, QuestionType, RawQuestion, TriviaResponse};
pub use record::{PlayerRecord, QuizResult, SessionSnapshot, NO_PROGRESS};
