use serde::{Deserialize, Serialize};

use super::question::{Difficulty, QuestionType};

pub const DEFAULT_AMOUNT: u32 = 10;
pub const MIN_AMOUNT: u32 = 1;
pub const MAX_AMOUNT: u32 = 50;

/// Filters for one batch of questions. Unset filters are left out of the
/// request entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizParams {
    pub amount: u32,
    pub category: Option<u32>,
    pub difficulty: Option<Difficulty>,
    pub question_type: Option<QuestionType>,
}

impl Default for QuizParams {
    fn default() -> Self {
        Self {
            amount: DEFAULT_AMOUNT,
            category: None,
            difficulty: None,
            question_type: None,
        }
    }
}

/// A category of the trivia source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub id: u32,
    pub name: &'static str,
}

pub const CATEGORIES: &[Category] = &[
    Category { id: 9, name: "General Knowledge" },
    Category { id: 10, name: "Entertainment: Books" },
    Category { id: 11, name: "Entertainment: Film" },
    Category { id: 12, name: "Entertainment: Music" },
    Category { id: 13, name: "Entertainment: Musicals & Theatres" },
    Category { id: 14, name: "Entertainment: Television" },
    Category { id: 15, name: "Entertainment: Video Games" },
    Category { id: 16, name: "Entertainment: Board Games" },
    Category { id: 17, name: "Science & Nature" },
    Category { id: 18, name: "Science: Computers" },
    Category { id: 19, name: "Science: Mathematics" },
    Category { id: 20, name: "Mythology" },
    Category { id: 21, name: "Sports" },
    Category { id: 22, name: "Geography" },
    Category { id: 23, name: "History" },
    Category { id: 24, name: "Politics" },
    Category { id: 25, name: "Art" },
    Category { id: 26, name: "Celebrities" },
    Category { id: 27, name: "Animals" },
    Category { id: 28, name: "Vehicles" },
    Category { id: 29, name: "Entertainment: Comics" },
    Category { id: 30, name: "Science: Gadgets" },
    Category { id: 31, name: "Entertainment: Japanese Anime & Manga" },
    Category { id: 32, name: "Entertainment: Cartoon & Animations" },
];

pub fn category_name(id: u32) -> Option<&'static str> {
    CATEGORIES.iter().find(|c| c.id == id).map(|c| c.name)
}
