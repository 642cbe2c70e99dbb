use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{NormalizedQuestion, RawQuestion, TriviaResponse};

use super::decode::decode_entities;
use super::error::SourceError;

/// Check the response code and normalize the results.
pub fn normalize_response(
    response: TriviaResponse,
) -> Result<Vec<NormalizedQuestion>, SourceError> {
    if let Some(err) = SourceError::from_code(response.response_code) {
        return Err(err);
    }
    Ok(normalize(response.results))
}

pub fn normalize(raw: Vec<RawQuestion>) -> Vec<NormalizedQuestion> {
    normalize_with_rng(raw, &mut rand::thread_rng())
}

/// Decode every question, number it by position and shuffle its answers.
/// Question order is preserved.
pub fn normalize_with_rng<R: Rng + ?Sized>(
    raw: Vec<RawQuestion>,
    rng: &mut R,
) -> Vec<NormalizedQuestion> {
    raw.into_iter()
        .enumerate()
        .map(|(id, question)| normalize_question(id, question, rng))
        .collect()
}

fn normalize_question<R: Rng + ?Sized>(
    id: usize,
    raw: RawQuestion,
    rng: &mut R,
) -> NormalizedQuestion {
    let correct_answer = decode_entities(&raw.correct_answer).into_owned();
    let incorrect_answers: Vec<String> = raw
        .incorrect_answers
        .iter()
        .map(|answer| decode_entities(answer).into_owned())
        .collect();

    let mut all_answers = Vec::with_capacity(incorrect_answers.len() + 1);
    all_answers.push(correct_answer.clone());
    all_answers.extend(incorrect_answers.iter().cloned());
    // Fisher-Yates
    all_answers.shuffle(rng);

    NormalizedQuestion {
        id,
        category: decode_entities(&raw.category).into_owned(),
        question_type: raw.question_type,
        difficulty: raw.difficulty,
        question: decode_entities(&raw.question).into_owned(),
        correct_answer,
        incorrect_answers,
        all_answers,
    }
}
