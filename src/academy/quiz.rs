use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rand::{Rng, seq::SliceRandom};

use crate::academy::{
    AcademyError, AcademyResult,
    eligibility::rounded_percent,
};
use crate::catalog::Question;
use crate::model::entity::QuizAttempt;

/// Picked option index per question id.
pub type Answers = HashMap<String, usize>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizScore {
    pub total: u32,
    pub correct: u32,
    /// Percentage in `0..=100`.
    pub score: u32,
    pub passed: bool,
}

impl QuizScore {
    pub fn into_attempt(self, created_at: DateTime<Utc>) -> QuizAttempt {
        QuizAttempt::new(created_at, self.score, self.passed, self.total, self.correct)
    }
}

/// Presentation order for a quiz: a uniformly random permutation.
pub fn shuffled<'a, R: Rng + ?Sized>(questions: &'a [Question], rng: &mut R) -> Vec<&'a Question> {
    let mut order: Vec<&Question> = questions.iter().collect();
    order.shuffle(rng);
    order
}

/// Scores `answers` against the full question set. Unanswered questions count
/// as wrong and answers to unknown question ids are ignored.
pub fn score_answers(
    questions: &[Question],
    answers: &Answers,
    passing_score: u32,
) -> AcademyResult<QuizScore> {
    if questions.is_empty() {
        return Err(AcademyError::invalid_state("quiz has no questions"));
    }

    let total = questions.len() as u32;
    let correct = questions
        .iter()
        .filter(|q| answers.get(q.id()).is_some_and(|picked| q.is_correct(*picked)))
        .count() as u32;
    let score = rounded_percent(correct, total);

    Ok(QuizScore {
        total,
        correct,
        score,
        passed: score >= passing_score,
    })
}

/// Ids of questions that have no recorded answer, in catalog order.
pub fn unanswered<'a>(questions: &'a [Question], answers: &Answers) -> Vec<&'a str> {
    questions
        .iter()
        .filter(|q| !answers.contains_key(q.id()))
        .map(Question::id)
        .collect()
}
