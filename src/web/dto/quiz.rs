use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::academy::{Issuance, PresentedQuiz, QuizOutcome};
use crate::model::entity::{Certificate, QuizAttempt};

/// A question as shown to the learner. The correct option is never included.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct QuizQuestionResponse {
    id: String,
    question: String,
    options: Vec<String>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct QuizResponse {
    course_id: String,
    locked: bool,
    passing_score: u32,
    questions: Vec<QuizQuestionResponse>,
}

impl QuizResponse {
    pub fn new(quiz: PresentedQuiz, passing_score: u32) -> Self {
        Self {
            course_id: quiz.course_id,
            locked: quiz.locked,
            passing_score,
            questions: quiz
                .questions
                .into_iter()
                .map(|q| QuizQuestionResponse {
                    id: q.id().to_string(),
                    question: q.question().to_string(),
                    options: q.options().to_vec(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct QuizSubmitRequest {
    /// Picked option index per question id.
    pub answers: HashMap<String, usize>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct QuizResultResponse {
    attempt: QuizAttempt,
    /// Set when the user holds a certificate for the course after this attempt.
    certificate: Option<Certificate>,
    newly_issued: bool,
}

impl From<QuizOutcome> for QuizResultResponse {
    fn from(outcome: QuizOutcome) -> Self {
        let newly_issued = matches!(outcome.issuance, Issuance::Issued(_));
        let certificate = match outcome.issuance {
            Issuance::Issued(c) | Issuance::AlreadyIssued(c) => Some(c),
            Issuance::Ineligible => None,
        };

        Self {
            attempt: outcome.attempt,
            certificate,
            newly_issued,
        }
    }
}
