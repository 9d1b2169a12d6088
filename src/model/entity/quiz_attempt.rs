use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct QuizAttempt {
    id: Uuid,
    created_at: DateTime<Utc>,
    /// Percentage in `0..=100`.
    score: u32,
    passed: bool,
    total: u32,
    correct: u32,
}

impl QuizAttempt {
    pub fn new(created_at: DateTime<Utc>, score: u32, passed: bool, total: u32, correct: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at,
            score,
            passed,
            total,
            correct,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn correct(&self) -> u32 {
        self.correct
    }
}
