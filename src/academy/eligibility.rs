use serde::Serialize;

use crate::catalog::Lesson;
use crate::model::AcademyState;
use crate::model::entity::QuizAttempt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct Completion {
    pub done: u32,
    pub total: u32,
    pub percent: u32,
}

impl Completion {
    pub fn is_complete(&self) -> bool {
        self.percent == 100
    }
}

/// `round(part / whole * 100)` with halves rounded up; 0 when `whole` is 0.
pub fn rounded_percent(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    let (part, whole) = (u64::from(part), u64::from(whole));
    ((part * 200 + whole) / (whole * 2)) as u32
}

pub fn get_course_completion(
    state: &AcademyState,
    user_id: &str,
    course_id: &str,
    lessons: &[Lesson],
) -> Completion {
    if lessons.is_empty() {
        return Completion {
            done: 0,
            total: 0,
            percent: 0,
        };
    }

    let done = lessons
        .iter()
        .filter(|l| state.is_lesson_done(user_id, course_id, l.id()))
        .count() as u32;
    let total = lessons.len() as u32;

    Completion {
        done,
        total,
        percent: rounded_percent(done, total),
    }
}

pub fn last_attempt<'a>(
    state: &'a AcademyState,
    user_id: &str,
    course_id: &str,
) -> Option<&'a QuizAttempt> {
    state
        .progress(user_id)
        .and_then(|p| p.quiz_attempts(course_id).last())
}

/// Certificate gate: enrolled, every lesson done, and the most recent attempt
/// both flagged as passed and scoring at least `passing_score`.
pub fn can_issue_certificate(
    state: &AcademyState,
    user_id: &str,
    course_id: &str,
    lessons: &[Lesson],
    passing_score: u32,
) -> bool {
    if !state.is_enrolled(user_id, course_id) {
        return false;
    }
    if !get_course_completion(state, user_id, course_id, lessons).is_complete() {
        return false;
    }

    last_attempt(state, user_id, course_id)
        .is_some_and(|a| a.passed() && a.score() >= passing_score)
}
