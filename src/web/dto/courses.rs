use serde::Serialize;

use crate::academy::Completion;
use crate::catalog::{Course, DurationType, Lesson};

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct CourseSummaryResponse {
    id: String,
    title: String,
    description: String,
    duration_type: DurationType,
    level: String,
    price: u32,
    is_free: bool,
    cover_emoji: String,
    lesson_count: usize,
    enrolled: bool,
    completion: Completion,
}

impl CourseSummaryResponse {
    pub fn new(course: &Course, enrolled: bool, completion: Completion) -> Self {
        Self {
            id: course.id().to_string(),
            title: course.title().to_string(),
            description: course.description().to_string(),
            duration_type: course.duration_type(),
            level: course.level().to_string(),
            price: course.price(),
            is_free: course.is_free(),
            cover_emoji: course.cover_emoji().to_string(),
            lesson_count: course.lessons().len(),
            enrolled,
            completion,
        }
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct LessonSummaryResponse {
    id: String,
    title: String,
    done: bool,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct CourseDetailResponse {
    #[serde(flatten)]
    summary: CourseSummaryResponse,
    question_count: usize,
    lessons: Vec<LessonSummaryResponse>,
}

impl CourseDetailResponse {
    pub fn new<F>(summary: CourseSummaryResponse, course: &Course, is_done: F) -> Self
    where
        F: Fn(&Lesson) -> bool,
    {
        Self {
            summary,
            question_count: course.questions().len(),
            lessons: course
                .lessons()
                .iter()
                .map(|l| LessonSummaryResponse {
                    id: l.id().to_string(),
                    title: l.title().to_string(),
                    done: is_done(l),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct LessonResponse {
    course_id: String,
    id: String,
    title: String,
    content: String,
    done: bool,
}

impl LessonResponse {
    pub fn new(course: &Course, lesson: &Lesson, done: bool) -> Self {
        Self {
            course_id: course.id().to_string(),
            id: lesson.id().to_string(),
            title: lesson.title().to_string(),
            content: lesson.content().to_string(),
            done,
        }
    }
}
