use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LessonProgress {
    done: bool,
    done_at: DateTime<Utc>,
}

impl LessonProgress {
    pub fn done_at(done_at: DateTime<Utc>) -> Self {
        Self {
            done: true,
            done_at,
        }
    }

    /// Key under which progress for a lesson is stored, `course:lesson`.
    pub fn key(course_id: &str, lesson_id: &str) -> String {
        format!("{course_id}:{lesson_id}")
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn completed_at(&self) -> DateTime<Utc> {
        self.done_at
    }
}
