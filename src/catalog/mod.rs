//! Static course content: courses, their lessons and quiz questions.
//!
//! The catalog is read-only at runtime. The built-in catalog is compiled in from
//! `assets/catalog.toml`.

mod course;
pub use course::{Course, DurationType, Lesson, Question};

use serde::Deserialize;
use thiserror::Error;

static BUILTIN_CATALOG: &str = include_str!("../../assets/catalog.toml");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog parse error: {0}")]
    TomlDeError(#[from] toml::de::Error),
    #[error("duplicate course id: {0}")]
    DuplicateCourse(String),
    #[error("course {course}: duplicate {kind} id {id}")]
    DuplicateEntry {
        course: String,
        kind: &'static str,
        id: String,
    },
    #[error("course {course}: question {question} has correct_index out of range")]
    AnswerOutOfRange { course: String, question: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    courses: Vec<Course>,
}

impl Catalog {
    pub fn new(courses: Vec<Course>) -> Result<Self, CatalogError> {
        let catalog = Self { courses };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml(BUILTIN_CATALOG)
    }

    pub fn from_toml(raw: &str) -> Result<Self, CatalogError> {
        let catalog: Self = toml::from_str(raw)?;
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = std::collections::HashSet::new();
        for course in &self.courses {
            if !seen.insert(course.id()) {
                return Err(CatalogError::DuplicateCourse(course.id().to_string()));
            }

            let mut lesson_ids = std::collections::HashSet::new();
            for lesson in course.lessons() {
                if !lesson_ids.insert(lesson.id()) {
                    return Err(CatalogError::DuplicateEntry {
                        course: course.id().to_string(),
                        kind: "lesson",
                        id: lesson.id().to_string(),
                    });
                }
            }

            let mut question_ids = std::collections::HashSet::new();
            for question in course.questions() {
                if !question_ids.insert(question.id()) {
                    return Err(CatalogError::DuplicateEntry {
                        course: course.id().to_string(),
                        kind: "question",
                        id: question.id().to_string(),
                    });
                }
                if question.correct_index() >= question.options().len() {
                    return Err(CatalogError::AnswerOutOfRange {
                        course: course.id().to_string(),
                        question: question.id().to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn course(&self, course_id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id() == course_id)
    }

    pub fn lesson_count(&self) -> usize {
        self.courses.iter().map(|c| c.lessons().len()).sum()
    }

    pub fn question_count(&self) -> usize {
        self.courses.iter().map(|c| c.questions().len()).sum()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.courses().len(), 2);

        let esd = catalog.course("emc-weekly-esd").unwrap();
        assert_eq!(esd.duration_type(), DurationType::Weekly);
        assert!(esd.is_free());
        assert_eq!(esd.lessons().len(), 3);
        assert_eq!(esd.questions().len(), 3);

        assert_eq!(catalog.course("emc-monthly-radiated").unwrap().lessons().len(), 4);
        assert_eq!(catalog.lesson_count(), 7);
        assert_eq!(catalog.question_count(), 6);
    }

    #[test]
    fn unknown_course_is_absent() {
        let catalog = Catalog::builtin().unwrap();
        assert!(catalog.course("nope").is_none());
    }

    #[test]
    fn rejects_out_of_range_answer() {
        let raw = r#"
            [[courses]]
            id = "c"
            title = "C"
            description = ""
            duration_type = "monthly"
            level = "x"
            price = 10

            [[courses.questions]]
            id = "q1"
            question = "?"
            options = ["a", "b"]
            correct_index = 2
        "#;
        assert!(matches!(
            Catalog::from_toml(raw),
            Err(CatalogError::AnswerOutOfRange { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_lessons() {
        let course = Course::new(
            "c",
            "C",
            vec![Lesson::new("l1", "a", ""), Lesson::new("l1", "b", "")],
            vec![],
        );
        assert!(matches!(
            Catalog::new(vec![course]),
            Err(CatalogError::DuplicateEntry { kind: "lesson", .. })
        ));
    }
}
