use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DurationType {
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Lesson {
    id: String,
    title: String,
    content: String,
}

impl Lesson {
    pub fn new<S: Into<String>>(id: S, title: S, content: S) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Question {
    id: String,
    question: String,
    options: Vec<String>,
    correct_index: usize,
}

impl Question {
    pub fn new<S: Into<String>>(id: S, question: S, options: Vec<String>, correct_index: usize) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            options,
            correct_index,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    pub fn is_correct(&self, picked: usize) -> bool {
        picked == self.correct_index
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Course {
    id: String,
    title: String,
    description: String,
    duration_type: DurationType,
    level: String,
    price: u32,
    #[serde(default)]
    cover_emoji: String,
    #[serde(default)]
    lessons: Vec<Lesson>,
    #[serde(default)]
    questions: Vec<Question>,
}

impl Course {
    pub fn new<S: Into<String>>(
        id: S,
        title: S,
        lessons: Vec<Lesson>,
        questions: Vec<Question>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            duration_type: DurationType::Weekly,
            level: String::new(),
            price: 0,
            cover_emoji: String::new(),
            lessons,
            questions,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn duration_type(&self) -> DurationType {
        self.duration_type
    }

    pub fn level(&self) -> &str {
        &self.level
    }

    pub fn price(&self) -> u32 {
        self.price
    }

    pub fn is_free(&self) -> bool {
        self.price == 0
    }

    pub fn cover_emoji(&self) -> &str {
        &self.cover_emoji
    }

    /// Lessons in presentation order.
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn lesson(&self, lesson_id: &str) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.id() == lesson_id)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}
