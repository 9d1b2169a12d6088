use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub enum ResourceType {
    Course,
    Lesson,
    Quiz,
    Enrollment,
    Certificate,
    Progress,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, limit: i64, offset: i64) -> Self {
        Self {
            items,
            total,
            limit,
            offset,
        }
    }

    /// Cuts one page out of an already materialized list.
    pub fn slice<I>(all: I, limit: i64, offset: i64) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        let iter = all.into_iter();
        let total = iter.len() as i64;
        let items = iter
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();
        Self::new(items, total, limit, offset)
    }
}

pub trait ResourceTyped {
    fn get_resource_type() -> ResourceType;
}
