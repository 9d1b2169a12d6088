mod access;
pub use access::{HasOwner, check_access};

pub mod blob;

mod database;
pub use database::DbConnection;

pub mod entity;

mod error;
pub use error::{DatabaseError, DatabaseResult};

mod repo;
pub use repo::{Page, ResourceType, ResourceTyped};

mod snapshot;
pub use snapshot::{AcademyState, SnapshotError, UserProgress};

mod store;
pub use store::ProgressStore;

use std::sync::Arc;

use crate::model::blob::{BlobStore, CounterStore, MemoryStore, PgStore};

#[derive(Debug, Clone)]
pub struct ModelManager {
    progress: Arc<ProgressStore>,
    counter: Arc<dyn CounterStore>,
}

impl ModelManager {
    pub async fn new(
        blobs: Arc<dyn BlobStore>,
        counter: Arc<dyn CounterStore>,
    ) -> DatabaseResult<Self> {
        let progress = ProgressStore::open(blobs).await?;
        Ok(Self {
            progress: Arc::new(progress),
            counter,
        })
    }

    pub async fn postgres(conn: DbConnection) -> DatabaseResult<Self> {
        let store = Arc::new(PgStore::new(conn));
        Self::new(store.clone(), store).await
    }

    pub async fn memory() -> DatabaseResult<Self> {
        Self::with_memory_store(Arc::new(MemoryStore::new())).await
    }

    pub async fn with_memory_store(store: Arc<MemoryStore>) -> DatabaseResult<Self> {
        Self::new(store.clone(), store).await
    }

    pub fn progress(&self) -> &ProgressStore {
        &self.progress
    }

    pub fn counter(&self) -> &dyn CounterStore {
        self.counter.as_ref()
    }
}
