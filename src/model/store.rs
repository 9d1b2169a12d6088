use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};

use crate::model::{
    DatabaseError, DatabaseResult,
    blob::{BlobStore, STATE_NAMESPACE},
    snapshot::AcademyState,
};

const LOAD_ATTEMPTS: u32 = 3;
const LOAD_BACKOFF: Duration = Duration::from_millis(200);

/// Holds the current progress snapshot and writes every new snapshot through
/// to the blob store before publishing it.
///
/// Writers are serialized; readers get an `Arc` of the current snapshot and
/// are never blocked by an in-flight write.
#[derive(Debug)]
pub struct ProgressStore {
    blobs: Arc<dyn BlobStore>,
    current: RwLock<Arc<AcademyState>>,
    writer: Mutex<()>,
}

impl ProgressStore {
    /// Loads the persisted snapshot. An absent snapshot is initialized and
    /// saved; an undecodable one is replaced by the default. Storage errors are
    /// retried and then returned.
    #[tracing::instrument(skip(blobs))]
    pub async fn open(blobs: Arc<dyn BlobStore>) -> DatabaseResult<Self> {
        let loaded = Self::load_with_retry(blobs.as_ref()).await?;

        let state = match loaded {
            Some(raw) => match serde_json::from_value::<AcademyState>(raw) {
                Ok(state) => state,
                Err(e) => {
                    tracing::warn!("stored snapshot is unreadable, starting from empty state: {e}");
                    AcademyState::default()
                }
            },
            None => {
                tracing::debug!("no stored snapshot, initializing");
                let state = AcademyState::default();
                blobs.save(STATE_NAMESPACE, &serde_json::to_value(&state)?).await?;
                state
            }
        };

        Ok(Self {
            blobs,
            current: RwLock::new(Arc::new(state)),
            writer: Mutex::new(()),
        })
    }

    async fn load_with_retry(blobs: &dyn BlobStore) -> DatabaseResult<Option<serde_json::Value>> {
        let mut attempt = 1;
        loop {
            match blobs.load(STATE_NAMESPACE).await {
                Ok(v) => return Ok(v),
                Err(e) if attempt < LOAD_ATTEMPTS => {
                    tracing::warn!("snapshot load attempt {attempt} failed: {e}");
                    tokio::time::sleep(LOAD_BACKOFF * attempt).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    pub async fn snapshot(&self) -> Arc<AcademyState> {
        self.current.read().await.clone()
    }

    /// Applies `transition` to the current snapshot, persists the result and
    /// only then makes it current. If the transition or the write fails, the
    /// current snapshot is left as it was.
    pub async fn commit<F, E>(&self, transition: F) -> Result<Arc<AcademyState>, E>
    where
        F: FnOnce(AcademyState) -> Result<AcademyState, E>,
        E: From<DatabaseError>,
    {
        let _guard = self.writer.lock().await;

        let base = self.snapshot().await;
        let next = transition(AcademyState::clone(&base))?;

        let body = serde_json::to_value(&next).map_err(DatabaseError::from)?;
        self.blobs.save(STATE_NAMESPACE, &body).await?;

        let next = Arc::new(next);
        *self.current.write().await = next.clone();
        Ok(next)
    }

    /// Infallible-transition shorthand for [`Self::commit`].
    pub async fn apply<F>(&self, transition: F) -> DatabaseResult<Arc<AcademyState>>
    where
        F: FnOnce(AcademyState) -> AcademyState,
    {
        self.commit(|state| Ok::<_, DatabaseError>(transition(state)))
            .await
    }

    /// Drops all progress and certificates. The certificate counter lives in
    /// its own namespace and is not affected.
    pub async fn reset(&self) -> DatabaseResult<()> {
        self.apply(|_| AcademyState::default()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use chrono::Utc;
    use serde_json::json;

    use super::*;
    use crate::academy::AcademyError;
    use crate::model::SnapshotError;
    use crate::model::blob::MemoryStore;
    use crate::model::entity::{Certificate, CertificateCreate};

    #[tokio::test]
    async fn open_initializes_missing_snapshot() {
        let blobs = Arc::new(MemoryStore::new());
        let store = ProgressStore::open(blobs.clone()).await.unwrap();

        assert_eq!(*store.snapshot().await, AcademyState::default());
        assert!(blobs.load(STATE_NAMESPACE).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn open_replaces_garbage_with_default() {
        let blobs = Arc::new(MemoryStore::new());
        blobs
            .save(STATE_NAMESPACE, &json!({"users": "not a map"}))
            .await
            .unwrap();

        let store = ProgressStore::open(blobs).await.unwrap();
        assert_eq!(*store.snapshot().await, AcademyState::default());
    }

    #[tokio::test]
    async fn committed_snapshot_is_durable() {
        let blobs = Arc::new(MemoryStore::new());
        let store = ProgressStore::open(blobs.clone()).await.unwrap();
        store
            .apply(|s| s.enroll("u1", "c1", Utc::now()))
            .await
            .unwrap();

        let reopened = ProgressStore::open(blobs).await.unwrap();
        assert!(reopened.snapshot().await.is_enrolled("u1", "c1"));
    }

    #[tokio::test]
    async fn failed_write_keeps_previous_snapshot() {
        let blobs = Arc::new(MemoryStore::new());
        let store = ProgressStore::open(blobs.clone()).await.unwrap();

        blobs.fail_writes(true);
        let result = store.apply(|s| s.enroll("u1", "c1", Utc::now())).await;
        assert!(matches!(result, Err(DatabaseError::Unavailable(_))));
        assert!(!store.snapshot().await.is_enrolled("u1", "c1"));
    }

    #[tokio::test]
    async fn rejected_transition_is_not_saved() {
        let blobs = Arc::new(MemoryStore::new());
        let store = ProgressStore::open(blobs.clone()).await.unwrap();
        let cert = |no: &str| -> Certificate {
            CertificateCreate {
                cert_no: no.to_string(),
                user_id: String::from("u1"),
                user_name: String::from("Ann Lee"),
                user_email: String::from("ann@example.com"),
                course_id: String::from("c1"),
                course_title: String::from("ESD basics"),
                issued_at: Utc::now(),
                hash: String::from("0123456789abcdef0123456789abcdef"),
            }
            .into()
        };

        let first = cert("EMC-2026-000001");
        store
            .commit(|s| s.issue_certificate(first).map_err(AcademyError::from))
            .await
            .unwrap();
        let before = store.snapshot().await;
        let persisted = blobs.load(STATE_NAMESPACE).await.unwrap();

        let second = cert("EMC-2026-000002");
        let result = store
            .commit(|s| s.issue_certificate(second).map_err(AcademyError::from))
            .await;
        assert!(matches!(
            result,
            Err(AcademyError::Snapshot(SnapshotError::AlreadyCertified { .. }))
        ));

        assert_eq!(store.snapshot().await, before);
        assert_eq!(blobs.load(STATE_NAMESPACE).await.unwrap(), persisted);
        assert!(store.snapshot().await.certificate("EMC-2026-000002").is_none());
    }

    #[tokio::test]
    async fn reset_clears_progress() {
        let blobs = Arc::new(MemoryStore::new());
        let store = ProgressStore::open(blobs).await.unwrap();
        store
            .apply(|s| s.enroll("u1", "c1", Utc::now()))
            .await
            .unwrap();

        store.reset().await.unwrap();
        assert!(store.snapshot().await.progress("u1").is_none());
    }
}
