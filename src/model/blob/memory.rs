use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::model::{
    DatabaseError, DatabaseResult,
    blob::{BlobStore, CounterStore},
};

/// Process-local backend, used for the demo mode and for tests.
///
/// Writes can be switched to fail on demand to exercise the all-or-nothing
/// behaviour of snapshot commits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: Mutex<HashMap<String, Value>>,
    counters: Mutex<HashMap<String, u64>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> DatabaseResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DatabaseError::Unavailable(String::from(
                "memory store is rejecting writes",
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStore for MemoryStore {
    async fn load(&self, namespace: &str) -> DatabaseResult<Option<Value>> {
        Ok(self.blobs.lock().await.get(namespace).cloned())
    }

    async fn save(&self, namespace: &str, body: &Value) -> DatabaseResult<()> {
        self.check_writable()?;
        self.blobs
            .lock()
            .await
            .insert(namespace.to_string(), body.clone());
        Ok(())
    }
}

#[async_trait]
impl CounterStore for MemoryStore {
    async fn increment(&self, namespace: &str) -> DatabaseResult<u64> {
        self.check_writable()?;
        let mut counters = self.counters.lock().await;
        let value = counters.entry(namespace.to_string()).or_insert(0);
        *value += 1;
        Ok(*value)
    }

    async fn current(&self, namespace: &str) -> DatabaseResult<u64> {
        Ok(self
            .counters
            .lock()
            .await
            .get(namespace)
            .copied()
            .unwrap_or(0))
    }
}
