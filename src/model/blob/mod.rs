//! Storage ports for the progress snapshot and the certificate counter.
//!
//! Both are addressed by a namespace string. The snapshot lives in a single
//! opaque JSON blob; the counter is a separate durable integer so that bumping
//! it never contends with snapshot writes.

use async_trait::async_trait;
use serde_json::Value;

use crate::model::DatabaseResult;

mod memory;
pub use memory::MemoryStore;

mod postgres;
pub use postgres::PgStore;

/// Namespace of the progress snapshot blob.
pub static STATE_NAMESPACE: &str = "emc_academy_state_v1";

/// Namespace of the certificate sequence counter.
pub static CERT_COUNTER_NAMESPACE: &str = "emc_academy_cert_counter_v1";

#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug {
    /// Returns the last saved blob, `None` if nothing was saved yet.
    async fn load(&self, namespace: &str) -> DatabaseResult<Option<Value>>;

    /// Overwrites the whole blob.
    async fn save(&self, namespace: &str, body: &Value) -> DatabaseResult<()>;
}

#[async_trait]
pub trait CounterStore: Send + Sync + std::fmt::Debug {
    /// Atomically increments the counter and returns the new value. The first
    /// call on a fresh namespace returns 1.
    async fn increment(&self, namespace: &str) -> DatabaseResult<u64>;

    /// Current value, 0 for a counter that was never incremented.
    async fn current(&self, namespace: &str) -> DatabaseResult<u64>;
}
