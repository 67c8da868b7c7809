// # Memory State Store
//
// In-memory implementation of StateStore.
//
// ## Crash Behavior
//
// - All state is lost on restart/crash
// - The first cycle after a restart re-establishes the baseline, so a
//   transition that happened while the process was down is not notified

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use async_trait::async_trait;

use crate::record::StatusRecord;
use crate::traits::StateStore;
use crate::Error;

/// In-memory state store implementation
///
/// # Example
///
/// ```rust,no_run
/// use rdapwatch_core::state::MemoryStateStore;
/// use rdapwatch_core::traits::StateStore;
/// use rdapwatch_core::StatusRecord;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemoryStateStore::new();
///
///     store.record("example.com", StatusRecord::available()).await?;
///
///     let record = store.get("example.com").await?;
///     assert_eq!(record, Some(StatusRecord::available()));
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MemoryStateStore {
    inner: Arc<RwLock<HashMap<String, StatusRecord>>>,
}

impl MemoryStateStore {
    /// Create a new empty memory state store
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for MemoryStateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn get(&self, domain: &str) -> Result<Option<StatusRecord>, Error> {
        let guard = self.inner.read().await;
        Ok(guard.get(domain).cloned())
    }

    async fn record(
        &self,
        domain: &str,
        record: StatusRecord,
    ) -> Result<Option<StatusRecord>, Error> {
        let mut guard = self.inner.write().await;
        Ok(guard.insert(domain.to_string(), record))
    }

    async fn flush(&self) -> Result<(), Error> {
        // Nothing to persist
        Ok(())
    }
}
