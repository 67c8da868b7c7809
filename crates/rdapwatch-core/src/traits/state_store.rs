// # State Store Trait
//
// Defines the interface for the tracked state: the most recent status
// record of every monitored domain.
//
// ## Lifetime
//
// State lives as long as the process. Nothing is persisted; after a restart
// the engine rebuilds the state from an initial check of every domain.
//
// ## Usage
//
// ```rust,ignore
// use rdapwatch_core::{StateStore, StatusRecord};
//
// let store = /* StateStore implementation */;
//
// // Store the latest check, getting the previous one back
// let previous = store.record("example.com", StatusRecord::available()).await?;
// ```

use async_trait::async_trait;

use crate::record::StatusRecord;

/// Trait for state store implementations
///
/// Only the engine writes to the store, once per check, whether or not the
/// check detected a change.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Get the last known record for a domain
    ///
    /// # Returns
    ///
    /// - `Ok(Some(StatusRecord))`: the last stored record
    /// - `Ok(None)`: the domain has not been checked yet
    /// - `Err(Error)`: storage error
    async fn get(&self, domain: &str) -> Result<Option<StatusRecord>, crate::Error>;

    /// Store the latest record for a domain
    ///
    /// # Returns
    ///
    /// The record it replaced, if any.
    async fn record(
        &self,
        domain: &str,
        record: StatusRecord,
    ) -> Result<Option<StatusRecord>, crate::Error>;

    /// Persist any pending changes
    ///
    /// Called once when the engine stops.
    async fn flush(&self) -> Result<(), crate::Error>;
}
