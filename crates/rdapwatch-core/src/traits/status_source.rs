// # Status Source Trait
//
// Defines the interface for looking up the registration status of a domain.
//
// ## Implementations
//
// - RDAP over HTTP: `rdapwatch-rdap` crate
//
// ## Usage
//
// ```rust,ignore
// use rdapwatch_core::StatusSource;
//
// #[tokio::main]
// async fn main() {
//     let source = /* StatusSource implementation */;
//
//     // Never fails: lookup errors come back as an error record
//     let record = source.check("example.com").await;
//     println!("available: {}", record.available);
// }
// ```

use async_trait::async_trait;
use tracing::error;

use crate::record::StatusRecord;

/// Trait for status source implementations
///
/// Implementors provide [`lookup`](StatusSource::lookup), a single-shot
/// query that may fail. The engine only ever calls
/// [`check`](StatusSource::check), which folds every failure into a
/// [`StatusRecord::error`] so a bad lookup never stops the monitoring loop.
///
/// # Rules for implementations
///
/// - One request per call, no retries (the loop's next cycle is the retry)
/// - No caching: every call must reflect the registry's current answer
/// - No state access: tracked state is owned by the engine
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Look up the current status of `domain`
    ///
    /// # Returns
    ///
    /// - `Ok(StatusRecord)`: the registry answered (including "not found")
    /// - `Err(Error)`: network, HTTP status or parse failure
    async fn lookup(&self, domain: &str) -> Result<StatusRecord, crate::Error>;

    /// Look up `domain`, absorbing any failure into an error record
    async fn check(&self, domain: &str) -> StatusRecord {
        match self.lookup(domain).await {
            Ok(record) => record,
            Err(e) => {
                error!("Error checking {}: {}", domain, e);
                StatusRecord::error(e.to_string())
            }
        }
    }

    /// Get the source name (for logging/debugging)
    fn source_name(&self) -> &'static str;
}
