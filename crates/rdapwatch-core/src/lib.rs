// # rdapwatch-core
//
// Core library for the rdapwatch domain status monitor.
//
// ## Architecture Overview
//
// - **StatusSource**: Trait for looking up a domain's registration status
// - **Notifier**: Trait for raising a notification on a state transition
// - **StateStore**: Trait for the last known status of every domain
// - **MonitorEngine**: Core engine that runs the poll → compare → notify loop
// - **tracker**: Pure change detection between two consecutive checks
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from the RDAP and
//    desktop implementations
// 2. **Errors Are Observations**: A failed lookup is a status record, never
//    a reason to stop monitoring
// 3. **Library-First**: All core functionality can be used as a library

pub mod config;
pub mod engine;
pub mod error;
pub mod record;
pub mod state;
pub mod tracker;
pub mod traits;

// Re-export core types for convenience
pub use config::{EngineConfig, LookupConfig, MonitorConfig, NotificationConfig};
pub use engine::{EngineEvent, MonitorEngine};
pub use error::{Error, Result};
pub use record::{DomainStatus, StatusRecord};
pub use state::MemoryStateStore;
pub use tracker::{Transition, classify, detect_change};
pub use traits::{Notifier, StateStore, StatusSource};
