//! Core traits for rdapwatch
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`StatusSource`]: Look up a domain's registration status
//! - [`Notifier`]: Raise a notification on a state transition
//! - [`StateStore`]: Last known status per domain

pub mod notifier;
pub mod state_store;
pub mod status_source;

pub use notifier::Notifier;
pub use state_store::StateStore;
pub use status_source::StatusSource;
