//! Change detection between two consecutive checks of a domain
//!
//! Only the availability flag and the status are compared. Registrar,
//! event dates and error messages can differ without counting as a change.

use crate::record::StatusRecord;

/// Registrar name used when a newly registered domain has none
pub const UNKNOWN_REGISTRAR: &str = "someone";

/// Whether `current` differs from `previous` in availability or status
pub fn detect_change(previous: &StatusRecord, current: &StatusRecord) -> bool {
    previous.available != current.available || previous.status != current.status
}

/// Kind of a detected state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The domain can now be registered
    BecameAvailable,

    /// A previously available domain was taken
    Registered {
        /// Who registered it, if the registry says
        registrar: Option<String>,
    },

    /// Any other change, e.g. the status list moved or a lookup failed
    StatusChanged,
}

impl Transition {
    /// Notification text for this transition on `domain`
    pub fn message(&self, domain: &str) -> String {
        match self {
            Transition::BecameAvailable => {
                format!("🎉 {} is now AVAILABLE for registration!", domain)
            }
            Transition::Registered { registrar } => format!(
                "❌ {} has been REGISTERED by {}",
                domain,
                registrar.as_deref().unwrap_or(UNKNOWN_REGISTRAR)
            ),
            Transition::StatusChanged => format!("Status change for {}", domain),
        }
    }

    /// Whether this transition raises a desktop notification
    ///
    /// Changes between two non-available states are only reported on the
    /// console.
    pub fn notifies(&self) -> bool {
        !matches!(self, Transition::StatusChanged)
    }
}

/// Classify the change from `previous` to `current`
///
/// Returns `None` when [`detect_change`] sees no change.
pub fn classify(previous: &StatusRecord, current: &StatusRecord) -> Option<Transition> {
    if !detect_change(previous, current) {
        return None;
    }

    if current.available {
        Some(Transition::BecameAvailable)
    } else if previous.available {
        Some(Transition::Registered {
            registrar: current.registrar.clone(),
        })
    } else {
        Some(Transition::StatusChanged)
    }
}
