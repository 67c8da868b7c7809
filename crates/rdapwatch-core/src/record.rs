//! Normalized status records
//!
//! A [`StatusRecord`] is what one check of one domain produces, regardless
//! of how the lookup went. Failed lookups are records too: they carry
//! [`DomainStatus::Error`] and an error message.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status reported for a domain
///
/// Values of different variants never compare equal, so an `Error` status
/// followed by a list of codes is always a change, and two lists are only
/// equal when they hold the same codes in the same order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawStatus", into = "RawStatus")]
pub enum DomainStatus {
    /// The registry has no record of the domain
    Available,
    /// RDAP status codes of a registered domain (e.g. `active`)
    Codes(Vec<String>),
    /// The lookup failed
    Error,
}

impl DomainStatus {
    const AVAILABLE: &'static str = "available";
    const ERROR: &'static str = "error";

    /// Build a status list from anything yielding strings
    pub fn codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Codes(codes.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for DomainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainStatus::Available => f.write_str(Self::AVAILABLE),
            DomainStatus::Error => f.write_str(Self::ERROR),
            DomainStatus::Codes(codes) => write!(f, "[{}]", codes.join(", ")),
        }
    }
}

/// Wire shape: `"available"`, `"error"` or an array of codes
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawStatus {
    Text(String),
    Codes(Vec<String>),
}

impl TryFrom<RawStatus> for DomainStatus {
    type Error = String;

    fn try_from(raw: RawStatus) -> Result<Self, String> {
        match raw {
            RawStatus::Codes(codes) => Ok(DomainStatus::Codes(codes)),
            RawStatus::Text(text) if text == DomainStatus::AVAILABLE => {
                Ok(DomainStatus::Available)
            }
            RawStatus::Text(text) if text == DomainStatus::ERROR => Ok(DomainStatus::Error),
            RawStatus::Text(other) => Err(format!("unknown domain status: {other}")),
        }
    }
}

impl From<DomainStatus> for RawStatus {
    fn from(status: DomainStatus) -> Self {
        match status {
            DomainStatus::Available => RawStatus::Text(DomainStatus::AVAILABLE.to_string()),
            DomainStatus::Error => RawStatus::Text(DomainStatus::ERROR.to_string()),
            DomainStatus::Codes(codes) => RawStatus::Codes(codes),
        }
    }
}

/// Result of checking one domain once
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRecord {
    /// Whether the domain can be registered
    pub available: bool,

    /// Registry status
    pub status: DomainStatus,

    /// Name of the sponsoring registrar
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registrar: Option<String>,

    /// Date of the `registration` event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_date: Option<String>,

    /// Date of the `expiration` event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,

    /// Why the lookup failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusRecord {
    /// Record for a domain the registry does not know about
    pub fn available() -> Self {
        Self {
            available: true,
            status: DomainStatus::Available,
            registrar: None,
            registration_date: None,
            expiration_date: None,
            error: None,
        }
    }

    /// Record for a registered domain
    pub fn registered(
        status: Vec<String>,
        registrar: Option<String>,
        registration_date: Option<String>,
        expiration_date: Option<String>,
    ) -> Self {
        Self {
            available: false,
            status: DomainStatus::Codes(status),
            registrar,
            registration_date,
            expiration_date,
            error: None,
        }
    }

    /// Record for a failed lookup
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            available: false,
            status: DomainStatus::Error,
            registrar: None,
            registration_date: None,
            expiration_date: None,
            error: Some(message.into()),
        }
    }

}
