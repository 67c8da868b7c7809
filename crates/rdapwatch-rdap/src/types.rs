//! RDAP domain response (RFC 9083), reduced to the members rdapwatch reads
//!
//! Events and entities stay as raw JSON. Only the members a lookup actually
//! reaches are required to be well formed: events up to the first one with
//! the wanted action, and the first entity's vCard.

use rdapwatch_core::{Error, Result};
use serde::Deserialize;
use serde_json::Value;

/// Event action marking when the domain was registered
pub const EVENT_REGISTRATION: &str = "registration";

/// Event action marking when the registration expires
pub const EVENT_EXPIRATION: &str = "expiration";

#[derive(Debug, Clone, Deserialize)]
pub struct RdapDomain {
    #[serde(default)]
    pub status: Vec<String>,

    #[serde(default)]
    pub events: Vec<Value>,

    #[serde(default)]
    pub entities: Vec<Value>,
}

impl RdapDomain {
    /// Date of the first event with the given action
    ///
    /// Every event scanned before the match must carry an `eventAction`
    /// string, and the match must carry an `eventDate`.
    pub fn event_date(&self, action: &str) -> Result<Option<String>> {
        for event in &self.events {
            let event_action = event
                .get("eventAction")
                .and_then(Value::as_str)
                .ok_or_else(|| Error::parse("event has no eventAction"))?;

            if event_action == action {
                return event
                    .get("eventDate")
                    .and_then(Value::as_str)
                    .map(|date| Some(date.to_string()))
                    .ok_or_else(|| Error::parse(format!("{} event has no eventDate", action)));
            }
        }

        Ok(None)
    }

    /// Registrar name taken from the first entity
    ///
    /// `None` when the response lists no entities.
    pub fn registrar(&self) -> Result<Option<String>> {
        match self.entities.first() {
            None => Ok(None),
            Some(entity) => formatted_name(entity)
                .map(|name| Some(name.to_string()))
                .ok_or_else(|| Error::parse("first entity has no vCard name")),
        }
    }
}

/// Value of an entity's second vCard property
///
/// jCard layout is `["vcard", [[name, params, type, value], ...]]`. The
/// first property is always `version`, so for registry responses the
/// second one is the `fn` (formatted name) line.
fn formatted_name(entity: &Value) -> Option<&str> {
    entity
        .get("vcardArray")?
        .get(1)?
        .get(1)?
        .get(3)?
        .as_str()
}
