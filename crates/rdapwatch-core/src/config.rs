//! Configuration types for rdapwatch
//!
//! This module defines all configuration structures used throughout the crate.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Default RDAP endpoint (Verisign, serves .com)
pub const DEFAULT_RDAP_BASE_URL: &str = "https://rdap.verisign.com/com/v1/domain";

/// Main monitor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Domains to monitor, checked in this order every cycle
    pub domains: Vec<String>,

    /// Seconds to sleep between cycles
    #[serde(default = "default_check_interval_secs", alias = "checkIntervalSeconds")]
    pub check_interval_secs: u64,

    /// Lookup service settings
    #[serde(default)]
    pub lookup: LookupConfig,

    /// Desktop notification settings
    #[serde(default)]
    pub notification: NotificationConfig,

    /// Optional engine settings
    #[serde(default)]
    pub engine: EngineConfig,
}

impl MonitorConfig {
    /// Create a configuration for the given domains with defaults
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            domains: domains.into_iter().map(Into::into).collect(),
            check_interval_secs: default_check_interval_secs(),
            lookup: LookupConfig::default(),
            notification: NotificationConfig::default(),
            engine: EngineConfig::default(),
        }
    }

    /// Set the interval between cycles
    pub fn with_check_interval_secs(mut self, secs: u64) -> Self {
        self.check_interval_secs = secs;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.domains.is_empty() {
            return Err(crate::Error::config("No domains configured"));
        }

        let mut seen = HashSet::new();
        for domain in &self.domains {
            validate_domain_name(domain)?;
            if !seen.insert(domain.to_ascii_lowercase()) {
                return Err(crate::Error::config(format!(
                    "Domain {} is configured more than once",
                    domain
                )));
            }
        }

        if self.check_interval_secs == 0 {
            return Err(crate::Error::config("Check interval must be > 0"));
        }

        self.lookup.validate()?;
        self.engine.validate()?;

        Ok(())
    }
}

/// Lookup service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Base URL; the domain is appended as the last path segment
    #[serde(default = "default_base_url", alias = "baseUrl")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_lookup_timeout_secs", alias = "timeoutSecs")]
    pub timeout_secs: u64,
}

impl LookupConfig {
    /// Validate the lookup configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.base_url.is_empty() {
            return Err(crate::Error::config("Lookup base URL cannot be empty"));
        }
        if !self.base_url.starts_with("https://") && !self.base_url.starts_with("http://") {
            return Err(crate::Error::config(format!(
                "Lookup base URL must use HTTP or HTTPS scheme. Got: {}",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(crate::Error::config("Lookup timeout must be > 0"));
        }
        Ok(())
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_lookup_timeout_secs(),
        }
    }
}

/// Desktop notification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// How long the notification stays on screen, in seconds
    #[serde(default = "default_notification_timeout_secs", alias = "timeoutSecs")]
    pub timeout_secs: u64,

    /// Icon name or path
    #[serde(default)]
    pub icon: Option<String>,

    /// Log notifications instead of raising them
    #[serde(default, alias = "dryRun")]
    pub dry_run: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_notification_timeout_secs(),
            icon: None,
            dry_run: false,
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Capacity of the internal event channel
    ///
    /// When full, new events are dropped (with a warning log).
    #[serde(default = "default_event_channel_capacity", alias = "eventChannelCapacity")]
    pub event_channel_capacity: usize,
}

impl EngineConfig {
    fn validate(&self) -> Result<(), crate::Error> {
        if self.event_channel_capacity == 0 {
            return Err(crate::Error::config("Event channel capacity must be > 0"));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

/// Validate that a string is a valid domain name
///
/// Basic RFC 1035 checks: total length, label length, characters, hyphen
/// placement.
pub fn validate_domain_name(domain: &str) -> Result<(), crate::Error> {
    if domain.is_empty() {
        return Err(crate::Error::config("Domain name cannot be empty"));
    }

    if domain.len() > 253 {
        return Err(crate::Error::config(format!(
            "Domain name too long: {} chars (max 253). Got: {}",
            domain.len(),
            domain
        )));
    }

    for label in domain.split('.') {
        if label.is_empty() {
            return Err(crate::Error::config(format!(
                "Domain name has empty label: '{}'",
                domain
            )));
        }

        if label.len() > 63 {
            return Err(crate::Error::config(format!(
                "Domain label too long: {} chars (max 63). Label: '{}'",
                label.len(),
                label
            )));
        }

        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(crate::Error::config(format!(
                "Domain label contains invalid characters. Label: '{}'",
                label
            )));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(crate::Error::config(format!(
                "Domain label cannot start or end with hyphen. Label: '{}'",
                label
            )));
        }
    }

    Ok(())
}

fn default_check_interval_secs() -> u64 {
    60
}

fn default_base_url() -> String {
    DEFAULT_RDAP_BASE_URL.to_string()
}

fn default_lookup_timeout_secs() -> u64 {
    10
}

fn default_notification_timeout_secs() -> u64 {
    10
}

fn default_event_channel_capacity() -> usize {
    1000
}
