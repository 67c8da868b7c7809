// # Desktop Notifier
//
// This crate raises rdapwatch notifications on the desktop through
// notify-rust (D-Bus on Linux/BSD, Notification Center on macOS, toast on
// Windows).
//
// ## Behavior
//
// - Title `Domain Status: <domain>`, body = the engine's message
// - Display timeout and optional icon come from `NotificationConfig`
// - The OS call blocks, so it runs on tokio's blocking pool
// - Failures are returned to the engine, which reports them; nothing is
//   retried here
//
// ## Dry-Run Mode
//
// When `dry_run` is true the notifier logs what it would raise and returns
// `Ok(())`. Useful on headless hosts and in CI where no notification
// daemon is running.

use async_trait::async_trait;
use notify_rust::{Notification, Timeout};
use rdapwatch_core::config::NotificationConfig;
use rdapwatch_core::traits::Notifier;
use rdapwatch_core::{Error, Result};
use std::time::Duration;
use tracing::{debug, info};

/// Application name reported to the notification server
const APP_NAME: &str = "rdapwatch";

/// Desktop notifier
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    /// How long the notification stays visible
    timeout: Duration,

    /// Icon name or path
    icon: Option<String>,

    /// Dry-run mode: log instead of raising notifications
    dry_run: bool,
}

impl DesktopNotifier {
    /// Create a notifier from configuration
    pub fn new(config: &NotificationConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.timeout_secs),
            icon: config.icon.clone(),
            dry_run: config.dry_run,
        }
    }

    /// Create a notifier that only logs
    pub fn new_dry_run() -> Self {
        Self::new(&NotificationConfig {
            dry_run: true,
            ..NotificationConfig::default()
        })
    }

    /// Whether notifications are only logged
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Notification title for a domain
    pub fn title(domain: &str) -> String {
        format!("Domain Status: {}", domain)
    }

    fn timeout_millis(&self) -> u32 {
        u32::try_from(self.timeout.as_millis()).unwrap_or(u32::MAX)
    }
}

#[async_trait]
impl Notifier for DesktopNotifier {
    async fn notify(&self, domain: &str, message: &str) -> Result<()> {
        let title = Self::title(domain);

        if self.dry_run {
            info!("[DRY-RUN] Would notify \"{}\": {}", title, message);
            return Ok(());
        }

        let body = message.to_string();
        let icon = self.icon.clone();
        let timeout = self.timeout_millis();

        debug!("Raising desktop notification \"{}\"", title);

        tokio::task::spawn_blocking(move || {
            let mut notification = Notification::new();
            notification
                .appname(APP_NAME)
                .summary(&title)
                .body(&body)
                .timeout(Timeout::Milliseconds(timeout));
            if let Some(icon) = icon.as_deref() {
                notification.icon(icon);
            }
            notification.show().map(drop).map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| Error::notification(format!("Notification task failed: {}", e)))?
        .map_err(Error::notification)
    }

    fn notifier_name(&self) -> &'static str {
        "desktop"
    }
}
