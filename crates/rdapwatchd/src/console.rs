//! Human-readable console report
//!
//! Turns engine events into the lines printed on stdout. Logging goes to
//! stderr through tracing; this is the report a user watches.

use rdapwatch_core::{EngineEvent, StatusRecord};
use tokio::sync::mpsc;

const UNKNOWN: &str = "unknown";

/// Local wall-clock time as `HH:MM:SS`
pub fn timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

/// Lines to print for `event`, stamped with `now`
///
/// An empty string stands for a blank separator line.
pub fn render(event: &EngineEvent, now: &str) -> Vec<String> {
    match event {
        EngineEvent::Initialized { domain, record } => {
            let mut lines = vec![
                String::new(),
                format!("[{}] Initial status for {}:", now, domain),
            ];
            lines.extend(summary(record));
            lines
        }
        EngineEvent::Unchanged { domain } => {
            vec![format!("[{}] Checking {}: No change", now, domain)]
        }
        EngineEvent::StatusChanged {
            domain,
            previous,
            current,
            ..
        } => vec![
            String::new(),
            format!("[{}] Status change for {}:", now, domain),
            format!("Previous: {}", previous.status),
            format!("Current: {}", current.status),
        ],
        EngineEvent::NotificationSent { message, .. } => {
            vec![String::new(), format!("[{}] {}", now, message)]
        }
        EngineEvent::NotificationFailed { error, .. } => {
            vec![format!("Failed to send notification: {}", error)]
        }
        EngineEvent::Started { .. }
        | EngineEvent::CycleCompleted { .. }
        | EngineEvent::Stopped { .. } => Vec::new(),
    }
}

/// Summary of a record: availability, status, and registration details
/// when the domain is taken
pub fn summary(record: &StatusRecord) -> Vec<String> {
    let mut lines = vec![
        format!("Available: {}", record.available),
        format!("Status: {}", record.status),
    ];

    if !record.available {
        lines.push(format!(
            "Registrar: {}",
            record.registrar.as_deref().unwrap_or(UNKNOWN)
        ));
        lines.push(format!(
            "Registration Date: {}",
            record.registration_date.as_deref().unwrap_or(UNKNOWN)
        ));
        lines.push(format!(
            "Expiration Date: {}",
            record.expiration_date.as_deref().unwrap_or(UNKNOWN)
        ));
    }

    if let Some(error) = &record.error {
        lines.push(format!("Error: {}", error));
    }

    lines
}

/// Print every event until the engine drops its sender
pub async fn print_events(mut events: mpsc::Receiver<EngineEvent>) {
    while let Some(event) = events.recv().await {
        for line in render(&event, &timestamp()) {
            println!("{}", line);
        }
    }
}
