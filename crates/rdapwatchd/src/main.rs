// # rdapwatchd - Domain Status Monitor Daemon
//
// The rdapwatchd daemon is a thin integration layer responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Wiring the RDAP source, desktop notifier and memory state store
// 4. Running the monitor engine until SIGINT/SIGTERM
// 5. Printing the console report
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// - `RDAPWATCH_DOMAINS`: Comma-separated list of domains to monitor (required)
// - `RDAPWATCH_CHECK_INTERVAL_SECS`: Seconds between cycles (default 60)
// - `RDAPWATCH_RDAP_BASE_URL`: RDAP domain endpoint (default Verisign .com)
// - `RDAPWATCH_HTTP_TIMEOUT_SECS`: Lookup timeout (default 10)
// - `RDAPWATCH_NOTIFY_TIMEOUT_SECS`: Notification display time (default 10)
// - `RDAPWATCH_NOTIFY_ICON`: Notification icon name or path
// - `RDAPWATCH_NOTIFY_DRY_RUN`: Log notifications instead of raising them
// - `RDAPWATCH_LOG_LEVEL`: trace, debug, info, warn, error (default info)
//
// ## Example
//
// ```bash
// export RDAPWATCH_DOMAINS=example1.com,example2.com,example3.com
// export RDAPWATCH_CHECK_INTERVAL_SECS=60
//
// rdapwatchd
// ```

mod console;

use anyhow::Result;
use rdapwatch_core::{MemoryStateStore, MonitorConfig, MonitorEngine};
use rdapwatch_notify_desktop::DesktopNotifier;
use rdapwatch_rdap::RdapStatusSource;
use std::env;
use std::process::ExitCode;
use std::str::FromStr;
use tokio::sync::oneshot;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum MonitorExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<MonitorExitCode> for ExitCode {
    fn from(code: MonitorExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    monitor: MonitorConfig,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Load configuration through a variable lookup
    fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let domains: Vec<String> = var("RDAPWATCH_DOMAINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let mut monitor = MonitorConfig::new(domains);

        if let Some(interval) = parse_var(&var, "RDAPWATCH_CHECK_INTERVAL_SECS")? {
            monitor.check_interval_secs = interval;
        }
        if let Some(url) = var("RDAPWATCH_RDAP_BASE_URL") {
            monitor.lookup.base_url = url;
        }
        if let Some(timeout) = parse_var(&var, "RDAPWATCH_HTTP_TIMEOUT_SECS")? {
            monitor.lookup.timeout_secs = timeout;
        }
        if let Some(timeout) = parse_var(&var, "RDAPWATCH_NOTIFY_TIMEOUT_SECS")? {
            monitor.notification.timeout_secs = timeout;
        }
        monitor.notification.icon = var("RDAPWATCH_NOTIFY_ICON").filter(|s| !s.is_empty());
        monitor.notification.dry_run = var("RDAPWATCH_NOTIFY_DRY_RUN")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        Ok(Self {
            monitor,
            log_level: var("RDAPWATCH_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the configuration
    ///
    /// Range checks for values set through the environment, then the
    /// library's own validation (domains, URL scheme, non-zero values).
    fn validate(&self) -> Result<()> {
        if self.monitor.domains.is_empty() {
            anyhow::bail!(
                "RDAPWATCH_DOMAINS must contain at least one domain. \
                Set it via: export RDAPWATCH_DOMAINS=example1.com,example2.com"
            );
        }

        let interval = self.monitor.check_interval_secs;
        if !(1..=86_400).contains(&interval) {
            anyhow::bail!(
                "RDAPWATCH_CHECK_INTERVAL_SECS must be between 1 and 86400 seconds. Got: {}",
                interval
            );
        }

        let timeout = self.monitor.lookup.timeout_secs;
        if !(1..=300).contains(&timeout) {
            anyhow::bail!(
                "RDAPWATCH_HTTP_TIMEOUT_SECS must be between 1 and 300 seconds. Got: {}",
                timeout
            );
        }

        if self.monitor.lookup.base_url.starts_with("http://") {
            eprintln!(
                "WARNING: RDAPWATCH_RDAP_BASE_URL uses HTTP (not HTTPS). \
                Consider using HTTPS."
            );
        }

        parse_log_level(&self.log_level)?;

        self.monitor.validate()?;

        Ok(())
    }
}

/// Parse an optional numeric variable
fn parse_var<F, T>(var: &F, name: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match var(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("{} is not a valid number ('{}'): {}", name, raw, e)),
        None => Ok(None),
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!(
            "RDAPWATCH_LOG_LEVEL '{}' is not valid. \
            Valid levels: trace, debug, info, warn, error",
            level
        ),
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return MonitorExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return MonitorExitCode::ConfigError.into();
    }

    // Logs go to stderr; stdout carries the console report
    let log_level = parse_log_level(&config.log_level).unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return MonitorExitCode::ConfigError.into();
    }

    info!("Starting rdapwatchd");
    info!(
        "Configuration loaded: {} domain(s)",
        config.monitor.domains.len()
    );

    // Checks run one after another; a single thread is enough
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return MonitorExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        match run_daemon(config.monitor).await {
            Ok(()) => MonitorExitCode::CleanShutdown,
            Err(e) => {
                error!("Daemon error: {}", e);
                println!("Error: {}", e);
                MonitorExitCode::RuntimeError
            }
        }
    });

    result.into()
}

/// Run the daemon
async fn run_daemon(config: MonitorConfig) -> Result<()> {
    let source = RdapStatusSource::new(&config.lookup)?;
    let notifier = DesktopNotifier::new(&config.notification);
    if notifier.is_dry_run() {
        info!("Notifications in dry-run mode");
    }

    println!(
        "Starting domain monitoring using RDAP lookups at {}...",
        config.lookup.base_url
    );

    let (engine, events) = MonitorEngine::new(
        Box::new(source),
        Box::new(notifier),
        Box::new(MemoryStateStore::new()),
        config,
    )?;

    for domain in engine.domains() {
        info!("Monitoring domain: {}", domain);
    }
    info!("Check interval: {:?}", engine.check_interval());

    let printer = tokio::spawn(console::print_events(events));

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let signal_task = tokio::spawn(async move {
        let outcome = wait_for_shutdown().await;
        let _ = shutdown_tx.send(());
        outcome
    });

    let run_result = engine.run_with_shutdown(shutdown_rx).await;

    // Dropping the engine closes the event channel so the printer drains and exits
    drop(engine);
    let _ = printer.await;

    if let Err(e) = run_result {
        signal_task.abort();
        return Err(e.into());
    }

    let signal = signal_task.await??;
    info!("Received shutdown signal: {}", signal);
    println!("\nMonitoring stopped by user");

    Ok(())
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// # Returns
///
/// Returns the name of the signal received.
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    let received = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };

    Ok(received)
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
