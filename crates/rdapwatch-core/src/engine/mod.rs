//! Core monitor engine
//!
//! The MonitorEngine is responsible for:
//! - Checking every configured domain via StatusSource
//! - Comparing each check against the tracked state
//! - Raising notifications via Notifier on availability transitions
//! - Storing every check as the new tracked state
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐
//! │ StatusSource │─── StatusRecord ───┐
//! └──────────────┘                    │
//!                                     ▼
//!                            ┌───────────────┐
//!                            │ MonitorEngine │
//!                            └───────────────┘
//!                                     │
//!         ┌───────────────────────────┼───────────────────────────┐
//!         │                           │                           │
//!         ▼                           ▼                           ▼
//! ┌─────────────┐           ┌──────────────┐           ┌─────────────┐
//! │ StateStore  │           │   Notifier   │           │   Events    │
//! │ (compare)   │           │  (desktop)   │           │  (console)  │
//! └─────────────┘           └──────────────┘           └─────────────┘
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Initializing**: every domain is checked once to set the baseline
//! 2. **Polling**: every domain is checked in order, one at a time
//! 3. **Sleeping**: fixed `check_interval_secs`, then back to Polling
//! 4. **Stopped**: on shutdown signal; the state store is flushed
//!
//! The shutdown signal is observed between two checks and while sleeping.
//! A lookup that is in flight runs to completion.

use crate::config::MonitorConfig;
use crate::error::{Error, Result};
use crate::record::StatusRecord;
use crate::tracker::{self, Transition};
use crate::traits::{Notifier, StateStore, StatusSource};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// Events emitted by the MonitorEngine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Engine started
    Started {
        domains_count: usize,
    },

    /// Baseline established for a domain
    Initialized {
        domain: String,
        record: StatusRecord,
    },

    /// Check found the same availability and status as before
    Unchanged {
        domain: String,
    },

    /// Check found a different availability or status
    StatusChanged {
        domain: String,
        previous: StatusRecord,
        current: StatusRecord,
        transition: Transition,
    },

    /// Notification handed to the notifier
    NotificationSent {
        domain: String,
        message: String,
    },

    /// Notifier returned an error
    NotificationFailed {
        domain: String,
        error: String,
    },

    /// Every domain was checked once more
    CycleCompleted {
        cycle: u64,
    },

    /// Engine stopped
    Stopped {
        reason: String,
    },
}

/// Core monitor engine
///
/// The engine drives the poll → compare → notify → store loop. It runs on
/// a single task and checks domains strictly one after another, so a cycle
/// takes as long as all of its lookups combined.
///
/// ## Lifecycle
///
/// 1. Create with [`MonitorEngine::new()`]
/// 2. Start with [`MonitorEngine::run()`] or [`MonitorEngine::run_with_shutdown()`]
/// 3. Engine runs until a shutdown signal is received
pub struct MonitorEngine {
    /// Lookup for domain status
    source: Box<dyn StatusSource>,

    /// Sink for availability notifications
    notifier: Box<dyn Notifier>,

    /// Tracked state
    state_store: Box<dyn StateStore>,

    /// Domains to monitor, in check order
    domains: Vec<String>,

    /// Sleep between cycles
    check_interval: Duration,

    /// Event sender for console reporting and monitoring
    event_tx: mpsc::Sender<EngineEvent>,
}

impl MonitorEngine {
    /// Create a new monitor engine
    ///
    /// # Returns
    ///
    /// A tuple of (engine, event_receiver) where event_receiver yields engine events
    pub fn new(
        source: Box<dyn StatusSource>,
        notifier: Box<dyn Notifier>,
        state_store: Box<dyn StateStore>,
        config: MonitorConfig,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.engine.event_channel_capacity);

        let engine = Self {
            source,
            notifier,
            state_store,
            domains: config.domains,
            check_interval: Duration::from_secs(config.check_interval_secs),
            event_tx: tx,
        };

        Ok((engine, rx))
    }

    /// Domains being monitored, in check order
    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    /// Sleep between two cycles
    pub fn check_interval(&self) -> Duration {
        self.check_interval
    }

    /// Run the engine until Ctrl-C
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Clean shutdown
    /// - `Err(Error)`: State store failure
    pub async fn run(&self) -> Result<()> {
        let (tx, rx) = oneshot::channel();

        let signal_task = tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    let _ = tx.send(());
                }
                Err(e) => {
                    warn!("Failed to listen for Ctrl-C: {}", e);
                    // Keep the sender alive so the engine is not stopped
                    std::future::pending::<()>().await;
                }
            }
        });

        let result = self.run_internal(rx).await;
        signal_task.abort();
        result
    }

    /// Run the engine until `shutdown_rx` fires or its sender is dropped
    ///
    /// Used by the daemon, which installs its own signal handlers, and by
    /// tests that need a controlled shutdown.
    pub async fn run_with_shutdown(&self, shutdown_rx: oneshot::Receiver<()>) -> Result<()> {
        self.run_internal(shutdown_rx).await
    }

    async fn run_internal(&self, mut shutdown_rx: oneshot::Receiver<()>) -> Result<()> {
        self.emit_event(EngineEvent::Started {
            domains_count: self.domains.len(),
        });
        info!(
            "Monitoring {} domain(s) via {}, every {:?}",
            self.domains.len(),
            self.source.source_name(),
            self.check_interval
        );

        if self.initialize(&mut shutdown_rx).await? {
            self.poll_until_shutdown(&mut shutdown_rx).await?;
        }

        info!("Shutdown signal received");
        self.emit_event(EngineEvent::Stopped {
            reason: "Shutdown signal".to_string(),
        });

        self.state_store.flush().await?;
        info!("State flushed, engine stopped");

        Ok(())
    }

    /// Check every domain once and store the result as its baseline
    ///
    /// Returns `false` when shutdown was requested before all domains were
    /// checked.
    async fn initialize(&self, shutdown_rx: &mut oneshot::Receiver<()>) -> Result<bool> {
        for domain in &self.domains {
            if shutdown_requested(shutdown_rx) {
                return Ok(false);
            }

            let record = self.source.check(domain).await;
            info!(
                "Initial status for {}: available={}, status={}",
                domain, record.available, record.status
            );
            self.state_store.record(domain, record.clone()).await?;
            self.emit_event(EngineEvent::Initialized {
                domain: domain.clone(),
                record,
            });
        }

        Ok(true)
    }

    async fn poll_until_shutdown(&self, shutdown_rx: &mut oneshot::Receiver<()>) -> Result<()> {
        let mut cycle: u64 = 0;

        loop {
            for domain in &self.domains {
                if shutdown_requested(shutdown_rx) {
                    return Ok(());
                }
                self.check_domain(domain).await?;
            }

            cycle += 1;
            debug!("Cycle {} complete", cycle);
            self.emit_event(EngineEvent::CycleCompleted { cycle });

            tokio::select! {
                _ = tokio::time::sleep(self.check_interval) => {}
                _ = &mut *shutdown_rx => return Ok(()),
            }
        }
    }

    /// Check one domain against its tracked state
    ///
    /// Every domain has a baseline after initialization; a store that lost
    /// one is reported as a state store error.
    async fn check_domain(&self, domain: &str) -> Result<()> {
        let current = self.source.check(domain).await;
        let previous = self
            .state_store
            .get(domain)
            .await?
            .ok_or_else(|| Error::state_store(format!("No baseline recorded for {}", domain)))?;

        match tracker::classify(&previous, &current) {
            Some(transition) => {
                info!(
                    "Status change for {}: {} -> {}",
                    domain, previous.status, current.status
                );

                if transition.notifies() {
                    self.send_notification(domain, transition.message(domain))
                        .await;
                }

                self.emit_event(EngineEvent::StatusChanged {
                    domain: domain.to_string(),
                    previous,
                    current: current.clone(),
                    transition,
                });
            }
            None => {
                debug!("Checking {}: No change", domain);
                self.emit_event(EngineEvent::Unchanged {
                    domain: domain.to_string(),
                });
            }
        }

        self.state_store.record(domain, current).await?;
        Ok(())
    }

    /// Hand a message to the notifier, reporting instead of propagating failures
    async fn send_notification(&self, domain: &str, message: String) {
        match self.notifier.notify(domain, &message).await {
            Ok(()) => {
                info!(
                    "Notification sent via {}: {}",
                    self.notifier.notifier_name(),
                    message
                );
                self.emit_event(EngineEvent::NotificationSent {
                    domain: domain.to_string(),
                    message,
                });
            }
            Err(e) => {
                warn!("Failed to send notification for {}: {}", domain, e);
                self.emit_event(EngineEvent::NotificationFailed {
                    domain: domain.to_string(),
                    error: e.to_string(),
                });
            }
        }
    }

    /// Emit an engine event
    fn emit_event(&self, event: EngineEvent) {
        match self.event_tx.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("Event channel full, dropping event. Consider increasing event_channel_capacity.");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!("Event receiver dropped, event discarded");
            }
        }
    }
}

/// A received signal and a dropped sender both mean stop
fn shutdown_requested(shutdown_rx: &mut oneshot::Receiver<()>) -> bool {
    !matches!(
        shutdown_rx.try_recv(),
        Err(oneshot::error::TryRecvError::Empty)
    )
}
