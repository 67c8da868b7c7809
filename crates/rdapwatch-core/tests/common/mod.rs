//! Test doubles and common utilities for engine contract tests
//!
//! The doubles keep their observable state behind `Arc`s so a test can hand
//! one copy to the engine and keep another to inspect afterwards.

#![allow(dead_code)]

use rdapwatch_core::error::{Error, Result};
use rdapwatch_core::traits::{Notifier, StateStore, StatusSource};
use rdapwatch_core::{
    EngineEvent, MemoryStateStore, MonitorConfig, MonitorEngine, StatusRecord,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// One scripted lookup outcome
#[derive(Debug, Clone)]
pub enum Scripted {
    Record(StatusRecord),
    Fail(String),
}

/// A status source that replays a script per domain
///
/// Each lookup consumes the next entry; once a script is exhausted its last
/// entry repeats forever.
#[derive(Clone, Default)]
pub struct ScriptedStatusSource {
    scripts: Arc<Mutex<HashMap<String, Vec<Scripted>>>>,
    positions: Arc<Mutex<HashMap<String, usize>>>,
    lookup_log: Arc<Mutex<Vec<String>>>,
}

impl ScriptedStatusSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the outcomes for `domain`
    pub fn script(self, domain: &str, outcomes: Vec<Scripted>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(domain.to_string(), outcomes);
        self
    }

    /// Domains in the order they were looked up
    pub fn lookup_log(&self) -> Vec<String> {
        self.lookup_log.lock().unwrap().clone()
    }

    /// Number of lookups for `domain`
    pub fn lookup_count(&self, domain: &str) -> usize {
        self.lookup_log
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.as_str() == domain)
            .count()
    }
}

#[async_trait::async_trait]
impl StatusSource for ScriptedStatusSource {
    async fn lookup(&self, domain: &str) -> Result<StatusRecord> {
        self.lookup_log.lock().unwrap().push(domain.to_string());

        let outcome = {
            let scripts = self.scripts.lock().unwrap();
            let script = scripts
                .get(domain)
                .unwrap_or_else(|| panic!("no script for {domain}"));
            let mut positions = self.positions.lock().unwrap();
            let position = positions.entry(domain.to_string()).or_insert(0);
            let outcome = script[(*position).min(script.len() - 1)].clone();
            *position += 1;
            outcome
        };

        match outcome {
            Scripted::Record(record) => Ok(record),
            Scripted::Fail(message) => Err(Error::network(message)),
        }
    }

    fn source_name(&self) -> &'static str {
        "scripted"
    }
}

/// A notifier that records every message, optionally failing
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<(String, String)>>>,
    attempts: Arc<AtomicUsize>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier whose every call fails
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// (domain, message) pairs delivered so far
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// Messages delivered so far
    pub fn messages(&self) -> Vec<String> {
        self.sent().into_iter().map(|(_, message)| message).collect()
    }

    /// Number of notify() calls, successful or not
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, domain: &str, message: &str) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::notification("no notification daemon"));
        }
        self.sent
            .lock()
            .unwrap()
            .push((domain.to_string(), message.to_string()));
        Ok(())
    }

    fn notifier_name(&self) -> &'static str {
        "recording"
    }
}

/// A state store that counts flushes on top of the memory store
#[derive(Clone, Default)]
pub struct CountingStateStore {
    inner: MemoryStateStore,
    flush_call_count: Arc<AtomicUsize>,
    record_call_count: Arc<AtomicUsize>,
}

impl CountingStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flush_call_count(&self) -> usize {
        self.flush_call_count.load(Ordering::SeqCst)
    }

    pub fn record_call_count(&self) -> usize {
        self.record_call_count.load(Ordering::SeqCst)
    }

    pub async fn current(&self, domain: &str) -> Option<StatusRecord> {
        self.inner.get(domain).await.unwrap()
    }
}

#[async_trait::async_trait]
impl StateStore for CountingStateStore {
    async fn get(&self, domain: &str) -> Result<Option<StatusRecord>> {
        self.inner.get(domain).await
    }

    async fn record(&self, domain: &str, record: StatusRecord) -> Result<Option<StatusRecord>> {
        self.record_call_count.fetch_add(1, Ordering::SeqCst);
        self.inner.record(domain, record).await
    }

    async fn flush(&self) -> Result<()> {
        self.flush_call_count.fetch_add(1, Ordering::SeqCst);
        self.inner.flush().await
    }
}

/// Registered record with the given status codes and registrar
pub fn registered(status: &[&str], registrar: Option<&str>) -> StatusRecord {
    StatusRecord::registered(
        status.iter().map(|s| s.to_string()).collect(),
        registrar.map(String::from),
        Some("1995-08-14T04:00:00Z".to_string()),
        Some("2030-08-13T04:00:00Z".to_string()),
    )
}

/// Helper to create a minimal MonitorConfig for testing
pub fn minimal_config(domains: &[&str]) -> MonitorConfig {
    MonitorConfig::new(domains.iter().copied()).with_check_interval_secs(60)
}

/// A running engine plus the handles a test needs to drive it
pub struct RunningEngine {
    pub events: mpsc::Receiver<EngineEvent>,
    pub shutdown_tx: Option<oneshot::Sender<()>>,
    pub handle: JoinHandle<Result<()>>,
}

impl RunningEngine {
    /// Receive events until `CycleCompleted { cycle }` arrives
    pub async fn events_until_cycle(&mut self, cycle: u64) -> Vec<EngineEvent> {
        let mut seen = Vec::new();
        let deadline = tokio::time::Duration::from_secs(24 * 60 * 60);

        tokio::time::timeout(deadline, async {
            while let Some(event) = self.events.recv().await {
                let done = event == EngineEvent::CycleCompleted { cycle };
                seen.push(event);
                if done {
                    break;
                }
            }
        })
        .await
        .expect("engine reaches the requested cycle");

        seen
    }

    /// Send the shutdown signal and wait for the engine to return
    pub async fn stop(mut self) -> (Result<()>, Vec<EngineEvent>) {
        if let Some(tx) = self.shutdown_tx.take() {
            tx.send(()).expect("engine still running");
        }
        let result = self.handle.await.expect("engine task does not panic");

        let mut rest = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            rest.push(event);
        }
        (result, rest)
    }
}

/// Build an engine from the doubles and spawn it
pub fn spawn_engine(
    source: ScriptedStatusSource,
    notifier: RecordingNotifier,
    store: CountingStateStore,
    config: MonitorConfig,
) -> RunningEngine {
    let (engine, events) = MonitorEngine::new(
        Box::new(source),
        Box::new(notifier),
        Box::new(store),
        config,
    )
    .expect("engine construction succeeds");

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let handle = tokio::spawn(async move { engine.run_with_shutdown(shutdown_rx).await });

    RunningEngine {
        events,
        shutdown_tx: Some(shutdown_tx),
        handle,
    }
}

/// Count events matching a predicate
pub fn count_events(events: &[EngineEvent], pred: impl Fn(&EngineEvent) -> bool) -> usize {
    events.iter().filter(|e| pred(e)).count()
}
