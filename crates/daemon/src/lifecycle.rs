// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup, event handling, shutdown.

use std::fs::{File, OpenOptions};
use std::path::PathBuf;
use std::time::Instant;

use fs2::FileExt;
use simsched_adapters::{
    AdapterSet, CommandActivator, CommandCallState, CommandSecretStore, CommandSimStatus,
    JsonStoreAdapter, LogNotifyAdapter, SimStatusAdapter, StatusSignal, SubscriptionProvider,
    TokioTimer, TracedActivationAdapter, TracedSimStatusAdapter, TracedTimerAdapter, WakeFired,
};
use simsched_core::{Event, EventReceiver, SystemClock};
use simsched_engine::{Engine, EngineError, SyncReport};
use simsched_storage::{JsonStore, StorageError};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::config::Config;

/// Adapter set with the concrete command-backed adapters (wrapped with tracing)
pub type DaemonAdapters = AdapterSet<
    JsonStoreAdapter,
    TracedActivationAdapter<SubscriptionProvider<CommandActivator, CommandActivator>>,
    CommandCallState,
    CommandSecretStore,
    TracedTimerAdapter<TokioTimer<SystemClock>>,
    TracedSimStatusAdapter<CommandSimStatus>,
    LogNotifyAdapter,
>;

pub type DaemonEngine = Engine<DaemonAdapters, SystemClock>;

/// Daemon state during operation
pub struct DaemonState {
    pub config: Config,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    pub engine: DaemonEngine,
    /// Programmed wakes as they come due
    pub wakes: mpsc::Receiver<WakeFired>,
    /// Raised on SIGUSR1 when the platform reports a SIM state change
    pub status_signal: StatusSignal,
    event_log: JoinHandle<()>,
    pub start_time: Instant,
}

impl DaemonState {
    /// Reconcile every resource after a reboot
    pub async fn boot(&self) -> Result<(), LifecycleError> {
        let report = self.engine.on_boot().await?;
        log_report("boot", &report);
        Ok(())
    }

    /// Handle a programmed wake
    pub async fn handle_wake(&self, fired: WakeFired) {
        info!(at = %fired.at, secrets = fired.payload.len(), "wake fired");
        match self.engine.on_wake(fired.payload).await {
            Ok(report) => log_report("wake", &report),
            Err(e) => error!("Error handling wake: {}", e),
        }
    }

    /// Handle a SIM being inserted or removed
    pub async fn handle_hotplug(&self) {
        match self.engine.on_hotplug().await {
            Ok(report) => log_report("hotplug", &report),
            Err(e) => error!("Error handling hotplug: {}", e),
        }
    }

    pub fn handle_status_change(&self) {
        self.status_signal.notify();
    }

    /// Shutdown the daemon gracefully
    pub async fn shutdown(&mut self) -> Result<(), LifecycleError> {
        info!("Shutting down daemon...");

        // 1. Stop an in-flight PIN delivery
        if let Some(report) = self.engine.shutdown().await {
            info!(
                delivered = report.delivered.len(),
                abandoned = report.abandoned.len(),
                "PIN delivery cancelled"
            );
        }

        // 2. Stop logging events
        self.event_log.abort();

        // 3. Remove PID file
        if self.config.lock_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.lock_path) {
                warn!("Failed to remove PID file: {}", e);
            }
        }

        // 4. Lock file is released automatically when self.lock_file is dropped

        info!(
            uptime_secs = self.start_time.elapsed().as_secs(),
            "Daemon shutdown complete"
        );
        Ok(())
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Could not read config at {0}: {1}")]
    ConfigNotFound(PathBuf, std::io::Error),

    #[error("Invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Missing config setting: {0}")]
    MissingSetting(&'static str),

    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("Failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("Store error: {0}")]
    Storage(#[from] StorageError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Start the daemon
pub async fn startup(config: &Config) -> Result<DaemonState, LifecycleError> {
    match startup_inner(config).await {
        Ok(state) => Ok(state),
        Err(LifecycleError::LockFailed(e)) => Err(LifecycleError::LockFailed(e)),
        Err(e) => {
            // Clean up any resources created before failure
            cleanup_on_failure(config);
            Err(e)
        }
    }
}

/// Inner startup logic - cleanup_on_failure called if this fails
async fn startup_inner(config: &Config) -> Result<DaemonState, LifecycleError> {
    // 1. Create state directory
    std::fs::create_dir_all(&config.state_dir)?;
    if let Some(parent) = config.lock_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // 2. Acquire lock file FIRST - prevents two daemons driving the same SIMs
    // Open without truncating so a losing attempt leaves the holder's PID intact
    let lock_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&config.lock_path)?;
    lock_file
        .try_lock_exclusive()
        .map_err(LifecycleError::LockFailed)?;

    use std::io::Write;
    lock_file.set_len(0)?;
    let mut lock_file = lock_file;
    writeln!(lock_file, "{}", std::process::id())?;
    let lock_file = lock_file;

    // 3. Open the rule and resource store
    let store = JsonStore::open(&config.store_path)?;
    info!(
        rules = store.load_rule_records()?.len(),
        resources = store.list_resources()?.len(),
        "Loaded store from {}",
        config.store_path.display()
    );

    // 4. Pick the activation provider once from the platform's capabilities
    let caps = CommandActivator::probe(config.probe_command.as_deref()).await;
    let provider = SubscriptionProvider::select(
        caps,
        CommandActivator::new(&config.activate_command),
        CommandActivator::new(&config.activate_command),
    );
    info!(modern = provider.is_modern(), "Selected activation provider");

    // 5. Set up adapters (wrapped with tracing for observability)
    let (wake_tx, wakes) = mpsc::channel(8);
    let sim_status = TracedSimStatusAdapter::new(CommandSimStatus::new(
        &config.sim_status_command,
        &config.sim_supply_command,
    ));
    let status_signal = sim_status.status_signal();
    let adapters = AdapterSet {
        store: JsonStoreAdapter::new(store.clone()),
        activation: TracedActivationAdapter::new(provider),
        call_state: CommandCallState::new(&config.call_state_command),
        secrets: CommandSecretStore::new(
            &config.secret_list_command,
            &config.secret_get_command,
            store,
        ),
        timer: TracedTimerAdapter::new(TokioTimer::new(SystemClock, wake_tx)),
        sim_status,
        notify: LogNotifyAdapter::new(),
    };

    // 6. Create engine and start logging its events
    let engine = Engine::new(adapters, SystemClock, config.engine.clone());
    let (_, events) = engine.bus().subscribe_all();
    let event_log = tokio::spawn(log_events(events));

    info!("Daemon started in {}", config.state_dir.display());

    Ok(DaemonState {
        config: config.clone(),
        lock_file,
        engine,
        wakes,
        status_signal,
        event_log,
        start_time: Instant::now(),
    })
}

/// Clean up resources on startup failure
fn cleanup_on_failure(config: &Config) {
    // Remove PID/lock file; only reached once we held the lock
    if config.lock_path.exists() {
        let _ = std::fs::remove_file(&config.lock_path);
    }
}

async fn log_events(mut events: EventReceiver) {
    while let Some(event) = events.recv().await {
        log_event(&event);
    }
}

fn log_event(event: &Event) {
    match event {
        Event::ActivationFailed { resource_id, reason, .. } => {
            warn!(%resource_id, %reason, "activation failed");
        }
        Event::PinFailed { resource_id, attempts } => {
            warn!(%resource_id, attempts, "PIN delivery gave up");
        }
        _ => match event.resource_id() {
            Some(resource_id) => info!(event = event.name(), %resource_id),
            None => info!(event = event.name()),
        },
    }
}

fn log_report(trigger: &str, report: &SyncReport) {
    info!(
        trigger,
        resources = report.outcomes.len(),
        enabled = report.enabled().len(),
        deferred = report.deferred().len(),
        "reconciled"
    );
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
