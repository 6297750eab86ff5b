//! The polling worker.
//!
//! A [`RelayWorker`] owns the processed order set and drives the relay loop on a background task:
//! ```text
//! while running {
//!     1. List page 1 of the order summaries in the configured status
//!     2. For each summary with an unseen order id (checking for a stop request before each one):
//!        fetch detail -> filter by sales channel -> create replica -> mark processed
//!     3. Persist the processed set
//!     4. Sleep for the polling interval (or the recovery interval if the round failed)
//! }
//! ```
//!
//! Only successful writes and permanent skips mark an order as processed. A failed write leaves the order to be retried
//! next round. A bug while handling a single order (an error the relay can't classify, or a panic) marks the order as
//! processed anyway, so that one poison order can't stall every round.
//!
//! The running flag is a `watch` channel. The loop checks it at the top of each round and before each order, and the
//! sleeps between rounds wake up as soon as it changes, so a stop request never waits out a full polling interval.
use std::{
    any::Any,
    panic::AssertUnwindSafe,
    sync::{
        atomic::{AtomicU64, AtomicUsize, Ordering},
        Arc,
        Mutex as StdMutex,
    },
    time::Duration,
};

use futures_util::FutureExt;
use serde::{Deserialize, Serialize};
use tokio::{
    runtime::Handle,
    sync::{watch, Mutex},
    task::JoinHandle,
};
use vtex_tools::OrderSummary;

use crate::{
    channel_filter::ChannelFilter,
    dedup_store::{load_or_default, save_or_log, ProcessedSet},
    errors::{RelayError, WorkerError},
    fetchers::{fetch_detail, list_summaries},
    replication::write_replica,
    reporter::{LogLevel, RelayReporter},
    settings::RelaySettings,
    traits::{OrderSource, ProcessedStore, ReplicaStore},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerStatus {
    Active,
    Inactive,
    /// The worker can never run with the current configuration.
    ConfigurationError(String),
}

impl WorkerStatus {
    pub fn label(&self) -> &'static str {
        match self {
            WorkerStatus::Active => "active",
            WorkerStatus::Inactive => "inactive",
            WorkerStatus::ConfigurationError(_) => "configuration_error",
        }
    }
}

/// What happened to a single order summary during a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOutcome {
    Replicated,
    AlreadyProcessed,
    MissingOrderId,
    DetailUnavailable,
    ChannelMismatch,
    WriteFailed,
    FailedClosed,
}

impl ItemOutcome {
    /// True if the order must never be considered again.
    pub fn marks_processed(&self) -> bool {
        matches!(self, Self::Replicated | Self::DetailUnavailable | Self::ChannelMismatch | Self::FailedClosed)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub listed: usize,
    pub replicated: usize,
    pub already_processed: usize,
    pub skipped: usize,
    pub missing_order_id: usize,
    pub write_failures: usize,
    pub failed_closed: usize,
    /// True if a stop request cut the round short.
    pub interrupted: bool,
}

impl RoundSummary {
    fn record(&mut self, outcome: ItemOutcome) {
        match outcome {
            ItemOutcome::Replicated => self.replicated += 1,
            ItemOutcome::AlreadyProcessed => self.already_processed += 1,
            ItemOutcome::MissingOrderId => self.missing_order_id += 1,
            ItemOutcome::DetailUnavailable | ItemOutcome::ChannelMismatch => self.skipped += 1,
            ItemOutcome::WriteFailed => self.write_failures += 1,
            ItemOutcome::FailedClosed => self.failed_closed += 1,
        }
    }
}

pub struct RelayWorker<S, R, P> {
    core: Arc<WorkerCore<S, R, P>>,
    runtime: Option<Handle>,
    handle: StdMutex<Option<JoinHandle<()>>>,
}

struct WorkerCore<S, R, P> {
    source: S,
    replicas: R,
    store: P,
    settings: RelaySettings,
    filter: ChannelFilter,
    reporter: Arc<dyn RelayReporter>,
    /// `Some(epoch)` while running. Every start gets a fresh epoch, so a loop that is still winding down from an
    /// earlier stop can tell that the flag no longer belongs to it.
    run_flag: watch::Sender<Option<u64>>,
    epochs: AtomicU64,
    /// Held by the loop for as long as it runs.
    processed: Mutex<ProcessedSet>,
    processed_count: AtomicUsize,
    last_round: StdMutex<Option<RoundSummary>>,
    configuration_error: Option<String>,
}

impl<S, R, P> RelayWorker<S, R, P>
where
    S: OrderSource,
    R: ReplicaStore,
    P: ProcessedStore,
{
    /// Creates a stopped worker and loads the processed set from `store`.
    ///
    /// If the source or the replica store reports a configuration problem, it is logged once at CRITICAL level and the
    /// worker will refuse to start for the rest of its life.
    ///
    /// When called from inside a Tokio runtime, that runtime is used for the worker loop. Otherwise, the runtime that is
    /// current when [`Self::start`] is called is used.
    pub fn new(source: S, replicas: R, store: P, settings: RelaySettings, reporter: Arc<dyn RelayReporter>) -> Self {
        let configuration_error = source.check_configuration().and_then(|()| replicas.check_configuration()).err();
        if let Some(reason) = &configuration_error {
            reporter.log(
                LogLevel::Critical,
                &format!("⛔️ Configuration error: {reason}. The relay will not run until this is fixed."),
            );
        }
        let processed = load_or_default(&store, reporter.as_ref());
        let processed_count = AtomicUsize::new(processed.len());
        reporter.processed_count_changed(processed.len());
        let (run_flag, _) = watch::channel(None);
        let core = WorkerCore {
            source,
            replicas,
            store,
            filter: ChannelFilter::new(settings.target_sales_channel.clone()),
            settings,
            reporter,
            run_flag,
            epochs: AtomicU64::new(0),
            processed: Mutex::new(processed),
            processed_count,
            last_round: StdMutex::new(None),
            configuration_error,
        };
        Self { core: Arc::new(core), runtime: Handle::try_current().ok(), handle: StdMutex::new(None) }
    }

    pub fn settings(&self) -> &RelaySettings {
        &self.core.settings
    }

    pub fn status(&self) -> WorkerStatus {
        if let Some(reason) = &self.core.configuration_error {
            WorkerStatus::ConfigurationError(reason.clone())
        } else if self.core.run_flag.borrow().is_some() {
            WorkerStatus::Active
        } else {
            WorkerStatus::Inactive
        }
    }

    /// Number of orders in the processed set, including those loaded from earlier sessions.
    pub fn processed_count(&self) -> usize {
        self.core.processed_count.load(Ordering::SeqCst)
    }

    /// The summary of the most recent round that ran to completion or was cut short by a stop request. Rounds that
    /// failed outright are not recorded.
    pub fn last_round(&self) -> Option<RoundSummary> {
        self.core.last_round.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Starts the relay loop on a background task.
    pub fn start(&self) -> Result<(), WorkerError> {
        if let Some(reason) = &self.core.configuration_error {
            return Err(WorkerError::Misconfigured(reason.clone()));
        }
        let runtime = self.runtime.clone().or_else(|| Handle::try_current().ok()).ok_or(WorkerError::NoRuntime)?;
        let epoch = self.core.epochs.fetch_add(1, Ordering::SeqCst) + 1;
        let mut already_running = false;
        self.core.run_flag.send_if_modified(|flag| {
            if flag.is_some() {
                already_running = true;
                false
            } else {
                *flag = Some(epoch);
                true
            }
        });
        if already_running {
            self.core.report(LogLevel::Warning, "Relay is already active.");
            return Err(WorkerError::AlreadyRunning);
        }
        self.core.report(LogLevel::Info, "▶️ Relay started");
        let core = Arc::clone(&self.core);
        let handle = runtime.spawn(async move { core.run(epoch).await });
        *self.handle.lock().unwrap_or_else(|e| e.into_inner()) = Some(handle);
        Ok(())
    }

    /// Asks the relay loop to stop. The order currently being handled is finished first; a sleep is cut short.
    pub fn stop(&self) -> Result<(), WorkerError> {
        if self.core.run_flag.send_replace(None).is_none() {
            self.core.report(LogLevel::Warning, "Relay is already inactive.");
            return Err(WorkerError::NotRunning);
        }
        self.core.report(LogLevel::Warning, "⏹️ Relay is stopping. Please wait.");
        Ok(())
    }

    /// Stops the relay loop (if it is running) and waits for it to persist the processed set and exit.
    pub async fn shutdown(&self) {
        if self.core.run_flag.send_replace(None).is_some() {
            self.core.report(LogLevel::Info, "⏹️ Relay is shutting down");
        }
        let handle = self.handle.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                self.core.report(LogLevel::Error, &format!("The relay loop did not exit cleanly. {e}"));
            }
        }
    }

    /// Runs a single polling round in the foreground and persists the result. No stop checks are made.
    ///
    /// Fails with [`WorkerError::AlreadyRunning`] if the background loop is active.
    pub async fn poll_once(&self) -> Result<RoundSummary, WorkerError> {
        if let Some(reason) = &self.core.configuration_error {
            return Err(WorkerError::Misconfigured(reason.clone()));
        }
        let mut processed = self.core.processed.try_lock().map_err(|_| WorkerError::AlreadyRunning)?;
        let result = self.core.run_round(&mut processed, None).await;
        self.core.persist(&processed).await;
        let summary = result.map_err(WorkerError::Round)?;
        self.core.record_round(&summary);
        Ok(summary)
    }
}

impl<S, R, P> WorkerCore<S, R, P>
where
    S: OrderSource,
    R: ReplicaStore,
    P: ProcessedStore,
{
    fn report(&self, level: LogLevel, message: &str) {
        self.reporter.log(level, message);
    }

    fn is_current(&self, epoch: u64) -> bool {
        *self.run_flag.borrow() == Some(epoch)
    }

    fn should_continue(&self, epoch: Option<u64>) -> bool {
        epoch.map_or(true, |e| self.is_current(e))
    }

    fn record_round(&self, summary: &RoundSummary) {
        *self.last_round.lock().unwrap_or_else(|e| e.into_inner()) = Some(summary.clone());
    }

    /// Saves a snapshot of the processed set on the blocking thread pool.
    async fn persist(self: &Arc<Self>, processed: &ProcessedSet) {
        let core = Arc::clone(self);
        let snapshot = processed.clone();
        let saved =
            tokio::task::spawn_blocking(move || save_or_log(&core.store, &snapshot, core.reporter.as_ref())).await;
        if let Err(e) = saved {
            self.report(LogLevel::Error, &format!("💾️ Could not save processed orders. {e}"));
        }
    }

    async fn run(self: Arc<Self>, epoch: u64) {
        let mut flag = self.run_flag.subscribe();
        // Waits here until a loop from a previous start has saved its state and exited.
        let mut processed = self.processed.lock().await;
        while self.is_current(epoch) {
            let round = AssertUnwindSafe(self.run_round(&mut processed, Some(epoch))).catch_unwind().await;
            let pause = match round {
                Ok(Ok(summary)) => {
                    self.persist(&processed).await;
                    self.record_round(&summary);
                    self.report(
                        LogLevel::Info,
                        &format!(
                            "🔁️ Round complete: {} replicated, {} skipped, {} failed. Next check in {}.",
                            summary.replicated,
                            summary.skipped,
                            summary.write_failures + summary.failed_closed,
                            describe(self.settings.poll_interval)
                        ),
                    );
                    self.settings.poll_interval
                },
                Ok(Err(e)) => {
                    self.report(LogLevel::Error, &format!("🔁️ Polling round failed. {e}"));
                    self.persist(&processed).await;
                    self.settings.recovery_interval
                },
                Err(panic) => {
                    let message = panic_message(panic.as_ref());
                    self.report(LogLevel::Critical, &format!("🔁️ Unexpected failure in the polling round. {message}"));
                    self.persist(&processed).await;
                    self.settings.recovery_interval
                },
            };
            if !self.is_current(epoch) {
                break;
            }
            self.pause(&mut flag, epoch, pause).await;
        }
        self.persist(&processed).await;
        self.report(LogLevel::Info, "⏹️ Relay stopped");
    }

    /// Sleeps for `period`, or until the run flag no longer carries `epoch`.
    async fn pause(&self, flag: &mut watch::Receiver<Option<u64>>, epoch: u64, period: Duration) {
        let stopped = async {
            while self.is_current(epoch) {
                if flag.changed().await.is_err() {
                    break;
                }
            }
        };
        tokio::select! {
            _ = tokio::time::sleep(period) => {},
            _ = stopped => {},
        }
    }

    async fn run_round(&self, processed: &mut ProcessedSet, epoch: Option<u64>) -> Result<RoundSummary, RelayError> {
        let settings = &self.settings;
        self.report(
            LogLevel::Info,
            &format!("🔁️ Starting polling round. {} orders already processed.", processed.len()),
        );
        let summaries =
            list_summaries(&self.source, &settings.order_status, settings.page, self.reporter.as_ref()).await?;
        let mut round = RoundSummary { listed: summaries.len(), ..Default::default() };
        if summaries.is_empty() {
            self.report(LogLevel::Warning, "🔁️ No orders were found, or the order list could not be fetched.");
            return Ok(round);
        }
        self.report(LogLevel::Info, &format!("🔁️ Found {} orders", summaries.len()));
        for summary in &summaries {
            if !self.should_continue(epoch) {
                self.report(LogLevel::Warning, "🔁️ Relay stopped. Abandoning the rest of this round.");
                round.interrupted = true;
                break;
            }
            let outcome = self.process_summary(summary, processed).await;
            round.record(outcome);
        }
        Ok(round)
    }

    async fn process_summary(&self, summary: &OrderSummary, processed: &mut ProcessedSet) -> ItemOutcome {
        let Some(order_id) = summary.id() else {
            self.report(LogLevel::Warning, &format!("📦️ Found an order summary without an orderId: {summary:?}"));
            return ItemOutcome::MissingOrderId;
        };
        if processed.contains(order_id) {
            self.report(LogLevel::Debug, &format!("📦️ Order {order_id} was processed before. Skipping."));
            return ItemOutcome::AlreadyProcessed;
        }
        self.report(LogLevel::Info, &format!("📦️ New order: {order_id}"));
        let outcome = match AssertUnwindSafe(self.handle_order(order_id)).catch_unwind().await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => {
                self.report(
                    LogLevel::Critical,
                    &format!("📦️ Unexpected error while processing order {order_id}. {e}. It will not be retried."),
                );
                ItemOutcome::FailedClosed
            },
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                self.report(
                    LogLevel::Critical,
                    &format!("📦️ Unexpected failure while processing order {order_id}. {message}. It will not be retried."),
                );
                ItemOutcome::FailedClosed
            },
        };
        if outcome.marks_processed() && processed.insert(order_id) {
            self.processed_count.store(processed.len(), Ordering::SeqCst);
            self.reporter.processed_count_changed(processed.len());
        }
        outcome
    }

    async fn handle_order(&self, order_id: &str) -> Result<ItemOutcome, RelayError> {
        let reporter = self.reporter.as_ref();
        let Some(detail) = fetch_detail(&self.source, order_id, reporter).await else {
            self.report(LogLevel::Warning, &format!("📦️ Could not get the details of order {order_id}. Skipping."));
            return Ok(ItemOutcome::DetailUnavailable);
        };
        let channel = detail.sales_channel_label();
        let target = self.filter.target();
        if !self.filter.matches(&detail) {
            self.report(
                LogLevel::Info,
                &format!("📦️ Order {order_id} (sales channel '{channel}') is not in sales channel '{target}'. Skipping."),
            );
            return Ok(ItemOutcome::ChannelMismatch);
        }
        self.report(LogLevel::Info, &format!("📦️ Order {order_id} is in sales channel '{target}'"));
        if write_replica(&self.replicas, &detail, reporter).await? {
            self.report(LogLevel::Info, &format!("📦️ Order {order_id} replicated and marked as processed"));
            Ok(ItemOutcome::Replicated)
        } else {
            self.report(LogLevel::Error, &format!("📦️ Order {order_id} was not replicated. It will be retried."));
            Ok(ItemOutcome::WriteFailed)
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

fn describe(period: Duration) -> String {
    let secs = period.as_secs();
    if secs >= 60 {
        format!("{} minutes", secs / 60)
    } else {
        format!("{secs} seconds")
    }
}
