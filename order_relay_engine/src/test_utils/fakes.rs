use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex, MutexGuard},
};

use tokio::sync::Notify;
use vtex_tools::{OrderDetail, OrderSummary};

use crate::{
    dedup_store::ProcessedSet,
    replication::ReplicaDocument,
    reporter::{LogLevel, LogReporter, RelayReporter},
    traits::{OrderSource, OrderSourceError, PersistenceError, ProcessedStore, ReplicaStore, ReplicationError},
};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

//-------------------------------------------------  FakeOrderSource  --------------------------------------------------
#[derive(Default)]
struct SourceState {
    summaries: Vec<OrderSummary>,
    details: HashMap<String, OrderDetail>,
    listing_error: Option<OrderSourceError>,
    panic_on_listing: bool,
    panic_on_fetch: HashSet<String>,
    held_fetches: HashMap<String, Arc<Notify>>,
    list_requests: Vec<(String, u32, u32)>,
    detail_requests: Vec<String>,
    configuration_error: Option<String>,
}

#[derive(Clone, Default)]
pub struct FakeOrderSource {
    state: Arc<Mutex<SourceState>>,
}

impl FakeOrderSource {
    /// Lists every given order, in order, and serves its detail.
    pub fn with_orders(orders: Vec<OrderDetail>) -> Self {
        let source = Self::default();
        for order in orders {
            source.add_order(order);
        }
        source
    }

    pub fn add_order(&self, detail: OrderDetail) {
        let id = detail.order_id.clone().unwrap_or_default();
        let mut state = lock(&self.state);
        state.summaries.push(OrderSummary::new(id.clone()));
        state.details.insert(id, detail);
    }

    /// Lists a summary without serving any detail for it.
    pub fn add_summary(&self, summary: OrderSummary) {
        lock(&self.state).summaries.push(summary);
    }

    /// Serves `detail` when `order_id` is fetched, whatever id the detail itself carries.
    pub fn set_detail(&self, order_id: &str, detail: OrderDetail) {
        lock(&self.state).details.insert(order_id.to_string(), detail);
    }

    pub fn remove_detail(&self, order_id: &str) {
        lock(&self.state).details.remove(order_id);
    }

    pub fn fail_listing(&self, error: OrderSourceError) {
        lock(&self.state).listing_error = Some(error);
    }

    pub fn panic_on_listing(&self, panic: bool) {
        lock(&self.state).panic_on_listing = panic;
    }

    pub fn panic_on_fetch(&self, order_id: &str) {
        lock(&self.state).panic_on_fetch.insert(order_id.to_string());
    }

    /// The next fetch of `order_id` waits until the returned gate is notified.
    pub fn hold_fetch(&self, order_id: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        lock(&self.state).held_fetches.insert(order_id.to_string(), Arc::clone(&gate));
        gate
    }

    pub fn misconfigure(&self, reason: &str) {
        lock(&self.state).configuration_error = Some(reason.to_string());
    }

    pub fn list_requests(&self) -> Vec<(String, u32, u32)> {
        lock(&self.state).list_requests.clone()
    }

    pub fn detail_requests(&self) -> Vec<String> {
        lock(&self.state).detail_requests.clone()
    }
}

impl OrderSource for FakeOrderSource {
    async fn list_orders(&self, status: &str, page: u32, per_page: u32) -> Result<Vec<OrderSummary>, OrderSourceError> {
        let (result, explode) = {
            let mut state = lock(&self.state);
            state.list_requests.push((status.to_string(), page, per_page));
            let result = match &state.listing_error {
                Some(e) => Err(e.clone()),
                None => Ok(state.summaries.clone()),
            };
            (result, state.panic_on_listing)
        };
        if explode {
            panic!("Simulated bug while listing orders");
        }
        result
    }

    async fn fetch_order(&self, order_id: &str) -> Result<OrderDetail, OrderSourceError> {
        let (result, explode, gate) = {
            let mut state = lock(&self.state);
            state.detail_requests.push(order_id.to_string());
            let result = state.details.get(order_id).cloned().ok_or_else(|| OrderSourceError::Http {
                status: 404,
                body: format!("Order {order_id} not found"),
            });
            (result, state.panic_on_fetch.contains(order_id), state.held_fetches.remove(order_id))
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if explode {
            panic!("Simulated bug while fetching order {order_id}");
        }
        result
    }

    fn check_configuration(&self) -> Result<(), String> {
        match &lock(&self.state).configuration_error {
            Some(reason) => Err(reason.clone()),
            None => Ok(()),
        }
    }
}

//-------------------------------------------------  FakeReplicaStore  -------------------------------------------------
#[derive(Default)]
struct StoreState {
    created: Vec<ReplicaDocument>,
    failure: Option<ReplicationError>,
    attempts: usize,
}

#[derive(Clone, Default)]
pub struct FakeReplicaStore {
    state: Arc<Mutex<StoreState>>,
}

impl FakeReplicaStore {
    /// Every subsequent write fails with `error`, until [`Self::succeed`] is called.
    pub fn fail_with(&self, error: ReplicationError) {
        lock(&self.state).failure = Some(error);
    }

    pub fn succeed(&self) {
        lock(&self.state).failure = None;
    }

    pub fn created_ids(&self) -> Vec<String> {
        lock(&self.state).created.iter().map(|d| d.order_id.clone()).collect()
    }

    /// Number of create calls, successful or not.
    pub fn attempts(&self) -> usize {
        lock(&self.state).attempts
    }
}

impl ReplicaStore for FakeReplicaStore {
    async fn create_document(&self, document: &ReplicaDocument) -> Result<(), ReplicationError> {
        let mut state = lock(&self.state);
        state.attempts += 1;
        match &state.failure {
            Some(e) => Err(e.clone()),
            None => {
                state.created.push(document.clone());
                Ok(())
            },
        }
    }
}

//-----------------------------------------------  MemoryProcessedStore  -----------------------------------------------
#[derive(Default)]
struct MemoryState {
    saved: Option<ProcessedSet>,
    save_count: usize,
    load_error: Option<PersistenceError>,
}

#[derive(Clone, Default)]
pub struct MemoryProcessedStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryProcessedStore {
    pub fn with_ids(ids: &[&str]) -> Self {
        let store = Self::default();
        lock(&store.state).saved = Some(ids.iter().copied().collect());
        store
    }

    pub fn corrupted() -> Self {
        let store = Self::default();
        lock(&store.state).load_error = Some(PersistenceError::Corrupt("not a JSON array".to_string()));
        store
    }

    /// The last saved set, or an empty one.
    pub fn saved(&self) -> ProcessedSet {
        lock(&self.state).saved.clone().unwrap_or_default()
    }

    pub fn save_count(&self) -> usize {
        lock(&self.state).save_count
    }
}

impl ProcessedStore for MemoryProcessedStore {
    fn load(&self) -> Result<ProcessedSet, PersistenceError> {
        let state = lock(&self.state);
        match &state.load_error {
            Some(e) => Err(e.clone()),
            None => Ok(state.saved.clone().unwrap_or_default()),
        }
    }

    fn save(&self, processed: &ProcessedSet) -> Result<(), PersistenceError> {
        let mut state = lock(&self.state);
        state.save_count += 1;
        state.saved = Some(processed.clone());
        state.load_error = None;
        Ok(())
    }
}

//-------------------------------------------------  RecordingReporter  ------------------------------------------------
#[derive(Default)]
struct ReporterState {
    messages: Vec<(LogLevel, String)>,
    processed_count: Option<usize>,
}

/// Keeps every report, and also forwards it to the `log` facade so test output stays readable.
#[derive(Clone, Default)]
pub struct RecordingReporter {
    state: Arc<Mutex<ReporterState>>,
}

impl RecordingReporter {
    pub fn contains(&self, fragment: &str) -> bool {
        lock(&self.state).messages.iter().any(|(_, m)| m.contains(fragment))
    }

    pub fn count_at(&self, level: LogLevel) -> usize {
        lock(&self.state).messages.iter().filter(|(l, _)| *l == level).count()
    }

    pub fn last_processed_count(&self) -> Option<usize> {
        lock(&self.state).processed_count
    }
}

impl RelayReporter for RecordingReporter {
    fn log(&self, level: LogLevel, message: &str) {
        LogReporter.log(level, message);
        lock(&self.state).messages.push((level, message.to_string()));
    }

    fn processed_count_changed(&self, count: usize) {
        lock(&self.state).processed_count = Some(count);
    }
}
