use std::{
    collections::HashMap,
    fmt::{Debug, Formatter},
    path::PathBuf,
    sync::{Arc, Mutex},
    time::Duration,
};

use cucumber::World;
use log::*;
use order_relay_engine::{
    JsonFileStore,
    LogReporter,
    OrderSource,
    OrderSourceError,
    RelaySettings,
    RelayWorker,
    ReplicaDocument,
    ReplicaStore,
    ReplicationError,
};
use tempfile::TempDir;
use vtex_tools::{OrderDetail, OrderSummary};

pub type ScenarioWorker = RelayWorker<ScriptedSource, ScriptedStore, JsonFileStore>;

#[derive(Default, World)]
pub struct RelayWorld {
    pub source: ScriptedSource,
    pub store: ScriptedStore,
    pub target_channel: Option<String>,
    pub state_dir: Option<TempDir>,
    pub worker: Option<ScenarioWorker>,
}

impl Debug for RelayWorld {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayWorld")
            .field("state_file", &self.state_dir.as_ref().map(|d| d.path().to_path_buf()))
            .field("worker_started", &self.worker.is_some())
            .finish()
    }
}

impl RelayWorld {
    pub fn state_file(&mut self) -> PathBuf {
        let dir = self.state_dir.get_or_insert_with(|| tempfile::tempdir().expect("Could not create a temp dir"));
        dir.path().join("processed_orders.json")
    }

    /// Creates the worker on first use, loading whatever is in the state file at that point.
    pub fn worker(&mut self) -> &ScenarioWorker {
        if self.worker.is_none() {
            let path = self.state_file();
            debug!("🚀️ Creating worker with state file {}", path.display());
            let mut settings = RelaySettings::default()
                .with_poll_interval(Duration::from_secs(3600))
                .with_recovery_interval(Duration::from_secs(3600));
            if let Some(channel) = &self.target_channel {
                settings = settings.with_target_sales_channel(channel.clone());
            }
            let worker = RelayWorker::new(
                self.source.clone(),
                self.store.clone(),
                JsonFileStore::new(path),
                settings,
                Arc::new(LogReporter),
            );
            self.worker = Some(worker);
        }
        self.worker.as_ref().expect("Worker was just created")
    }
}

#[derive(Default)]
struct SourceState {
    listing: Vec<OrderSummary>,
    details: HashMap<String, OrderDetail>,
    fetched: Vec<String>,
}

/// Lists a fixed set of orders and serves whichever details have been registered.
#[derive(Clone, Default)]
pub struct ScriptedSource {
    state: Arc<Mutex<SourceState>>,
}

impl ScriptedSource {
    pub fn list(&self, summary: OrderSummary) {
        self.state.lock().unwrap().listing.push(summary);
    }

    pub fn serve(&self, detail: OrderDetail) {
        let id = detail.order_id.clone().unwrap_or_default();
        self.state.lock().unwrap().details.insert(id, detail);
    }

    pub fn fetched(&self) -> Vec<String> {
        self.state.lock().unwrap().fetched.clone()
    }
}

impl OrderSource for ScriptedSource {
    async fn list_orders(&self, _status: &str, _page: u32, _per_page: u32) -> Result<Vec<OrderSummary>, OrderSourceError> {
        Ok(self.state.lock().unwrap().listing.clone())
    }

    async fn fetch_order(&self, order_id: &str) -> Result<OrderDetail, OrderSourceError> {
        let mut state = self.state.lock().unwrap();
        state.fetched.push(order_id.to_string());
        state
            .details
            .get(order_id)
            .cloned()
            .ok_or_else(|| OrderSourceError::Http { status: 404, body: format!("Order {order_id} not found") })
    }
}

#[derive(Default)]
struct StoreState {
    rejection: Option<u16>,
    documents: Vec<ReplicaDocument>,
    attempts: usize,
}

#[derive(Clone, Default)]
pub struct ScriptedStore {
    state: Arc<Mutex<StoreState>>,
}

impl ScriptedStore {
    pub fn reject_with(&self, status: Option<u16>) {
        self.state.lock().unwrap().rejection = status;
    }

    pub fn documents(&self) -> Vec<ReplicaDocument> {
        self.state.lock().unwrap().documents.clone()
    }

    pub fn attempts(&self) -> usize {
        self.state.lock().unwrap().attempts
    }
}

impl ReplicaStore for ScriptedStore {
    async fn create_document(&self, document: &ReplicaDocument) -> Result<(), ReplicationError> {
        let mut state = self.state.lock().unwrap();
        state.attempts += 1;
        match state.rejection {
            Some(status) => Err(ReplicationError::Rejected { status, body: "Internal server error".to_string() }),
            None => {
                state.documents.push(document.clone());
                Ok(())
            },
        }
    }
}
