use std::{sync::Arc, time::Duration};

use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use log::debug;
use order_relay_engine::{
    test_utils::{FakeOrderSource, FakeReplicaStore, MemoryProcessedStore},
    RelaySettings,
    RelayWorker,
};

use crate::{log_buffer::LogBuffer, server::relay_routes};

pub type FakeWorker = RelayWorker<FakeOrderSource, FakeReplicaStore, MemoryProcessedStore>;

pub struct TestRelay {
    pub source: FakeOrderSource,
    pub replicas: FakeReplicaStore,
    pub store: MemoryProcessedStore,
    pub buffer: LogBuffer,
    pub worker: web::Data<FakeWorker>,
}

impl TestRelay {
    /// Must be called from inside the test runtime, so that the worker can start its loop on it.
    pub fn new(source: FakeOrderSource, store: MemoryProcessedStore) -> Self {
        let replicas = FakeReplicaStore::default();
        let buffer = LogBuffer::default();
        let settings = RelaySettings::default()
            .with_poll_interval(Duration::from_secs(3600))
            .with_recovery_interval(Duration::from_secs(3600));
        let worker = RelayWorker::new(
            source.clone(),
            replicas.clone(),
            store.clone(),
            settings,
            Arc::new(buffer.clone()),
        );
        Self { source, replicas, store, buffer, worker: web::Data::new(worker) }
    }

    pub async fn request(&self, req: TestRequest) -> (StatusCode, String) {
        let app = App::new()
            .app_data(self.worker.clone())
            .app_data(web::Data::new(self.buffer.clone()))
            .configure(relay_routes::<FakeOrderSource, FakeReplicaStore, MemoryProcessedStore>);
        let service = test::init_service(app).await;
        debug!("Making request");
        let res = test::call_service(&service, req.to_request()).await;
        let status = res.status();
        let body = String::from_utf8_lossy(&test::read_body(res).await).into_owned();
        (status, body)
    }

    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        self.request(TestRequest::get().uri(path)).await
    }

    pub async fn post(&self, path: &str) -> (StatusCode, String) {
        self.request(TestRequest::post().uri(path)).await
    }
}

pub async fn eventually<F: Fn() -> bool>(condition: F) {
    for _ in 0..500 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("Condition was not met in time");
}
