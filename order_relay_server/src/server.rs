use std::{sync::Arc, time::Duration};

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use order_relay_engine::{JsonFileStore, OrderSource, ProcessedStore, RelayWorker, ReplicaStore};
use vtex_tools::VtexApi;

use crate::{
    config::RelayConfig,
    errors::ServerError,
    log_buffer::LogBuffer,
    routes::{health, logs, StartRoute, StatusRoute, StopRoute},
};

pub type VtexRelayWorker = RelayWorker<VtexApi, VtexApi, JsonFileStore>;

pub async fn run_server(config: RelayConfig) -> Result<(), ServerError> {
    let buffer = LogBuffer::default();
    let worker = web::Data::new(create_worker(&config, buffer.clone())?);
    if config.autostart {
        match worker.start() {
            Ok(()) => info!("🚀️ Relay started automatically"),
            Err(e) => warn!("🚀️ The relay was not started automatically. {e}"),
        }
    } else {
        info!("🚀️ RELAY_AUTOSTART is off. POST /start to begin polling.");
    }
    let srv = create_server_instance(&config, worker.clone(), buffer)?;
    let result = srv.await.map_err(|e| ServerError::Unspecified(e.to_string()));
    info!("🚀️ Server stopped. Waiting for the relay to save its state.");
    worker.shutdown().await;
    result
}

/// Builds the relay worker against the VTEX APIs. A missing credential does not fail here: the worker is created in its
/// configuration error state, so that the control server can still report the problem.
pub fn create_worker(config: &RelayConfig, buffer: LogBuffer) -> Result<VtexRelayWorker, ServerError> {
    let api = VtexApi::new(config.vtex.clone())?;
    let store = JsonFileStore::new(config.processed_file.clone());
    info!("🚀️ Processed orders are kept in {}", store.path().display());
    Ok(RelayWorker::new(api.clone(), api, store, config.relay_settings(), Arc::new(buffer)))
}

/// Registers the relay routes for a worker with the given seams.
pub fn relay_routes<S, R, P>(cfg: &mut web::ServiceConfig)
where
    S: OrderSource,
    R: ReplicaStore,
    P: ProcessedStore,
{
    cfg.service(health)
        .service(logs)
        .service(StatusRoute::<S, R, P>::new())
        .service(StartRoute::<S, R, P>::new())
        .service(StopRoute::<S, R, P>::new());
}

pub fn create_server_instance<S, R, P>(
    config: &RelayConfig,
    worker: web::Data<RelayWorker<S, R, P>>,
    buffer: LogBuffer,
) -> Result<Server, ServerError>
where
    S: OrderSource,
    R: ReplicaStore,
    P: ProcessedStore,
{
    let buffer = web::Data::new(buffer);
    let srv = HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("order_relay::access_log"))
            .app_data(worker.clone())
            .app_data(buffer.clone())
            .configure(relay_routes::<S, R, P>)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
