//! Request handler definitions
//!
//! Define each route and its handler here. Handlers must not block the worker thread: everything the relay worker
//! exposes to these handlers is either non-blocking or async.
use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use order_relay_engine::{OrderSource, ProcessedStore, RelayWorker, ReplicaStore, WorkerStatus};

use crate::{
    data_objects::{JsonResponse, LogsResponse, StatusResponse},
    errors::ServerError,
    log_buffer::LogBuffer,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

#[get("/logs")]
pub async fn logs(buffer: web::Data<LogBuffer>) -> impl Responder {
    trace!("💻️ GET logs");
    HttpResponse::Ok().json(LogsResponse { lines: buffer.lines() })
}

//----------------------------------------------   Relay control  ----------------------------------------------------

route!(status => Get "/status" impl OrderSource, ReplicaStore, ProcessedStore);
/// Route handler for the status endpoint
///
/// Reports whether the relay is polling, how many orders it has handled (across restarts) and what it is polling for.
pub async fn status<S: OrderSource, R: ReplicaStore, P: ProcessedStore>(
    worker: web::Data<RelayWorker<S, R, P>>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET status");
    let settings = worker.settings();
    let state = worker.status();
    let message = match &state {
        WorkerStatus::Active => {
            format!("Relay active. Checking for new orders every {} seconds.", settings.poll_interval.as_secs())
        },
        WorkerStatus::Inactive => "Relay inactive.".to_string(),
        WorkerStatus::ConfigurationError(reason) => format!("Configuration error: {reason}"),
    };
    let response = StatusResponse {
        status: state.label().to_string(),
        message,
        processed_count: worker.processed_count(),
        order_status: settings.order_status.clone(),
        target_sales_channel: settings.target_sales_channel.clone(),
        poll_interval_seconds: settings.poll_interval.as_secs(),
        last_round: worker.last_round(),
    };
    Ok(HttpResponse::Ok().json(response))
}

route!(start => Post "/start" impl OrderSource, ReplicaStore, ProcessedStore);
/// Route handler for the start endpoint
///
/// Starts the polling loop. The log buffer is cleared first, so `/logs` only ever shows the current session.
/// Returns 409 if the relay is already running, and 503 if it can never run with the current configuration.
pub async fn start<S: OrderSource, R: ReplicaStore, P: ProcessedStore>(
    worker: web::Data<RelayWorker<S, R, P>>,
    buffer: web::Data<LogBuffer>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ POST start");
    if worker.status() == WorkerStatus::Inactive {
        buffer.clear();
    }
    worker.start()?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Relay started")))
}

route!(stop => Post "/stop" impl OrderSource, ReplicaStore, ProcessedStore);
/// Route handler for the stop endpoint
///
/// Asks the polling loop to stop. The order being handled (if any) is finished first. Returns 409 if the relay is not
/// running.
pub async fn stop<S: OrderSource, R: ReplicaStore, P: ProcessedStore>(
    worker: web::Data<RelayWorker<S, R, P>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ POST stop");
    worker.stop()?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Relay is stopping")))
}
