//! Order Relay Engine
//!
//! The relay polls an order-management API for orders in a given status, fetches the full record of every order it has
//! not seen before, keeps the ones that belong to the configured sales channel, and creates a copy of each of those in a
//! separate document store. Every order is written at most once across restarts: the set of handled order ids is
//! persisted after every polling round.
//!
//! The library is organised around three seams, defined in [`mod@traits`]:
//! 1. [`OrderSource`], where orders come from. [`vtex_tools::VtexApi`] implements it for the VTEX OMS API.
//! 2. [`ReplicaStore`], where the copies go. [`vtex_tools::VtexApi`] implements it for VTEX Master Data.
//! 3. [`ProcessedStore`], where the processed set is kept between runs. [`JsonFileStore`] is the default.
//!
//! Operator-facing messages are sent to an injected [`RelayReporter`]. [`LogReporter`] forwards them to the `log`
//! facade.
//!
//! [`RelayWorker`] ties it all together and runs the polling loop on a background task.
pub mod channel_filter;
pub mod dedup_store;
pub mod errors;
pub mod fetchers;
pub mod replication;
pub mod reporter;
pub mod settings;
pub mod traits;
mod vtex;
pub mod worker;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use channel_filter::ChannelFilter;
pub use dedup_store::{JsonFileStore, ProcessedSet};
pub use errors::{RelayError, WorkerError};
pub use replication::ReplicaDocument;
pub use reporter::{LogLevel, LogReporter, RelayReporter};
pub use settings::RelaySettings;
pub use traits::{
    OrderSource,
    OrderSourceError,
    PersistenceError,
    ProcessedStore,
    ReplicaStore,
    ReplicationError,
};
pub use worker::{ItemOutcome, RelayWorker, RoundSummary, WorkerStatus};
