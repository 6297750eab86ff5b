//! # Seams between the relay and the outside world
//!
//! The polling worker never talks to HTTP or the filesystem directly. Instead it is generic over three traits:
//!
//! * [`OrderSource`] lists order summaries and fetches full order records from the order-management API.
//! * [`ReplicaStore`] creates replica documents in the destination store.
//! * [`ProcessedStore`] persists the set of order ids that will never be reconsidered.
//!
//! [`vtex_tools::VtexApi`] implements the first two (see [`crate::vtex`]), and
//! [`JsonFileStore`](crate::dedup_store::JsonFileStore) implements the last.
mod order_source;
mod processed_store;
mod replica_store;

pub use order_source::{OrderSource, OrderSourceError};
pub use processed_store::{PersistenceError, ProcessedStore};
pub use replica_store::{ReplicaStore, ReplicationError};
