use thiserror::Error;

use crate::dedup_store::ProcessedSet;

#[derive(Debug, Clone, Error)]
pub enum PersistenceError {
    #[error("I/O error on the processed order store. {0}")]
    Io(String),
    #[error("The processed order store is corrupt. {0}")]
    Corrupt(String),
}

impl From<std::io::Error> for PersistenceError {
    fn from(e: std::io::Error) -> Self {
        PersistenceError::Io(e.to_string())
    }
}

/// Durable storage for the processed order set.
///
/// `save` must replace the previous state as a whole, so that the last successful save wins if the process is killed
/// part-way through a write.
pub trait ProcessedStore: Send + Sync + 'static {
    /// Loads the persisted set. Absence of any prior state is not an error and yields an empty set.
    fn load(&self) -> Result<ProcessedSet, PersistenceError>;
    fn save(&self, processed: &ProcessedSet) -> Result<(), PersistenceError>;
}
