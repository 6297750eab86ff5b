use std::future::Future;

use thiserror::Error;

use crate::replication::ReplicaDocument;

#[derive(Debug, Clone, Error)]
pub enum ReplicationError {
    /// The store answered, but not with "created".
    #[error("Document was not created. HTTP {status}. {body}")]
    Rejected { status: u16, body: String },
    #[error("Could not reach the document store. {0}")]
    Transport(String),
    /// Anything the relay does not know how to classify. Orders that hit this are not retried.
    #[error("Unexpected replication failure. {0}")]
    Unexpected(String),
}

pub trait ReplicaStore: Send + Sync + 'static {
    /// Creates a new document. There is no update path: a retry after a failure creates again.
    fn create_document(&self, document: &ReplicaDocument) -> impl Future<Output = Result<(), ReplicationError>> + Send;

    fn check_configuration(&self) -> Result<(), String> {
        Ok(())
    }
}
