//! [`OrderSource`] and [`ReplicaStore`] for the VTEX OMS and Master Data APIs.
use vtex_tools::{OrderDetail, OrderSummary, VtexApi, VtexApiError};

use crate::{
    replication::ReplicaDocument,
    traits::{OrderSource, OrderSourceError, ReplicaStore, ReplicationError},
};

impl From<VtexApiError> for OrderSourceError {
    fn from(e: VtexApiError) -> Self {
        match e {
            VtexApiError::QueryError { status, message } => Self::Http { status, body: message },
            VtexApiError::RestResponseError(s) => Self::Transport(s),
            VtexApiError::JsonError(s) => Self::MalformedResponse(s),
            VtexApiError::Initialization(s) | VtexApiError::MissingCredentials(s) => Self::Configuration(s),
        }
    }
}

impl From<VtexApiError> for ReplicationError {
    fn from(e: VtexApiError) -> Self {
        match e {
            VtexApiError::QueryError { status, message } => Self::Rejected { status, body: message },
            VtexApiError::RestResponseError(s) => Self::Transport(s),
            other => Self::Unexpected(other.to_string()),
        }
    }
}

impl OrderSource for VtexApi {
    async fn list_orders(&self, status: &str, page: u32, per_page: u32) -> Result<Vec<OrderSummary>, OrderSourceError> {
        Ok(VtexApi::list_orders(self, status, page, per_page).await?)
    }

    async fn fetch_order(&self, order_id: &str) -> Result<OrderDetail, OrderSourceError> {
        Ok(self.get_order(order_id).await?)
    }

    fn check_configuration(&self) -> Result<(), String> {
        self.check_credentials().map_err(|e| e.to_string())
    }
}

impl ReplicaStore for VtexApi {
    async fn create_document(&self, document: &ReplicaDocument) -> Result<(), ReplicationError> {
        VtexApi::create_document(self, document).await?;
        Ok(())
    }

    fn check_configuration(&self) -> Result<(), String> {
        self.check_credentials().map_err(|e| e.to_string())
    }
}
