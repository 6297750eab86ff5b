use std::future::Future;

use thiserror::Error;
use vtex_tools::{OrderDetail, OrderSummary};

#[derive(Debug, Clone, Error)]
pub enum OrderSourceError {
    #[error("Order API returned HTTP {status}. {body}")]
    Http { status: u16, body: String },
    #[error("Could not reach the order API. {0}")]
    Transport(String),
    #[error("The order API sent a response that could not be read. {0}")]
    MalformedResponse(String),
    #[error("The order API client is not configured. {0}")]
    Configuration(String),
}

pub trait OrderSource: Send + Sync + 'static {
    /// Fetches one page of order summaries with the given status.
    fn list_orders(
        &self,
        status: &str,
        page: u32,
        per_page: u32,
    ) -> impl Future<Output = Result<Vec<OrderSummary>, OrderSourceError>> + Send;

    /// Fetches the full order record for `order_id`.
    fn fetch_order(&self, order_id: &str) -> impl Future<Output = Result<OrderDetail, OrderSourceError>> + Send;

    /// Returns a description of the problem if the source can never work as configured (e.g. missing credentials).
    fn check_configuration(&self) -> Result<(), String> {
        Ok(())
    }
}
