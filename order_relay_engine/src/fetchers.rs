//! Upstream reads, with the relay's failure policy applied: a failed read is logged and treated as "no data".
use vtex_tools::{OrderDetail, OrderSummary, ORDERS_PER_PAGE};

use crate::{
    errors::RelayError,
    reporter::{LogLevel, RelayReporter},
    traits::{OrderSource, OrderSourceError},
};

/// Lists one page of order summaries.
///
/// HTTP and transport failures are logged and produce an empty list, so callers can't tell "no orders" from "fetch
/// failed". A response that can't be decoded is returned as an error, for the worker's recovery path to deal with.
pub async fn list_summaries<S: OrderSource>(
    source: &S,
    status: &str,
    page: u32,
    reporter: &dyn RelayReporter,
) -> Result<Vec<OrderSummary>, RelayError> {
    reporter.log(LogLevel::Debug, &format!("🔎️ Listing orders with status '{status}', page {page}"));
    match source.list_orders(status, page, ORDERS_PER_PAGE).await {
        Ok(list) => Ok(list),
        Err(OrderSourceError::Http { status, body }) => {
            reporter.log(LogLevel::Error, &format!("🔎️ HTTP {status} while listing orders. {body}"));
            Ok(Vec::new())
        },
        Err(OrderSourceError::Transport(e)) => {
            reporter.log(LogLevel::Error, &format!("🔎️ Connection error while listing orders. {e}"));
            Ok(Vec::new())
        },
        Err(e) => Err(RelayError::UpstreamFetch(e)),
    }
}

/// Fetches the full order record. Any failure is logged and yields `None`.
pub async fn fetch_detail<S: OrderSource>(
    source: &S,
    order_id: &str,
    reporter: &dyn RelayReporter,
) -> Option<OrderDetail> {
    reporter.log(LogLevel::Debug, &format!("🔎️ Fetching details for order {order_id}"));
    match source.fetch_order(order_id).await {
        Ok(detail) => Some(detail),
        Err(OrderSourceError::Http { status, body }) => {
            reporter.log(LogLevel::Error, &format!("🔎️ HTTP {status} while fetching order {order_id}. {body}"));
            None
        },
        Err(e) => {
            reporter.log(LogLevel::Error, &format!("🔎️ Could not fetch order {order_id}. {e}"));
            None
        },
    }
}
