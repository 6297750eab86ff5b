//! Mapping of full order records to replica documents, and the write itself.
use serde::{Deserialize, Serialize};
use vtex_tools::OrderDetail;

use crate::{
    errors::RelayError,
    reporter::{LogLevel, RelayReporter},
    traits::{ReplicaStore, ReplicationError},
};

/// The normalized record written to the destination store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplicaDocument {
    pub order_id: String,
    pub status: Option<String>,
    pub creation_date: Option<String>,
    /// Order total in major currency units
    pub total_value: f64,
    pub client_email: String,
    pub client_phone_cell: String,
    pub client_name: String,
}

impl TryFrom<&OrderDetail> for ReplicaDocument {
    type Error = RelayError;

    fn try_from(detail: &OrderDetail) -> Result<Self, Self::Error> {
        let order_id = detail
            .order_id
            .clone()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| RelayError::InvalidOrder("The order record has no orderId".to_string()))?;
        let client = detail.client_profile_data.clone().unwrap_or_default();
        let first_name = client.first_name.unwrap_or_default();
        let last_name = client.last_name.unwrap_or_default();
        Ok(Self {
            order_id,
            status: detail.status.clone(),
            creation_date: detail.creation_date.clone(),
            total_value: detail.value.to_major(),
            client_email: client.email.unwrap_or_default(),
            client_phone_cell: client.phone.unwrap_or_default(),
            client_name: format!("{first_name} {last_name}"),
        })
    }
}

/// Replicates one order.
///
/// * `Ok(true)`: the document was created.
/// * `Ok(false)`: the store rejected the document or could not be reached. The order should be retried later.
/// * `Err`: the order could not be mapped, or the failure is unclassified. The order should not be retried.
pub async fn write_replica<R: ReplicaStore>(
    store: &R,
    detail: &OrderDetail,
    reporter: &dyn RelayReporter,
) -> Result<bool, RelayError> {
    let document = ReplicaDocument::try_from(detail)?;
    let order_id = document.order_id.as_str();
    reporter.log(LogLevel::Info, &format!("📝️ Creating replica document for order {order_id}"));
    match store.create_document(&document).await {
        Ok(()) => {
            reporter.log(LogLevel::Info, &format!("📝️ Replica document created for order {order_id}"));
            Ok(true)
        },
        Err(ReplicationError::Rejected { status, body }) => {
            reporter.log(LogLevel::Error, &format!("📝️ Could not create replica for order {order_id}: HTTP {status}"));
            reporter.log(LogLevel::Error, &format!("📝️ Response body: {body}"));
            Ok(false)
        },
        Err(ReplicationError::Transport(e)) => {
            reporter.log(LogLevel::Error, &format!("📝️ Could not reach the document store for order {order_id}. {e}"));
            Ok(false)
        },
        Err(ReplicationError::Unexpected(e)) => Err(RelayError::Unexpected(e)),
    }
}
