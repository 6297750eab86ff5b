use relay_common::MinorUnits;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The minimal order record returned by the order list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OrderSummary {
    pub fn new<S: Into<String>>(order_id: S) -> Self {
        Self { order_id: Some(order_id.into()), ..Default::default() }
    }

    /// The order id, if present and not blank.
    pub fn id(&self) -> Option<&str> {
        self.order_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Response body of `GET /api/oms/pvt/orders`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OrderList {
    #[serde(default)]
    pub list: Vec<OrderSummary>,
    #[serde(default)]
    pub paging: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientProfileData {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// The full order record, as returned by `GET /api/oms/pvt/orders/{orderId}`. Only the fields that the relay uses are
/// typed; everything else is kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub creation_date: Option<String>,
    /// Order total in minor currency units
    #[serde(default)]
    pub value: MinorUnits,
    /// VTEX sends the sales channel as a string, but some accounts return a bare number.
    #[serde(default)]
    pub sales_channel: Value,
    #[serde(default)]
    pub client_profile_data: Option<ClientProfileData>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OrderDetail {
    pub fn new<S: Into<String>>(order_id: S) -> Self {
        Self { order_id: Some(order_id.into()), ..Default::default() }
    }

    pub fn with_sales_channel<V: Into<Value>>(mut self, channel: V) -> Self {
        self.sales_channel = channel.into();
        self
    }

    pub fn with_value(mut self, value: MinorUnits) -> Self {
        self.value = value;
        self
    }

    pub fn with_client(mut self, client: ClientProfileData) -> Self {
        self.client_profile_data = Some(client);
        self
    }

    /// The sales channel rendered as a string. Numbers are formatted as-is and a missing channel is an empty string.
    pub fn sales_channel_label(&self) -> String {
        match &self.sales_channel {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Response body of a successful Master Data document creation.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DocumentCreated {
    #[serde(rename = "Id", default)]
    pub id: Option<String>,
    #[serde(rename = "Href", default)]
    pub href: Option<String>,
    #[serde(rename = "DocumentId", default)]
    pub document_id: Option<String>,
}
