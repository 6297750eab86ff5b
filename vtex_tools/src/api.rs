use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
    StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::VtexConfig,
    data_objects::{DocumentCreated, OrderDetail, OrderList, OrderSummary},
    VtexApiError,
};

/// The order list endpoint is always queried with this page size.
pub const ORDERS_PER_PAGE: u32 = 25;

#[derive(Clone)]
pub struct VtexApi {
    config: VtexConfig,
    client: Arc<Client>,
}

impl VtexApi {
    pub fn new(config: VtexConfig) -> Result<Self, VtexApiError> {
        let mut headers = HeaderMap::with_capacity(3);
        let key = HeaderValue::from_str(config.app_key.reveal().as_str())
            .map_err(|e| VtexApiError::Initialization(format!("Invalid app key. {e}")))?;
        let token = HeaderValue::from_str(config.app_token.reveal().as_str())
            .map_err(|e| VtexApiError::Initialization(format!("Invalid app token. {e}")))?;
        headers.insert("X-VTEX-API-AppKey", key);
        headers.insert("X-VTEX-API-AppToken", token);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| VtexApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    /// Fails with [`VtexApiError::MissingCredentials`] if any account or credential value is blank.
    pub fn check_credentials(&self) -> Result<(), VtexApiError> {
        let missing = self.config.missing_credentials();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(VtexApiError::MissingCredentials(missing.join(", ")))
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url())
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
        body: Option<B>,
    ) -> Result<T, VtexApiError> {
        let (status, text) = self.send(method, path, params, body).await?;
        if status.is_success() {
            trace!("REST query successful. {status}");
            serde_json::from_str::<T>(&text).map_err(|e| VtexApiError::JsonError(e.to_string()))
        } else {
            Err(VtexApiError::QueryError { status: status.as_u16(), message: text })
        }
    }

    async fn send<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
        body: Option<B>,
    ) -> Result<(StatusCode, String), VtexApiError> {
        let url = self.url(path);
        trace!("Sending REST query: {method} {url}");
        let mut req = self.client.request(method, url);
        if !params.is_empty() {
            req = req.query(params);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| VtexApiError::RestResponseError(e.to_string()))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| VtexApiError::RestResponseError(e.to_string()))?;
        Ok((status, text))
    }

    /// Fetches one page of order summaries in the given status.
    pub async fn list_orders(&self, status: &str, page: u32, per_page: u32) -> Result<Vec<OrderSummary>, VtexApiError> {
        let page = page.to_string();
        let per_page = per_page.to_string();
        let params = [("f_status", status), ("page", page.as_str()), ("per_page", per_page.as_str())];
        debug!("Fetching orders with status '{status}', page {page}");
        let result = self.rest_query::<OrderList, ()>(Method::GET, "/api/oms/pvt/orders", &params, None).await?;
        debug!("Fetched {} order summaries", result.list.len());
        Ok(result.list)
    }

    pub async fn get_order(&self, order_id: &str) -> Result<OrderDetail, VtexApiError> {
        let path = format!("/api/oms/pvt/orders/{order_id}");
        debug!("Fetching order #{order_id}");
        let result = self.rest_query::<OrderDetail, ()>(Method::GET, &path, &[], None).await?;
        info!("Fetched order #{order_id}");
        Ok(result)
    }

    /// Creates a new document in the configured Master Data entity. Only `201 Created` counts as success. There is no
    /// upsert: calling this twice with the same body creates two documents unless the entity enforces uniqueness.
    pub async fn create_document<B: Serialize>(&self, document: &B) -> Result<DocumentCreated, VtexApiError> {
        let path = format!("/api/dataentities/{}/documents", self.config.data_entity);
        let (status, text) = self.send(Method::POST, &path, &[], Some(document)).await?;
        if status != StatusCode::CREATED {
            return Err(VtexApiError::QueryError { status: status.as_u16(), message: text });
        }
        let created = serde_json::from_str::<DocumentCreated>(&text).unwrap_or_else(|e| {
            warn!("Document was created, but the response could not be read. {e}. Body: {text}");
            DocumentCreated::default()
        });
        info!("Created document {:?} in entity {}", created.id, self.config.data_entity);
        Ok(created)
    }
}

#[cfg(test)]
mod test {
    use relay_common::Secret;

    use super::*;

    #[test]
    fn urls() {
        let config = VtexConfig {
            account: "mystore".into(),
            environment: "vtexcommercestable".into(),
            app_key: Secret::new("key".into()),
            app_token: Secret::new("token".into()),
            ..Default::default()
        };
        let api = VtexApi::new(config).unwrap();
        assert_eq!(
            api.url("/api/oms/pvt/orders/123-01"),
            "https://mystore.vtexcommercestable.com.br/api/oms/pvt/orders/123-01"
        );
        assert!(api.check_credentials().is_ok());
    }

    #[test]
    fn blank_credentials_are_reported() {
        let api = VtexApi::new(VtexConfig::default()).unwrap();
        match api.check_credentials() {
            Err(VtexApiError::MissingCredentials(s)) => {
                assert_eq!(s, "VTEX_ACCOUNT, VTEX_ENVIRONMENT, VTEX_APP_KEY, VTEX_APP_TOKEN")
            },
            other => panic!("Expected missing credentials, got {other:?}"),
        }
    }
}
