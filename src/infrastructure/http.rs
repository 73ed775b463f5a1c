use crate::domain::options::OrderRequest;
use crate::domain::order::OrderResponse;
use crate::domain::ports::OrderApi;
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{self, HeaderValue};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Order API reached over HTTP.
///
/// Points either at the provider directly (server side, with an API key) or at
/// the `POST /api/orders` proxy of this crate (client side).
pub struct HttpOrderApi {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl HttpOrderApi {
    pub fn new(endpoint: Url, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }
}

#[async_trait]
impl OrderApi for HttpOrderApi {
    async fn create_order(&self, request: &OrderRequest) -> Result<OrderResponse> {
        let body = serde_json::to_vec(request)?;
        let mut builder = self
            .client
            .post(self.endpoint.clone())
            .header(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            )
            .body(body);
        if let Some(api_key) = &self.api_key {
            builder = builder.header("X-API-KEY", api_key);
        }

        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            // The error body is re-serialized so the message is compact JSON.
            let error: serde_json::Value = serde_json::from_slice(&bytes)?;
            warn!(%status, endpoint = %self.endpoint, "order creation rejected");
            return Err(CheckoutError::OrderCreation(error.to_string()));
        }

        debug!(%status, "order creation succeeded");
        Ok(serde_json::from_slice(&bytes)?)
    }
}
