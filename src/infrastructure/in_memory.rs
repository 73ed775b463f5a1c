use crate::domain::options::{OrderRequest, execution_amounts};
use crate::domain::order::{Order, OrderResponse};
use crate::domain::ports::OrderApi;
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::{Map, json};
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// An order issuer that never leaves the process.
///
/// Hands out sequential order ids. Used by the `--offline` mode of the binary and
/// throughout the tests. Only an issuer built with [`InMemoryOrderApi::recording`]
/// keeps the requests it receives; the plain one holds no per-request state.
#[derive(Clone)]
pub struct InMemoryOrderApi {
    environment: String,
    next_id: Arc<AtomicU64>,
    requests: Option<Arc<RwLock<Vec<OrderRequest>>>>,
}

impl InMemoryOrderApi {
    /// Creates an issuer tagging its orders with `environment`.
    pub fn new(environment: impl Into<String>) -> Self {
        Self {
            environment: environment.into(),
            next_id: Arc::new(AtomicU64::new(1)),
            requests: None,
        }
    }

    /// Like [`InMemoryOrderApi::new`], but logs every request for later inspection.
    pub fn recording(environment: impl Into<String>) -> Self {
        Self {
            requests: Some(Arc::default()),
            ..Self::new(environment)
        }
    }

    /// Every request received so far, in arrival order. Always empty unless recording.
    pub async fn requests(&self) -> Vec<OrderRequest> {
        match &self.requests {
            Some(requests) => requests.read().await.clone(),
            None => Vec::new(),
        }
    }
}

fn is_positive(amount: &str) -> bool {
    matches!(Decimal::from_str(amount), Ok(value) if value > Decimal::ZERO)
}

#[async_trait]
impl OrderApi for InMemoryOrderApi {
    async fn create_order(&self, request: &OrderRequest) -> Result<OrderResponse> {
        if let Some(requests) = &self.requests {
            requests.write().await.push(request.clone());
        }

        if !execution_amounts(request).into_iter().all(is_positive) {
            return Err(CheckoutError::OrderCreation(
                json!({ "message": "bad amount" }).to_string(),
            ));
        }

        let order_id = format!("order-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        Ok(OrderResponse {
            client_secret: format!("secret-{order_id}"),
            order: Order {
                order_id,
                extra: Map::new(),
            },
            environment: Some(self.environment.clone()),
            extra: Map::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::options::CheckoutOptions;
    use crate::domain::order::Environment;

    fn request(amount: &str) -> OrderRequest {
        CheckoutOptions::default()
            .with_amount(amount)
            .to_request()
            .unwrap()
    }

    #[tokio::test]
    async fn test_sequential_orders() {
        let api = InMemoryOrderApi::recording("production");

        let first = api.create_order(&request("10")).await.unwrap();
        let second = api.create_order(&request("20")).await.unwrap();

        assert_eq!(first.order.order_id, "order-1");
        assert_eq!(second.order.order_id, "order-2");
        assert_eq!(second.client_secret, "secret-order-2");
        assert_eq!(first.environment(), Environment::Production);
        assert_eq!(api.requests().await, vec![request("10"), request("20")]);
    }

    #[tokio::test]
    async fn test_default_issuer_keeps_no_requests() {
        let api = InMemoryOrderApi::new("staging");

        for amount in ["1", "2", "0", "3"] {
            let _ = api.create_order(&request(amount)).await;
        }

        assert!(api.requests.is_none());
        assert!(api.requests().await.is_empty());
        let next = api.create_order(&request("4")).await.unwrap();
        assert_eq!(next.order.order_id, "order-4");
    }

    #[tokio::test]
    async fn test_rejects_non_positive_amount() {
        let api = InMemoryOrderApi::recording("staging");

        let err = api.create_order(&request("0")).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"Failed to create order: {"message":"bad amount"}"#
        );
        // Rejected requests are still recorded.
        assert_eq!(api.requests().await.len(), 1);
    }

    #[tokio::test]
    async fn test_accepts_request_without_amount() {
        let api = InMemoryOrderApi::new("staging");
        let order = api
            .create_order(&json!({ "lineItems": [{ "tokenLocator": "base:0xabc" }] }))
            .await
            .unwrap();
        assert_eq!(order.order.order_id, "order-1");
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let api = InMemoryOrderApi::recording("staging");
        let clone = api.clone();

        clone.create_order(&request("5")).await.unwrap();
        let next = api.create_order(&request("5")).await.unwrap();

        assert_eq!(next.order.order_id, "order-2");
        assert_eq!(api.requests().await.len(), 2);
    }
}
