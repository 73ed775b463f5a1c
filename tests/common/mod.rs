#![allow(dead_code)]

use async_trait::async_trait;
use keypad_checkout::application::checkout::CheckoutUrlBuilder;
use keypad_checkout::config::CheckoutConfig;
use keypad_checkout::domain::options::{CheckoutOptions, OrderRequest, execution_amounts};
use keypad_checkout::domain::order::OrderResponse;
use keypad_checkout::domain::ports::{OrderApi, OrderApiRef};
use keypad_checkout::error::Result;
use keypad_checkout::infrastructure::in_memory::InMemoryOrderApi;
use keypad_checkout::interfaces::http::{AppState, create_router};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Wraps an order API and delays responses per amount.
pub struct DelayedOrderApi {
    pub inner: InMemoryOrderApi,
    pub delays: HashMap<String, Duration>,
}

#[async_trait]
impl OrderApi for DelayedOrderApi {
    async fn create_order(&self, request: &OrderRequest) -> Result<OrderResponse> {
        let amount = execution_amounts(request).first().copied();
        if let Some(delay) = amount.and_then(|amount| self.delays.get(amount)) {
            tokio::time::sleep(*delay).await;
        }
        self.inner.create_order(request).await
    }
}

pub fn builder(api: OrderApiRef) -> CheckoutUrlBuilder {
    CheckoutUrlBuilder::new(api, CheckoutOptions::default(), CheckoutConfig::default())
}

pub fn query_value(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

pub fn line_items_amount(url: &Url) -> Option<String> {
    let line_items: serde_json::Value = serde_json::from_str(&query_value(url, "lineItems")?).ok()?;
    line_items["executionParameters"]["amount"]
        .as_str()
        .map(str::to_string)
}

/// Serves the order proxy on an ephemeral port and returns its order endpoint.
pub async fn spawn_proxy(api: OrderApiRef, environment: &str) -> Url {
    let router = create_router(AppState::new(api, environment));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Url::parse(&format!("http://{addr}/api/orders")).unwrap()
}
