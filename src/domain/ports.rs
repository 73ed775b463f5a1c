use super::options::OrderRequest;
use super::order::OrderResponse;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Creates orders with the checkout provider.
#[async_trait]
pub trait OrderApi: Send + Sync {
    async fn create_order(&self, request: &OrderRequest) -> Result<OrderResponse>;
}

pub type OrderApiRef = Arc<dyn OrderApi>;
