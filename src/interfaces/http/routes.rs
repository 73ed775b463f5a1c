use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    routing::{get, post},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, error};

use super::error::HttpError;
use crate::domain::options::OrderRequest;
use crate::domain::order::OrderResponse;
use crate::domain::ports::OrderApiRef;
use crate::error::Result;

#[derive(Clone)]
pub struct AppState {
    pub api: OrderApiRef,
    /// Reported back in every order response.
    pub environment: Arc<str>,
}

impl AppState {
    pub fn new(api: OrderApiRef, environment: impl Into<Arc<str>>) -> Self {
        Self {
            api,
            environment: environment.into(),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/orders", post(create_order))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME")
    }))
}

/// Forwards the order request upstream and stamps the deployment environment
/// onto the response.
///
/// The body is forwarded as the JSON it arrived as, fields this crate does not
/// model included. It is parsed by hand so a malformed request fails like every
/// other error here, with a 500 and a JSON message.
async fn create_order(
    State(state): State<AppState>,
    body: Bytes,
) -> std::result::Result<Json<OrderResponse>, HttpError> {
    let result: Result<OrderResponse> = async {
        let request: OrderRequest = serde_json::from_slice(&body)?;
        debug!(body = %String::from_utf8_lossy(&body), "proxying order request");
        state.api.create_order(&request).await
    }
    .await;

    match result {
        Ok(order) => Ok(Json(order.with_environment(&*state.environment))),
        Err(e) => {
            error!(error = %e, "order proxy failed");
            Err(e.into())
        }
    }
}
