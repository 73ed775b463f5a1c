use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Deployment tier of the checkout provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Production,
    Staging,
}

impl Environment {
    /// Anything but the exact `"production"` tag is treated as staging.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("production") => Self::Production,
            _ => Self::Staging,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Production => f.write_str("production"),
            Self::Staging => f.write_str("staging"),
        }
    }
}

/// Order issued by the checkout provider.
///
/// Only `orderId` is read here. Everything else is kept in `extra` so the proxy
/// can hand the provider's payload back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Successful response of the order-creation API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub order: Order,
    pub client_secret: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OrderResponse {
    pub fn environment(&self) -> Environment {
        Environment::from_tag(self.environment.as_deref())
    }

    /// Replaces the environment tag with the one this deployment runs in.
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_environment_from_tag() {
        assert_eq!(Environment::from_tag(Some("production")), Environment::Production);
        assert_eq!(Environment::from_tag(Some("staging")), Environment::Staging);
        assert_eq!(Environment::from_tag(Some("Production")), Environment::Staging);
        assert_eq!(Environment::from_tag(None), Environment::Staging);
    }

    #[test]
    fn test_unknown_fields_survive() {
        let payload = json!({
            "order": { "orderId": "o1", "phase": "payment", "lineItems": [] },
            "clientSecret": "cs1",
            "environment": "production",
            "expiresAt": "2026-01-01T00:00:00Z"
        });
        let response: OrderResponse = serde_json::from_value(payload.clone()).unwrap();

        assert_eq!(response.order.order_id, "o1");
        assert_eq!(response.environment(), Environment::Production);
        assert_eq!(serde_json::to_value(&response).unwrap(), payload);
    }

    #[test]
    fn test_with_environment() {
        let response: OrderResponse = serde_json::from_value(json!({
            "order": { "orderId": "o1" },
            "clientSecret": "cs1"
        }))
        .unwrap();
        assert_eq!(response.environment(), Environment::Staging);

        let value = serde_json::to_value(response.with_environment("production")).unwrap();
        assert_eq!(value["environment"], "production");
        assert_eq!(value["order"]["orderId"], "o1");
    }
}
