use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Body of an order-creation request as it travels on the wire.
///
/// The proxy forwards it untouched, so it stays an untyped JSON value; the
/// typed view is [`CheckoutOptions`].
pub type OrderRequest = Value;

/// Options describing the hosted checkout: what is bought, for whom, and how it is paid.
///
/// Callers hold one template and derive a per-amount copy with
/// [`CheckoutOptions::with_amount`]. Fields this crate does not model are kept in
/// `extra` and written back out unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutOptions {
    pub locale: String,
    #[serde(default)]
    pub appearance: Appearance,
    pub recipient: Recipient,
    pub line_items: LineItems,
    pub payment: Payment,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Appearance {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub rules: BTreeMap<String, AppearanceRule>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppearanceRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One line item, or several for a multi-item order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LineItems {
    Single(LineItem),
    Multiple(Vec<LineItem>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub token_locator: String,
    pub execution_parameters: ExecutionParameters,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionParameters {
    pub mode: ExecutionMode,
    /// Amount in USD, exactly as typed on the keypad.
    pub amount: String,
    /// Provider default slippage applies when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_slippage_bps: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutionMode {
    /// Spend exactly `amount`, receiving whatever quantity of tokens it buys.
    ExactIn,
    ExactOut,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub crypto: CryptoPayment,
    pub fiat: FiatPayment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_method: Option<PaymentKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CryptoPayment {
    pub enabled: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiatPayment {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_methods: Option<AllowedMethods>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowedMethods {
    pub card: bool,
    pub apple_pay: bool,
    pub google_pay: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentKind {
    Fiat,
    Crypto,
}

impl Default for CheckoutOptions {
    /// Demo template: buys a Solana token with Apple Pay.
    fn default() -> Self {
        let rules = ["ReceiptEmailInput", "DestinationInput"]
            .into_iter()
            .map(|name| {
                (
                    name.to_string(),
                    AppearanceRule {
                        display: Some("hidden".to_string()),
                        extra: Map::new(),
                    },
                )
            })
            .collect();

        Self {
            locale: "en-US".to_string(),
            appearance: Appearance {
                rules,
                extra: Map::new(),
            },
            recipient: Recipient {
                wallet_address: Some("EbXL4e6XgbcC7s33cD5EZtyn5nixRDsieBjPQB7zf448".to_string()),
                email: None,
                extra: Map::new(),
            },
            line_items: LineItems::Single(LineItem {
                token_locator: "solana:6p6xgHyF7AeE6TZkSmFsko444wqoP15icUSqi2jfGiPN".to_string(),
                execution_parameters: ExecutionParameters {
                    mode: ExecutionMode::ExactIn,
                    amount: "1".to_string(),
                    max_slippage_bps: Some("500".to_string()),
                    extra: Map::new(),
                },
                extra: Map::new(),
            }),
            payment: Payment {
                crypto: CryptoPayment {
                    enabled: false,
                    extra: Map::new(),
                },
                fiat: FiatPayment {
                    enabled: true,
                    allowed_methods: Some(AllowedMethods {
                        card: false,
                        apple_pay: true,
                        google_pay: false,
                    }),
                    extra: Map::new(),
                },
                method: Some("checkoutcom-flow".to_string()),
                default_method: Some(PaymentKind::Fiat),
                receipt_email: Some("buyer@example.com".to_string()),
                extra: Map::new(),
            },
            extra: Map::new(),
        }
    }
}

impl LineItems {
    pub fn items(&self) -> &[LineItem] {
        match self {
            Self::Single(item) => std::slice::from_ref(item),
            Self::Multiple(items) => items,
        }
    }

    fn items_mut(&mut self) -> &mut [LineItem] {
        match self {
            Self::Single(item) => std::slice::from_mut(item),
            Self::Multiple(items) => items,
        }
    }
}

impl CheckoutOptions {
    /// Copy of the template with every line item's execution amount replaced.
    pub fn with_amount(&self, amount: &str) -> Self {
        let mut options = self.clone();
        for item in options.line_items.items_mut() {
            item.execution_parameters.amount = amount.to_string();
        }
        options
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_request(&self) -> serde_json::Result<OrderRequest> {
        serde_json::to_value(self)
    }
}

/// Execution amounts named by a raw request, for either shape of `lineItems`.
pub fn execution_amounts(request: &OrderRequest) -> Vec<&str> {
    fn amount(item: &Value) -> Option<&str> {
        item["executionParameters"]["amount"].as_str()
    }

    match &request["lineItems"] {
        Value::Array(items) => items.iter().filter_map(amount).collect(),
        item => amount(item).into_iter().collect(),
    }
}
