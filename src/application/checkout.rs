use crate::config::CheckoutConfig;
use crate::domain::amount::is_ready_amount;
use crate::domain::options::CheckoutOptions;
use crate::domain::order::OrderResponse;
use crate::domain::ports::OrderApiRef;
use crate::error::Result;
use tracing::{debug, info};
use url::Url;

/// Turns a keypad amount into a hosted-checkout URL.
///
/// Each call creates a fresh order; nothing is cached between amounts. The
/// builder owns its template, so concurrent builds never observe each other's
/// amount.
pub struct CheckoutUrlBuilder {
    api: OrderApiRef,
    template: CheckoutOptions,
    config: CheckoutConfig,
}

impl CheckoutUrlBuilder {
    /// Creates a new `CheckoutUrlBuilder`.
    ///
    /// # Arguments
    ///
    /// * `api` - The order API used to create an order per amount.
    /// * `template` - Checkout options; only the execution amount is overridden.
    /// * `config` - Checkout base URLs and SDK metadata.
    pub fn new(api: OrderApiRef, template: CheckoutOptions, config: CheckoutConfig) -> Self {
        Self {
            api,
            template,
            config,
        }
    }

    /// Creates an order for `amount` and returns the checkout URL for it.
    ///
    /// Returns `Ok(None)` without touching the order API when the amount is
    /// empty or zero.
    pub async fn build(&self, amount: &str) -> Result<Option<Url>> {
        if !is_ready_amount(amount) {
            return Ok(None);
        }

        let options = self.template.with_amount(amount);
        let order = self.api.create_order(&options.to_request()?).await?;
        info!(
            amount,
            order_id = %order.order.order_id,
            environment = %order.environment(),
            "order created"
        );

        self.checkout_url(&options, &order).map(Some)
    }

    /// Serializes the redirect URL for an order created from `options`.
    pub fn checkout_url(&self, options: &CheckoutOptions, order: &OrderResponse) -> Result<Url> {
        let mut url = self.config.base_url(order.environment()).clone();
        url.query_pairs_mut()
            .append_pair("locale", &options.locale)
            .append_pair("orderId", &order.order.order_id)
            .append_pair("clientSecret", &order.client_secret)
            .append_pair("recipient", &serde_json::to_string(&options.recipient)?)
            .append_pair("payment", &serde_json::to_string(&options.payment)?)
            .append_pair("appearance", &serde_json::to_string(&options.appearance)?)
            .append_pair(
                "sdkMetadata",
                &serde_json::to_string(&self.config.sdk_metadata)?,
            )
            .append_pair("lineItems", &serde_json::to_string(&options.line_items)?);
        debug!(%url, "checkout url built");
        Ok(url)
    }
}
