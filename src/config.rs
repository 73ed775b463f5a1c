use crate::domain::order::Environment;
use serde::Serialize;
use url::Url;

pub const DEFAULT_STAGING_BASE_URL: &str =
    "https://staging.crossmint.com/sdk/2024-03-05/embedded-checkout";
pub const DEFAULT_PRODUCTION_BASE_URL: &str =
    "https://www.crossmint.com/sdk/2024-03-05/embedded-checkout";

/// Identifies this integration to the hosted checkout page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SdkMetadata {
    pub name: String,
    pub version: String,
}

impl Default for SdkMetadata {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Where hosted checkout pages live and how this client introduces itself.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    pub staging_base_url: Url,
    pub production_base_url: Url,
    pub sdk_metadata: SdkMetadata,
}

impl CheckoutConfig {
    pub fn new(staging_base_url: Url, production_base_url: Url) -> Self {
        Self {
            staging_base_url,
            production_base_url,
            sdk_metadata: SdkMetadata::default(),
        }
    }

    pub fn base_url(&self, environment: Environment) -> &Url {
        match environment {
            Environment::Production => &self.production_base_url,
            Environment::Staging => &self.staging_base_url,
        }
    }
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self::new(
            Url::parse(DEFAULT_STAGING_BASE_URL).expect("static staging URL"),
            Url::parse(DEFAULT_PRODUCTION_BASE_URL).expect("static production URL"),
        )
    }
}
