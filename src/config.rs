//! Client configuration
//!
//! Configuration can be built in code, loaded from a JSON file, or read from
//! `PAYMOB_*` environment variables.

use crate::types::{DEFAULT_CURRENCY, DEFAULT_PAYMENT_KEY_EXPIRATION};
use crate::{PaymobError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Accept API base URL
pub const DEFAULT_BASE_URL: &str = "https://accept.paymobsolutions.com/api";

/// Configuration for [`PaymobClient`](crate::PaymobClient)
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymobConfig {
    /// Accept API base URL
    pub base_url: String,
    /// Merchant API key used to obtain auth tokens
    pub api_key: String,
    /// Shared secret for callback HMAC verification
    pub hmac_secret: String,
    /// Payment integration id
    pub integration_id: String,
    /// Hosted checkout iframe id
    pub iframe_id: String,
    /// Request timeout in milliseconds, unset means no timeout
    pub timeout_ms: Option<u64>,
    /// Currency used for payment keys
    pub currency: String,
    /// Payment key lifetime
    pub payment_key_expiration: u64,
}

impl std::fmt::Debug for PaymobConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymobConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("hmac_secret", &"<redacted>")
            .field("integration_id", &self.integration_id)
            .field("iframe_id", &self.iframe_id)
            .field("timeout_ms", &self.timeout_ms)
            .field("currency", &self.currency)
            .field("payment_key_expiration", &self.payment_key_expiration)
            .finish()
    }
}

impl Default for PaymobConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            hmac_secret: String::new(),
            integration_id: String::new(),
            iframe_id: String::new(),
            timeout_ms: None,
            currency: DEFAULT_CURRENCY.to_string(),
            payment_key_expiration: DEFAULT_PAYMENT_KEY_EXPIRATION,
        }
    }
}

impl PaymobConfig {
    /// Create a configuration with the given API key and defaults elsewhere
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: PaymobConfig = serde_json::from_str(&content)
            .map_err(|e| PaymobError::config(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(base_url) = std::env::var("PAYMOB_BASE_URL") {
            config.base_url = base_url;
        }

        if let Ok(api_key) = std::env::var("PAYMOB_API_KEY") {
            config.api_key = api_key;
        }

        if let Ok(secret) = std::env::var("PAYMOB_HMAC_SECRET") {
            config.hmac_secret = secret;
        }

        if let Ok(integration_id) = std::env::var("PAYMOB_INTEGRATION_ID") {
            config.integration_id = integration_id;
        }

        if let Ok(iframe_id) = std::env::var("PAYMOB_IFRAME_ID") {
            config.iframe_id = iframe_id;
        }

        if let Ok(currency) = std::env::var("PAYMOB_CURRENCY") {
            config.currency = currency;
        }

        if let Ok(timeout) = std::env::var("PAYMOB_TIMEOUT_MS") {
            config.timeout_ms = Some(
                timeout
                    .parse()
                    .map_err(|e| PaymobError::config(format!("Invalid PAYMOB_TIMEOUT_MS: {}", e)))?,
            );
        }

        if let Ok(expiration) = std::env::var("PAYMOB_PAYMENT_KEY_EXPIRATION") {
            config.payment_key_expiration = expiration.parse().map_err(|e| {
                PaymobError::config(format!("Invalid PAYMOB_PAYMENT_KEY_EXPIRATION: {}", e))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(PaymobError::config("PAYMOB_API_KEY is required"));
        }

        let url = url::Url::parse(&self.base_url)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(PaymobError::config(
                "Base URL must start with http:// or https://",
            ));
        }

        if self.timeout_ms == Some(0) {
            return Err(PaymobError::config(
                "Timeout must be greater than zero, leave it unset for no timeout",
            ));
        }

        Ok(())
    }

    /// Request timeout as a [`Duration`]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Set the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the callback HMAC secret
    pub fn with_hmac_secret(mut self, secret: impl Into<String>) -> Self {
        self.hmac_secret = secret.into();
        self
    }

    /// Set the payment integration id
    pub fn with_integration_id(mut self, integration_id: impl Into<String>) -> Self {
        self.integration_id = integration_id.into();
        self
    }

    /// Set the iframe id
    pub fn with_iframe_id(mut self, iframe_id: impl Into<String>) -> Self {
        self.iframe_id = iframe_id.into();
        self
    }

    /// Set the request timeout.
    ///
    /// Non-zero durations below one millisecond round up to one millisecond.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self.timeout_ms = Some(if millis == 0 && !timeout.is_zero() {
            1
        } else {
            millis
        });
        self
    }
}
