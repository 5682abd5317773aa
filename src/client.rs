//! HTTP client for the Accept API
//!
//! The three upstream calls are independent request/response exchanges. A
//! checkout is the caller chaining them: auth token, then order id, then payment
//! key, each feeding the next. [`PaymobClient::checkout`] does that chaining for
//! the common case.

use crate::config::PaymobConfig;
use crate::types::*;
use crate::{PaymobError, Result};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Token issuance endpoint
pub const AUTH_TOKENS_PATH: &str = "auth/tokens";
/// Order registration endpoint
pub const ORDERS_PATH: &str = "ecommerce/orders";
/// Payment key endpoint
pub const PAYMENT_KEYS_PATH: &str = "acceptance/payment_keys";
/// Hosted checkout iframe endpoint
pub const IFRAMES_PATH: &str = "acceptance/iframes";

/// Client for the Accept API
#[derive(Debug, Clone)]
pub struct PaymobClient {
    /// Underlying HTTP client
    client: Client,
    /// Credentials and endpoint settings
    config: PaymobConfig,
}

impl PaymobClient {
    /// Create a new client from a validated configuration
    pub fn new(config: PaymobConfig) -> Result<Self> {
        config.validate()?;

        let mut client_builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            client_builder = client_builder.timeout(timeout);
        }

        let client = client_builder
            .build()
            .map_err(|e| PaymobError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Create a client from `PAYMOB_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(PaymobConfig::from_env()?)
    }

    /// Get the client configuration
    pub fn config(&self) -> &PaymobConfig {
        &self.config
    }

    /// Get the base URL of the Accept API
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Exchange an API key for an auth token valid for one hour
    pub async fn authenticate(&self, api_key: &str) -> Result<String> {
        let response: AuthTokenResponse = self
            .post_json(AUTH_TOKENS_PATH, &AuthTokenRequest { api_key })
            .await?;
        Ok(response.token)
    }

    /// Register an order and return its Accept order id
    pub async fn register_order(
        &self,
        auth_token: &str,
        items: Vec<Item>,
        amount_cents: u64,
    ) -> Result<u64> {
        let request = OrderRegistrationRequest::new(auth_token, items, amount_cents);
        Ok(self.register_order_with(&request).await?.id)
    }

    /// Register an order from a fully specified request
    pub async fn register_order_with(
        &self,
        request: &OrderRegistrationRequest,
    ) -> Result<OrderRegistrationResponse> {
        let response: OrderRegistrationResponse = self.post_json(ORDERS_PATH, request).await?;
        tracing::info!(order_id = response.id, "Registered order");
        Ok(response)
    }

    /// Request a payment key for an order.
    ///
    /// Integration id, currency and expiration come from the client configuration.
    pub async fn request_payment_key(
        &self,
        auth_token: &str,
        order_id: u64,
        amount_cents: u64,
        billing_data: BillingData,
    ) -> Result<String> {
        let request = PaymentKeyRequest::new(
            auth_token,
            order_id,
            amount_cents,
            self.config.integration_id.clone(),
            billing_data,
        )
        .with_currency(self.config.currency.clone())
        .with_expiration(self.config.payment_key_expiration);

        self.request_payment_key_with(&request).await
    }

    /// Request a payment key from a fully specified request
    pub async fn request_payment_key_with(&self, request: &PaymentKeyRequest) -> Result<String> {
        let response: PaymentKeyResponse = self.post_json(PAYMENT_KEYS_PATH, request).await?;
        Ok(response.token)
    }

    /// Build the hosted checkout URL for a payment key
    pub fn iframe_url(&self, iframe_id: &str, payment_token: &str) -> String {
        iframe_url(&self.config.base_url, iframe_id, payment_token)
    }

    /// Run the whole flow with the configured credentials and iframe
    pub async fn checkout(
        &self,
        items: Vec<Item>,
        amount_cents: u64,
        billing_data: BillingData,
    ) -> Result<Checkout> {
        if self.config.integration_id.is_empty() {
            return Err(PaymobError::config("PAYMOB_INTEGRATION_ID is required for checkout"));
        }
        if self.config.iframe_id.is_empty() {
            return Err(PaymobError::config("PAYMOB_IFRAME_ID is required for checkout"));
        }

        let auth_token = self.authenticate(&self.config.api_key).await?;
        let order_id = self.register_order(&auth_token, items, amount_cents).await?;
        let payment_token = self
            .request_payment_key(&auth_token, order_id, amount_cents, billing_data)
            .await?;
        let iframe_url = self.iframe_url(&self.config.iframe_id, &payment_token);

        Ok(Checkout {
            order_id,
            payment_token,
            iframe_url,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// POST a JSON body and decode a 200/201 JSON response
    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path);
        tracing::debug!(%url, "Paymob API request");

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        tracing::debug!(%url, status = status.as_u16(), "Paymob API response");

        if status != StatusCode::OK && status != StatusCode::CREATED {
            let text = response.text().await?;
            let body = serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text));
            tracing::warn!(%url, status = status.as_u16(), "Paymob API request failed");
            return Err(PaymobError::api(status.as_u16(), body));
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            PaymobError::unexpected_response(format!("{} returned an unexpected body: {}", path, e))
        })
    }
}

/// Build the hosted checkout URL for an iframe id and payment key
pub fn iframe_url(base_url: &str, iframe_id: &str, payment_token: &str) -> String {
    let token: String = url::form_urlencoded::byte_serialize(payment_token.as_bytes()).collect();
    format!(
        "{}/{}/{}?payment_token={}",
        base_url.trim_end_matches('/'),
        IFRAMES_PATH,
        iframe_id,
        token
    )
}
