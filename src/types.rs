//! Request and response models for the Accept API

use serde::{Deserialize, Serialize};

/// Placeholder the Accept API expects for billing fields we do not collect
pub const BILLING_PLACEHOLDER: &str = "NA";

/// Default currency for orders and payment keys
pub const DEFAULT_CURRENCY: &str = "EGP";

/// Default payment key lifetime sent as `expiration`
pub const DEFAULT_PAYMENT_KEY_EXPIRATION: u64 = 600_000;

/// A line item attached to an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub amount_cents: u64,
    pub description: String,
    pub quantity: u64,
}

impl Item {
    /// Create a new order item
    pub fn new(
        name: impl Into<String>,
        amount_cents: u64,
        description: impl Into<String>,
        quantity: u64,
    ) -> Self {
        Self {
            name: name.into(),
            amount_cents,
            description: description.into(),
            quantity,
        }
    }
}

/// Customer billing details required by the payment key endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingData {
    pub apartment: String,
    pub email: String,
    pub floor: String,
    pub first_name: String,
    pub street: String,
    pub building: String,
    pub phone_number: String,
    pub shipping_method: String,
    pub postal_code: String,
    pub city: String,
    pub country: String,
    pub last_name: String,
    pub state: String,
}

impl BillingData {
    /// Billing data with only the customer's identity filled in.
    ///
    /// Every address field is set to [`BILLING_PLACEHOLDER`].
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        let na = || BILLING_PLACEHOLDER.to_string();
        Self {
            apartment: na(),
            email: email.into(),
            floor: na(),
            first_name: first_name.into(),
            street: na(),
            building: na(),
            phone_number: phone_number.into(),
            shipping_method: na(),
            postal_code: na(),
            city: na(),
            country: na(),
            last_name: last_name.into(),
            state: na(),
        }
    }

    /// Set the city
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = city.into();
        self
    }

    /// Set the country
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    /// Set the street
    pub fn with_street(mut self, street: impl Into<String>) -> Self {
        self.street = street.into();
        self
    }
}

/// Body of `POST /auth/tokens`
#[derive(Debug, Clone, Serialize)]
pub struct AuthTokenRequest<'a> {
    pub api_key: &'a str,
}

/// Response of `POST /auth/tokens`. The token is valid for one hour.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthTokenResponse {
    pub token: String,
    #[serde(default)]
    pub profile: Option<serde_json::Value>,
}

/// Body of `POST /ecommerce/orders`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRegistrationRequest {
    pub auth_token: String,
    pub delivery_needed: bool,
    pub amount_cents: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_order_id: Option<String>,
    pub items: Vec<Item>,
}

impl OrderRegistrationRequest {
    /// Create an order registration without delivery
    pub fn new(auth_token: impl Into<String>, items: Vec<Item>, amount_cents: u64) -> Self {
        Self {
            auth_token: auth_token.into(),
            delivery_needed: false,
            amount_cents,
            currency: None,
            merchant_order_id: None,
            items,
        }
    }

    /// Attach the merchant's own order reference
    pub fn with_merchant_order_id(mut self, id: impl Into<String>) -> Self {
        self.merchant_order_id = Some(id.into());
        self
    }

    /// Set the order currency
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }
}

/// Response of `POST /ecommerce/orders`
///
/// Order ids are JSON integers well inside the `u64` range.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderRegistrationResponse {
    pub id: u64,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub amount_cents: Option<u64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub merchant_order_id: Option<String>,
}

/// Body of `POST /acceptance/payment_keys`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentKeyRequest {
    pub auth_token: String,
    pub amount_cents: u64,
    pub expiration: u64,
    pub order_id: u64,
    pub currency: String,
    pub integration_id: String,
    pub billing_data: BillingData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock_order_when_paid: Option<bool>,
}

impl PaymentKeyRequest {
    /// Create a payment key request with default currency and expiration
    pub fn new(
        auth_token: impl Into<String>,
        order_id: u64,
        amount_cents: u64,
        integration_id: impl Into<String>,
        billing_data: BillingData,
    ) -> Self {
        Self {
            auth_token: auth_token.into(),
            amount_cents,
            expiration: DEFAULT_PAYMENT_KEY_EXPIRATION,
            order_id,
            currency: DEFAULT_CURRENCY.to_string(),
            integration_id: integration_id.into(),
            billing_data,
            lock_order_when_paid: None,
        }
    }

    /// Set the currency
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Set the key lifetime
    pub fn with_expiration(mut self, expiration: u64) -> Self {
        self.expiration = expiration;
        self
    }

    /// Refuse further payments on the order once it is paid
    pub fn with_lock_order_when_paid(mut self, lock: bool) -> Self {
        self.lock_order_when_paid = Some(lock);
        self
    }
}

/// Response of `POST /acceptance/payment_keys`
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentKeyResponse {
    pub token: String,
}

/// Everything needed to send a customer to the hosted checkout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkout {
    /// Accept order id
    pub order_id: u64,
    /// Payment key for the iframe
    pub payment_token: String,
    /// Hosted checkout URL
    pub iframe_url: String,
}
