//! Server-to-server "transaction processed" webhook

use super::{lenient, Callback, SignedFields, SourceData};
use crate::Result;
use serde::Deserialize;

/// Webhook body: `{"type": "TRANSACTION", "obj": {...}}`
///
/// Accept usually sends the signature as an `hmac` query parameter on the
/// webhook URL; some integrations receive it in the body instead, which is
/// captured in [`TransactionProcessed::hmac`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TransactionProcessed {
    #[serde(rename = "type", deserialize_with = "lenient::string")]
    pub kind: String,
    #[serde(deserialize_with = "lenient::object")]
    pub obj: ProcessedTransaction,
    #[serde(deserialize_with = "lenient::optional_string")]
    pub hmac: Option<String>,
}

/// The transaction inside a webhook
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProcessedTransaction {
    #[serde(deserialize_with = "lenient::number")]
    pub id: u64,
    #[serde(deserialize_with = "lenient::flag")]
    pub pending: bool,
    #[serde(deserialize_with = "lenient::number")]
    pub amount_cents: u64,
    #[serde(deserialize_with = "lenient::flag")]
    pub success: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub is_auth: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub is_capture: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub is_standalone_payment: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub is_voided: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub is_refunded: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub is_3d_secure: bool,
    #[serde(deserialize_with = "lenient::number")]
    pub integration_id: u64,
    #[serde(deserialize_with = "lenient::flag")]
    pub has_parent_transaction: bool,
    /// Id of `obj.order`
    #[serde(rename = "order", deserialize_with = "lenient::order_id")]
    pub order_id: u64,
    #[serde(deserialize_with = "lenient::string")]
    pub created_at: String,
    #[serde(deserialize_with = "lenient::string")]
    pub currency: String,
    #[serde(deserialize_with = "lenient::object")]
    pub source_data: SourceData,
    #[serde(deserialize_with = "lenient::flag")]
    pub error_occured: bool,
    #[serde(deserialize_with = "lenient::number")]
    pub owner: u64,
}

impl TransactionProcessed {
    /// Decode a webhook body.
    ///
    /// Missing or wrong-typed fields inside the body decode to zero values.
    /// A body that is not JSON is an error, and so is JSON that is not a
    /// webhook shape at all: `null`, a bare scalar, or an object repeating a
    /// top-level key.
    pub fn from_json(body: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Decode an already parsed webhook body
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Use `hmac` as the signature when the body did not carry one
    pub fn with_signature(mut self, hmac: impl Into<String>) -> Self {
        if self.hmac.is_none() {
            self.hmac = Some(hmac.into());
        }
        self
    }
}

impl From<&ProcessedTransaction> for SignedFields {
    fn from(obj: &ProcessedTransaction) -> Self {
        Self {
            amount_cents: obj.amount_cents,
            created_at: obj.created_at.clone(),
            currency: obj.currency.clone(),
            error_occured: obj.error_occured,
            has_parent_transaction: obj.has_parent_transaction,
            id: obj.id,
            integration_id: obj.integration_id,
            is_3d_secure: obj.is_3d_secure,
            is_auth: obj.is_auth,
            is_capture: obj.is_capture,
            is_refunded: obj.is_refunded,
            is_standalone_payment: obj.is_standalone_payment,
            is_voided: obj.is_voided,
            order_id: obj.order_id,
            owner: obj.owner.to_string(),
            pending: obj.pending,
            source_data: obj.source_data.clone(),
            success: obj.success,
        }
    }
}

impl Callback for TransactionProcessed {
    fn signed_fields(&self) -> SignedFields {
        SignedFields::from(&self.obj)
    }

    fn signature(&self) -> Option<&str> {
        self.hmac.as_deref()
    }
}
