//! Post-payment redirect callback
//!
//! After checkout the customer's browser is sent back to the merchant with the
//! transaction flattened into query parameters. Nested values use dotted names
//! (`source_data.pan`), the order id arrives as plain `order`, and `owner` is
//! just text.

use super::{lenient, Callback, SignedFields, SourceData, HMAC_PARAM};
use std::collections::HashMap;

/// Transaction delivered on the redirect URL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionResponse {
    pub id: u64,
    pub pending: bool,
    pub amount_cents: u64,
    pub success: bool,
    pub is_auth: bool,
    pub is_capture: bool,
    pub is_standalone_payment: bool,
    pub is_voided: bool,
    pub is_refunded: bool,
    pub is_3d_secure: bool,
    pub integration_id: u64,
    pub has_parent_transaction: bool,
    pub order: u64,
    pub created_at: String,
    pub currency: String,
    pub source_data: SourceData,
    pub error_occured: bool,
    pub owner: String,
    /// Merchant's own order reference, not signed
    pub merchant_order_id: Option<String>,
    /// Acquirer response code, not signed
    pub txn_response_code: Option<String>,
    /// Human readable outcome (`data.message`), not signed
    pub message: Option<String>,
    /// Signature sent with the redirect
    pub hmac: Option<String>,
}

impl TransactionResponse {
    /// Decode a raw query string, with or without the leading `?`.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::from_pairs(url::form_urlencoded::parse(query.as_bytes()))
    }

    /// Decode already split query parameters.
    ///
    /// The first occurrence of a repeated name wins. Unknown names are
    /// ignored, absent ones decode to zero values.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut params: HashMap<String, String> = HashMap::new();
        for (name, value) in pairs {
            params.entry(name.into()).or_insert_with(|| value.into());
        }
        let params = Params(params);

        Self {
            id: params.number("id"),
            pending: params.flag("pending"),
            amount_cents: params.number("amount_cents"),
            success: params.flag("success"),
            is_auth: params.flag("is_auth"),
            is_capture: params.flag("is_capture"),
            is_standalone_payment: params.flag("is_standalone_payment"),
            is_voided: params.flag("is_voided"),
            is_refunded: params.flag("is_refunded"),
            is_3d_secure: params.flag("is_3d_secure"),
            integration_id: params.number("integration_id"),
            has_parent_transaction: params.flag("has_parent_transaction"),
            order: params.number("order"),
            created_at: params.text("created_at"),
            currency: params.text("currency"),
            source_data: SourceData {
                pan: params.text("source_data.pan"),
                sub_type: params.text("source_data.sub_type"),
                kind: params.text("source_data.type"),
            },
            error_occured: params.flag("error_occured"),
            owner: params.text("owner"),
            merchant_order_id: params.optional("merchant_order_id"),
            txn_response_code: params.optional("txn_response_code"),
            message: params.optional("data.message"),
            hmac: params.optional(HMAC_PARAM),
        }
    }
}

struct Params(HashMap<String, String>);

impl Params {
    fn text(&self, name: &str) -> String {
        self.0.get(name).cloned().unwrap_or_default()
    }

    fn optional(&self, name: &str) -> Option<String> {
        self.0.get(name).cloned()
    }

    fn number(&self, name: &str) -> u64 {
        self.0
            .get(name)
            .map(|v| lenient::parse_number(v))
            .unwrap_or_default()
    }

    fn flag(&self, name: &str) -> bool {
        self.0
            .get(name)
            .map(|v| lenient::parse_flag(v))
            .unwrap_or_default()
    }
}

impl From<&TransactionResponse> for SignedFields {
    fn from(txn: &TransactionResponse) -> Self {
        Self {
            amount_cents: txn.amount_cents,
            created_at: txn.created_at.clone(),
            currency: txn.currency.clone(),
            error_occured: txn.error_occured,
            has_parent_transaction: txn.has_parent_transaction,
            id: txn.id,
            integration_id: txn.integration_id,
            is_3d_secure: txn.is_3d_secure,
            is_auth: txn.is_auth,
            is_capture: txn.is_capture,
            is_refunded: txn.is_refunded,
            is_standalone_payment: txn.is_standalone_payment,
            is_voided: txn.is_voided,
            order_id: txn.order,
            owner: txn.owner.clone(),
            pending: txn.pending,
            source_data: txn.source_data.clone(),
            success: txn.success,
        }
    }
}

impl Callback for TransactionResponse {
    fn signed_fields(&self) -> SignedFields {
        SignedFields::from(self)
    }

    fn signature(&self) -> Option<&str> {
        self.hmac.as_deref()
    }
}
