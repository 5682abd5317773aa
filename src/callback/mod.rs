//! Transaction callback verification
//!
//! Accept notifies the merchant about a transaction twice: the customer is
//! redirected back with the transaction flattened into query parameters
//! ([`redirect::TransactionResponse`]), and the merchant server receives a JSON
//! webhook with the same transaction nested under `obj`
//! ([`processed::TransactionProcessed`]).
//!
//! Both carry an `hmac` computed by Accept: HMAC-SHA512, keyed with the
//! merchant's HMAC secret, over twenty transaction fields concatenated in a
//! fixed order with no separators. Both shapes project onto [`SignedFields`],
//! which renders that concatenation.
//!
//! Callback input is untrusted, so decoding is permissive and a bad signature
//! is a `false`, never an error.

use chrono::NaiveDateTime;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha512;

mod lenient;
pub mod processed;
pub mod redirect;

pub use processed::{ProcessedTransaction, TransactionProcessed};
pub use redirect::TransactionResponse;

type HmacSha512 = Hmac<Sha512>;

/// Name of the signature parameter Accept sends alongside callbacks
pub const HMAC_PARAM: &str = "hmac";

/// Card details attached to a transaction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceData {
    /// Masked card number, usually the last four digits
    #[serde(deserialize_with = "lenient::string")]
    pub pan: String,
    /// Card brand, e.g. `MasterCard`
    #[serde(deserialize_with = "lenient::string")]
    pub sub_type: String,
    /// Source kind, e.g. `card` or `wallet`
    #[serde(rename = "type", deserialize_with = "lenient::string")]
    pub kind: String,
}

/// The transaction fields covered by the callback signature
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignedFields {
    pub amount_cents: u64,
    pub created_at: String,
    pub currency: String,
    pub error_occured: bool,
    pub has_parent_transaction: bool,
    pub id: u64,
    pub integration_id: u64,
    pub is_3d_secure: bool,
    pub is_auth: bool,
    pub is_capture: bool,
    pub is_refunded: bool,
    pub is_standalone_payment: bool,
    pub is_voided: bool,
    pub order_id: u64,
    /// Owner as its literal text; numeric in webhooks, a string in redirects
    pub owner: String,
    pub pending: bool,
    pub source_data: SourceData,
    pub success: bool,
}

impl SignedFields {
    /// Concatenate the signed fields in the order Accept hashes them.
    ///
    /// Numbers are plain decimal, booleans are `true`/`false` and strings are
    /// passed through untouched.
    pub fn canonical_string(&self) -> String {
        format!(
            "{}{}{}{}{}{}{}{}{}{}{}{}{}{}{}{}{}{}{}{}",
            self.amount_cents,
            self.created_at,
            self.currency,
            self.error_occured,
            self.has_parent_transaction,
            self.id,
            self.integration_id,
            self.is_3d_secure,
            self.is_auth,
            self.is_capture,
            self.is_refunded,
            self.is_standalone_payment,
            self.is_voided,
            self.order_id,
            self.owner,
            self.pending,
            self.source_data.pan,
            self.source_data.sub_type,
            self.source_data.kind,
            self.success,
        )
    }

    /// Outcome of the transaction as reported by its flags
    pub fn status(&self) -> TransactionStatus {
        if self.pending {
            TransactionStatus::Pending
        } else if self.is_voided {
            TransactionStatus::Voided
        } else if self.is_refunded {
            TransactionStatus::Refunded
        } else if self.success {
            TransactionStatus::Succeeded
        } else {
            TransactionStatus::Failed
        }
    }

    /// Parse `created_at`, which Accept sends without an offset
    pub fn created_at_parsed(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.created_at, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .or_else(|| {
                chrono::DateTime::parse_from_rfc3339(&self.created_at)
                    .ok()
                    .map(|dt| dt.naive_utc())
            })
    }
}

/// Transaction outcome derived from callback flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Succeeded,
    Failed,
    Voided,
    Refunded,
}

/// A decoded callback that can be checked against its signature
pub trait Callback {
    /// Project the callback onto the signed fields
    fn signed_fields(&self) -> SignedFields;

    /// Signature carried with the callback, if any
    fn signature(&self) -> Option<&str>;

    /// The string Accept signed for this callback
    fn canonical_string(&self) -> String {
        self.signed_fields().canonical_string()
    }

    /// Check `expected_hex` against this callback
    fn verify(&self, expected_hex: &str, key: &[u8]) -> bool {
        verify_hmac(&self.canonical_string(), expected_hex, key)
    }

    /// Check the signature carried by the callback itself
    fn verify_carried(&self, key: &[u8]) -> bool {
        match self.signature() {
            Some(signature) => self.verify(signature, key),
            None => {
                tracing::debug!("Callback carries no signature");
                false
            }
        }
    }
}

/// Verify a hex-encoded HMAC-SHA512 of `message` under `key`.
///
/// Returns `false` for non-hex input or a digest of the wrong length. The
/// comparison runs in constant time.
pub fn verify_hmac(message: &str, expected_hex: &str, key: &[u8]) -> bool {
    let expected = match hex::decode(expected_hex.trim()) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!("Callback signature is not valid hex: {e}");
            return false;
        }
    };

    let Ok(mut mac) = HmacSha512::new_from_slice(key) else {
        return false;
    };
    mac.update(message.as_bytes());

    let valid = mac.verify_slice(&expected).is_ok();
    tracing::debug!(valid, "Checked callback signature");
    valid
}

/// Compute the lowercase hex HMAC-SHA512 of `message` under `key`
pub fn sign_hmac(message: &str, key: &[u8]) -> String {
    let mut mac = HmacSha512::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const GOLDEN_MESSAGE: &str = "1002024-01-01T10:00:00.000000EGPfalsefalse12345678truefalsefalsefalsetruefalse987642false2346MasterCardcardtrue";
    pub(crate) const GOLDEN_HMAC: &str = "65ff0e9891c22b2ec0cdbcc50e091b150cccae4e85091f53f102d9aeb4e94a6289b78af7c994e97f6608f388935cc5e02ae508b53796a3411b17b6f8b66e4741";

    pub(crate) fn sample_fields() -> SignedFields {
        SignedFields {
            amount_cents: 100,
            created_at: "2024-01-01T10:00:00.000000".to_string(),
            currency: "EGP".to_string(),
            error_occured: false,
            has_parent_transaction: false,
            id: 12345,
            integration_id: 678,
            is_3d_secure: true,
            is_auth: false,
            is_capture: false,
            is_refunded: false,
            is_standalone_payment: true,
            is_voided: false,
            order_id: 9876,
            owner: "42".to_string(),
            pending: false,
            source_data: SourceData {
                pan: "2346".to_string(),
                sub_type: "MasterCard".to_string(),
                kind: "card".to_string(),
            },
            success: true,
        }
    }

    #[test]
    fn test_canonical_string_order() {
        assert_eq!(sample_fields().canonical_string(), GOLDEN_MESSAGE);
    }

    #[test]
    fn test_canonical_string_of_empty_fields() {
        assert_eq!(
            SignedFields::default().canonical_string(),
            "0falsefalse00falsefalsefalsefalsefalsefalse0falsefalse"
        );
    }

    #[test]
    fn test_golden_vector() {
        assert_eq!(sign_hmac(GOLDEN_MESSAGE, b"k"), GOLDEN_HMAC);
        assert!(verify_hmac(GOLDEN_MESSAGE, GOLDEN_HMAC, b"k"));
    }

    #[test]
    fn test_uppercase_hex_accepted() {
        assert!(verify_hmac(GOLDEN_MESSAGE, &GOLDEN_HMAC.to_uppercase(), b"k"));
    }

    #[test]
    fn test_wrong_key_rejected() {
        assert!(!verify_hmac(GOLDEN_MESSAGE, GOLDEN_HMAC, b"K"));
        assert!(!verify_hmac(GOLDEN_MESSAGE, GOLDEN_HMAC, b""));
    }

    #[test]
    fn test_every_single_character_flip_rejected() {
        for i in 0..GOLDEN_HMAC.len() {
            let mut tampered: Vec<u8> = GOLDEN_HMAC.bytes().collect();
            tampered[i] = if tampered[i] == b'0' { b'1' } else { b'0' };
            let tampered = String::from_utf8(tampered).unwrap();
            assert!(
                !verify_hmac(GOLDEN_MESSAGE, &tampered, b"k"),
                "flip at {} accepted",
                i
            );
        }
    }

    #[test]
    fn test_message_change_rejected() {
        let mut fields = sample_fields();
        fields.amount_cents = 1000;
        assert!(!verify_hmac(&fields.canonical_string(), GOLDEN_HMAC, b"k"));
    }

    #[test]
    fn test_malformed_hex_rejected() {
        assert!(!verify_hmac(GOLDEN_MESSAGE, "not-a-valid-signature", b"k"));
        assert!(!verify_hmac(GOLDEN_MESSAGE, "abc", b"k"));
        assert!(!verify_hmac(GOLDEN_MESSAGE, "", b"k"));
    }

    #[test]
    fn test_truncated_digest_rejected() {
        assert!(!verify_hmac(GOLDEN_MESSAGE, &GOLDEN_HMAC[..64], b"k"));
        let extended = format!("{}00", GOLDEN_HMAC);
        assert!(!verify_hmac(GOLDEN_MESSAGE, &extended, b"k"));
    }

    #[test]
    fn test_status_from_flags() {
        let mut fields = sample_fields();
        assert_eq!(fields.status(), TransactionStatus::Succeeded);

        fields.success = false;
        assert_eq!(fields.status(), TransactionStatus::Failed);

        fields.is_refunded = true;
        assert_eq!(fields.status(), TransactionStatus::Refunded);

        fields.is_voided = true;
        assert_eq!(fields.status(), TransactionStatus::Voided);

        fields.pending = true;
        assert_eq!(fields.status(), TransactionStatus::Pending);
    }

    #[test]
    fn test_created_at_parsing() {
        let fields = sample_fields();
        let parsed = fields.created_at_parsed().unwrap();
        assert_eq!(parsed.to_string(), "2024-01-01 10:00:00");

        let mut fields = sample_fields();
        fields.created_at = "2024-01-01T12:00:00+02:00".to_string();
        assert_eq!(
            fields.created_at_parsed().unwrap().to_string(),
            "2024-01-01 10:00:00"
        );

        fields.created_at = "yesterday".to_string();
        assert!(fields.created_at_parsed().is_none());
    }
}
