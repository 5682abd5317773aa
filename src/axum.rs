//! Axum integration for Accept callbacks
//!
//! [`VerifiedRedirect`] and [`VerifiedProcessed`] decode a callback and only
//! hand it to the handler when its `hmac` matches. The HMAC secret is taken
//! from router state through [`FromRef`].
//!
//! ```no_run
//! use axum::{routing::{get, post}, Router};
//! use paymob::axum::{CallbackSecret, VerifiedProcessed, VerifiedRedirect};
//!
//! async fn redirected(VerifiedRedirect(txn): VerifiedRedirect) -> &'static str {
//!     if txn.success { "paid" } else { "declined" }
//! }
//!
//! async fn processed(VerifiedProcessed(callback): VerifiedProcessed) {
//!     tracing::info!(order_id = callback.obj.order_id, "Transaction processed");
//! }
//!
//! let app: Router = Router::new()
//!     .route("/paymob/response", get(redirected))
//!     .route("/paymob/processed", post(processed))
//!     .with_state(CallbackSecret::new("hmac-secret"));
//! ```

use crate::callback::{Callback, TransactionProcessed, TransactionResponse, HMAC_PARAM};
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRef, FromRequest, FromRequestParts, Request},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// HMAC secret shared with Accept
#[derive(Clone)]
pub struct CallbackSecret(Arc<[u8]>);

impl CallbackSecret {
    /// Wrap a secret
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self(Arc::from(secret.as_ref()))
    }

    /// Secret bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for CallbackSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CallbackSecret(<redacted>)")
    }
}

impl From<&crate::PaymobConfig> for CallbackSecret {
    fn from(config: &crate::PaymobConfig) -> Self {
        Self::new(&config.hmac_secret)
    }
}

/// Why a callback was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackRejection {
    /// No `hmac` was sent
    MissingSignature,
    /// The `hmac` does not match the payload
    InvalidSignature,
    /// The webhook body could not be read or is not JSON
    MalformedBody,
}

impl CallbackRejection {
    fn status(&self) -> StatusCode {
        match self {
            Self::MissingSignature | Self::InvalidSignature => StatusCode::UNAUTHORIZED,
            Self::MalformedBody => StatusCode::BAD_REQUEST,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            Self::MissingSignature => "missing callback signature",
            Self::InvalidSignature => "invalid callback signature",
            Self::MalformedBody => "malformed callback body",
        }
    }
}

impl IntoResponse for CallbackRejection {
    fn into_response(self) -> Response {
        tracing::warn!(reason = self.message(), "Rejected Paymob callback");
        (self.status(), self.message()).into_response()
    }
}

fn check<C: Callback>(callback: &C, secret: &CallbackSecret) -> Result<(), CallbackRejection> {
    let Some(signature) = callback.signature() else {
        return Err(CallbackRejection::MissingSignature);
    };
    if !callback.verify(signature, secret.as_bytes()) {
        return Err(CallbackRejection::InvalidSignature);
    }
    Ok(())
}

/// Redirect callback whose query-string signature has been verified
#[derive(Debug, Clone)]
pub struct VerifiedRedirect(pub TransactionResponse);

#[async_trait]
impl<S> FromRequestParts<S> for VerifiedRedirect
where
    S: Send + Sync,
    CallbackSecret: FromRef<S>,
{
    type Rejection = CallbackRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let secret = CallbackSecret::from_ref(state);
        let txn = TransactionResponse::from_query(parts.uri.query().unwrap_or_default());
        check(&txn, &secret)?;
        tracing::debug!(transaction_id = txn.id, order_id = txn.order, "Verified redirect callback");
        Ok(Self(txn))
    }
}

/// Webhook whose signature has been verified.
///
/// The `hmac` query parameter takes precedence over an `hmac` body field.
#[derive(Debug, Clone)]
pub struct VerifiedProcessed(pub TransactionProcessed);

#[async_trait]
impl<S> FromRequest<S> for VerifiedProcessed
where
    S: Send + Sync,
    CallbackSecret: FromRef<S>,
{
    type Rejection = CallbackRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let secret = CallbackSecret::from_ref(state);
        let query_signature = req.uri().query().and_then(|query| {
            url::form_urlencoded::parse(query.as_bytes())
                .find(|(name, _)| name == HMAC_PARAM)
                .map(|(_, value)| value.into_owned())
        });

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|_| CallbackRejection::MalformedBody)?;
        let mut callback = TransactionProcessed::from_json(&body).map_err(|e| {
            tracing::debug!("Failed to decode webhook body: {e}");
            CallbackRejection::MalformedBody
        })?;
        if query_signature.is_some() {
            callback.hmac = query_signature;
        }

        check(&callback, &secret)?;
        tracing::debug!(
            transaction_id = callback.obj.id,
            order_id = callback.obj.order_id,
            "Verified processed callback"
        );
        Ok(Self(callback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_debug_redacted() {
        let secret = CallbackSecret::new("topsecret");
        assert_eq!(secret.as_bytes(), b"topsecret");
        assert!(!format!("{:?}", secret).contains("topsecret"));
    }

    #[test]
    fn test_rejection_status() {
        assert_eq!(
            CallbackRejection::InvalidSignature.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            CallbackRejection::MalformedBody.into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_secret_from_config() {
        let config = crate::PaymobConfig::new("key").with_hmac_secret("s3cret");
        assert_eq!(CallbackSecret::from(&config).as_bytes(), b"s3cret");
    }
}
