//! Axum server receiving verified Paymob callbacks
//!
//! Reads `PAYMOB_HMAC_SECRET`. Point the integration's "transaction processed"
//! callback at `/paymob/processed` and its "transaction response" callback at
//! `/paymob/response`.

use axum::{
    routing::{get, post},
    Router,
};
use paymob::axum::{CallbackSecret, VerifiedProcessed, VerifiedRedirect};
use paymob::TransactionStatus;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let secret = std::env::var("PAYMOB_HMAC_SECRET")?;

    let app = Router::new()
        .route("/paymob/response", get(redirected))
        .route("/paymob/processed", post(processed))
        .with_state(CallbackSecret::new(secret));

    let listener = tokio::net::TcpListener::bind("0.0.0.0:4021").await?;
    tracing::info!("Listening for Paymob callbacks on 0.0.0.0:4021");
    axum::serve(listener, app).await?;

    Ok(())
}

async fn redirected(VerifiedRedirect(txn): VerifiedRedirect) -> &'static str {
    use paymob::Callback;

    match txn.signed_fields().status() {
        TransactionStatus::Succeeded => "Payment received, thank you!",
        TransactionStatus::Pending => "Payment is being processed.",
        _ => "Payment was not completed.",
    }
}

async fn processed(VerifiedProcessed(callback): VerifiedProcessed) {
    use paymob::Callback;

    let fields = callback.signed_fields();
    tracing::info!(
        transaction_id = fields.id,
        order_id = fields.order_id,
        amount_cents = fields.amount_cents,
        status = ?fields.status(),
        "Transaction processed"
    );
}
