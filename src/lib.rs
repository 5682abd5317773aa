//! # paymob - Accept payment gateway client
//!
//! A client for the Paymob Accept API: obtain an auth token, register an order,
//! request a payment key and send the customer to the hosted checkout iframe.
//! Transaction callbacks coming back from Accept, both the browser redirect and
//! the server-to-server webhook, are verified with the merchant's HMAC secret.
//!
//! ```no_run
//! use paymob::{BillingData, Item, PaymobClient, PaymobConfig};
//!
//! # async fn run() -> paymob::Result<()> {
//! let config = PaymobConfig::new("api-key")
//!     .with_integration_id("123456")
//!     .with_iframe_id("7890");
//! let client = PaymobClient::new(config)?;
//!
//! let checkout = client
//!     .checkout(
//!         vec![Item::new("Mug", 5000, "Ceramic mug", 1)],
//!         5000,
//!         BillingData::new("Ada", "Lovelace", "ada@example.com", "+201000000000"),
//!     )
//!     .await?;
//! println!("{}", checkout.iframe_url);
//! # Ok(())
//! # }
//! ```

pub mod callback;
pub mod client;
pub mod config;
pub mod error;
pub mod types;

// Re-exports for convenience
pub use callback::{
    sign_hmac, verify_hmac, Callback, SignedFields, TransactionProcessed, TransactionResponse,
    TransactionStatus,
};
pub use client::{iframe_url, PaymobClient};
pub use config::PaymobConfig;
pub use error::{PaymobError, Result};
pub use types::*;

// Feature-gated framework support
#[cfg(feature = "axum")]
pub mod axum;

/// Current version of the paymob library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
