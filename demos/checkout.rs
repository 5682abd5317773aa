//! Start a hosted checkout and print the iframe URL
//!
//! Reads `PAYMOB_API_KEY`, `PAYMOB_INTEGRATION_ID` and `PAYMOB_IFRAME_ID`.

use paymob::{BillingData, Item, PaymobClient};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = PaymobClient::from_env()?;

    let items = vec![
        Item::new("Espresso", 4500, "Double shot", 2),
        Item::new("Croissant", 3000, "Butter croissant", 1),
    ];
    let total = items.iter().map(|i| i.amount_cents * i.quantity).sum();
    let billing = BillingData::new("Ada", "Lovelace", "ada@example.com", "+201000000000")
        .with_city("Cairo")
        .with_country("EG");

    let checkout = client.checkout(items, total, billing).await?;

    println!("Order {} registered", checkout.order_id);
    println!("Send the customer to: {}", checkout.iframe_url);

    Ok(())
}
