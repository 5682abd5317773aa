//! Callback verification through the public API

use paymob::callback::SourceData;
use paymob::{
    sign_hmac, verify_hmac, Callback, SignedFields, TransactionProcessed, TransactionResponse,
};
use serde_json::json;

const SECRET: &[u8] = b"merchant-hmac-secret";

fn signed_webhook() -> (TransactionProcessed, String) {
    let callback = TransactionProcessed::from_value(json!({
        "type": "TRANSACTION",
        "obj": {
            "id": 192036465,
            "pending": false,
            "amount_cents": 25000,
            "success": false,
            "is_auth": false,
            "is_capture": false,
            "is_standalone_payment": true,
            "is_voided": false,
            "is_refunded": false,
            "is_3d_secure": false,
            "integration_id": 4097558,
            "has_parent_transaction": false,
            "order": {"id": 217503754},
            "created_at": "2024-06-13T11:33:44.592345",
            "currency": "EGP",
            "source_data": {"pan": "01010101010", "type": "wallet", "sub_type": "wallet"},
            "error_occured": false,
            "owner": 302852
        }
    }))
    .unwrap();
    let signature = sign_hmac(&callback.canonical_string(), SECRET);
    (callback, signature)
}

#[test]
fn test_webhook_round_trip_through_signature() {
    let (callback, signature) = signed_webhook();
    assert_eq!(
        callback.canonical_string(),
        "250002024-06-13T11:33:44.592345EGPfalsefalse1920364654097558falsefalsefalsefalsetruefalse217503754302852false01010101010walletwalletfalse"
    );
    assert!(callback.verify(&signature, SECRET));
}

#[test]
fn test_redirect_matches_webhook_signature() {
    let (_, signature) = signed_webhook();
    let query = format!(
        "amount_cents=25000&created_at=2024-06-13T11%3A33%3A44.592345&currency=EGP\
         &error_occured=false&has_parent_transaction=false&id=192036465\
         &integration_id=4097558&is_3d_secure=false&is_auth=false&is_capture=false\
         &is_refunded=false&is_standalone_payment=true&is_voided=false&order=217503754\
         &owner=302852&pending=false&source_data.pan=01010101010\
         &source_data.sub_type=wallet&source_data.type=wallet&success=false&hmac={}",
        signature
    );

    let redirect = TransactionResponse::from_query(&query);
    assert!(redirect.verify_carried(SECRET));
}

#[test]
fn test_key_change_rejected() {
    let (callback, signature) = signed_webhook();
    assert!(!callback.verify(&signature, b"merchant-hmac-secreT"));
}

#[test]
fn test_garbage_signature_rejected() {
    let (callback, _) = signed_webhook();
    let wrong_full = "a".repeat(128);
    let odd_length = "a".repeat(127);
    for signature in ["", "zz", "0x00", "💳", wrong_full.as_str(), odd_length.as_str()] {
        assert!(!callback.verify(signature, SECRET), "accepted {:?}", signature);
    }
}

#[test]
fn test_whitespace_around_signature_tolerated() {
    let (callback, signature) = signed_webhook();
    assert!(callback.verify(&format!(" {}\n", signature), SECRET));
}

#[test]
fn test_string_fields_passed_verbatim() {
    let fields = SignedFields {
        created_at: " 2024 ".to_string(),
        owner: "007".to_string(),
        source_data: SourceData {
            pan: "&=%".to_string(),
            ..SourceData::default()
        },
        ..SignedFields::default()
    };
    let canonical = fields.canonical_string();
    assert!(canonical.contains(" 2024 "));
    assert!(canonical.contains("007"));
    assert!(canonical.contains("&=%"));

    let signature = sign_hmac(&canonical, SECRET);
    assert!(verify_hmac(&canonical, &signature, SECRET));
}

#[test]
fn test_verification_is_thread_safe() {
    let (callback, signature) = signed_webhook();
    let callback = std::sync::Arc::new(callback);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let callback = callback.clone();
            let signature = signature.clone();
            std::thread::spawn(move || callback.verify(&signature, SECRET))
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
