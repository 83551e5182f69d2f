use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use polymarket_clob_tools::config::{ContractAddresses, SignatureType};
use polymarket_clob_tools::domain::{
    ApiCredentials, AssetType, CancelTarget, OrderFilter, OrderKind, OrderRequest, Side,
};
use polymarket_clob_tools::execution::{ClobClient, ClobError, ExchangeApi};
use polymarket_clob_tools::wallet::WalletSigner;

// Well-known local development key.
const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const TOKEN: &str = "1234567890";

fn creds() -> ApiCredentials {
    ApiCredentials {
        api_key: "test-key".to_string(),
        secret: "c2VjcmV0LWtleS1mb3ItdGVzdHM=".to_string(),
        passphrase: "test-pass".to_string(),
    }
}

fn client(server: &MockServer, creds: Option<ApiCredentials>) -> ClobClient {
    ClobClient::new(
        &server.uri(),
        WalletSigner::polygon(TEST_KEY).unwrap(),
        creds,
        SignatureType::Eoa,
        None,
        &ContractAddresses::polygon(None).unwrap(),
    )
    .unwrap()
}

fn order_json(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "status": "LIVE",
        "market": "0xmarket",
        "asset_id": TOKEN,
        "side": "BUY",
        "price": "0.4",
        "original_size": "10",
        "size_matched": "0",
        "created_at": 1_700_000_000,
        "expiration": "0",
        "order_type": "GTC"
    })
}

#[tokio::test]
async fn reads_collateral_balance_with_l2_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/balance-allowance"))
        .and(query_param("asset_type", "COLLATERAL"))
        .and(query_param("signature_type", "0"))
        .and(header_exists("poly_api_key"))
        .and(header_exists("poly_signature"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "balance": "12500000",
            "allowance": "115792089237316195423570985008687907853269984665640564039457584007913129639935"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let snapshot = client(&server, Some(creds()))
        .balance_allowance(&AssetType::Collateral)
        .await
        .unwrap();

    assert_eq!(snapshot.balance, dec!(12.5));
    assert_eq!(snapshot.allowance, Some(Decimal::MAX));
}

#[tokio::test]
async fn authenticated_calls_need_credentials() {
    let server = MockServer::start().await;
    Mock::given(path("/balance-allowance"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server, None)
        .balance_allowance(&AssetType::Collateral)
        .await
        .unwrap_err();
    assert!(matches!(err, ClobError::MissingCredentials));
}

#[tokio::test]
async fn follows_order_cursors_to_the_end_marker() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/orders"))
        .and(query_param("next_cursor", "MA=="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [order_json("0x1"), order_json("0x2")],
            "next_cursor": "Mg=="
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/orders"))
        .and(query_param("next_cursor", "Mg=="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [order_json("0x3")],
            "next_cursor": "LTE="
        })))
        .expect(1)
        .mount(&server)
        .await;

    let orders = client(&server, Some(creds()))
        .open_orders(&OrderFilter::default())
        .await
        .unwrap();

    let ids: Vec<&str> = orders.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids, vec!["0x1", "0x2", "0x3"]);
}

#[tokio::test]
async fn parses_partial_cancel() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/cancel-market-orders"))
        .and(body_partial_json(json!({ "market": "0xmarket", "asset_id": "" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "canceled": ["0x1"],
            "not_canceled": { "0x2": "order already matched" }
        })))
        .mount(&server)
        .await;

    let outcome = client(&server, Some(creds()))
        .cancel(&CancelTarget::Market("0xmarket".into()))
        .await
        .unwrap();

    assert_eq!(outcome.canceled, vec!["0x1".to_string()]);
    assert!(outcome.is_partial());
}

#[tokio::test]
async fn posts_signed_limit_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tick-size"))
        .and(query_param("token_id", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "minimum_tick_size": 0.01 })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/neg-risk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "neg_risk": false })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/order"))
        .and(body_partial_json(json!({
            "owner": "test-key",
            "orderType": "GTC",
            "order": {
                "tokenId": TOKEN,
                "makerAmount": "5000000",
                "takerAmount": "10000000",
                "side": "BUY"
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "orderID": "0xabc",
            "success": true,
            "status": "live"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = OrderRequest {
        token_id: TOKEN.to_string(),
        side: Side::Buy,
        kind: OrderKind::Limit,
        price: dec!(0.50),
        size: dec!(10),
    };
    let response = client(&server, Some(creds()))
        .place_order(&request)
        .await
        .unwrap();

    assert_eq!(response.order_id, "0xabc");
    assert!(response.success);
}

#[tokio::test]
async fn off_tick_limit_price_is_never_posted() {
    let server = MockServer::start().await;
    Mock::given(path("/tick-size"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "minimum_tick_size": "0.01" })))
        .mount(&server)
        .await;
    Mock::given(path("/neg-risk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "neg_risk": false })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/order"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(0)
        .mount(&server)
        .await;

    let request = OrderRequest {
        token_id: TOKEN.to_string(),
        side: Side::Buy,
        kind: OrderKind::Limit,
        price: dec!(0.505),
        size: dec!(100),
    };
    assert!(request.validate().is_ok());

    let err = client(&server, Some(creds()))
        .place_order(&request)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClobError::OffTickPrice { price, tick } if price == dec!(0.505) && tick == dec!(0.01)
    ));
}

#[tokio::test]
async fn rejected_order_keeps_the_remote_detail() {
    let server = MockServer::start().await;
    Mock::given(path("/tick-size"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "minimum_tick_size": "0.01" })))
        .mount(&server)
        .await;
    Mock::given(path("/neg-risk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "neg_risk": true })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/order"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "error": "not enough balance / allowance" })),
        )
        .mount(&server)
        .await;

    let request = OrderRequest {
        token_id: TOKEN.to_string(),
        side: Side::Buy,
        kind: OrderKind::Market,
        price: dec!(0.50),
        size: dec!(2),
    };
    let err = client(&server, Some(creds()))
        .place_order(&request)
        .await
        .unwrap_err();

    match &err {
        ClobError::Api { status, .. } => assert_eq!(*status, 400),
        other => panic!("unexpected error {:?}", other),
    }
    assert!(err.remote_detail().unwrap().contains("not enough balance"));
}

#[tokio::test]
async fn derives_key_when_create_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/api-key"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "error": "key exists" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/derive-api-key"))
        .and(header_exists("poly_signature"))
        .and(header_exists("poly_nonce"))
        .and(wiremock::matchers::header(
            "poly_address",
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "apiKey": "derived",
            "secret": "c2VjcmV0",
            "passphrase": "phrase"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let creds = client(&server, None).create_or_derive_api_key().await.unwrap();
    assert_eq!(creds.api_key, "derived");
}
