use reqwest::Client;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::errors::ClobError;
use super::send_json;
use crate::domain::{Quote, Side};

/* ===============================
PUBLIC MARKET DATA RESPONSES
=============================== */

#[derive(Debug, Deserialize)]
struct PriceResponse {
    price: Decimal,
}

#[derive(Debug, Deserialize)]
struct MidpointResponse {
    mid: Decimal,
}

#[derive(Debug, Deserialize)]
struct TickSizeResponse {
    minimum_tick_size: Decimal,
}

#[derive(Debug, Deserialize)]
struct NegRiskResponse {
    neg_risk: bool,
}

async fn get_public<T: DeserializeOwned>(
    http: &Client,
    host: &str,
    path: &str,
    query: &[(&str, &str)],
) -> Result<T, ClobError> {
    send_json(http.get(format!("{}{}", host, path)).query(query), path).await
}

/* ===============================
PRICES
=============================== */

/// Best price resting on `side` of the book: `Buy` gives the best bid (what
/// a seller gets instantly), `Sell` the best ask (what a buyer pays).
pub async fn fetch_price(
    http: &Client,
    host: &str,
    token_id: &str,
    side: Side,
) -> Result<Decimal, ClobError> {
    let resp: PriceResponse = get_public(
        http,
        host,
        "/price",
        &[("token_id", token_id), ("side", side.as_str())],
    )
    .await?;
    Ok(resp.price)
}

pub async fn fetch_midpoint(http: &Client, host: &str, token_id: &str) -> Result<Decimal, ClobError> {
    let resp: MidpointResponse =
        get_public(http, host, "/midpoint", &[("token_id", token_id)]).await?;
    Ok(resp.mid)
}

pub async fn fetch_quote(http: &Client, host: &str, token_id: &str) -> Result<Quote, ClobError> {
    let ask = fetch_price(http, host, token_id, Side::Sell).await?;
    let bid = fetch_price(http, host, token_id, Side::Buy).await?;
    let mid = fetch_midpoint(http, host, token_id).await?;
    Ok(Quote { bid, ask, mid })
}

/* ===============================
MARKET PARAMETERS
=============================== */

pub async fn fetch_tick_size(http: &Client, host: &str, token_id: &str) -> Result<Decimal, ClobError> {
    let resp: TickSizeResponse =
        get_public(http, host, "/tick-size", &[("token_id", token_id)]).await?;
    Ok(resp.minimum_tick_size.round_dp(6).normalize())
}

pub async fn fetch_neg_risk(http: &Client, host: &str, token_id: &str) -> Result<bool, ClobError> {
    let resp: NegRiskResponse =
        get_public(http, host, "/neg-risk", &[("token_id", token_id)]).await?;
    Ok(resp.neg_risk)
}
