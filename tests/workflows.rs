use anyhow::anyhow;
use async_trait::async_trait;
use ethers::types::{Address, TxHash, U256};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use polymarket_clob_tools::domain::{
    AllowanceSet, ApiCredentials, ApprovalStep, AssetType, BalanceSnapshot, CancelOutcome,
    CancelTarget, LandingStatus, OpenOrder, OrderFilter, OrderKind, OrderRequest, OrderResponse,
    Quote, Side, Spender, GRANT_SEQUENCE,
};
use polymarket_clob_tools::domain::order::ValidationError;
use polymarket_clob_tools::execution::{ClobError, CredentialApi, ExchangeApi};
use polymarket_clob_tools::wallet::{AllowanceGateway, FeeBid, TokenBalance, WalletReader};
use polymarket_clob_tools::workflow::allowance_setup::{
    check_phase, grant_phase, setup_allowances, AllowanceError, AllowanceOptions, SetupOutcome,
};
use polymarket_clob_tools::workflow::balance::{check_balance, check_landing};
use polymarket_clob_tools::workflow::cancel::cancel_orders;
use polymarket_clob_tools::workflow::credentials::bootstrap_credentials;
use polymarket_clob_tools::workflow::list_orders::list_orders;
use polymarket_clob_tools::workflow::order_placement::{
    place_order, PlacementOptions, PreflightError, ScoringStatus,
};

const TOKEN: &str = "71321045679252212594626385532706912750332728571942532289631379312455583992563";

fn api_error(path: &str) -> ClobError {
    ClobError::Api {
        path: path.to_string(),
        status: 500,
        body: r#"{"error":"internal"}"#.to_string(),
    }
}

// ==================================================
// FAKE EXCHANGE
// ==================================================

#[derive(Default)]
struct FakeExchange {
    collateral: Decimal,
    conditional: Decimal,
    quote_fails: bool,
    balance_fails: bool,
    cancel_fails: bool,
    scoring_fails_for: HashSet<String>,
    response: OrderResponse,
    cancel_outcome: CancelOutcome,
    orders: Vec<OpenOrder>,

    balance_requests: Mutex<Vec<AssetType>>,
    placed: Mutex<Vec<OrderRequest>>,
    scoring_requests: Mutex<Vec<String>>,
    open_order_requests: Mutex<usize>,
}

impl FakeExchange {
    fn funded(collateral: Decimal) -> Self {
        Self {
            collateral,
            response: OrderResponse {
                order_id: "0xorder".to_string(),
                success: true,
                status: Some("live".to_string()),
                error_msg: None,
            },
            ..Default::default()
        }
    }

    fn placed(&self) -> Vec<OrderRequest> {
        self.placed.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExchangeApi for FakeExchange {
    fn address(&self) -> Address {
        Address::repeat_byte(0x11)
    }

    async fn balance_allowance(&self, asset: &AssetType) -> Result<BalanceSnapshot, ClobError> {
        self.balance_requests.lock().unwrap().push(asset.clone());
        if self.balance_fails {
            return Err(api_error("/balance-allowance"));
        }
        let balance = match asset {
            AssetType::Collateral => self.collateral,
            AssetType::Conditional(_) => self.conditional,
        };
        Ok(BalanceSnapshot {
            balance,
            allowance: Some(Decimal::MAX),
        })
    }

    async fn quote(&self, _token_id: &str) -> Result<Quote, ClobError> {
        if self.quote_fails {
            return Err(api_error("/price"));
        }
        Ok(Quote {
            bid: dec!(0.48),
            ask: dec!(0.52),
            mid: dec!(0.50),
        })
    }

    async fn place_order(&self, request: &OrderRequest) -> Result<OrderResponse, ClobError> {
        self.placed.lock().unwrap().push(request.clone());
        Ok(self.response.clone())
    }

    async fn is_order_scoring(&self, order_id: &str) -> Result<bool, ClobError> {
        self.scoring_requests.lock().unwrap().push(order_id.to_string());
        if self.scoring_fails_for.contains(order_id) {
            return Err(api_error("/order-scoring"));
        }
        Ok(true)
    }

    async fn cancel(&self, _target: &CancelTarget) -> Result<CancelOutcome, ClobError> {
        if self.cancel_fails {
            return Err(api_error("/cancel-all"));
        }
        Ok(self.cancel_outcome.clone())
    }

    async fn open_orders(&self, _filter: &OrderFilter) -> Result<Vec<OpenOrder>, ClobError> {
        *self.open_order_requests.lock().unwrap() += 1;
        Ok(self.orders.clone())
    }
}

fn request(side: Side, kind: OrderKind, price: Decimal, size: Decimal) -> OrderRequest {
    OrderRequest {
        token_id: TOKEN.to_string(),
        side,
        kind,
        price,
        size,
    }
}

fn no_delay() -> PlacementOptions {
    PlacementOptions {
        scoring_delay: Duration::ZERO,
    }
}

fn open_order(id: &str, side: &str) -> OpenOrder {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "status": "LIVE",
        "market": "0xmarket",
        "asset_id": TOKEN,
        "side": side,
        "price": "0.45",
        "original_size": "10",
        "size_matched": "2.5",
        "created_at": 1_700_000_000,
        "expiration": "0",
    }))
    .unwrap()
}

// ==================================================
// ORDER PLACEMENT
// ==================================================

#[tokio::test]
async fn insufficient_collateral_aborts_before_placement() {
    let exchange = FakeExchange::funded(dec!(40));
    let order = request(Side::Buy, OrderKind::Limit, dec!(0.50), dec!(100));

    let err = place_order(&exchange, &order, &no_delay()).await.unwrap_err();

    assert_eq!(
        err.downcast_ref::<PreflightError>(),
        Some(&PreflightError::Insufficient {
            asset: "USDC",
            available: dec!(40),
            required: dec!(50),
        })
    );
    assert!(exchange.placed().is_empty());
}

#[tokio::test]
async fn market_buy_needs_the_full_dollar_size() {
    // $100 at 50¢: the market order needs $100, the limit order only $50.
    let exchange = FakeExchange::funded(dec!(60));

    let market = request(Side::Buy, OrderKind::Market, dec!(0.50), dec!(100));
    assert!(place_order(&exchange, &market, &no_delay()).await.is_err());

    let limit = request(Side::Buy, OrderKind::Limit, dec!(0.50), dec!(100));
    let report = place_order(&exchange, &limit, &no_delay()).await.unwrap();
    assert!(report.response.success);
    assert_eq!(exchange.placed(), vec![limit]);
}

#[tokio::test]
async fn validation_failure_makes_no_calls() {
    let exchange = FakeExchange::funded(dec!(1000));
    let order = request(Side::Buy, OrderKind::Limit, dec!(0.50), dec!(4));

    let err = place_order(&exchange, &order, &no_delay()).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ValidationError>(),
        Some(ValidationError::LimitBelowMinimumShares(_))
    ));
    assert!(exchange.balance_requests.lock().unwrap().is_empty());
    assert!(exchange.placed().is_empty());
}

#[tokio::test]
async fn quote_failure_does_not_block_placement() {
    let exchange = FakeExchange {
        quote_fails: true,
        ..FakeExchange::funded(dec!(100))
    };
    let order = request(Side::Buy, OrderKind::Market, dec!(0.50), dec!(10));

    let report = place_order(&exchange, &order, &no_delay()).await.unwrap();

    assert!(report.quote.is_none());
    assert_eq!(exchange.placed().len(), 1);
    assert_eq!(report.scoring, None);
}

#[tokio::test]
async fn scoring_failure_is_reported_as_unknown() {
    let exchange = FakeExchange {
        scoring_fails_for: HashSet::from(["0xorder".to_string()]),
        ..FakeExchange::funded(dec!(100))
    };
    let order = request(Side::Buy, OrderKind::Limit, dec!(0.49), dec!(10));

    let report = place_order(&exchange, &order, &no_delay()).await.unwrap();

    assert_eq!(report.scoring, Some(ScoringStatus::Unknown));
    assert!(report.quote.is_some());
}

#[tokio::test]
async fn accepted_limit_order_without_id_scores_unknown() {
    let exchange = FakeExchange {
        response: OrderResponse {
            order_id: String::new(),
            success: true,
            status: Some("live".to_string()),
            error_msg: None,
        },
        ..FakeExchange::funded(dec!(100))
    };
    let order = request(Side::Buy, OrderKind::Limit, dec!(0.49), dec!(10));

    let report = place_order(&exchange, &order, &no_delay()).await.unwrap();

    assert_eq!(report.scoring, Some(ScoringStatus::Unknown));
    assert!(exchange.scoring_requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn oversized_market_buy_is_rejected_without_calls() {
    let exchange = FakeExchange::funded(dec!(10));
    let order = request(Side::Buy, OrderKind::Market, dec!(0.50), Decimal::MAX);

    let err = place_order(&exchange, &order, &no_delay()).await.unwrap_err();

    assert_eq!(
        err.downcast_ref::<ValidationError>(),
        Some(&ValidationError::SizeTooLarge(Decimal::MAX))
    );
    assert!(exchange.balance_requests.lock().unwrap().is_empty());
    assert!(exchange.placed().is_empty());
}

#[tokio::test]
async fn market_sell_under_one_dollar_is_rejected() {
    let exchange = FakeExchange {
        conditional: dec!(100),
        ..FakeExchange::funded(dec!(0))
    };
    let order = request(Side::Sell, OrderKind::Market, dec!(0.10), dec!(5));

    let err = place_order(&exchange, &order, &no_delay()).await.unwrap_err();

    assert_eq!(
        err.downcast_ref::<ValidationError>(),
        Some(&ValidationError::MarketBelowMinimum(dec!(0.50)))
    );
    assert!(exchange.placed().is_empty());
}

#[tokio::test]
async fn sell_checks_the_token_balance() {
    let exchange = FakeExchange {
        conditional: dec!(3),
        ..FakeExchange::funded(dec!(1000))
    };
    let order = request(Side::Sell, OrderKind::Limit, dec!(0.60), dec!(5));

    let err = place_order(&exchange, &order, &no_delay()).await.unwrap_err();

    assert!(err.downcast_ref::<PreflightError>().is_some());
    assert_eq!(
        exchange.balance_requests.lock().unwrap().as_slice(),
        &[AssetType::Conditional(TOKEN.to_string())]
    );
    assert!(exchange.placed().is_empty());
}

// ==================================================
// CANCEL & LIST
// ==================================================

#[tokio::test]
async fn partial_cancel_is_success() {
    let mut outcome = CancelOutcome::default();
    outcome.canceled.push("0x1".to_string());
    outcome
        .not_canceled
        .insert("0x2".to_string(), "order already matched".to_string());
    let exchange = FakeExchange {
        cancel_outcome: outcome.clone(),
        orders: vec![open_order("0x1", "BUY"), open_order("0x2", "SELL")],
        ..Default::default()
    };

    let result = cancel_orders(&exchange, &CancelTarget::All).await.unwrap();

    assert_eq!(result, outcome);
    assert_eq!(*exchange.open_order_requests.lock().unwrap(), 1);
}

#[tokio::test]
async fn single_order_cancel_skips_the_count() {
    let exchange = FakeExchange::default();
    cancel_orders(&exchange, &CancelTarget::Order("0x1".into()))
        .await
        .unwrap();
    assert_eq!(*exchange.open_order_requests.lock().unwrap(), 0);
}

#[tokio::test]
async fn failed_cancel_request_is_fatal() {
    let exchange = FakeExchange {
        cancel_fails: true,
        ..Default::default()
    };
    assert!(cancel_orders(&exchange, &CancelTarget::All).await.is_err());
}

#[tokio::test]
async fn one_scoring_failure_does_not_abort_listing() {
    let exchange = FakeExchange {
        orders: vec![
            open_order("0xa", "BUY"),
            open_order("0xb", "SELL"),
            open_order("0xc", "BUY"),
        ],
        scoring_fails_for: HashSet::from(["0xb".to_string()]),
        ..Default::default()
    };

    let listing = list_orders(&exchange, &OrderFilter::default()).await.unwrap();

    let statuses: Vec<ScoringStatus> = listing.orders.iter().map(|o| o.scoring).collect();
    assert_eq!(
        statuses,
        vec![
            ScoringStatus::Scoring,
            ScoringStatus::Unknown,
            ScoringStatus::Scoring
        ]
    );
    assert_eq!(listing.counts.total, 3);
    assert_eq!(listing.counts.buys, 2);
    assert_eq!(listing.counts.sells, 1);
    assert_eq!(listing.orders[0].order.percent_matched(), dec!(25.0));
}

// ==================================================
// FAKE WALLET
// ==================================================

struct FakeWallet {
    gas: Option<Decimal>,
    usdc: Option<Decimal>,
}

#[async_trait]
impl WalletReader for FakeWallet {
    fn owner(&self) -> Address {
        Address::repeat_byte(0x22)
    }

    async fn gas_balance(&self) -> anyhow::Result<Decimal> {
        self.gas.ok_or_else(|| anyhow!("rpc timeout"))
    }

    async fn usdc_balance(&self) -> anyhow::Result<TokenBalance> {
        let amount = self.usdc.ok_or_else(|| anyhow!("rpc timeout"))?;
        Ok(TokenBalance {
            raw: U256::zero(),
            decimals: 6,
            symbol: "USDC.e".to_string(),
            amount,
        })
    }
}

#[tokio::test]
async fn balance_queries_are_independent() {
    let wallet = FakeWallet {
        gas: None,
        usdc: Some(dec!(12.5)),
    };
    let exchange = FakeExchange {
        balance_fails: true,
        ..Default::default()
    };

    let report = check_balance(&wallet, &exchange).await;

    assert!(report.gas.is_none());
    assert_eq!(report.usdc.map(|b| b.amount), Some(dec!(12.5)));
    assert!(report.exchange.is_none());
    assert_eq!(report.checks.len(), 3);
}

#[tokio::test]
async fn landing_check_reads_the_polygon_balance() {
    let landed = FakeWallet {
        gas: None,
        usdc: Some(dec!(1.99)),
    };
    assert_eq!(check_landing(&landed).await.unwrap(), LandingStatus::Landed);

    let pending = FakeWallet {
        gas: None,
        usdc: Some(Decimal::ZERO),
    };
    assert_eq!(check_landing(&pending).await.unwrap(), LandingStatus::Pending);
}

// ==================================================
// CREDENTIALS
// ==================================================

struct FakeCredentials {
    configured: bool,
}

#[async_trait]
impl CredentialApi for FakeCredentials {
    fn address(&self) -> Address {
        Address::repeat_byte(0x33)
    }

    fn has_credentials(&self) -> bool {
        self.configured
    }

    async fn create_or_derive_api_key(&self) -> Result<ApiCredentials, ClobError> {
        Ok(ApiCredentials {
            api_key: "key".into(),
            secret: "c2VjcmV0".into(),
            passphrase: "pass".into(),
        })
    }

    async fn api_keys(&self) -> Result<serde_json::Value, ClobError> {
        Err(api_error("/auth/api-keys"))
    }
}

#[tokio::test]
async fn bootstrap_skips_validation_without_configured_keys() {
    let wallet = FakeWallet {
        gas: Some(dec!(2)),
        usdc: Some(dec!(10)),
    };

    let report =
        bootstrap_credentials(&FakeCredentials { configured: false }, &wallet, &wallet, None).await;
    assert_eq!(report.credentials.map(|c| c.api_key), Some("key".to_string()));
    assert_eq!(report.validated, None);

    let report =
        bootstrap_credentials(&FakeCredentials { configured: true }, &wallet, &wallet, None).await;
    assert_eq!(report.validated, Some(false));
}

// ==================================================
// FAKE ALLOWANCE GATEWAY
// ==================================================

struct FakeGateway {
    gas: Decimal,
    approvals: AllowanceSet,
    fail_at: Option<usize>,
    broadcasts: Mutex<Vec<ApprovalStep>>,
    fee_requests: Mutex<usize>,
}

impl FakeGateway {
    fn new(gas: Decimal, approvals: AllowanceSet) -> Self {
        Self {
            gas,
            approvals,
            fail_at: None,
            broadcasts: Mutex::new(Vec::new()),
            fee_requests: Mutex::new(0),
        }
    }

    fn broadcasts(&self) -> Vec<ApprovalStep> {
        self.broadcasts.lock().unwrap().clone()
    }
}

#[async_trait]
impl AllowanceGateway for FakeGateway {
    fn owner(&self) -> Address {
        Address::repeat_byte(0x44)
    }

    async fn gas_balance(&self) -> anyhow::Result<Decimal> {
        Ok(self.gas)
    }

    async fn usdc_allowance(&self, spender: Spender) -> anyhow::Result<U256> {
        Ok(match spender {
            Spender::Exchange => self.approvals.usdc_exchange,
            Spender::NegRiskAdapter => self.approvals.usdc_neg_risk_adapter,
            Spender::NegRiskExchange => self.approvals.usdc_neg_risk_exchange,
        })
    }

    async fn ctf_approved(&self, operator: Spender) -> anyhow::Result<bool> {
        Ok(match operator {
            Spender::Exchange => self.approvals.ctf_exchange,
            _ => self.approvals.ctf_neg_risk_exchange,
        })
    }

    async fn fee_bid(&self) -> anyhow::Result<FeeBid> {
        *self.fee_requests.lock().unwrap() += 1;
        Ok(FeeBid::from_base_fee(None))
    }

    async fn broadcast(&self, step: ApprovalStep, _fee: &FeeBid) -> anyhow::Result<TxHash> {
        let mut sent = self.broadcasts.lock().unwrap();
        sent.push(step);
        if self.fail_at == Some(sent.len()) {
            return Err(anyhow!("replacement transaction underpriced"));
        }
        Ok(TxHash::from_low_u64_be(sent.len() as u64))
    }

    async fn confirm(&self, _tx: TxHash) -> anyhow::Result<()> {
        Ok(())
    }
}

fn instant() -> AllowanceOptions {
    AllowanceOptions {
        countdown: Duration::ZERO,
        cooldown: Duration::ZERO,
    }
}

fn all_approved() -> AllowanceSet {
    AllowanceSet {
        usdc_exchange: U256::MAX,
        usdc_neg_risk_adapter: U256::MAX,
        usdc_neg_risk_exchange: U256::MAX,
        ctf_exchange: true,
        ctf_neg_risk_exchange: true,
    }
}

#[tokio::test]
async fn check_phase_is_read_only_and_repeatable() {
    let gateway = FakeGateway::new(dec!(5), AllowanceSet::default());

    let first = check_phase(&gateway).await.unwrap();
    let second = check_phase(&gateway).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.missing().len(), 5);
    assert!(gateway.broadcasts().is_empty());
}

#[tokio::test]
async fn fully_approved_wallet_sends_nothing() {
    let gateway = FakeGateway::new(dec!(5), all_approved());

    let outcome = setup_allowances(&gateway, &instant()).await.unwrap();

    assert_eq!(outcome, SetupOutcome::AlreadyApproved(all_approved()));
    assert!(gateway.broadcasts().is_empty());
}

#[tokio::test]
async fn grants_all_five_in_order() {
    // One gap is enough to re-send the whole sequence.
    let gateway = FakeGateway::new(
        dec!(5),
        AllowanceSet {
            ctf_neg_risk_exchange: false,
            ..all_approved()
        },
    );

    let outcome = setup_allowances(&gateway, &instant()).await.unwrap();

    assert_eq!(gateway.broadcasts(), GRANT_SEQUENCE.to_vec());
    assert_eq!(*gateway.fee_requests.lock().unwrap(), 1);
    match outcome {
        SetupOutcome::Granted(granted) => {
            let hashes: Vec<TxHash> = granted.iter().map(|g| g.tx).collect();
            let expected: Vec<TxHash> = (1..=5).map(TxHash::from_low_u64_be).collect();
            assert_eq!(hashes, expected);
        }
        other => panic!("expected grants, got {:?}", other),
    }
}

#[tokio::test]
async fn failure_stops_the_sequence_and_keeps_earlier_grants() {
    let mut gateway = FakeGateway::new(dec!(5), AllowanceSet::default());
    gateway.fail_at = Some(3);

    let err = grant_phase(&gateway, &instant()).await.unwrap_err();

    match err.downcast_ref::<AllowanceError>() {
        Some(AllowanceError::StepFailed {
            position,
            completed,
            ..
        }) => {
            assert_eq!(*position, 3);
            assert_eq!(completed.len(), 2);
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(gateway.broadcasts().len(), 3);
}

#[tokio::test]
async fn low_gas_means_zero_broadcasts() {
    let gateway = FakeGateway::new(dec!(0.3), AllowanceSet::default());

    let err = setup_allowances(&gateway, &instant()).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<AllowanceError>(),
        Some(AllowanceError::InsufficientGas { .. })
    ));
    assert!(gateway.broadcasts().is_empty());
    assert_eq!(*gateway.fee_requests.lock().unwrap(), 0);
}
