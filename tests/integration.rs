use async_trait::async_trait;
use num_bigint::BigUint;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use swap_router::core::chain::{ChainClient, PairReserves};
use swap_router::core::constants::{FEE_BPS, NATIVE_KEY};
use swap_router::core::math::get_amount_out;
use swap_router::core::quote::QuoteEngine;
use swap_router::core::snapshot::write_snapshot;
use swap_router::core::submit::{prepare_swap, submit_and_confirm, SubmitError, SwapRequest};
use swap_router::core::types::{Pair, PairMap, PairSnapshot, SwapCall, TokenMeta};
use swap_router::orchestrator::{get_quote, load_catalog, load_engine, validate_request};
use swap_router::types::{DexConfig, QuoteRequest};

const WRAPPED: &str = "0x00000000000000000000000000000000000wphrs";
const TOKEN_A: &str = "0x0000000000000000000000000000000000000aaa";
const TOKEN_B: &str = "0x0000000000000000000000000000000000000bbb";

fn big(n: u128) -> BigUint {
    BigUint::from(n)
}

fn pair(address: &str, token0: &str, token1: &str, r0: u128, r1: u128) -> Pair {
    Pair {
        address: address.to_string(),
        token0: token0.to_string(),
        token1: token1.to_string(),
        reserve0: big(r0),
        reserve1: big(r1),
        total_supply: big(1_000_000),
    }
}

fn engine(pairs: Vec<Pair>) -> QuoteEngine {
    let map: PairMap = pairs.into_iter().map(|p| (p.key(), p)).collect();
    QuoteEngine::new(map, WRAPPED, FEE_BPS)
}

struct FakeChain {
    reserves: HashMap<String, PairReserves>,
    reserve_calls: AtomicUsize,
}

impl FakeChain {
    fn new(reserves: Vec<(&str, PairReserves)>) -> Self {
        Self {
            reserves: reserves
                .into_iter()
                .map(|(address, r)| (address.to_string(), r))
                .collect(),
            reserve_calls: AtomicUsize::new(0),
        }
    }

    fn empty() -> Self {
        Self::new(vec![])
    }
}

#[async_trait]
impl ChainClient for FakeChain {
    async fn get_reserves(&self, pair_address: &str) -> anyhow::Result<PairReserves> {
        self.reserve_calls.fetch_add(1, Ordering::SeqCst);
        self.reserves
            .get(pair_address)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("unknown pair {}", pair_address))
    }

    async fn get_token_meta(&self, _token_address: &str) -> anyhow::Result<TokenMeta> {
        Ok(TokenMeta {
            symbol: "FAKE".to_string(),
            decimals: 18,
            authoritative: true,
        })
    }

    async fn submit(&self, _call: &SwapCall) -> anyhow::Result<String> {
        Ok("0xdeadbeef".to_string())
    }

    async fn await_confirmation(&self, _tx_hash: &str) -> anyhow::Result<()> {
        Ok(())
    }
}

fn swap_request(sell: &str, buy: &str, amount_in: u128, quoted_out: u128) -> SwapRequest {
    SwapRequest {
        sell_key: sell.to_string(),
        buy_key: buy.to_string(),
        amount_in: big(amount_in),
        quoted_out: big(quoted_out),
        slippage_bps: 100,
        recipient: "0x000000000000000000000000000000000000cafe".to_string(),
        deadline: 1_900_000_000,
    }
}

#[tokio::test]
async fn submission_aborts_when_quote_drifts_beyond_tolerance() {
    let engine = engine(vec![pair("0xpool1", TOKEN_A, TOKEN_B, 1_000_000, 2_000_000)]);

    // Reserves moved since the displayed quote: quoting against the
    // fresh numbers yields a lower output.
    let fresh = PairReserves {
        reserve0: big(1_100_000),
        reserve1: big(2_000_000),
        token0: TOKEN_A.to_string(),
    };
    let fresh_out = get_amount_out(&big(10_000), &fresh.reserve0, &fresh.reserve1, FEE_BPS);
    let chain = FakeChain::new(vec![("0xpool1", fresh)]);

    // Displayed quote sits 2% above what the fresh reserves produce.
    let displayed = &fresh_out * big(102) / big(100);
    let mut request = swap_request(TOKEN_A, TOKEN_B, 10_000, 0);
    request.quoted_out = displayed;

    match prepare_swap(&engine, &chain, &request).await {
        Err(SubmitError::StaleQuote { fresh_out: reported }) => {
            assert_eq!(reported, fresh_out);
        }
        other => panic!("expected StaleQuote, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn submission_proceeds_with_fresh_min_out_within_tolerance() {
    let engine = engine(vec![pair("0xpool1", TOKEN_A, TOKEN_B, 1_000_000, 2_000_000)]);

    let fresh = PairReserves {
        reserve0: big(1_000_000),
        reserve1: big(2_000_000),
        token0: TOKEN_A.to_string(),
    };
    let fresh_out = get_amount_out(&big(10_000), &fresh.reserve0, &fresh.reserve1, FEE_BPS);
    let chain = FakeChain::new(vec![("0xpool1", fresh)]);

    let mut request = swap_request(TOKEN_A, TOKEN_B, 10_000, 0);
    request.quoted_out = fresh_out.clone();

    let call = prepare_swap(&engine, &chain, &request).await.unwrap();
    let expected_min = &fresh_out * big(9_900) / big(10_000);
    match call.clone() {
        SwapCall::ExactTokensForTokens {
            amount_in,
            min_amount_out,
            path,
            recipient,
            deadline,
        } => {
            assert_eq!(amount_in, big(10_000));
            assert_eq!(min_amount_out, expected_min);
            assert_eq!(path, vec![TOKEN_A.to_string(), TOKEN_B.to_string()]);
            assert_eq!(recipient, request.recipient);
            assert_eq!(deadline, request.deadline);
        }
        other => panic!("expected ExactTokensForTokens, got {:?}", other),
    }
    assert_eq!(chain.reserve_calls.load(Ordering::SeqCst), 1);

    let tx_hash = submit_and_confirm(&chain, &call).await.unwrap();
    assert_eq!(tx_hash, "0xdeadbeef");
}

#[tokio::test]
async fn two_hop_submission_revalidates_every_hop() {
    let engine = engine(vec![
        pair("0xpool1", TOKEN_A, WRAPPED, 1_000_000, 1_000_000),
        pair("0xpool2", WRAPPED, TOKEN_B, 1_000_000, 1_000_000),
    ]);

    let hop0 = PairReserves {
        reserve0: big(1_000_000),
        reserve1: big(1_000_000),
        token0: TOKEN_A.to_string(),
    };
    // Second hop stored with token0 = TOKEN_B to exercise orientation.
    let hop1 = PairReserves {
        reserve0: big(1_000_000),
        reserve1: big(1_000_000),
        token0: TOKEN_B.to_string(),
    };
    let chain = FakeChain::new(vec![("0xpool1", hop0), ("0xpool2", hop1)]);

    let mid = get_amount_out(&big(10_000), &big(1_000_000), &big(1_000_000), FEE_BPS);
    let fresh_out = get_amount_out(&mid, &big(1_000_000), &big(1_000_000), FEE_BPS);

    let mut request = swap_request(TOKEN_A, TOKEN_B, 10_000, 0);
    request.quoted_out = fresh_out.clone();

    let call = prepare_swap(&engine, &chain, &request).await.unwrap();
    match call {
        SwapCall::ExactTokensForTokens { min_amount_out, path, .. } => {
            assert_eq!(path.len(), 3);
            assert_eq!(min_amount_out, &fresh_out * big(9_900) / big(10_000));
        }
        other => panic!("expected ExactTokensForTokens, got {:?}", other),
    }
    assert_eq!(chain.reserve_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn wrap_bypasses_revalidation_and_fees() {
    let engine = engine(vec![]);
    let chain = FakeChain::empty();

    let request = swap_request(NATIVE_KEY, WRAPPED, 777, 0);
    let call = prepare_swap(&engine, &chain, &request).await.unwrap();
    assert_eq!(call, SwapCall::Wrap { amount: big(777) });

    let request = swap_request(WRAPPED, NATIVE_KEY, 777, 0);
    let call = prepare_swap(&engine, &chain, &request).await.unwrap();
    assert_eq!(call, SwapCall::Unwrap { amount: big(777) });

    // No reserve read happened for either direction.
    assert_eq!(chain.reserve_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn native_endpoints_choose_the_native_call_variants() {
    let engine = engine(vec![pair("0xpool1", WRAPPED, TOKEN_B, 1_000_000, 1_000_000)]);
    let reserves = PairReserves {
        reserve0: big(1_000_000),
        reserve1: big(1_000_000),
        token0: WRAPPED.to_string(),
    };
    let chain = FakeChain::new(vec![("0xpool1", reserves)]);

    let call = prepare_swap(&engine, &chain, &swap_request(NATIVE_KEY, TOKEN_B, 1_000, 0))
        .await
        .unwrap();
    assert!(matches!(call, SwapCall::ExactNativeForTokens { .. }));

    let call = prepare_swap(&engine, &chain, &swap_request(TOKEN_B, NATIVE_KEY, 1_000, 0))
        .await
        .unwrap();
    assert!(matches!(call, SwapCall::ExactTokensForNative { .. }));
}

#[tokio::test]
async fn unroutable_submission_is_rejected() {
    let engine = engine(vec![]);
    let chain = FakeChain::empty();
    let result = prepare_swap(&engine, &chain, &swap_request(TOKEN_A, TOKEN_B, 1_000, 0)).await;
    assert!(matches!(result, Err(SubmitError::NoRoute)));

    let result = prepare_swap(&engine, &chain, &swap_request(TOKEN_A, TOKEN_A, 1_000, 0)).await;
    assert!(matches!(result, Err(SubmitError::NothingToSwap)));
}

fn test_config(working_dir: &str) -> DexConfig {
    DexConfig {
        working_dir: working_dir.to_string(),
        wrapped_native: WRAPPED.to_string(),
        ..DexConfig::default()
    }
}

fn snapshot(
    address: &str,
    token0: &str,
    token1: &str,
    r0: &str,
    r1: &str,
    supply: &str,
    symbol0: Option<&str>,
    symbol1: Option<&str>,
) -> PairSnapshot {
    PairSnapshot {
        pair: address.to_string(),
        token0: token0.to_string(),
        token1: token1.to_string(),
        reserve0: r0.to_string(),
        reserve1: r1.to_string(),
        total_supply: supply.to_string(),
        symbol0: symbol0.map(|s| s.to_string()),
        symbol1: symbol1.map(|s| s.to_string()),
        decimals0: None,
        decimals1: None,
    }
}

#[test]
fn quote_from_persisted_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path().to_str().unwrap());

    let snapshots = vec![
        snapshot(
            "0xpool1",
            TOKEN_A,
            WRAPPED,
            "1000000",
            "1000000",
            "1000000",
            Some("SAFI"),
            Some("WPHRS"),
        ),
        snapshot(
            "0xpool2",
            WRAPPED,
            TOKEN_B,
            "1000000",
            "1000000",
            "1000000",
            None,
            Some("USDX"),
        ),
        // Empty pool, must not appear in any route.
        snapshot("0xpool3", TOKEN_A, TOKEN_B, "0", "1000000", "1000000", None, None),
    ];
    let path = dir.path().join(&config.snapshot_file);
    write_snapshot(&path, &snapshots).unwrap();

    let mut catalog = load_catalog(&config);
    swap_router::core::snapshot::merge_snapshot_metadata(&mut catalog, &snapshots);
    catalog
        .save(dir.path().join(&config.catalog_file))
        .unwrap();

    let request = QuoteRequest {
        sell_token_address: TOKEN_A.to_string(),
        buy_token_address: TOKEN_B.to_string(),
        sell_amount: Some("10000".to_string()),
        buy_amount: None,
        slippage_bps: None,
    };
    let response = get_quote(&config, &request).unwrap();

    // The direct pool is empty, so the trade bridges through WPHRS.
    assert_eq!(response.route.len(), 2);
    assert_eq!(response.route[0].token_in_symbol, "SAFI");
    assert_eq!(response.route[1].token_out_symbol, "USDX");

    let mid = get_amount_out(&big(10_000), &big(1_000_000), &big(1_000_000), FEE_BPS);
    let out = get_amount_out(&mid, &big(1_000_000), &big(1_000_000), FEE_BPS);
    assert_eq!(response.buy_amount, out.to_string());
    assert_eq!(
        response.min_buy_amount,
        (&out * big(9_900) / big(10_000)).to_string()
    );
    // Two percent-of-reserve hops plus the fee on each leg.
    assert!(response.price_impact_bps > 0);
    assert!(response.price_impact_bps < 300);
}

#[test]
fn exact_out_quote_reports_required_input() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path().to_str().unwrap());

    let snapshots = vec![snapshot(
        "0xpool1",
        TOKEN_A,
        TOKEN_B,
        "1000000",
        "2000000",
        "1000000",
        None,
        None,
    )];
    write_snapshot(dir.path().join(&config.snapshot_file), &snapshots).unwrap();

    let request = QuoteRequest {
        sell_token_address: TOKEN_A.to_string(),
        buy_token_address: TOKEN_B.to_string(),
        sell_amount: None,
        buy_amount: Some("1995".to_string()),
        slippage_bps: Some(0),
    };
    let response = get_quote(&config, &request).unwrap();
    assert_eq!(response.buy_amount, "1995");

    // Feeding the reported input back must cover the requested output.
    let engine = load_engine(&config);
    let required = response.sell_amount.parse::<u128>().unwrap();
    let forward = engine
        .quote_exact_in(TOKEN_A, TOKEN_B, &big(required), 0)
        .unwrap();
    assert!(forward.amount_out >= big(1_995));
}

#[test]
fn no_route_surfaces_as_a_quote_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path().to_str().unwrap());

    // Two pools that never connect TOKEN_A to TOKEN_B.
    let other = "0x0000000000000000000000000000000000000ccc";
    let snapshots = vec![snapshot(
        "0xpool1", TOKEN_A, other, "1000", "1000", "1000", None, None,
    )];
    write_snapshot(dir.path().join(&config.snapshot_file), &snapshots).unwrap();

    let request = QuoteRequest {
        sell_token_address: TOKEN_A.to_string(),
        buy_token_address: TOKEN_B.to_string(),
        sell_amount: Some("1000".to_string()),
        buy_amount: None,
        slippage_bps: None,
    };
    let err = get_quote(&config, &request).unwrap_err();
    assert!(err.to_string().contains("no route"));
}

#[test]
fn malformed_amount_degrades_to_empty_quote() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path().to_str().unwrap());

    let snapshots = vec![snapshot(
        "0xpool1", TOKEN_A, TOKEN_B, "1000000", "2000000", "1000000", None, None,
    )];
    write_snapshot(dir.path().join(&config.snapshot_file), &snapshots).unwrap();

    let request = QuoteRequest {
        sell_token_address: TOKEN_A.to_string(),
        buy_token_address: TOKEN_B.to_string(),
        sell_amount: Some("12.5notanumber".to_string()),
        buy_amount: None,
        slippage_bps: None,
    };
    let response = get_quote(&config, &request).unwrap();
    assert_eq!(response.sell_amount, "0");
    assert_eq!(response.buy_amount, "0");
    assert_eq!(response.min_buy_amount, "0");
}

#[test]
fn wrap_quote_is_identity_with_empty_route() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path().to_str().unwrap());

    let request = QuoteRequest {
        sell_token_address: NATIVE_KEY.to_string(),
        buy_token_address: WRAPPED.to_string(),
        sell_amount: Some("123456".to_string()),
        buy_amount: None,
        slippage_bps: Some(300),
    };
    let response = get_quote(&config, &request).unwrap();
    assert_eq!(response.buy_amount, "123456");
    assert_eq!(response.min_buy_amount, "123456");
    assert_eq!(response.price_impact_bps, 0);
    assert!(response.route.is_empty());
}

#[test]
fn request_validation_requires_addresses_and_an_amount() {
    let request = QuoteRequest {
        sell_token_address: "".to_string(),
        buy_token_address: TOKEN_B.to_string(),
        sell_amount: Some("1".to_string()),
        buy_amount: None,
        slippage_bps: None,
    };
    assert!(validate_request(&request).is_err());

    let request = QuoteRequest {
        sell_token_address: TOKEN_A.to_string(),
        buy_token_address: TOKEN_B.to_string(),
        sell_amount: None,
        buy_amount: None,
        slippage_bps: None,
    };
    assert!(validate_request(&request).is_err());
}
