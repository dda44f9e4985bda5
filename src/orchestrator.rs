use crate::core::catalog::TokenCatalog;
use crate::core::quote::QuoteEngine;
use crate::core::snapshot::{
    merge_snapshot_metadata, read_snapshot, usable_pairs, write_snapshot,
};
use crate::core::types::{Quote, RoutePlan};
use crate::feed::SnapshotFeed;
use crate::types::{DexConfig, QuoteRequest, QuoteResponse, ResponseHop};
use anyhow::{anyhow, Context, Result};
use num_bigint::BigUint;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

pub fn validate_request(request: &QuoteRequest) -> Result<()> {
    if request.buy_token_address.trim().is_empty() || request.sell_token_address.trim().is_empty() {
        return Err(anyhow!("Buy and Sell Token addresses cannot be empty"));
    }
    if request.buy_amount.is_none() && request.sell_amount.is_none() {
        return Err(anyhow!("One of sellAmount or buyAmount is mandatory"));
    }
    Ok(())
}

fn snapshot_path(config: &DexConfig) -> PathBuf {
    Path::new(config.working_dir.as_str()).join(config.snapshot_file.as_str())
}

fn catalog_path(config: &DexConfig) -> PathBuf {
    Path::new(config.working_dir.as_str()).join(config.catalog_file.as_str())
}

pub fn ensure_working_dir(config: &DexConfig) -> Result<()> {
    if !Path::new(config.working_dir.as_str()).exists() {
        fs::create_dir_all(config.working_dir.as_str())
            .context("Couldn't create working directory")?;
    }
    Ok(())
}

/// Fetch a fresh snapshot from the feed, persist it, and fold its
/// token metadata into the persisted catalog. The snapshot file is
/// overwritten wholesale; the catalog only ever grows or upgrades
/// placeholder entries.
pub async fn refresh_pair_data(config: &DexConfig, feed: &SnapshotFeed) -> Result<usize> {
    ensure_working_dir(config)?;
    let snapshots = feed.fetch_pairs().await?;
    write_snapshot(snapshot_path(config), &snapshots)?;

    let mut catalog = load_catalog(config);
    merge_snapshot_metadata(&mut catalog, &snapshots);
    catalog.save(catalog_path(config))?;

    info!(
        pairs = snapshots.len(),
        tokens = catalog.len(),
        "pair snapshot refreshed"
    );
    Ok(snapshots.len())
}

/// Seeded catalog merged with whatever was persisted by earlier runs.
/// A missing or unreadable catalog file just means a fresh session.
pub fn load_catalog(config: &DexConfig) -> TokenCatalog {
    let mut catalog = TokenCatalog::seeded(
        &config.wrapped_native,
        &config.native_symbol,
        &config.wrapped_symbol,
    );
    if let Ok(persisted) = TokenCatalog::load(catalog_path(config)) {
        catalog.absorb(persisted);
    }
    catalog
}

/// Build a quote engine from the last persisted snapshot. A missing
/// snapshot file yields an engine over an empty pair set: every
/// routed quote then reports "no route" instead of failing.
pub fn load_engine(config: &DexConfig) -> QuoteEngine {
    let snapshots = read_snapshot(snapshot_path(config)).unwrap_or_default();
    QuoteEngine::new(
        usable_pairs(&snapshots),
        &config.wrapped_native,
        config.fee_bps,
    )
}

/// Malformed numeric input degrades to "nothing to quote" rather than
/// an error.
fn parse_amount(raw: Option<&str>) -> BigUint {
    raw.and_then(|value| BigUint::from_str(value.trim()).ok())
        .unwrap_or_default()
}

pub fn get_quote(config: &DexConfig, request: &QuoteRequest) -> Result<QuoteResponse> {
    validate_request(request)?;

    let engine = load_engine(config);
    let catalog = load_catalog(config);
    let slippage_bps = request.slippage_bps.unwrap_or(config.default_slippage_bps);

    let sell_key = request.sell_token_address.trim().to_lowercase();
    let buy_key = request.buy_token_address.trim().to_lowercase();

    let quote = if let Some(sell_amount) = request.sell_amount.as_deref() {
        let amount_in = parse_amount(Some(sell_amount));
        engine.quote_exact_in(&sell_key, &buy_key, &amount_in, slippage_bps)
    } else {
        let amount_out = parse_amount(request.buy_amount.as_deref());
        engine.quote_exact_out(&sell_key, &buy_key, &amount_out, slippage_bps)
    }
    .map_err(|e| anyhow!("{}", e))?;

    Ok(build_response(config, &engine, &catalog, request, &quote))
}

fn build_response(
    config: &DexConfig,
    engine: &QuoteEngine,
    catalog: &TokenCatalog,
    request: &QuoteRequest,
    quote: &Quote,
) -> QuoteResponse {
    let route = match &quote.plan {
        RoutePlan::Identity => vec![],
        RoutePlan::Hops(tokens) => tokens
            .windows(2)
            .filter_map(|hop| {
                let pair = engine.pair_for_hop(&hop[0], &hop[1]).ok()?;
                Some(ResponseHop {
                    pair_address: pair.address.clone(),
                    token_in: hop[0].clone(),
                    token_out: hop[1].clone(),
                    token_in_symbol: catalog.symbol_for(&hop[0]),
                    token_out_symbol: catalog.symbol_for(&hop[1]),
                })
            })
            .collect(),
    };

    QuoteResponse {
        sell_token_address: request.sell_token_address.clone(),
        buy_token_address: request.buy_token_address.clone(),
        sell_amount: quote.amount_in.to_string(),
        buy_amount: quote.amount_out.to_string(),
        min_buy_amount: quote.min_amount_out.to_string(),
        price_impact_bps: quote.price_impact_bps,
        chain_id: config.chain_id.clone(),
        route,
    }
}
