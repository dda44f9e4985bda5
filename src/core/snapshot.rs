use super::catalog::TokenCatalog;
use super::types::{Pair, PairMap, PairSnapshot, TokenMeta};
use super::Result;
use anyhow::Context;
use num_bigint::BigUint;
use num_traits::Zero;
use std::path::Path;
use std::str::FromStr;
use tracing::warn;

/// Filter a raw feed snapshot down to usable pools and index them by
/// ordered token key. A pool with an empty reserve or zero share
/// supply cannot be routed through and is dropped here, before the
/// graph ever sees it. Records with unparsable amounts are dropped the
/// same way.
pub fn usable_pairs(snapshots: &[PairSnapshot]) -> PairMap {
    let mut pairs = PairMap::new();
    for snapshot in snapshots {
        let Some(pair) = to_usable_pair(snapshot) else {
            continue;
        };
        pairs.insert(pair.key(), pair);
    }
    pairs
}

fn to_usable_pair(snapshot: &PairSnapshot) -> Option<Pair> {
    let reserve0 = parse_amount(&snapshot.reserve0, &snapshot.pair)?;
    let reserve1 = parse_amount(&snapshot.reserve1, &snapshot.pair)?;
    let total_supply = parse_amount(&snapshot.total_supply, &snapshot.pair)?;
    if reserve0.is_zero() || reserve1.is_zero() || total_supply.is_zero() {
        return None;
    }
    Some(Pair {
        address: snapshot.pair.to_lowercase(),
        token0: snapshot.token0.to_lowercase(),
        token1: snapshot.token1.to_lowercase(),
        reserve0,
        reserve1,
        total_supply,
    })
}

fn parse_amount(raw: &str, pair: &str) -> Option<BigUint> {
    match BigUint::from_str(raw.trim()) {
        Ok(amount) => Some(amount),
        Err(_) => {
            warn!(pair, raw, "dropping pair with unparsable amount");
            None
        }
    }
}

/// Fold the snapshot's optional symbol/decimals fields into the token
/// catalog. Tokens without feed metadata still get placeholder entries
/// so every address encountered this session stays resolvable.
pub fn merge_snapshot_metadata(catalog: &mut TokenCatalog, snapshots: &[PairSnapshot]) {
    for snapshot in snapshots {
        merge_token_side(
            catalog,
            &snapshot.token0,
            snapshot.symbol0.as_deref(),
            snapshot.decimals0,
        );
        merge_token_side(
            catalog,
            &snapshot.token1,
            snapshot.symbol1.as_deref(),
            snapshot.decimals1,
        );
    }
}

fn merge_token_side(
    catalog: &mut TokenCatalog,
    address: &str,
    symbol: Option<&str>,
    decimals: Option<u8>,
) {
    match symbol {
        Some(symbol) if !symbol.trim().is_empty() => catalog.merge(
            address,
            TokenMeta {
                symbol: symbol.trim().to_string(),
                decimals: decimals.unwrap_or(18),
                authoritative: true,
            },
        ),
        _ => {
            catalog.ensure(address);
        }
    }
}

/// Persist the raw snapshot so quoting has non-empty state before the
/// live feed responds. Overwritten wholesale on every fresh snapshot.
pub fn write_snapshot<P: AsRef<Path>>(path: P, snapshots: &[PairSnapshot]) -> Result<()> {
    let mut writer = csv::Writer::from_path(&path).context("Couldn't create pair snapshot file")?;
    for snapshot in snapshots {
        writer.serialize(snapshot)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_snapshot<P: AsRef<Path>>(path: P) -> Result<Vec<PairSnapshot>> {
    let mut reader = csv::Reader::from_path(&path).context("Couldn't open pair snapshot file")?;
    let mut snapshots = vec![];
    for record in reader.deserialize() {
        let snapshot: PairSnapshot = record?;
        snapshots.push(snapshot);
    }
    Ok(snapshots)
}
