use super::types::{SwapCall, TokenMeta};
use super::Result;
use async_trait::async_trait;
use num_bigint::BigUint;

/// Fresh reserve reading for a pool, together with its `token0` so the
/// caller can orient the reserves for a hop.
#[derive(Clone, Debug)]
pub struct PairReserves {
    pub reserve0: BigUint,
    pub reserve1: BigUint,
    pub token0: String,
}

/// Narrow capability interface over the wallet/RPC collaborators.
///
/// This is everything the quote engine needs from the chain: reserve
/// reads, token metadata reads, call submission and confirmation.
/// Tests run against a fake implementation; no network is involved in
/// any quoting logic.
#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn get_reserves(&self, pair_address: &str) -> Result<PairReserves>;

    async fn get_token_meta(&self, token_address: &str) -> Result<TokenMeta>;

    /// Hand a prepared call to the wallet for signing and broadcast.
    /// Returns the transaction hash.
    async fn submit(&self, call: &SwapCall) -> Result<String>;

    async fn await_confirmation(&self, tx_hash: &str) -> Result<()>;
}
