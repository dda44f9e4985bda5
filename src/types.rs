use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Service configuration, loaded through confy.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DexConfig {
    pub working_dir: String,
    pub snapshot_file: String,
    pub catalog_file: String,
    /// Base URL of the backend serving pair snapshots.
    pub backend_url: String,
    /// Wrapped counterpart of the native coin; also the designated
    /// bridging token for two-hop routes.
    pub wrapped_native: String,
    pub native_symbol: String,
    pub wrapped_symbol: String,
    /// Single authoritative pool fee, in basis points.
    pub fee_bps: u32,
    pub default_slippage_bps: u32,
    /// Seconds between background snapshot refreshes.
    pub refresh_secs: u64,
    pub chain_id: String,
    pub listen_port: u16,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    #[schema(example = "0x5fbdb2315678afecb367f032d93f642f64180aa3")]
    pub sell_token_address: String,

    #[schema(example = "0xe7f1725e7734ce288f8367e1bb143e90bb3f0512")]
    pub buy_token_address: String,

    /// Exact-in amount, in the token's smallest unit. One of
    /// `sellAmount`/`buyAmount` must be present.
    #[schema(example = "1000000000000000000", nullable = true)]
    pub sell_amount: Option<String>,

    /// Exact-out amount, in the token's smallest unit.
    #[schema(example = "2500000000", nullable = true)]
    pub buy_amount: Option<String>,

    /// Slippage tolerance override in basis points; defaults to 1%.
    #[schema(example = 100, nullable = true)]
    pub slippage_bps: Option<u32>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResponseHop {
    pub pair_address: String,
    pub token_in: String,
    pub token_out: String,
    pub token_in_symbol: String,
    pub token_out_symbol: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub sell_token_address: String,
    pub buy_token_address: String,
    pub sell_amount: String,
    pub buy_amount: String,
    /// Minimum acceptable output after the slippage tolerance.
    pub min_buy_amount: String,
    pub price_impact_bps: u32,
    pub chain_id: String,
    /// Ordered hops of the chosen route; empty for wrap/unwrap.
    pub route: Vec<ResponseHop>,
}
