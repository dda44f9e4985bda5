use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One record from the backend pair feed. Reserve and supply amounts
/// arrive as decimal strings since they routinely exceed u64.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairSnapshot {
    pub pair: String,
    pub token0: String,
    pub token1: String,
    pub reserve0: String,
    pub reserve1: String,
    pub total_supply: String,
    #[serde(default)]
    pub symbol0: Option<String>,
    #[serde(default)]
    pub symbol1: Option<String>,
    #[serde(default)]
    pub decimals0: Option<u8>,
    #[serde(default)]
    pub decimals1: Option<u8>,
}

/// Token addresses of a pool, lexicographically ordered.
pub type PairKey = (String, String);
pub type PairMap = HashMap<PairKey, Pair>;

pub fn ordered_key(a: &str, b: &str) -> PairKey {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// A usable pool: positive reserves and a non-zero share supply.
/// Addresses are stored lower-cased.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Pair {
    pub address: String,
    pub token0: String,
    pub token1: String,
    pub reserve0: BigUint,
    pub reserve1: BigUint,
    pub total_supply: BigUint,
}

impl Pair {
    pub fn key(&self) -> PairKey {
        ordered_key(&self.token0, &self.token1)
    }

    /// Reserves oriented so the first element backs `token_in`.
    pub fn reserves_for(&self, token_in: &str) -> (&BigUint, &BigUint) {
        if token_in == self.token0 {
            (&self.reserve0, &self.reserve1)
        } else {
            (&self.reserve1, &self.reserve0)
        }
    }
}

/// Cached descriptive data for a token address. `authoritative` is
/// false while the symbol is still a shortened-address placeholder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMeta {
    pub symbol: String,
    pub decimals: u8,
    pub authoritative: bool,
}

/// Undirected adjacency over tokens that share at least one pool.
#[derive(Debug, Default)]
pub struct Graph {
    pub edges: HashMap<String, HashSet<String>>,
}

/// Route selected for a quote. Wrap/unwrap and same-token requests
/// touch no pool at all.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoutePlan {
    Identity,
    /// 2 or 3 token addresses, never more.
    Hops(Vec<String>),
}

impl RoutePlan {
    pub fn hops(&self) -> &[String] {
        match self {
            RoutePlan::Identity => &[],
            RoutePlan::Hops(tokens) => tokens,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Quote {
    pub amount_in: BigUint,
    pub amount_out: BigUint,
    pub min_amount_out: BigUint,
    pub price_impact_bps: u32,
    pub plan: RoutePlan,
}

/// Call parameters handed to the wallet collaborator for signing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SwapCall {
    ExactTokensForTokens {
        amount_in: BigUint,
        min_amount_out: BigUint,
        path: Vec<String>,
        recipient: String,
        deadline: u64,
    },
    ExactNativeForTokens {
        amount_in: BigUint,
        min_amount_out: BigUint,
        path: Vec<String>,
        recipient: String,
        deadline: u64,
    },
    ExactTokensForNative {
        amount_in: BigUint,
        min_amount_out: BigUint,
        path: Vec<String>,
        recipient: String,
        deadline: u64,
    },
    Wrap {
        amount: BigUint,
    },
    Unwrap {
        amount: BigUint,
    },
}
