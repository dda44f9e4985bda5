use super::constants::{BPS_DENOMINATOR, NATIVE_KEY};
use super::math::{get_amount_in, get_amount_out};
use super::slippage::{min_amount_out, price_impact_bps};
use super::types::{Graph, Pair, PairMap, Quote, RoutePlan};
use num_bigint::BigUint;
use num_traits::Zero;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuoteError {
    /// Source and destination are not connected within the
    /// one-bridge-hop search limit.
    #[error("no route available between the requested tokens")]
    NoRoute,
    /// A hop along the route computed to zero, or the desired output
    /// meets or exceeds a pool's reserve.
    #[error("insufficient liquidity on the route")]
    InsufficientLiquidity,
}

/// Pure quoting over the current pair set. Rebuilt whenever a fresh
/// snapshot arrives; carries no identity across recomputations.
pub struct QuoteEngine {
    pairs: PairMap,
    graph: Graph,
    wrapped_native: String,
    fee_bps: u32,
}

impl QuoteEngine {
    pub fn new(pairs: PairMap, wrapped_native: &str, fee_bps: u32) -> Self {
        let graph = Graph::from_pairs(pairs.values());
        Self {
            pairs,
            graph,
            wrapped_native: wrapped_native.to_lowercase(),
            // A configured fee above 100% is nonsense; cap it here so
            // neither quoting direction underflows on it.
            fee_bps: fee_bps.min(BPS_DENOMINATOR),
        }
    }

    pub fn pairs(&self) -> &PairMap {
        &self.pairs
    }

    pub fn wrapped_native(&self) -> &str {
        &self.wrapped_native
    }

    pub fn fee_bps(&self) -> u32 {
        self.fee_bps
    }

    /// Map a token key onto the routing graph: the native coin trades
    /// as its wrapped counterpart.
    pub fn normalize_key(&self, key: &str) -> String {
        if key == NATIVE_KEY {
            self.wrapped_native.clone()
        } else {
            key.to_lowercase()
        }
    }

    pub fn is_wrap(&self, sell_key: &str, buy_key: &str) -> bool {
        sell_key == NATIVE_KEY && buy_key.to_lowercase() == self.wrapped_native
    }

    pub fn is_unwrap(&self, sell_key: &str, buy_key: &str) -> bool {
        sell_key.to_lowercase() == self.wrapped_native && buy_key == NATIVE_KEY
    }

    pub fn plan_route(&self, sell_key: &str, buy_key: &str) -> Result<RoutePlan, QuoteError> {
        let from = self.normalize_key(sell_key);
        let to = self.normalize_key(buy_key);
        self.graph
            .find_route(&from, &to, &self.wrapped_native)
            .ok_or(QuoteError::NoRoute)
    }

    pub fn pair_for_hop(&self, token_in: &str, token_out: &str) -> Result<&Pair, QuoteError> {
        self.pairs
            .get(&super::types::ordered_key(token_in, token_out))
            .ok_or(QuoteError::NoRoute)
    }

    /// Reserves per hop, oriented in trade direction.
    pub fn hop_reserves(&self, hops: &[String]) -> Result<Vec<(BigUint, BigUint)>, QuoteError> {
        hops.windows(2)
            .map(|hop| {
                let pair = self.pair_for_hop(&hop[0], &hop[1])?;
                let (reserve_in, reserve_out) = pair.reserves_for(&hop[0]);
                Ok((reserve_in.clone(), reserve_out.clone()))
            })
            .collect()
    }

    /// Quote an exact-in trade: path, counterpart amount, minimum
    /// acceptable output after slippage and price impact.
    pub fn quote_exact_in(
        &self,
        sell_key: &str,
        buy_key: &str,
        amount_in: &BigUint,
        slippage_bps: u32,
    ) -> Result<Quote, QuoteError> {
        let plan = self.plan_route(sell_key, buy_key)?;

        if amount_in.is_zero() {
            return Ok(Self::zero_quote(plan));
        }

        if plan == RoutePlan::Identity {
            // Wrap/unwrap and same-token: 1:1, no fee, no slippage.
            return Ok(Quote {
                amount_in: amount_in.clone(),
                amount_out: amount_in.clone(),
                min_amount_out: amount_in.clone(),
                price_impact_bps: 0,
                plan,
            });
        }

        let reserves = self.hop_reserves(plan.hops())?;
        let mut current = amount_in.clone();
        for (reserve_in, reserve_out) in &reserves {
            current = get_amount_out(&current, reserve_in, reserve_out, self.fee_bps);
            if current.is_zero() {
                return Err(QuoteError::InsufficientLiquidity);
            }
        }

        Ok(Quote {
            amount_in: amount_in.clone(),
            min_amount_out: min_amount_out(&current, slippage_bps),
            price_impact_bps: price_impact_bps(&reserves, amount_in, &current),
            amount_out: current,
            plan,
        })
    }

    /// Quote an exact-out trade: the minimum input that yields at
    /// least the desired output, chained backwards along the route.
    pub fn quote_exact_out(
        &self,
        sell_key: &str,
        buy_key: &str,
        amount_out: &BigUint,
        slippage_bps: u32,
    ) -> Result<Quote, QuoteError> {
        let plan = self.plan_route(sell_key, buy_key)?;

        if amount_out.is_zero() {
            return Ok(Self::zero_quote(plan));
        }

        if plan == RoutePlan::Identity {
            return Ok(Quote {
                amount_in: amount_out.clone(),
                amount_out: amount_out.clone(),
                min_amount_out: amount_out.clone(),
                price_impact_bps: 0,
                plan,
            });
        }

        let reserves = self.hop_reserves(plan.hops())?;
        let mut current = amount_out.clone();
        for (reserve_in, reserve_out) in reserves.iter().rev() {
            current = get_amount_in(&current, reserve_in, reserve_out, self.fee_bps)
                .ok_or(QuoteError::InsufficientLiquidity)?;
        }

        Ok(Quote {
            amount_in: current.clone(),
            min_amount_out: min_amount_out(amount_out, slippage_bps),
            price_impact_bps: price_impact_bps(&reserves, &current, amount_out),
            amount_out: amount_out.clone(),
            plan,
        })
    }

    fn zero_quote(plan: RoutePlan) -> Quote {
        Quote {
            amount_in: BigUint::zero(),
            amount_out: BigUint::zero(),
            min_amount_out: BigUint::zero(),
            price_impact_bps: 0,
            plan,
        }
    }
}
