use super::chain::ChainClient;
use super::constants::{BPS_DENOMINATOR, NATIVE_KEY, REVALIDATION_DRIFT_BPS};
use super::math::get_amount_out;
use super::quote::QuoteEngine;
use super::slippage::min_amount_out;
use super::types::{RoutePlan, SwapCall};
use num_bigint::BigUint;
use num_traits::Zero;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum SubmitError {
    /// Reserves moved since the quote was displayed: the fresh output
    /// deviates by more than the tolerated drift. The caller should
    /// display `fresh_out` and ask the user to re-trigger.
    #[error("quote is stale; fresh output is {fresh_out}")]
    StaleQuote { fresh_out: BigUint },
    #[error("insufficient liquidity on the route")]
    InsufficientLiquidity,
    #[error("source and destination are the same token")]
    NothingToSwap,
    #[error("no route available between the requested tokens")]
    NoRoute,
    /// RPC error, rejected signature or reverted transaction. Surfaced
    /// as-is; never retried automatically.
    #[error(transparent)]
    Chain(#[from] anyhow::Error),
}

/// Everything needed to turn a displayed quote into call parameters.
#[derive(Clone, Debug)]
pub struct SwapRequest {
    pub sell_key: String,
    pub buy_key: String,
    pub amount_in: BigUint,
    /// The output the user last saw; the drift check runs against it.
    pub quoted_out: BigUint,
    pub slippage_bps: u32,
    pub recipient: String,
    pub deadline: u64,
}

/// Re-validate a quote against fresh reserves and construct the call
/// parameters for the wallet.
///
/// Every hop's reserves are re-read through the chain client and the
/// expected output recomputed. A deviation beyond
/// [`REVALIDATION_DRIFT_BPS`] in either direction aborts the
/// submission; otherwise the minimum-output bound is derived from the
/// fresh output, not the displayed one. Wrap and unwrap skip the whole
/// check since no reserves are involved.
pub async fn prepare_swap(
    engine: &QuoteEngine,
    chain: &dyn ChainClient,
    request: &SwapRequest,
) -> Result<SwapCall, SubmitError> {
    if request.sell_key == request.buy_key {
        return Err(SubmitError::NothingToSwap);
    }
    if request.amount_in.is_zero() {
        return Err(SubmitError::NothingToSwap);
    }

    if engine.is_wrap(&request.sell_key, &request.buy_key) {
        return Ok(SwapCall::Wrap {
            amount: request.amount_in.clone(),
        });
    }
    if engine.is_unwrap(&request.sell_key, &request.buy_key) {
        return Ok(SwapCall::Unwrap {
            amount: request.amount_in.clone(),
        });
    }

    let plan = engine
        .plan_route(&request.sell_key, &request.buy_key)
        .map_err(|_| SubmitError::NoRoute)?;
    let hops = match &plan {
        RoutePlan::Identity => return Err(SubmitError::NothingToSwap),
        RoutePlan::Hops(tokens) => tokens,
    };

    let fresh_out = recompute_output(engine, chain, hops, &request.amount_in).await?;
    if fresh_out.is_zero() {
        return Err(SubmitError::InsufficientLiquidity);
    }

    if !request.quoted_out.is_zero() {
        let drift_bps = drift_bps(&request.quoted_out, &fresh_out);
        if drift_bps > BigUint::from(REVALIDATION_DRIFT_BPS) {
            warn!(%drift_bps, quoted = %request.quoted_out, fresh = %fresh_out,
                "reserves moved since the quote was displayed");
            return Err(SubmitError::StaleQuote { fresh_out });
        }
    }

    let min_amount_out = min_amount_out(&fresh_out, request.slippage_bps);
    info!(amount_in = %request.amount_in, %fresh_out, %min_amount_out,
        hops = hops.len() - 1, "swap revalidated");

    let call = if request.sell_key == NATIVE_KEY {
        SwapCall::ExactNativeForTokens {
            amount_in: request.amount_in.clone(),
            min_amount_out,
            path: hops.clone(),
            recipient: request.recipient.clone(),
            deadline: request.deadline,
        }
    } else if request.buy_key == NATIVE_KEY {
        SwapCall::ExactTokensForNative {
            amount_in: request.amount_in.clone(),
            min_amount_out,
            path: hops.clone(),
            recipient: request.recipient.clone(),
            deadline: request.deadline,
        }
    } else {
        SwapCall::ExactTokensForTokens {
            amount_in: request.amount_in.clone(),
            min_amount_out,
            path: hops.clone(),
            recipient: request.recipient.clone(),
            deadline: request.deadline,
        }
    };
    Ok(call)
}

/// Submit a prepared call and wait for its confirmation.
pub async fn submit_and_confirm(
    chain: &dyn ChainClient,
    call: &SwapCall,
) -> Result<String, SubmitError> {
    let tx_hash = chain.submit(call).await?;
    info!(%tx_hash, "swap submitted");
    chain.await_confirmation(&tx_hash).await?;
    Ok(tx_hash)
}

async fn recompute_output(
    engine: &QuoteEngine,
    chain: &dyn ChainClient,
    hops: &[String],
    amount_in: &BigUint,
) -> Result<BigUint, SubmitError> {
    let mut current = amount_in.clone();
    for hop in hops.windows(2) {
        let pair = engine
            .pair_for_hop(&hop[0], &hop[1])
            .map_err(|_| SubmitError::NoRoute)?;
        let fresh = chain.get_reserves(&pair.address).await?;
        let token_in_is_0 = hop[0] == fresh.token0.to_lowercase();
        let (reserve_in, reserve_out) = if token_in_is_0 {
            (&fresh.reserve0, &fresh.reserve1)
        } else {
            (&fresh.reserve1, &fresh.reserve0)
        };
        current = get_amount_out(&current, reserve_in, reserve_out, engine.fee_bps());
        if current.is_zero() {
            return Ok(BigUint::zero());
        }
    }
    Ok(current)
}

fn drift_bps(quoted: &BigUint, fresh: &BigUint) -> BigUint {
    let diff = if quoted > fresh {
        quoted - fresh
    } else {
        fresh - quoted
    };
    diff * BigUint::from(BPS_DENOMINATOR) / quoted
}
