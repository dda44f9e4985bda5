use super::constants::{price_scale, BPS_DENOMINATOR, MAX_SLIPPAGE_BPS};
use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};

pub fn clamp_slippage(slippage_bps: u32) -> u32 {
    slippage_bps.min(MAX_SLIPPAGE_BPS)
}

/// Minimum acceptable output after slippage tolerance, truncating.
pub fn min_amount_out(amount_out: &BigUint, slippage_bps: u32) -> BigUint {
    let slippage_bps = clamp_slippage(slippage_bps);
    amount_out * BigUint::from(BPS_DENOMINATOR - slippage_bps) / BigUint::from(BPS_DENOMINATOR)
}

/// Degradation of the realized execution price versus the pools'
/// marginal price, in basis points.
///
/// `hop_reserves` holds `(reserve_in, reserve_out)` per hop, oriented
/// in trade direction; the marginal price is the product of the hop
/// ratios. Degenerate inputs (zero amounts, empty route, execution at
/// or above the marginal price) report zero impact rather than an
/// error.
pub fn price_impact_bps(
    hop_reserves: &[(BigUint, BigUint)],
    amount_in: &BigUint,
    amount_out: &BigUint,
) -> u32 {
    if hop_reserves.is_empty() || amount_in.is_zero() || amount_out.is_zero() {
        return 0;
    }

    let mut num = BigUint::from(1u32);
    let mut den = BigUint::from(1u32);
    for (reserve_in, reserve_out) in hop_reserves {
        if reserve_in.is_zero() {
            return 0;
        }
        num *= reserve_out;
        den *= reserve_in;
    }
    if den.is_zero() {
        return 0;
    }

    let scale = price_scale();
    let mid_scaled = num * &scale / den;
    let exec_scaled = amount_out * &scale / amount_in;
    if mid_scaled.is_zero() || exec_scaled >= mid_scaled {
        return 0;
    }

    let impact = (&mid_scaled - &exec_scaled) * BigUint::from(BPS_DENOMINATOR) / &mid_scaled;
    impact.to_u32().unwrap_or(BPS_DENOMINATOR)
}
