use super::constants::BPS_DENOMINATOR;
use num_bigint::BigUint;
use num_traits::Zero;

// A fee at or above 100% leaves nothing of the input; saturate rather
// than underflow on a misconfigured value.
fn fee_numerator(fee_bps: u32) -> BigUint {
    BigUint::from(BPS_DENOMINATOR.saturating_sub(fee_bps))
}

/// Constant product output for a single hop.
///
/// `out = in * (10000 - fee) * rOut / (rIn * 10000 + in * (10000 - fee))`
/// with floor division throughout. Returns zero whenever any input is
/// zero, so a drained or unknown pool quotes as "nothing out" rather
/// than failing.
pub fn get_amount_out(
    amount_in: &BigUint,
    reserve_in: &BigUint,
    reserve_out: &BigUint,
    fee_bps: u32,
) -> BigUint {
    if amount_in.is_zero() || reserve_in.is_zero() || reserve_out.is_zero() {
        return BigUint::zero();
    }
    let fee_den = BigUint::from(BPS_DENOMINATOR);
    let fee_num = fee_numerator(fee_bps);

    let amount_in_with_fee = amount_in * &fee_num;
    let numerator = &amount_in_with_fee * reserve_out;
    let denominator = reserve_in * &fee_den + &amount_in_with_fee;
    if denominator.is_zero() {
        return BigUint::zero();
    }
    numerator / denominator
}

/// Minimum input that yields at least `amount_out` from a single hop.
///
/// Inverse of [`get_amount_out`] with ceiling division. `None` when the
/// requested output is zero, a reserve is zero, or the output would
/// meet or exceed the pool's reserve.
pub fn get_amount_in(
    amount_out: &BigUint,
    reserve_in: &BigUint,
    reserve_out: &BigUint,
    fee_bps: u32,
) -> Option<BigUint> {
    if amount_out.is_zero() || reserve_in.is_zero() || reserve_out.is_zero() {
        return None;
    }
    if amount_out >= reserve_out {
        return None;
    }
    let fee_den = BigUint::from(BPS_DENOMINATOR);
    let fee_num = fee_numerator(fee_bps);
    if fee_num.is_zero() {
        return None;
    }

    let numerator = reserve_in * amount_out * fee_den;
    let denominator = (reserve_out - amount_out) * fee_num;

    // Round up so the forward computation meets the requested output.
    Some((&numerator + &denominator - BigUint::from(1u32)) / denominator)
}
