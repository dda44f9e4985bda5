use num_bigint::BigUint;

/// Total pool fee in basis points, matching the fee charged by the
/// deployed pair contract. Both quoting directions use this one value;
/// it can be overridden via `DexConfig::fee_bps`.
pub const FEE_BPS: u32 = 15;

/// Base for all basis-point arithmetic.
pub const BPS_DENOMINATOR: u32 = 10_000;

pub const DEFAULT_SLIPPAGE_BPS: u32 = 100;

/// Slippage tolerance is clamped to [0%, 50%].
pub const MAX_SLIPPAGE_BPS: u32 = 5_000;

/// Maximum tolerated movement between a displayed quote and the output
/// recomputed from fresh reserves at submit time.
pub const REVALIDATION_DRIFT_BPS: u32 = 100;

/// Sentinel key for the unwrapped native coin, which has no contract
/// address of its own. It routes through its wrapped counterpart.
pub const NATIVE_KEY: &str = "native";

/// Fixed-point scale used when comparing marginal and execution prices.
pub fn price_scale() -> BigUint {
    BigUint::from(10u32).pow(18)
}
