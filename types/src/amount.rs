//! Token-unit helpers.
//!
//! Amounts are plain `u128` counts of the smallest unit. Both the staking
//! token and the reward token use 18 decimals.

/// Number of decimals carried by every token in the system.
pub const TOKEN_DECIMALS: u32 = 18;

/// Raw units in one whole token (`10^18`).
pub const TOKEN_UNIT: u128 = 1_000_000_000_000_000_000;

/// Convert whole tokens to raw units, `None` on overflow.
pub fn from_units(whole: u128) -> Option<u128> {
    whole.checked_mul(TOKEN_UNIT)
}

/// Render a raw amount as `whole.fraction` with trailing zeros trimmed.
pub fn format_units(raw: u128) -> String {
    let whole = raw / TOKEN_UNIT;
    let frac = raw % TOKEN_UNIT;
    if frac == 0 {
        return whole.to_string();
    }
    let digits = format!("{:0>width$}", frac, width = TOKEN_DECIMALS as usize);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}
