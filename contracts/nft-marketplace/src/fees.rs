//! Royalty and platform fee arithmetic.

use crate::types::SaleBreakdown;

/// Standard basis points denominator
pub const BASIS_POINTS_DIVISOR: u32 = 10_000;

/// 10% - highest royalty the admin may configure
pub const MAX_ROYALTY_BPS: u32 = 1_000;

/// 5% - highest platform fee the admin may configure
pub const MAX_PLATFORM_BPS: u32 = 500;

/// 2.5% royalty written by the constructor
pub const DEFAULT_ROYALTY_BPS: u32 = 250;

/// 2.5% platform fee written by the constructor
pub const DEFAULT_PLATFORM_BPS: u32 = 250;

/// Computes `amount * bps / 10000`, rounding down.
///
/// Amounts too large to multiply safely are divided first; the result can
/// then be slightly lower than the exact cut, which only ever favours the seller.
pub fn fee_amount(amount: i128, bps: u32) -> i128 {
    const MAX_SAFE_AMOUNT: i128 = i128::MAX / BASIS_POINTS_DIVISOR as i128;

    if amount > MAX_SAFE_AMOUNT {
        (amount / BASIS_POINTS_DIVISOR as i128).saturating_mul(bps as i128)
    } else {
        amount.saturating_mul(bps as i128) / BASIS_POINTS_DIVISOR as i128
    }
}

/// Splits a sale price into royalty, platform and seller parts.
///
/// The seller part is derived by subtraction so the three parts always add
/// up to `price` exactly.
pub fn split_price(price: i128, royalty_bps: u32, platform_bps: u32) -> SaleBreakdown {
    let royalty = fee_amount(price, royalty_bps);
    let platform = fee_amount(price, platform_bps);

    SaleBreakdown {
        price,
        royalty,
        platform,
        seller: price - royalty - platform,
    }
}
