//! Constant-product pool math with the pool's 0.7% swap fee.
//!
//! All arithmetic is checked `i128` over smallest units. Decimals only appear
//! at the edges, through [`Amount`].

use crate::datasource::DataSourceError;
use crate::domain::amount::TOKEN_SCALE;
use crate::domain::{Amount, Decimal, PoolReserveSnapshot};
use thiserror::Error;

/// Input kept after the fee, per mille.
pub const FEE_NUMERATOR: i128 = 993;
pub const FEE_DENOMINATOR: i128 = 1_000;

#[derive(Debug, Error)]
pub enum ValuationError {
    #[error(transparent)]
    Source(#[from] DataSourceError),
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),
}

fn checked(value: Option<i128>, what: &'static str) -> Result<i128, ValuationError> {
    value.ok_or(ValuationError::Overflow(what))
}

/// Quote the native side of swapping `token_amount` tokens against the pool.
///
/// A non-negative amount sells that many tokens and returns the native coin
/// received. A negative amount is an inverse quote: the result is the
/// negated native cost tied to `|token_amount|`, rounded one unit up so it
/// never under-quotes. Zero input and unreachable quotes return zero.
pub fn quote_swap_output(
    reserves: &PoolReserveSnapshot,
    token_amount: Decimal,
) -> Result<Amount, ValuationError> {
    let input = checked(token_amount.abs().to_units(TOKEN_SCALE), "token input")?;
    if input == 0 {
        return Ok(Amount::zero());
    }

    if token_amount.is_negative() {
        inverse_quote(reserves, input)
    } else {
        forward_quote(reserves, input)
    }
}

fn forward_quote(reserves: &PoolReserveSnapshot, input: i128) -> Result<Amount, ValuationError> {
    if input > reserves.native_reserve {
        return Ok(Amount::zero());
    }

    let input_with_fee = checked(FEE_NUMERATOR.checked_mul(input), "fee-adjusted input")?;
    let numerator = checked(
        input_with_fee.checked_mul(reserves.native_reserve),
        "forward numerator",
    )?;
    let scaled_reserve = checked(
        FEE_DENOMINATOR.checked_mul(reserves.token_reserve),
        "scaled token reserve",
    )?;
    let denominator = checked(
        input_with_fee.checked_add(scaled_reserve),
        "forward denominator",
    )?;
    if denominator <= 0 {
        return Ok(Amount::zero());
    }

    Ok(Amount::native(numerator.div_euclid(denominator)))
}

fn inverse_quote(reserves: &PoolReserveSnapshot, input: i128) -> Result<Amount, ValuationError> {
    if input >= reserves.native_reserve {
        return Ok(Amount::zero());
    }

    let numerator = checked(
        reserves
            .token_reserve
            .checked_mul(input)
            .and_then(|n| n.checked_mul(FEE_DENOMINATOR)),
        "inverse numerator",
    )?;
    let denominator = checked(
        (reserves.native_reserve - input).checked_mul(FEE_NUMERATOR),
        "inverse denominator",
    )?;

    let units = checked(
        numerator.div_euclid(denominator).checked_add(1),
        "inverse rounding",
    )?;
    Ok(Amount::native(-units))
}

/// Value `pool_token_units` of liquidity at the pool's current reserves.
///
/// The token side is the pro-rata share of the token reserve. The native side
/// is the pool tokens themselves, redeemed 1:1 in native units, plus the
/// pro-rata share of the native reserve. Shares truncate toward zero. An
/// empty pool redeems nothing.
pub fn redeem_liquidity(
    reserves: &PoolReserveSnapshot,
    pool_token_units: i128,
) -> Result<Amount, ValuationError> {
    if reserves.total_liquidity <= 0 || pool_token_units == 0 {
        return Ok(Amount::zero());
    }

    let token_share = checked(
        pool_token_units.checked_mul(reserves.token_reserve),
        "token share",
    )? / reserves.total_liquidity;
    let native_share = checked(
        pool_token_units.checked_mul(reserves.native_reserve),
        "native share",
    )? / reserves.total_liquidity;
    let native_out = checked(pool_token_units.checked_add(native_share), "native redemption")?;

    Ok(Amount::from_units(token_share, native_out))
}
