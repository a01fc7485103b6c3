//! Paired (token, native coin) quantities in smallest units and decimal form.

use crate::domain::decimal::MAX_MANTISSA;
use crate::domain::Decimal;
use serde::Serialize;

/// Decimal places of a token (CAT): 1 token = 1_000 smallest units.
pub const TOKEN_SCALE: u32 = 3;
/// Decimal places of the native coin: 1 coin = 10^12 smallest units.
pub const NATIVE_SCALE: u32 = 12;

pub const TOKEN_DIVISOR: i128 = 1_000;
pub const NATIVE_DIVISOR: i128 = 1_000_000_000_000;

/// An immutable token/native quantity pair.
///
/// Only [`Amount::from_units`] builds one, so the decimal fields always equal
/// the integer fields divided by their divisor. Negative values mean the
/// quantity was given up by the wallet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Amount {
    token_units: i128,
    token_decimal: Decimal,
    native_units: i128,
    native_decimal: Decimal,
}

impl Amount {
    pub fn from_units(token_units: i128, native_units: i128) -> Self {
        // clamp here too so the integers match what the decimals kept
        let token_units = token_units.clamp(-MAX_MANTISSA, MAX_MANTISSA);
        let native_units = native_units.clamp(-MAX_MANTISSA, MAX_MANTISSA);
        Amount {
            token_units,
            token_decimal: Decimal::from_units(token_units, TOKEN_SCALE),
            native_units,
            native_decimal: Decimal::from_units(native_units, NATIVE_SCALE),
        }
    }

    /// Build from raw JSON-style numbers that may be fractional or not finite.
    ///
    /// NaN and infinities become zero; fractions truncate toward zero.
    pub fn from_lossy_units(token_units: f64, native_units: f64) -> Self {
        Amount::from_units(lossy_units(token_units), lossy_units(native_units))
    }

    pub fn zero() -> Self {
        Amount::from_units(0, 0)
    }

    pub fn token(units: i128) -> Self {
        Amount::from_units(units, 0)
    }

    pub fn native(units: i128) -> Self {
        Amount::from_units(0, units)
    }

    pub fn negate(&self) -> Self {
        Amount::from_units(-self.token_units, -self.native_units)
    }

    pub fn add(&self, other: &Amount) -> Self {
        Amount::from_units(
            self.token_units.saturating_add(other.token_units),
            self.native_units.saturating_add(other.native_units),
        )
    }

    pub fn token_units(&self) -> i128 {
        self.token_units
    }

    pub fn token_decimal(&self) -> Decimal {
        self.token_decimal
    }

    pub fn native_units(&self) -> i128 {
        self.native_units
    }

    pub fn native_decimal(&self) -> Decimal {
        self.native_decimal
    }

    pub fn is_zero(&self) -> bool {
        self.token_units == 0 && self.native_units == 0
    }
}

/// Normalize a raw numeric unit count to an integer.
pub fn lossy_units(raw: f64) -> i128 {
    if raw.is_finite() {
        // `as` saturates at the i128 bounds
        raw.trunc() as i128
    } else {
        0
    }
}
