//! Per-pair aggregate positions and the balance sources that feed them.

use crate::domain::amount::TOKEN_SCALE;
use crate::domain::{Decimal, Pair, SwapKind, SwapRecord};
use serde::{Deserialize, Serialize};

/// Signed per-pair balances in decimal units.
///
/// Every source shape (swap history, wallet balances) projects onto these
/// four keys, so the same fold consolidates both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balances {
    pub native_coin: Decimal,
    pub liquidity_fee_native: Decimal,
    pub asset: Decimal,
    pub pool_token: Decimal,
}

impl Balances {
    pub fn zero() -> Self {
        Balances::default()
    }

    /// Pool token balance in smallest units, if it fits.
    pub fn pool_token_units(&self) -> Option<i128> {
        self.pool_token.to_units(TOKEN_SCALE)
    }
}

impl std::ops::AddAssign for Balances {
    fn add_assign(&mut self, rhs: Balances) {
        self.native_coin += rhs.native_coin;
        self.liquidity_fee_native += rhs.liquidity_fee_native;
        self.asset += rhs.asset;
        self.pool_token += rhs.pool_token;
    }
}

/// Anything that contributes signed balances to one pair.
pub trait Contribution {
    fn pair(&self) -> &Pair;
    fn balances(&self) -> Balances;
}

impl Contribution for SwapRecord {
    fn pair(&self) -> &Pair {
        &self.pair
    }

    fn balances(&self) -> Balances {
        let (asset, pool_token) = match self.kind {
            SwapKind::Addition => (self.offered.token_decimal(), self.requested.token_decimal()),
            SwapKind::Removal => (self.requested.token_decimal(), self.offered.token_decimal()),
        };
        Balances {
            native_coin: self.offered.native_decimal() + self.requested.native_decimal(),
            liquidity_fee_native: self.liquidity_fee.native_decimal(),
            asset,
            pool_token,
        }
    }
}

/// What a wallet balance holds for its pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Holding {
    PoolToken,
    Asset,
}

/// A confirmed CAT wallet balance resolved to a pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceSnapshot {
    pub pair: Pair,
    pub holding: Holding,
    pub units: i128,
}

impl Contribution for BalanceSnapshot {
    fn pair(&self) -> &Pair {
        &self.pair
    }

    fn balances(&self) -> Balances {
        let value = Decimal::from_units(self.units, TOKEN_SCALE);
        match self.holding {
            Holding::PoolToken => Balances {
                pool_token: value,
                ..Balances::zero()
            },
            Holding::Asset => Balances {
                asset: value,
                ..Balances::zero()
            },
        }
    }
}

/// Sum of every contribution sharing a pair id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsolidatedRecord {
    pub pair: Pair,
    pub balances: Balances,
}
