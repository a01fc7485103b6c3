//! Pool valuation against live reserves.

use super::pricing::{self, ValuationError};
use crate::datasource::PoolReserveSource;
use crate::domain::{Amount, Balances, ConsolidatedRecord, Decimal, Pair, PoolReserveSnapshot};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Native-coin value of one pair's held balances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceValuation {
    pub pair: Pair,
    pub balances: Balances,
    /// What the pool tokens redeem for right now.
    pub liquidity_value: Amount,
    /// Native proceeds of selling the redeemed and held tokens.
    pub token_value: Amount,
    pub total_native: Decimal,
}

/// Quotes and redemptions for pairs, backed by a reserve source.
#[derive(Debug, Clone)]
pub struct PoolValuator {
    source: Arc<dyn PoolReserveSource>,
}

impl PoolValuator {
    pub fn new(source: Arc<dyn PoolReserveSource>) -> Self {
        Self { source }
    }

    /// Fetch live reserves for a pair. Never cached.
    pub async fn reserves(&self, pair: &Pair) -> Result<PoolReserveSnapshot, ValuationError> {
        let reserves = self.source.fetch_reserves(&pair.pair_id).await?;
        debug!(
            pair = %pair.display_name(),
            token_reserve = reserves.token_reserve,
            native_reserve = reserves.native_reserve,
            total_liquidity = reserves.total_liquidity,
            "Fetched pool reserves"
        );
        Ok(reserves)
    }

    pub async fn quote_swap_output(
        &self,
        pair: &Pair,
        token_amount: Decimal,
    ) -> Result<Amount, ValuationError> {
        let reserves = self.reserves(pair).await?;
        pricing::quote_swap_output(&reserves, token_amount)
    }

    pub async fn redeem_liquidity(
        &self,
        pair: &Pair,
        pool_token_units: i128,
    ) -> Result<Amount, ValuationError> {
        let reserves = self.reserves(pair).await?;
        pricing::redeem_liquidity(&reserves, pool_token_units)
    }

    /// Value a consolidated balance record at the given reserves.
    pub fn value_holdings(
        record: &ConsolidatedRecord,
        reserves: &PoolReserveSnapshot,
    ) -> Result<BalanceValuation, ValuationError> {
        let balances = record.balances;
        let pool_units = balances
            .pool_token_units()
            .ok_or(ValuationError::Overflow("pool token balance"))?;

        let liquidity_value = pricing::redeem_liquidity(reserves, pool_units)?;
        let token_value =
            pricing::quote_swap_output(reserves, liquidity_value.token_decimal() + balances.asset)?;

        Ok(BalanceValuation {
            pair: record.pair.clone(),
            balances,
            liquidity_value,
            token_value,
            total_native: liquidity_value.native_decimal() + token_value.native_decimal(),
        })
    }
}
