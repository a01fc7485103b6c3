//! Net return of liquidity positions versus holding the deposited assets.

use super::pricing::{self, ValuationError};
use crate::domain::{Amount, Balances, ConsolidatedRecord, Decimal, Pair, PoolReserveSnapshot};
use serde::Serialize;

/// Impermanence of one pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImpermanenceResult {
    pub pair: Pair,
    pub balances: Balances,
    /// What the held pool tokens redeem for at current reserves.
    pub current_value: Amount,
    pub net_native: Decimal,
    pub net_token: Decimal,
    /// Signed native value of `net_token` at current reserves.
    pub pair_value: Amount,
    pub net_return: Decimal,
    /// Sum of `net_return` over this pair and every pair before it.
    pub running_total: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImpermanenceReport {
    pub results: Vec<ImpermanenceResult>,
    pub total_net_return: Decimal,
}

/// Accumulates per-pair results and the portfolio running total.
#[derive(Debug, Default)]
pub struct ImpermanenceCalculator {
    results: Vec<ImpermanenceResult>,
    running_total: Decimal,
}

impl ImpermanenceCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute one pair's result and fold it into the running total.
    pub fn add(
        &mut self,
        record: &ConsolidatedRecord,
        reserves: &PoolReserveSnapshot,
    ) -> Result<&ImpermanenceResult, ValuationError> {
        let balances = record.balances;
        let pool_units = balances
            .pool_token_units()
            .ok_or(ValuationError::Overflow("pool token balance"))?;

        let current_value = pricing::redeem_liquidity(reserves, pool_units)?;
        // native_coin and asset already carry the sign of what was given up
        let net_native = current_value.native_decimal() + balances.native_coin;
        let net_token = current_value.token_decimal() + balances.asset;
        let pair_value = pricing::quote_swap_output(reserves, net_token)?;
        let net_return =
            net_native + pair_value.native_decimal() - balances.liquidity_fee_native;

        self.running_total += net_return;
        self.results.push(ImpermanenceResult {
            pair: record.pair.clone(),
            balances,
            current_value,
            net_native,
            net_token,
            pair_value,
            net_return,
            running_total: self.running_total,
        });

        // just pushed
        Ok(&self.results[self.results.len() - 1])
    }

    pub fn running_total(&self) -> Decimal {
        self.running_total
    }

    pub fn finish(self) -> ImpermanenceReport {
        ImpermanenceReport {
            results: self.results,
            total_net_return: self.running_total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AssetId, PairId, Token};

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn pair(symbol: &str) -> Pair {
        Pair::new(
            PairId::new(format!("pair-{}", symbol)),
            Token {
                asset_id: AssetId::new(format!("cat-{}", symbol)),
                symbol: symbol.to_string(),
                display_name: symbol.to_string(),
                verified: true,
            },
            AssetId::new(format!("lp-{}", symbol)),
        )
    }

    /// 10 native + 5 tokens deposited for 5 pool tokens, 5000 unit mint fee.
    fn deposit(symbol: &str) -> ConsolidatedRecord {
        ConsolidatedRecord {
            pair: pair(symbol),
            balances: Balances {
                native_coin: d("-10"),
                liquidity_fee_native: d("0.000000005"),
                asset: d("-5"),
                pool_token: d("5"),
            },
        }
    }

    const UNCHANGED: PoolReserveSnapshot = PoolReserveSnapshot {
        token_reserve: 1_000_000,
        native_reserve: 2_000_000_000_000_000,
        total_liquidity: 1_000_000,
    };

    const MOVED: PoolReserveSnapshot = PoolReserveSnapshot {
        token_reserve: 900_000,
        native_reserve: 2_200_000_000_000_000,
        total_liquidity: 1_000_000,
    };

    #[test]
    fn test_unchanged_pool_nets_to_zero() {
        let mut calc = ImpermanenceCalculator::new();
        let result = calc.add(&deposit("X"), &UNCHANGED).unwrap();

        assert_eq!(result.current_value, Amount::from_units(5_000, 10_000_000_005_000));
        assert_eq!(result.net_native, d("0.000000005"));
        assert_eq!(result.net_token, Decimal::zero());
        assert!(result.pair_value.is_zero());
        assert_eq!(result.net_return, Decimal::zero());
    }

    #[test]
    fn test_moved_pool() {
        let mut calc = ImpermanenceCalculator::new();
        let result = calc.add(&deposit("X"), &MOVED).unwrap().clone();

        assert_eq!(result.current_value, Amount::from_units(4_500, 11_000_000_005_000));
        assert_eq!(result.net_native, d("1.000000005"));
        assert_eq!(result.net_token, d("-0.5"));
        // buying back the missing tokens costs one unit after rounding up
        assert_eq!(result.pair_value, Amount::native(-1));
        assert_eq!(result.net_return, d("0.999999999999"));
        assert_eq!(result.running_total, result.net_return);
    }

    #[test]
    fn test_running_total_in_iteration_order() {
        let mut calc = ImpermanenceCalculator::new();
        let first = calc.add(&deposit("A"), &MOVED).unwrap().running_total;
        let second = calc.add(&deposit("B"), &UNCHANGED).unwrap().running_total;
        let third = calc.add(&deposit("C"), &MOVED).unwrap().running_total;

        assert_eq!(first, d("0.999999999999"));
        assert_eq!(second, first);
        assert_eq!(third, d("1.999999999998"));

        let report = calc.finish();
        assert_eq!(report.results.len(), 3);
        assert_eq!(report.total_net_return, third);
        let summed: Decimal = report.results.iter().map(|r| r.net_return).sum();
        assert_eq!(summed, report.total_net_return);
    }

    #[test]
    fn test_empty_report() {
        let report = ImpermanenceCalculator::new().finish();
        assert!(report.results.is_empty());
        assert_eq!(report.total_net_return, Decimal::zero());
    }
}
