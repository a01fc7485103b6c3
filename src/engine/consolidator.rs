//! Fold swaps or balance snapshots into one record per pair.

use crate::domain::{Balances, ConsolidatedRecord, Contribution, PairId};
use std::collections::BTreeMap;

/// Sum every contribution per pair id.
///
/// Input order does not matter. Output is sorted by pair display name; ties
/// keep pair id order.
pub fn consolidate<'a, C>(contributions: impl IntoIterator<Item = &'a C>) -> Vec<ConsolidatedRecord>
where
    C: Contribution + 'a,
{
    let mut by_pair: BTreeMap<PairId, ConsolidatedRecord> = BTreeMap::new();

    for contribution in contributions {
        let pair = contribution.pair();
        by_pair
            .entry(pair.pair_id.clone())
            .or_insert_with(|| ConsolidatedRecord {
                pair: pair.clone(),
                balances: Balances::zero(),
            })
            .balances += contribution.balances();
    }

    let mut records: Vec<_> = by_pair.into_values().collect();
    records.sort_by_cached_key(|r| r.pair.display_name());
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Amount, AssetId, Decimal, Pair, SwapKind, SwapRecord, Token};

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

    fn addition(pair: &Pair, native: i128, token: i128, pool: i128) -> SwapRecord {
        SwapRecord {
            trade_id: format!("add-{}-{}", native, token),
            kind: SwapKind::Addition,
            pair: pair.clone(),
            offered: Amount::from_units(token, native).negate(),
            requested: Amount::token(pool),
            liquidity_fee: Amount::native(pool),
        }
    }

    fn removal(pair: &Pair, native: i128, token: i128, pool: i128) -> SwapRecord {
        SwapRecord {
            trade_id: format!("rm-{}-{}", native, token),
            kind: SwapKind::Removal,
            pair: pair.clone(),
            offered: Amount::token(pool).negate(),
            requested: Amount::from_units(token, native),
            liquidity_fee: Amount::zero(),
        }
    }

    #[test]
    fn test_two_additions_same_pair() {
        let x = pair("X");
        let a = addition(&x, 5_000_000_000_000, 2_000, 1_500);
        let b = addition(&x, 1_000_000_000_000, 500, 300);

        let records = consolidate(&[a.clone(), b.clone()]);
        assert_eq!(records.len(), 1);

        let balances = records[0].balances;
        assert_eq!(
            balances.asset,
            a.offered.token_decimal() + b.offered.token_decimal()
        );
        assert_eq!(balances.asset, d("-2.5"));
        assert_eq!(balances.pool_token, d("1.8"));
        assert_eq!(balances.native_coin, d("-6"));
        assert_eq!(balances.liquidity_fee_native, d("0.0000000018"));
    }

    #[test]
    fn test_addition_then_removal_nets_position() {
        let x = pair("X");
        let records = consolidate(&[
            addition(&x, 5_000_000_000_000, 2_000, 1_500),
            removal(&x, 5_000_000_000_000, 2_000, 1_500),
        ]);

        let balances = records[0].balances;
        assert_eq!(balances.native_coin, Decimal::zero());
        assert_eq!(balances.asset, Decimal::zero());
        assert_eq!(balances.pool_token, Decimal::zero());
        // the mint fee is burned, never refunded
        assert_eq!(balances.liquidity_fee_native, d("0.0000000015"));
    }

    #[test]
    fn test_order_independent() {
        let x = pair("X");
        let y = pair("Y");
        let swaps = vec![
            addition(&x, 7, 11, 13),
            removal(&y, 3, 5, 2),
            addition(&y, 17, 19, 23),
            removal(&x, 29, 31, 37),
        ];
        let mut reversed = swaps.clone();
        reversed.reverse();
        let mut rotated = swaps.clone();
        rotated.rotate_left(1);

        let expected = consolidate(&swaps);
        assert_eq!(consolidate(&reversed), expected);
        assert_eq!(consolidate(&rotated), expected);
    }

    #[test]
    fn test_sorted_by_display_name() {
        let swaps = vec![
            addition(&pair("ZED"), 1, 1, 1),
            addition(&pair("ALPHA"), 1, 1, 1),
            addition(&pair("MID"), 1, 1, 1),
        ];
        let names: Vec<_> = consolidate(&swaps)
            .iter()
            .map(|r| r.pair.display_name())
            .collect();
        assert_eq!(names, vec!["TIBET-ALPHA-XCH", "TIBET-MID-XCH", "TIBET-ZED-XCH"]);
    }

    #[test]
    fn test_empty_input() {
        let none: Vec<SwapRecord> = Vec::new();
        assert!(consolidate(&none).is_empty());
    }
}
