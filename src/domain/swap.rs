//! Normalized liquidity swaps.

use crate::domain::{Amount, Pair};
use serde::{Deserialize, Serialize};

/// The two liquidity lifecycle shapes recognized from offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapKind {
    /// Native coin and token given for pool tokens.
    Addition,
    /// Pool tokens given for native coin and token.
    Removal,
}

impl std::fmt::Display for SwapKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SwapKind::Addition => write!(f, "addition"),
            SwapKind::Removal => write!(f, "removal"),
        }
    }
}

/// A qualifying offer after classification and normalization.
///
/// `offered` is negated: it is what the wallet gave up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwapRecord {
    pub trade_id: String,
    pub kind: SwapKind,
    pub pair: Pair,
    pub offered: Amount,
    pub requested: Amount,
    pub liquidity_fee: Amount,
}

impl SwapRecord {
    /// Native coin that actually entered the pool, net of the mint fee.
    ///
    /// Zero for removals.
    pub fn liquidity_native(&self) -> Amount {
        match self.kind {
            SwapKind::Addition => {
                let given = self.offered.negate().native_units();
                Amount::native(given - self.liquidity_fee.native_units())
            }
            SwapKind::Removal => Amount::zero(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&SwapKind::Addition).unwrap(),
            "\"addition\""
        );
        assert_eq!(SwapKind::Removal.to_string(), "removal");
    }
}
