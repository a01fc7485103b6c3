//! Pure computation engine(s) for swap reconciliation.
//!
//! Control flow: classify -> normalize -> consolidate -> price -> impermanence.
//! Only the valuator touches the network; everything else is deterministic.

use crate::domain::AssetId;

pub mod classifier;
pub mod consolidator;
pub mod impermanence;
pub mod normalizer;
pub mod pricing;
pub mod valuator;

pub use classifier::{classify, is_addition, is_removal, ClassifiedOffer};
pub use consolidator::consolidate;
pub use impermanence::{ImpermanenceCalculator, ImpermanenceReport, ImpermanenceResult};
pub use normalizer::{normalize, normalize_offer, resolve_pair};
pub use pricing::{quote_swap_output, redeem_liquidity, ValuationError};
pub use valuator::{BalanceValuation, PoolValuator};

/// Why an offer was left out of the results. Never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Shape is neither an addition nor a removal.
    Malformed,
    /// The offer's asset has no listed pool.
    Unresolved(AssetId),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Malformed => write!(f, "not a liquidity addition or removal"),
            SkipReason::Unresolved(asset_id) => write!(f, "no pool for asset {}", asset_id),
        }
    }
}
