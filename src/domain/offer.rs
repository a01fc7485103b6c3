//! Raw trade offers and the validated asset legs parsed from them.

use crate::domain::{Amount, AssetId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Offer status the wallet reports for settled trades.
pub const STATUS_CONFIRMED: &str = "CONFIRMED";

/// A trade record as summarized by the wallet.
///
/// Map keys are asset ids; values are smallest-unit amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawOffer {
    pub trade_id: String,
    pub status: String,
    pub is_mine: bool,
    pub offered: BTreeMap<AssetId, i128>,
    pub requested: BTreeMap<AssetId, i128>,
}

impl RawOffer {
    pub fn is_confirmed_own(&self) -> bool {
        self.status == STATUS_CONFIRMED && self.is_mine
    }
}

/// One side of an offer with at most one native and one non-native entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLeg {
    pub native: Option<i128>,
    pub asset: Option<(AssetId, i128)>,
}

/// Why an asset map could not be read as a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegError {
    Empty,
    TooManyAssets,
}

impl AssetLeg {
    /// Validate an asset map: empty maps and maps with more than one
    /// non-native entry are rejected.
    pub fn parse(assets: &BTreeMap<AssetId, i128>) -> Result<Self, LegError> {
        if assets.is_empty() {
            return Err(LegError::Empty);
        }

        let mut leg = AssetLeg {
            native: None,
            asset: None,
        };
        for (id, units) in assets {
            if id.is_native() {
                leg.native = Some(*units);
            } else if leg.asset.is_some() {
                return Err(LegError::TooManyAssets);
            } else {
                leg.asset = Some((id.clone(), *units));
            }
        }
        Ok(leg)
    }

    pub fn asset_id(&self) -> Option<&AssetId> {
        self.asset.as_ref().map(|(id, _)| id)
    }

    /// Native entry to the native side, the asset entry to the token side.
    pub fn amount(&self) -> Amount {
        let token_units = self.asset.as_ref().map(|(_, units)| *units).unwrap_or(0);
        Amount::from_units(token_units, self.native.unwrap_or(0))
    }
}
