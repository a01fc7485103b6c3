//! Turn classified offers into canonical swap records.

use super::classifier::{classify, ClassifiedOffer};
use super::SkipReason;
use crate::domain::{Amount, AssetId, Pair, RawOffer, SwapKind, SwapRecord};
use crate::registry::TokenRegistry;

/// The asset whose pool an offer touched.
///
/// Additions carry it on the offered side, removals on the requested side.
fn pool_asset(offer: &ClassifiedOffer) -> Option<&AssetId> {
    match offer.kind {
        SwapKind::Addition => offer.offered.asset_id(),
        SwapKind::Removal => offer.requested.asset_id(),
    }
}

/// Resolve the pair an offer belongs to.
pub fn resolve_pair(offer: &ClassifiedOffer, registry: &TokenRegistry) -> Result<Pair, SkipReason> {
    let asset_id = pool_asset(offer).ok_or(SkipReason::Malformed)?;
    registry
        .pair_for_asset(asset_id)
        .cloned()
        .ok_or_else(|| SkipReason::Unresolved(asset_id.clone()))
}

/// Build the swap record for a classified offer and its pair.
///
/// The mint fee of an addition, in native smallest units, equals the
/// requested pool token count. Removals pay no fee.
pub fn normalize(offer: &ClassifiedOffer, pair: Pair) -> SwapRecord {
    let offered = offer.offered.amount();
    let requested = offer.requested.amount();

    let liquidity_fee = match offer.kind {
        SwapKind::Addition => Amount::native(requested.token_units()),
        SwapKind::Removal => Amount::zero(),
    };

    SwapRecord {
        trade_id: offer.trade_id.clone(),
        kind: offer.kind,
        pair,
        offered: offered.negate(),
        requested,
        liquidity_fee,
    }
}

/// Classify, resolve and normalize one raw offer.
pub fn normalize_offer(offer: &RawOffer, registry: &TokenRegistry) -> Result<SwapRecord, SkipReason> {
    let classified = classify(offer)?;
    let pair = resolve_pair(&classified, registry)?;
    Ok(normalize(&classified, pair))
}
