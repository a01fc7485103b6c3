//! Decide whether an offer is a liquidity addition, a removal, or neither.

use super::SkipReason;
use crate::domain::{AssetId, AssetLeg, RawOffer, SwapKind};
use std::collections::BTreeMap;

/// An offer whose shape matched one of the two liquidity events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedOffer {
    pub trade_id: String,
    pub kind: SwapKind,
    pub offered: AssetLeg,
    pub requested: AssetLeg,
}

fn has_native(assets: &BTreeMap<AssetId, i128>) -> bool {
    assets.keys().any(AssetId::is_native)
}

/// Two assets offered, one of them native; one non-native asset requested.
pub fn is_addition(offer: &RawOffer) -> bool {
    offer.offered.len() == 2
        && has_native(&offer.offered)
        && offer.requested.len() == 1
        && !has_native(&offer.requested)
}

/// One non-native asset offered; two assets requested, one of them native.
pub fn is_removal(offer: &RawOffer) -> bool {
    offer.offered.len() == 1
        && !has_native(&offer.offered)
        && offer.requested.len() == 2
        && has_native(&offer.requested)
}

/// Classify an offer and parse both legs.
pub fn classify(offer: &RawOffer) -> Result<ClassifiedOffer, SkipReason> {
    let kind = if is_addition(offer) {
        SwapKind::Addition
    } else if is_removal(offer) {
        SwapKind::Removal
    } else {
        return Err(SkipReason::Malformed);
    };

    let offered = AssetLeg::parse(&offer.offered).map_err(|_| SkipReason::Malformed)?;
    let requested = AssetLeg::parse(&offer.requested).map_err(|_| SkipReason::Malformed)?;

    Ok(ClassifiedOffer {
        trade_id: offer.trade_id.clone(),
        kind,
        offered,
        requested,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer(offered: &[(&str, i128)], requested: &[(&str, i128)]) -> RawOffer {
        let map = |entries: &[(&str, i128)]| {
            entries
                .iter()
                .map(|(id, units)| (AssetId::new(*id), *units))
                .collect()
        };
        RawOffer {
            trade_id: "t".to_string(),
            status: "CONFIRMED".to_string(),
            is_mine: true,
            offered: map(offered),
            requested: map(requested),
        }
    }

    #[test]
    fn test_addition_shape() {
        let o = offer(&[("xch", 5_000), ("cat", 2_000)], &[("lp", 1_500)]);
        assert!(is_addition(&o));
        assert!(!is_removal(&o));
        assert_eq!(classify(&o).unwrap().kind, SwapKind::Addition);
    }

    #[test]
    fn test_removal_shape() {
        let o = offer(&[("lp", 1_500)], &[("xch", 5_000), ("cat", 2_000)]);
        assert!(is_removal(&o));
        assert!(!is_addition(&o));
        let classified = classify(&o).unwrap();
        assert_eq!(classified.kind, SwapKind::Removal);
        assert_eq!(classified.requested.native, Some(5_000));
    }

    #[test]
    fn test_other_shapes_are_malformed() {
        let shapes = vec![
            // plain buy of a token with native coin
            offer(&[("xch", 5_000)], &[("cat", 2_000)]),
            // plain sale of a token
            offer(&[("cat", 2_000)], &[("xch", 5_000)]),
            // two tokens for a token
            offer(&[("cat", 1), ("dog", 2)], &[("lp", 3)]),
            // three assets offered
            offer(&[("xch", 1), ("cat", 2), ("dog", 3)], &[("lp", 3)]),
            // addition requesting native back
            offer(&[("xch", 1), ("cat", 2)], &[("xch", 3)]),
            // nothing requested (e.g. an NFT leg the summary omits)
            offer(&[("xch", 1), ("cat", 2)], &[]),
        ];
        for o in shapes {
            assert_eq!(classify(&o), Err(SkipReason::Malformed), "{:?}", o);
        }
    }

    #[test]
    fn test_never_both() {
        let candidates = vec![
            offer(&[("xch", 1), ("cat", 2)], &[("lp", 3)]),
            offer(&[("lp", 3)], &[("xch", 1), ("cat", 2)]),
            offer(&[("xch", 1)], &[("xch", 1)]),
            offer(&[], &[]),
        ];
        for o in candidates {
            assert!(!(is_addition(&o) && is_removal(&o)));
        }
    }
}
