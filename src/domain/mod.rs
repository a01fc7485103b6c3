//! Domain types for liquidity swap reconciliation.
//!
//! This module provides:
//! - Lossless numeric handling via the Decimal wrapper
//! - Amount, the paired token/native unit model
//! - Domain primitives: AssetId, PairId, Fingerprint, Token, Pair
//! - Raw offers, normalized swaps, and per-pair balance aggregates

pub mod amount;
pub mod decimal;
pub mod offer;
pub mod pool;
pub mod position;
pub mod primitives;
pub mod swap;

pub use amount::Amount;
pub use decimal::Decimal;
pub use offer::{AssetLeg, LegError, RawOffer};
pub use pool::PoolReserveSnapshot;
pub use position::{BalanceSnapshot, Balances, ConsolidatedRecord, Contribution, Holding};
pub use primitives::{AssetId, Fingerprint, Pair, PairId, Token, NATIVE_ASSET_ID};
pub use swap::{SwapKind, SwapRecord};
