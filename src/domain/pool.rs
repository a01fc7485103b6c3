//! Live pool reserve state.

use serde::{Deserialize, Serialize};

/// Reserves of one pool at fetch time, in smallest units.
///
/// Never cached by the engine; each valuation run fetches its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolReserveSnapshot {
    pub token_reserve: i128,
    pub native_reserve: i128,
    pub total_liquidity: i128,
}
