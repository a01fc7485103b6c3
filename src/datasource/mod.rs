//! Data source abstractions for the wallet daemon and the pool API.

use crate::domain::{AssetId, Fingerprint, PairId, PoolReserveSnapshot, RawOffer};
use crate::registry::{PairListing, TokenListing};
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::fmt;

pub mod chia_wallet;
pub mod mock;
pub mod tibet;

pub use chia_wallet::ChiaWalletRpc;
pub use mock::{MockPoolSource, MockTokenListSource, MockWalletSession};
pub use tibet::TibetApi;

/// A CAT wallet held by a wallet key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatWallet {
    pub id: u32,
    pub name: String,
    pub asset_id: AssetId,
}

/// Wallet daemon session.
///
/// Every call that takes a fingerprint logs in to that key first; `None`
/// uses whichever key the daemon has active.
#[async_trait]
pub trait WalletSession: Send + Sync + fmt::Debug {
    /// Stream every confirmed offer this wallet made, each exactly once.
    ///
    /// Pagination happens inside the stream; the first item is only
    /// requested after login completes.
    fn confirmed_own_offers(
        &self,
        fingerprint: Option<Fingerprint>,
    ) -> BoxStream<'_, Result<RawOffer, DataSourceError>>;

    /// List the CAT wallets of a key.
    async fn cat_wallets(
        &self,
        fingerprint: Option<Fingerprint>,
    ) -> Result<Vec<CatWallet>, DataSourceError>;

    /// Confirmed balance of a wallet in smallest units, once synced.
    async fn confirmed_balance(
        &self,
        fingerprint: Option<Fingerprint>,
        wallet_id: u32,
    ) -> Result<i128, DataSourceError>;
}

/// Live pool reserve state.
#[async_trait]
pub trait PoolReserveSource: Send + Sync + fmt::Debug {
    async fn fetch_reserves(&self, pair_id: &PairId) -> Result<PoolReserveSnapshot, DataSourceError>;
}

/// Token and pair listings used to build the registry.
#[async_trait]
pub trait TokenListSource: Send + Sync + fmt::Debug {
    async fn fetch_tokens(&self) -> Result<Vec<TokenListing>, DataSourceError>;
    async fn fetch_pairs(&self) -> Result<Vec<PairListing>, DataSourceError>;
}

/// Error type for data source operations.
#[derive(Debug, Clone)]
pub enum DataSourceError {
    /// Network error (e.g., connection refused, TLS failure, timeout)
    NetworkError(String),
    /// HTTP error (e.g., 429 rate limit, 5xx server error)
    HttpError { status: u16, message: String },
    /// Parsing error (invalid JSON or malformed response)
    ParseError(String),
    /// Rate limit exceeded (caller should implement backoff)
    RateLimited,
    /// Wallet RPC answered with `success: false`
    Rpc(String),
    /// Other error
    Other(String),
}

impl fmt::Display for DataSourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSourceError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            DataSourceError::HttpError { status, message } => {
                write!(f, "HTTP error {}: {}", status, message)
            }
            DataSourceError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            DataSourceError::RateLimited => write!(f, "Rate limited"),
            DataSourceError::Rpc(msg) => write!(f, "Wallet RPC error: {}", msg),
            DataSourceError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for DataSourceError {}

/// Read a JSON number as a unit count, accepting integers and floats.
///
/// Non-finite floats become zero.
pub(crate) fn json_units(value: &serde_json::Value) -> Option<i128> {
    if let Some(i) = value.as_i64() {
        return Some(i128::from(i));
    }
    if let Some(u) = value.as_u64() {
        return Some(i128::from(u));
    }
    value.as_f64().map(crate::domain::amount::lossy_units)
}
