//! Mock data sources for testing without network calls.

use super::{
    CatWallet, DataSourceError, PoolReserveSource, TokenListSource, WalletSession,
};
use crate::domain::{Fingerprint, PairId, PoolReserveSnapshot, RawOffer};
use crate::registry::{PairListing, TokenListing};
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Mock wallet session keyed by fingerprint.
///
/// Offers registered under `None` belong to the daemon's active key.
#[derive(Debug, Clone, Default)]
pub struct MockWalletSession {
    offers: HashMap<Option<Fingerprint>, Vec<RawOffer>>,
    wallets: HashMap<Option<Fingerprint>, Vec<CatWallet>>,
    balances: HashMap<(Option<Fingerprint>, u32), i128>,
    failing: bool,
}

impl MockWalletSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an offer record to a wallet. Unconfirmed or foreign records are
    /// filtered out by the stream like the real daemon client does.
    pub fn with_offer(mut self, fingerprint: Option<Fingerprint>, offer: RawOffer) -> Self {
        self.offers.entry(fingerprint).or_default().push(offer);
        self
    }

    pub fn with_offers(mut self, fingerprint: Option<Fingerprint>, offers: Vec<RawOffer>) -> Self {
        self.offers.entry(fingerprint).or_default().extend(offers);
        self
    }

    /// Add a CAT wallet with its confirmed balance.
    pub fn with_wallet(
        mut self,
        fingerprint: Option<Fingerprint>,
        wallet: CatWallet,
        balance: i128,
    ) -> Self {
        self.balances.insert((fingerprint, wallet.id), balance);
        self.wallets.entry(fingerprint).or_default().push(wallet);
        self
    }

    /// Make every call fail with a network error.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }
}

#[async_trait]
impl WalletSession for MockWalletSession {
    fn confirmed_own_offers(
        &self,
        fingerprint: Option<Fingerprint>,
    ) -> BoxStream<'_, Result<RawOffer, DataSourceError>> {
        if self.failing {
            return stream::once(async {
                Err(DataSourceError::NetworkError("wallet unreachable".to_string()))
            })
            .boxed();
        }

        let offers: Vec<_> = self
            .offers
            .get(&fingerprint)
            .map(|offers| {
                offers
                    .iter()
                    .filter(|o| o.is_confirmed_own())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        stream::iter(offers.into_iter().map(Ok)).boxed()
    }

    async fn cat_wallets(
        &self,
        fingerprint: Option<Fingerprint>,
    ) -> Result<Vec<CatWallet>, DataSourceError> {
        if self.failing {
            return Err(DataSourceError::NetworkError("wallet unreachable".to_string()));
        }
        Ok(self.wallets.get(&fingerprint).cloned().unwrap_or_default())
    }

    async fn confirmed_balance(
        &self,
        fingerprint: Option<Fingerprint>,
        wallet_id: u32,
    ) -> Result<i128, DataSourceError> {
        if self.failing {
            return Err(DataSourceError::NetworkError("wallet unreachable".to_string()));
        }
        self.balances
            .get(&(fingerprint, wallet_id))
            .copied()
            .ok_or_else(|| DataSourceError::Rpc(format!("unknown wallet {}", wallet_id)))
    }
}

/// Mock reserve source that counts fetches.
#[derive(Debug, Clone, Default)]
pub struct MockPoolSource {
    reserves: HashMap<PairId, PoolReserveSnapshot>,
    fetches: Arc<AtomicUsize>,
}

impl MockPoolSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reserves(mut self, pair_id: PairId, reserves: PoolReserveSnapshot) -> Self {
        self.reserves.insert(pair_id, reserves);
        self
    }

    /// Number of `fetch_reserves` calls served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PoolReserveSource for MockPoolSource {
    async fn fetch_reserves(&self, pair_id: &PairId) -> Result<PoolReserveSnapshot, DataSourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.reserves
            .get(pair_id)
            .copied()
            .ok_or_else(|| DataSourceError::HttpError {
                status: 404,
                message: format!("pair {} not found", pair_id),
            })
    }
}

/// Mock token list source that counts fetches.
#[derive(Debug, Clone, Default)]
pub struct MockTokenListSource {
    tokens: Vec<TokenListing>,
    pairs: Vec<PairListing>,
    fetches: Arc<AtomicUsize>,
}

impl MockTokenListSource {
    pub fn new(tokens: Vec<TokenListing>, pairs: Vec<PairListing>) -> Self {
        Self {
            tokens,
            pairs,
            fetches: Arc::default(),
        }
    }

    /// Number of list fetches served so far (tokens and pairs each count).
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenListSource for MockTokenListSource {
    async fn fetch_tokens(&self) -> Result<Vec<TokenListing>, DataSourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.tokens.clone())
    }

    async fn fetch_pairs(&self) -> Result<Vec<PairListing>, DataSourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.pairs.clone())
    }
}
