use crate::datasource::{DataSourceError, WalletSession};
use crate::domain::{
    AssetId, BalanceSnapshot, ConsolidatedRecord, Fingerprint, Holding, Pair, SwapKind, SwapRecord,
};
use crate::engine::{
    consolidate, normalize_offer, BalanceValuation, ImpermanenceCalculator, ImpermanenceReport,
    PoolValuator, SkipReason, ValuationError,
};
use crate::registry::TokenRegistry;
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Which swap kinds a scan keeps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapMode {
    #[default]
    All,
    Additions,
    Removals,
}

impl SwapMode {
    pub fn admits(&self, kind: SwapKind) -> bool {
        matches!(
            (self, kind),
            (SwapMode::All, _)
                | (SwapMode::Additions, SwapKind::Addition)
                | (SwapMode::Removals, SwapKind::Removal)
        )
    }
}

impl FromStr for SwapMode {
    type Err = ReconcileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(SwapMode::All),
            "additions" => Ok(SwapMode::Additions),
            "removals" => Ok(SwapMode::Removals),
            other => Err(ReconcileError::InvalidMode(other.to_string())),
        }
    }
}

/// Token and kind restrictions for a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwapFilter {
    /// Pair token symbol, matched case-insensitively.
    pub token: Option<String>,
    pub mode: SwapMode,
}

impl SwapFilter {
    pub fn token(symbol: impl Into<String>) -> Self {
        SwapFilter {
            token: Some(symbol.into()),
            mode: SwapMode::All,
        }
    }

    pub fn admits_pair(&self, pair: &Pair) -> bool {
        self.token
            .as_deref()
            .map_or(true, |symbol| pair.matches_symbol(symbol))
    }

    pub fn admits(&self, swap: &SwapRecord) -> bool {
        self.mode.admits(swap.kind) && self.admits_pair(&swap.pair)
    }
}

/// Offer counts of one scan.
///
/// `additions` and `removals` count every recognized swap, including ones
/// the filter then left out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub offers_seen: usize,
    pub additions: usize,
    pub removals: usize,
    pub skipped_malformed: usize,
    pub skipped_unresolved: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwapScan {
    pub swaps: Vec<SwapRecord>,
    pub stats: ScanStats,
}

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Source(#[from] DataSourceError),
    #[error(transparent)]
    Valuation(#[from] ValuationError),
    #[error("invalid mode: must be all, additions, or removals, got {0}")]
    InvalidMode(String),
}

/// Runs swap scans and valuations across the configured wallet keys.
///
/// The wallet daemon has a single active key, so wallet access is
/// serialized: a run holds `session` from its first login until its last
/// wallet read.
#[derive(Debug, Clone)]
pub struct Reconciler {
    wallet: Arc<dyn WalletSession>,
    session: Arc<Mutex<()>>,
    valuator: PoolValuator,
    registry: Arc<TokenRegistry>,
    fingerprints: Vec<Fingerprint>,
}

impl Reconciler {
    pub fn new(
        wallet: Arc<dyn WalletSession>,
        valuator: PoolValuator,
        registry: Arc<TokenRegistry>,
        fingerprints: Vec<Fingerprint>,
    ) -> Self {
        Self {
            wallet,
            session: Arc::new(Mutex::new(())),
            valuator,
            registry,
            fingerprints,
        }
    }

    pub fn registry(&self) -> &TokenRegistry {
        &self.registry
    }

    /// No configured fingerprints means the daemon's active key.
    fn scan_targets(&self) -> Vec<Option<Fingerprint>> {
        if self.fingerprints.is_empty() {
            vec![None]
        } else {
            self.fingerprints.iter().copied().map(Some).collect()
        }
    }

    /// Scan every key's offers for liquidity swaps.
    ///
    /// Keys are scanned one after another; any transport failure aborts the
    /// whole scan. Results are sorted by pair display name.
    pub async fn swaps(&self, filter: &SwapFilter) -> Result<SwapScan, ReconcileError> {
        let mut swaps = Vec::new();
        let mut stats = ScanStats::default();
        let _session = self.session.lock().await;

        for fingerprint in self.scan_targets() {
            let before = stats;
            let mut offers = self.wallet.confirmed_own_offers(fingerprint);

            while let Some(offer) = offers.try_next().await? {
                stats.offers_seen += 1;
                match normalize_offer(&offer, &self.registry) {
                    Ok(swap) => {
                        match swap.kind {
                            SwapKind::Addition => stats.additions += 1,
                            SwapKind::Removal => stats.removals += 1,
                        }
                        if filter.admits(&swap) {
                            swaps.push(swap);
                        }
                    }
                    Err(reason) => {
                        match reason {
                            SkipReason::Malformed => stats.skipped_malformed += 1,
                            SkipReason::Unresolved(_) => stats.skipped_unresolved += 1,
                        }
                        debug!(trade_id = %offer.trade_id, %reason, "Skipping offer");
                    }
                }
            }

            info!(
                fingerprint = ?fingerprint,
                offers = stats.offers_seen - before.offers_seen,
                additions = stats.additions - before.additions,
                removals = stats.removals - before.removals,
                "Scanned wallet offers"
            );
        }

        swaps.sort_by_cached_key(|s| s.pair.display_name());
        Ok(SwapScan { swaps, stats })
    }

    pub async fn consolidated(
        &self,
        filter: &SwapFilter,
    ) -> Result<Vec<ConsolidatedRecord>, ReconcileError> {
        let scan = self.swaps(filter).await?;
        Ok(consolidate(&scan.swaps))
    }

    /// Net return per pair against live reserves.
    ///
    /// The full scan is consolidated before any reserves are fetched; each
    /// pair's reserves are fetched once.
    pub async fn impermanence(
        &self,
        filter: &SwapFilter,
    ) -> Result<ImpermanenceReport, ReconcileError> {
        let records = self.consolidated(filter).await?;

        let mut calculator = ImpermanenceCalculator::new();
        for record in &records {
            let reserves = self.valuator.reserves(&record.pair).await?;
            let result = calculator.add(record, &reserves)?;
            debug!(
                pair = %record.pair.display_name(),
                net_return = %result.net_return,
                "Valued position"
            );
        }

        let report = calculator.finish();
        info!(
            pairs = report.results.len(),
            total_net_return = %report.total_net_return,
            "Impermanence computed"
        );
        Ok(report)
    }

    /// Value the liquidity and token balances the wallets hold right now.
    pub async fn balances(&self, token: Option<&str>) -> Result<Vec<BalanceValuation>, ReconcileError> {
        let filter = SwapFilter {
            token: token.map(str::to_string),
            mode: SwapMode::All,
        };
        let mut snapshots = Vec::new();

        let session = self.session.lock().await;
        for fingerprint in self.scan_targets() {
            for wallet in self.wallet.cat_wallets(fingerprint).await? {
                let Some((pair, holding)) = self.resolve_holding(&wallet.asset_id) else {
                    debug!(wallet = %wallet.name, asset_id = %wallet.asset_id, "No pool for wallet");
                    continue;
                };
                if !filter.admits_pair(&pair) {
                    continue;
                }
                let units = self.wallet.confirmed_balance(fingerprint, wallet.id).await?;
                snapshots.push(BalanceSnapshot {
                    pair,
                    holding,
                    units,
                });
            }
        }
        drop(session);

        let mut valuations = Vec::new();
        for record in consolidate(&snapshots) {
            let reserves = self.valuator.reserves(&record.pair).await?;
            valuations.push(PoolValuator::value_holdings(&record, &reserves)?);
        }
        info!(pairs = valuations.len(), "Wallet balances valued");
        Ok(valuations)
    }

    /// A liquidity token match wins over a listed asset match.
    fn resolve_holding(&self, asset_id: &AssetId) -> Option<(Pair, Holding)> {
        if let Some(pair) = self.registry.pair_for_liquidity_token(asset_id) {
            return Some((pair.clone(), Holding::PoolToken));
        }
        self.registry
            .pair_for_asset(asset_id)
            .map(|pair| (pair.clone(), Holding::Asset))
    }
}
