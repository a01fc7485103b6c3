//! Build the registry from cached or freshly fetched listings.

use super::{PairListing, TokenListing, TokenRegistry};
use crate::datasource::{DataSourceError, TokenListSource};
use crate::db::Repository;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

const TOKENS_KEY: &str = "tokens";
const PAIRS_KEY: &str = "pairs";

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Source(#[from] DataSourceError),
    #[error(transparent)]
    Db(#[from] sqlx::Error),
    #[error("cached listing is unreadable: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Loads the token registry, refreshing the SQLite cache once it ages out.
#[derive(Debug, Clone)]
pub struct RegistryLoader {
    source: Arc<dyn TokenListSource>,
    repo: Arc<Repository>,
    ttl_ms: i64,
}

impl RegistryLoader {
    pub fn new(source: Arc<dyn TokenListSource>, repo: Arc<Repository>, ttl_ms: i64) -> Self {
        Self { source, repo, ttl_ms }
    }

    pub async fn load(&self) -> Result<TokenRegistry, RegistryError> {
        self.load_at(chrono::Utc::now().timestamp_millis()).await
    }

    /// Load as of `now_ms`.
    ///
    /// Both cached lists must be fresh to be used; otherwise both are
    /// refetched and stored.
    pub async fn load_at(&self, now_ms: i64) -> Result<TokenRegistry, RegistryError> {
        let cached_tokens = self.read::<TokenListing>(TOKENS_KEY, now_ms).await?;
        let cached_pairs = self.read::<PairListing>(PAIRS_KEY, now_ms).await?;

        let (tokens, pairs) = match (cached_tokens, cached_pairs) {
            (Some(tokens), Some(pairs)) => {
                debug!("Using cached token and pair lists");
                (tokens, pairs)
            }
            _ => {
                let tokens = self.source.fetch_tokens().await?;
                let pairs = self.source.fetch_pairs().await?;
                self.repo
                    .write_cached(TOKENS_KEY, &serde_json::to_string(&tokens)?, now_ms)
                    .await?;
                self.repo
                    .write_cached(PAIRS_KEY, &serde_json::to_string(&pairs)?, now_ms)
                    .await?;
                debug!(tokens = tokens.len(), pairs = pairs.len(), "Refreshed listing cache");
                (tokens, pairs)
            }
        };

        let registry = TokenRegistry::from_lists(&tokens, &pairs);
        info!(
            tokens = registry.token_count(),
            pairs = registry.pair_count(),
            "Token registry loaded"
        );
        Ok(registry)
    }

    /// An unreadable payload counts as a miss, so it gets overwritten.
    async fn read<T: DeserializeOwned>(
        &self,
        name: &str,
        now_ms: i64,
    ) -> Result<Option<Vec<T>>, RegistryError> {
        let Some(payload) = self.repo.read_cached(name, self.ttl_ms, now_ms).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&payload) {
            Ok(listings) => Ok(Some(listings)),
            Err(e) => {
                warn!(cache = name, error = %e, "Discarding unreadable listing cache");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::MockTokenListSource;
    use crate::db::init_db;
    use crate::domain::AssetId;
    use crate::registry::tests::sample_lists;
    use tempfile::TempDir;

    const DAY_MS: i64 = 86_400_000;

    async fn setup() -> (RegistryLoader, MockTokenListSource, Arc<Repository>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir
            .path()
            .join("cache.db")
            .to_string_lossy()
            .to_string();
        let repo = Arc::new(Repository::new(init_db(&db_path).await.unwrap()));
        let (tokens, pairs) = sample_lists();
        let source = MockTokenListSource::new(tokens, pairs);
        let loader = RegistryLoader::new(Arc::new(source.clone()), repo.clone(), DAY_MS);
        (loader, source, repo, temp_dir)
    }

    #[tokio::test]
    async fn test_cold_cache_fetches_and_stores() {
        let (loader, source, repo, _dir) = setup().await;

        let registry = loader.load_at(1_000).await.unwrap();
        assert_eq!(registry.pair_count(), 1);
        assert!(registry.pair_for_asset(&AssetId::new("cat-dbx")).is_some());
        assert_eq!(source.fetch_count(), 2);
        assert!(repo.read_cached(TOKENS_KEY, DAY_MS, 1_000).await.unwrap().is_some());
        assert!(repo.read_cached(PAIRS_KEY, DAY_MS, 1_000).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_warm_cache_skips_fetch() {
        let (loader, source, _repo, _dir) = setup().await;

        loader.load_at(1_000).await.unwrap();
        let registry = loader.load_at(1_000 + DAY_MS - 1).await.unwrap();
        assert_eq!(registry.token_count(), 2);
        assert_eq!(source.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_expired_cache_refetches() {
        let (loader, source, _repo, _dir) = setup().await;

        loader.load_at(1_000).await.unwrap();
        loader.load_at(1_000 + DAY_MS).await.unwrap();
        assert_eq!(source.fetch_count(), 4);
    }

    #[tokio::test]
    async fn test_half_cache_refetches_both() {
        let (loader, source, repo, _dir) = setup().await;
        repo.write_cached(TOKENS_KEY, "[]", 1_000).await.unwrap();

        let registry = loader.load_at(1_000).await.unwrap();
        assert_eq!(registry.token_count(), 2);
        assert_eq!(source.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_corrupt_cache_is_refetched() {
        let (loader, source, repo, _dir) = setup().await;
        loader.load_at(1_000).await.unwrap();
        repo.write_cached(TOKENS_KEY, "not json", 1_000).await.unwrap();

        let registry = loader.load_at(2_000).await.unwrap();
        assert_eq!(source.fetch_count(), 4);
        assert_eq!(registry.token_count(), 2);
        assert!(registry.pair_for_asset(&AssetId::new("cat-dbx")).is_some());

        let rewritten = repo.read_cached(TOKENS_KEY, DAY_MS, 2_000).await.unwrap().unwrap();
        assert!(serde_json::from_str::<Vec<TokenListing>>(&rewritten).is_ok());
    }
}
