//! In-memory token and pair metadata, built once per run.

use crate::domain::{AssetId, Pair, PairId, Token};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

pub mod loader;

pub use loader::{RegistryError, RegistryLoader};

/// A token as listed by the pool API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenListing {
    pub asset_id: String,
    #[serde(default)]
    pub pair_id: Option<String>,
    pub name: String,
    pub short_name: String,
    #[serde(default)]
    pub verified: bool,
}

/// A pool as listed by the pool API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairListing {
    pub launcher_id: String,
    pub asset_id: String,
    pub liquidity_asset_id: String,
}

/// Read-only lookup of tokens and pairs.
#[derive(Debug, Clone, Default)]
pub struct TokenRegistry {
    tokens: HashMap<AssetId, Token>,
    pairs: Vec<Pair>,
    by_asset: HashMap<AssetId, usize>,
    by_liquidity_token: HashMap<AssetId, usize>,
}

impl TokenRegistry {
    /// Join the token and pair lists. Pairs whose token is unlisted are dropped.
    pub fn from_lists(tokens: &[TokenListing], pairs: &[PairListing]) -> Self {
        let mut registry = TokenRegistry::default();

        for listing in tokens {
            let token = Token {
                asset_id: AssetId::new(listing.asset_id.clone()),
                symbol: listing.short_name.clone(),
                display_name: listing.name.clone(),
                verified: listing.verified,
            };
            registry.tokens.insert(token.asset_id.clone(), token);
        }

        for listing in pairs {
            let asset_id = AssetId::new(listing.asset_id.clone());
            let Some(token) = registry.tokens.get(&asset_id).cloned() else {
                debug!("Dropping pair {} for unlisted asset {}", listing.launcher_id, asset_id);
                continue;
            };
            let pair = Pair::new(
                PairId::new(listing.launcher_id.clone()),
                token,
                AssetId::new(listing.liquidity_asset_id.clone()),
            );
            let index = registry.pairs.len();
            registry.by_asset.insert(asset_id, index);
            registry
                .by_liquidity_token
                .insert(pair.liquidity_token_id.clone(), index);
            registry.pairs.push(pair);
        }

        registry
    }

    /// Look up a token by asset id. The native id always resolves.
    pub fn token(&self, asset_id: &AssetId) -> Option<Token> {
        if asset_id.is_native() {
            return Some(Token::native());
        }
        self.tokens.get(asset_id).cloned()
    }

    /// The pool trading `asset_id` against the native coin.
    pub fn pair_for_asset(&self, asset_id: &AssetId) -> Option<&Pair> {
        self.by_asset.get(asset_id).map(|&i| &self.pairs[i])
    }

    /// The pool whose liquidity token is `liquidity_token_id`.
    pub fn pair_for_liquidity_token(&self, liquidity_token_id: &AssetId) -> Option<&Pair> {
        self.by_liquidity_token
            .get(liquidity_token_id)
            .map(|&i| &self.pairs[i])
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }
}
