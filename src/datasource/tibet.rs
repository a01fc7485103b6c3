//! TibetSwap REST API client: token/pair listings and live pool reserves.

use super::{json_units, DataSourceError, PoolReserveSource, TokenListSource};
use crate::domain::{PairId, PoolReserveSnapshot};
use crate::registry::{PairListing, TokenListing};
use async_trait::async_trait;
use backoff::future::retry;
use backoff::ExponentialBackoff;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Upper bound on the number of pairs requested from the listing endpoint.
const PAIR_LIST_LIMIT: u32 = 750;

/// Pool API data source.
#[derive(Debug, Clone)]
pub struct TibetApi {
    client: Client,
    base_url: String,
}

impl TibetApi {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_json(&self, path: &str) -> Result<serde_json::Value, DataSourceError> {
        let url = format!("{}/{}", self.base_url, path);
        let backoff = ExponentialBackoff {
            max_elapsed_time: Some(Duration::from_secs(30)),
            ..Default::default()
        };

        retry(backoff, || async {
            let response = self.client.get(&url).send().await.map_err(|e| {
                backoff::Error::transient(DataSourceError::NetworkError(e.to_string()))
            })?;

            let status = response.status();
            if status == 429 {
                return Err(backoff::Error::transient(DataSourceError::RateLimited));
            }
            if status.is_server_error() {
                return Err(backoff::Error::transient(DataSourceError::HttpError {
                    status: status.as_u16(),
                    message: "Server error".to_string(),
                }));
            }
            if !status.is_success() {
                return Err(backoff::Error::permanent(DataSourceError::HttpError {
                    status: status.as_u16(),
                    message: "Client error".to_string(),
                }));
            }

            response
                .json::<serde_json::Value>()
                .await
                .map_err(|e| backoff::Error::permanent(DataSourceError::ParseError(e.to_string())))
        })
        .await
    }
}

#[async_trait]
impl TokenListSource for TibetApi {
    async fn fetch_tokens(&self) -> Result<Vec<TokenListing>, DataSourceError> {
        debug!("Fetching token list from {}", self.base_url);
        let response = self.get_json("tokens").await?;
        serde_json::from_value(response)
            .map_err(|e| DataSourceError::ParseError(format!("Invalid token list: {}", e)))
    }

    async fn fetch_pairs(&self) -> Result<Vec<PairListing>, DataSourceError> {
        debug!("Fetching pair list from {}", self.base_url);
        let response = self
            .get_json(&format!("pairs?limit={}", PAIR_LIST_LIMIT))
            .await?;
        serde_json::from_value(response)
            .map_err(|e| DataSourceError::ParseError(format!("Invalid pair list: {}", e)))
    }
}

#[async_trait]
impl PoolReserveSource for TibetApi {
    async fn fetch_reserves(&self, pair_id: &PairId) -> Result<PoolReserveSnapshot, DataSourceError> {
        debug!("Fetching reserves for pair={}", pair_id);
        let response = self.get_json(&format!("pair/{}", pair_id)).await?;
        parse_reserves(&response)
    }
}

fn parse_reserves(pair_json: &serde_json::Value) -> Result<PoolReserveSnapshot, DataSourceError> {
    let field = |name: &str| {
        pair_json
            .get(name)
            .and_then(json_units)
            .ok_or_else(|| DataSourceError::ParseError(format!("Missing {} field", name)))
    };

    Ok(PoolReserveSnapshot {
        token_reserve: field("token_reserve")?,
        native_reserve: field("xch_reserve")?,
        total_liquidity: field("liquidity")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reserves_valid() {
        let pair_json = serde_json::json!({
            "launcher_id": "abc",
            "asset_id": "def",
            "liquidity_asset_id": "ghi",
            "xch_reserve": 2_000_000_000_000u64,
            "token_reserve": 1_000_000_000u64,
            "liquidity": 1_500_000_000u64
        });

        let reserves = parse_reserves(&pair_json).unwrap();
        assert_eq!(reserves.native_reserve, 2_000_000_000_000);
        assert_eq!(reserves.token_reserve, 1_000_000_000);
        assert_eq!(reserves.total_liquidity, 1_500_000_000);
    }

    #[test]
    fn test_parse_reserves_missing_field() {
        let pair_json = serde_json::json!({ "xch_reserve": 1, "token_reserve": 2 });
        match parse_reserves(&pair_json) {
            Err(DataSourceError::ParseError(msg)) => assert!(msg.contains("liquidity")),
            other => panic!("Expected ParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_listing_deserialization_ignores_extra_fields() {
        let tokens: Vec<TokenListing> = serde_json::from_value(serde_json::json!([{
            "asset_id": "a1",
            "pair_id": "p1",
            "name": "Token One",
            "short_name": "ONE",
            "image_url": "https://example.invalid/one.png",
            "verified": true
        }]))
        .unwrap();
        assert_eq!(tokens[0].short_name, "ONE");
        assert!(tokens[0].verified);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let api = TibetApi::new("https://api.example.invalid/".to_string());
        assert_eq!(api.base_url, "https://api.example.invalid");
    }
}
