//! Chia wallet RPC client (HTTPS with a client certificate).

use super::{json_units, CatWallet, DataSourceError, WalletSession};
use crate::domain::{AssetId, Fingerprint, RawOffer};
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use reqwest::{Client, Identity};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Offers requested per `get_all_offers` page.
const OFFER_PAGE_SIZE: usize = 10;
/// Wallet type code of CAT wallets.
const CAT_WALLET_TYPE: u32 = 6;

/// Wallet daemon client.
#[derive(Debug, Clone)]
pub struct ChiaWalletRpc {
    client: Client,
    base_url: String,
    sync_poll: Duration,
}

impl ChiaWalletRpc {
    /// Build a client authenticating with the daemon's PEM cert/key pair.
    ///
    /// The daemon's certificate is signed by a per-install CA, so server
    /// certificate validation is disabled.
    pub fn new(
        base_url: String,
        cert_pem: &[u8],
        key_pem: &[u8],
        timeout: Duration,
        sync_poll: Duration,
    ) -> Result<Self, DataSourceError> {
        let identity = Identity::from_pkcs8_pem(cert_pem, key_pem)
            .map_err(|e| DataSourceError::Other(format!("Invalid wallet identity: {}", e)))?;
        let client = Client::builder()
            .identity(identity)
            .danger_accept_invalid_certs(true)
            .timeout(timeout)
            .build()
            .map_err(|e| DataSourceError::NetworkError(e.to_string()))?;

        Ok(Self::with_client(client, base_url, sync_poll))
    }

    pub fn with_client(client: Client, base_url: String, sync_poll: Duration) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            sync_poll,
        }
    }

    async fn rpc(
        &self,
        endpoint: &str,
        payload: serde_json::Value,
    ) -> Result<serde_json::Value, DataSourceError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| DataSourceError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataSourceError::HttpError {
                status: status.as_u16(),
                message: format!("{} failed", endpoint),
            });
        }

        let body = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| DataSourceError::ParseError(e.to_string()))?;
        check_success(endpoint, body)
    }

    async fn log_in(&self, fingerprint: Option<Fingerprint>) -> Result<(), DataSourceError> {
        if let Some(fingerprint) = fingerprint {
            debug!("Logging in to wallet fingerprint={}", fingerprint);
            self.rpc("log_in", serde_json::json!({ "fingerprint": fingerprint.0 }))
                .await?;
        }
        Ok(())
    }

    async fn offers_count(&self) -> Result<usize, DataSourceError> {
        let response = self.rpc("get_offers_count", serde_json::json!({})).await?;
        response
            .get("total")
            .and_then(|v| v.as_u64())
            .map(|n| n as usize)
            .ok_or_else(|| DataSourceError::ParseError("Missing total field".to_string()))
    }

    async fn offers_page(&self, start: usize) -> Result<Vec<RawOffer>, DataSourceError> {
        let response = self
            .rpc(
                "get_all_offers",
                serde_json::json!({
                    "start": start,
                    "end": start + OFFER_PAGE_SIZE,
                    "exclude_my_offers": false,
                    "exclude_taken_offers": false,
                    "include_completed": true,
                    "reverse": false,
                    "file_contents": false
                }),
            )
            .await?;

        let records = response
            .get("trade_records")
            .and_then(|v| v.as_array())
            .ok_or_else(|| DataSourceError::ParseError("Missing trade_records".to_string()))?;

        let mut offers = Vec::with_capacity(records.len());
        for record in records {
            match parse_trade_record(record) {
                Ok(offer) => offers.push(offer),
                Err(e) => warn!("Failed to parse trade record: {}", e),
            }
        }
        Ok(offers)
    }

    async fn wait_for_sync(&self) -> Result<(), DataSourceError> {
        loop {
            let status = self.rpc("get_sync_status", serde_json::json!({})).await?;
            if status.get("synced").and_then(|v| v.as_bool()).unwrap_or(false) {
                return Ok(());
            }
            info!("Waiting for wallet sync...");
            tokio::time::sleep(self.sync_poll).await;
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PageCursor {
    start: usize,
    total: Option<usize>,
}

#[async_trait]
impl WalletSession for ChiaWalletRpc {
    fn confirmed_own_offers(
        &self,
        fingerprint: Option<Fingerprint>,
    ) -> BoxStream<'_, Result<RawOffer, DataSourceError>> {
        let cursor = PageCursor {
            start: 0,
            total: None,
        };

        stream::try_unfold(cursor, move |mut cursor| async move {
            let total = match cursor.total {
                Some(total) => total,
                None => {
                    self.log_in(fingerprint).await?;
                    let total = self.offers_count().await?;
                    debug!("Wallet reports {} offers", total);
                    cursor.total = Some(total);
                    total
                }
            };
            if cursor.start >= total {
                return Ok::<_, DataSourceError>(None);
            }

            let page = self.offers_page(cursor.start).await?;
            cursor.start += OFFER_PAGE_SIZE;
            Ok(Some((page, cursor)))
        })
        .map_ok(|page| stream::iter(page.into_iter().map(Ok::<RawOffer, DataSourceError>)))
        .try_flatten()
        .try_filter(|offer| futures::future::ready(offer.is_confirmed_own()))
        .boxed()
    }

    async fn cat_wallets(
        &self,
        fingerprint: Option<Fingerprint>,
    ) -> Result<Vec<CatWallet>, DataSourceError> {
        self.log_in(fingerprint).await?;
        let response = self
            .rpc(
                "get_wallets",
                serde_json::json!({ "type": CAT_WALLET_TYPE, "include_data": true }),
            )
            .await?;

        let wallets = response
            .get("wallets")
            .and_then(|v| v.as_array())
            .ok_or_else(|| DataSourceError::ParseError("Missing wallets".to_string()))?;

        let mut cat_wallets = Vec::with_capacity(wallets.len());
        for wallet in wallets {
            match parse_cat_wallet(wallet) {
                Ok(w) => cat_wallets.push(w),
                Err(e) => warn!("Failed to parse wallet: {}", e),
            }
        }
        Ok(cat_wallets)
    }

    async fn confirmed_balance(
        &self,
        fingerprint: Option<Fingerprint>,
        wallet_id: u32,
    ) -> Result<i128, DataSourceError> {
        self.log_in(fingerprint).await?;
        self.wait_for_sync().await?;
        let response = self
            .rpc(
                "get_wallet_balance",
                serde_json::json!({ "wallet_id": wallet_id }),
            )
            .await?;

        response
            .get("wallet_balance")
            .and_then(|b| b.get("confirmed_wallet_balance"))
            .and_then(json_units)
            .ok_or_else(|| {
                DataSourceError::ParseError("Missing confirmed_wallet_balance".to_string())
            })
    }
}

fn check_success(
    endpoint: &str,
    body: serde_json::Value,
) -> Result<serde_json::Value, DataSourceError> {
    if body.get("success").and_then(|v| v.as_bool()) == Some(true) {
        return Ok(body);
    }
    let message = body
        .get("error")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown error");
    Err(DataSourceError::Rpc(format!("{}: {}", endpoint, message)))
}

fn parse_asset_map(
    value: Option<&serde_json::Value>,
    side: &str,
) -> Result<BTreeMap<AssetId, i128>, DataSourceError> {
    let object = value
        .and_then(|v| v.as_object())
        .ok_or_else(|| DataSourceError::ParseError(format!("Missing {} summary", side)))?;

    object
        .iter()
        .map(|(asset_id, units)| {
            json_units(units)
                .map(|units| (AssetId::new(asset_id.clone()), units))
                .ok_or_else(|| {
                    DataSourceError::ParseError(format!("Invalid {} amount for {}", side, asset_id))
                })
        })
        .collect()
}

fn parse_trade_record(record: &serde_json::Value) -> Result<RawOffer, DataSourceError> {
    let trade_id = record
        .get("trade_id")
        .and_then(|v| v.as_str())
        .ok_or_else(|| DataSourceError::ParseError("Missing trade_id field".to_string()))?
        .to_string();

    let status = record
        .get("status")
        .and_then(|v| v.as_str())
        .ok_or_else(|| DataSourceError::ParseError("Missing status field".to_string()))?
        .to_string();

    let is_mine = record
        .get("is_my_offer")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    let summary = record.get("summary");
    let offered = parse_asset_map(summary.and_then(|s| s.get("offered")), "offered")?;
    let requested = parse_asset_map(summary.and_then(|s| s.get("requested")), "requested")?;

    Ok(RawOffer {
        trade_id,
        status,
        is_mine,
        offered,
        requested,
    })
}

fn parse_cat_wallet(wallet: &serde_json::Value) -> Result<CatWallet, DataSourceError> {
    let id = wallet
        .get("id")
        .and_then(|v| v.as_u64())
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| DataSourceError::ParseError("Missing id field".to_string()))?;

    let name = wallet
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    // wallet data is the asset id followed by a two character suffix
    let data = wallet
        .get("data")
        .and_then(|v| v.as_str())
        .ok_or_else(|| DataSourceError::ParseError("Missing data field".to_string()))?;
    let asset_id = data
        .get(..data.len().saturating_sub(2))
        .filter(|s| !s.is_empty())
        .ok_or_else(|| DataSourceError::ParseError(format!("Invalid wallet data: {}", data)))?;

    Ok(CatWallet {
        id,
        name,
        asset_id: AssetId::new(asset_id),
    })
}
