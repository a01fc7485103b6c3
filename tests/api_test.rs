use axum::http::StatusCode;
use liqledger::api;
use liqledger::datasource::{MockPoolSource, MockWalletSession};
use liqledger::domain::{AssetId, PairId, PoolReserveSnapshot, RawOffer};
use liqledger::engine::PoolValuator;
use liqledger::orchestration::Reconciler;
use liqledger::registry::{PairListing, TokenListing, TokenRegistry};
use std::collections::BTreeMap;
use std::sync::Arc;
use tower::util::ServiceExt;

fn registry() -> TokenRegistry {
    TokenRegistry::from_lists(
        &[TokenListing {
            asset_id: "asset_dbx".to_string(),
            pair_id: Some("pair_dbx".to_string()),
            name: "dexie bucks".to_string(),
            short_name: "DBX".to_string(),
            verified: true,
        }],
        &[PairListing {
            launcher_id: "pair_dbx".to_string(),
            asset_id: "asset_dbx".to_string(),
            liquidity_asset_id: "pool_token_dbx".to_string(),
        }],
    )
}

fn offer(trade_id: &str, offered: &[(&str, i128)], requested: &[(&str, i128)]) -> RawOffer {
    let map = |entries: &[(&str, i128)]| -> BTreeMap<AssetId, i128> {
        entries
            .iter()
            .map(|(id, units)| (AssetId::new(*id), *units))
            .collect()
    };
    RawOffer {
        trade_id: trade_id.to_string(),
        status: "CONFIRMED".to_string(),
        is_mine: true,
        offered: map(offered),
        requested: map(requested),
    }
}

fn setup_test_app(wallet: MockWalletSession) -> axum::Router {
    let pools = MockPoolSource::new().with_reserves(
        PairId::new("pair_dbx"),
        PoolReserveSnapshot {
            token_reserve: 1_000_000,
            native_reserve: 2_000_000_000_000_000,
            total_liquidity: 1_000_000,
        },
    );
    let reconciler = Reconciler::new(
        Arc::new(wallet),
        PoolValuator::new(Arc::new(pools)),
        Arc::new(registry()),
        vec![],
    );
    api::create_router(api::AppState::new(Arc::new(reconciler)))
}

fn default_wallet() -> MockWalletSession {
    MockWalletSession::new().with_offers(
        None,
        vec![
            offer(
                "add",
                &[("xch", 10_000_000_000_000), ("asset_dbx", 5_000)],
                &[("pool_token_dbx", 5_000)],
            ),
            offer(
                "remove",
                &[("pool_token_dbx", 1_000)],
                &[("xch", 2_000_000_000_000), ("asset_dbx", 1_000)],
            ),
        ],
    )
}

async fn request(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .method("GET")
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health_and_ready() {
    let (status, json) = request(setup_test_app(default_wallet()), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");

    let (status, json) = request(setup_test_app(default_wallet()), "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ready");
    assert_eq!(json["pairs"], 1);
}

#[tokio::test]
async fn test_swaps_response_shape() {
    let (status, json) = request(setup_test_app(default_wallet()), "/v1/swaps").await;
    assert_eq!(status, StatusCode::OK);

    let swaps = json["swaps"].as_array().unwrap();
    assert_eq!(swaps.len(), 2);
    let first = &swaps[0];
    assert!(first["trade_id"].is_string());
    assert_eq!(first["pair"]["pair_id"], "pair_dbx");
    assert!(first["offered"]["native_decimal"].is_number());
    assert!(first["liquidity_fee"]["native_units"].is_number());

    assert_eq!(json["stats"]["offers_seen"], 2);
    assert_eq!(json["stats"]["additions"], 1);
    assert_eq!(json["stats"]["removals"], 1);
}

#[tokio::test]
async fn test_swaps_mode_filter() {
    let (status, json) = request(
        setup_test_app(default_wallet()),
        "/v1/swaps?mode=removals&token=dbx",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let swaps = json["swaps"].as_array().unwrap();
    assert_eq!(swaps.len(), 1);
    assert_eq!(swaps[0]["kind"], "removal");
}

#[tokio::test]
async fn test_invalid_mode_is_bad_request() {
    let (status, json) = request(setup_test_app(default_wallet()), "/v1/swaps?mode=sideways").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("sideways"));
}

#[tokio::test]
async fn test_consolidated_endpoint() {
    let (status, json) = request(setup_test_app(default_wallet()), "/v1/swaps/consolidated").await;
    assert_eq!(status, StatusCode::OK);

    let records = json.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["balances"]["pool_token"].as_f64(), Some(4.0));
    assert_eq!(records[0]["balances"]["native_coin"].as_f64(), Some(-8.0));
}

#[tokio::test]
async fn test_impermanence_endpoint() {
    let (status, json) = request(setup_test_app(default_wallet()), "/v1/impermanence").await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(json["results"].as_array().unwrap().len(), 1);
    assert!(json["total_net_return"].is_number());
    assert_eq!(json["results"][0]["running_total"], json["total_net_return"]);
}

#[tokio::test]
async fn test_unreachable_wallet_is_bad_gateway() {
    let (status, json) = request(
        setup_test_app(MockWalletSession::new().failing()),
        "/v1/impermanence",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_balances_endpoint_empty_wallet() {
    let (status, json) = request(setup_test_app(MockWalletSession::new()), "/v1/balances").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!([]));
}
