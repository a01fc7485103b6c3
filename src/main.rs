use anyhow::Context;
use liqledger::datasource::{ChiaWalletRpc, TibetApi};
use liqledger::engine::PoolValuator;
use liqledger::orchestration::Reconciler;
use liqledger::registry::RegistryLoader;
use liqledger::{api, config::Config, db::init_db, Repository};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    let config = Config::from_env().context("Configuration error")?;

    let pool = init_db(&config.database_path)
        .await
        .context("Failed to initialize database")?;
    let repo = Arc::new(Repository::new(pool));

    // the registry must be complete before any offer is classified
    let tibet = Arc::new(TibetApi::new(config.tibet_api_url.clone()));
    let registry = RegistryLoader::new(tibet.clone(), repo, config.registry_cache_ttl_ms)
        .load()
        .await
        .context("Failed to load token registry")?;

    let cert_pem = std::fs::read(&config.wallet_cert_path)
        .with_context(|| format!("Failed to read {}", config.wallet_cert_path))?;
    let key_pem = std::fs::read(&config.wallet_key_path)
        .with_context(|| format!("Failed to read {}", config.wallet_key_path))?;
    let wallet = ChiaWalletRpc::new(
        config.wallet_rpc_url.clone(),
        &cert_pem,
        &key_pem,
        Duration::from_secs(config.rpc_timeout_secs),
        Duration::from_millis(config.sync_poll_ms),
    )
    .context("Failed to build wallet RPC client")?;

    let reconciler = Reconciler::new(
        Arc::new(wallet),
        PoolValuator::new(tibet),
        Arc::new(registry),
        config.wallet_fingerprints.clone(),
    );
    let app = api::create_router(api::AppState::new(Arc::new(reconciler)));

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
