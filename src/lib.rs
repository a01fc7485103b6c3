pub mod api;
pub mod config;
pub mod datasource;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;
pub mod registry;

pub use config::Config;
pub use datasource::{
    ChiaWalletRpc, DataSourceError, MockPoolSource, MockTokenListSource, MockWalletSession,
    TibetApi,
};
pub use db::{init_db, Repository};
pub use domain::{Amount, AssetId, Decimal, Pair, PairId, SwapKind, SwapRecord};
pub use error::AppError;
pub use orchestration::{Reconciler, SwapFilter, SwapMode};
pub use registry::{RegistryLoader, TokenRegistry};
