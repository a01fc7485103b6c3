use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::{non_blank, AppState};
use crate::domain::ConsolidatedRecord;
use crate::error::AppError;
use crate::orchestration::{SwapFilter, SwapMode, SwapScan};

#[derive(Debug, Default, Deserialize)]
pub struct SwapQuery {
    pub token: Option<String>,
    pub mode: Option<String>,
}

impl SwapQuery {
    fn filter(&self) -> Result<SwapFilter, AppError> {
        let mode = non_blank(self.mode.as_deref())
            .map(str::parse::<SwapMode>)
            .transpose()?
            .unwrap_or_default();
        Ok(SwapFilter {
            token: non_blank(self.token.as_deref()).map(str::to_string),
            mode,
        })
    }
}

pub async fn get_swaps(
    Query(params): Query<SwapQuery>,
    State(state): State<AppState>,
) -> Result<Json<SwapScan>, AppError> {
    let filter = params.filter()?;
    Ok(Json(state.reconciler.swaps(&filter).await?))
}

pub async fn get_consolidated(
    Query(params): Query<SwapQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<ConsolidatedRecord>>, AppError> {
    let filter = params.filter()?;
    Ok(Json(state.reconciler.consolidated(&filter).await?))
}
