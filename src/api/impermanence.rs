use axum::extract::{Query, State};
use axum::Json;

use crate::api::{non_blank, AppState, TokenQuery};
use crate::engine::ImpermanenceReport;
use crate::error::AppError;
use crate::orchestration::SwapFilter;

pub async fn get_impermanence(
    Query(params): Query<TokenQuery>,
    State(state): State<AppState>,
) -> Result<Json<ImpermanenceReport>, AppError> {
    let filter = SwapFilter {
        token: non_blank(params.token.as_deref()).map(str::to_string),
        ..SwapFilter::default()
    };
    Ok(Json(state.reconciler.impermanence(&filter).await?))
}
