use axum::extract::{Query, State};
use axum::Json;

use crate::api::{non_blank, AppState, TokenQuery};
use crate::engine::BalanceValuation;
use crate::error::AppError;

pub async fn get_balances(
    Query(params): Query<TokenQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<BalanceValuation>>, AppError> {
    let token = non_blank(params.token.as_deref());
    Ok(Json(state.reconciler.balances(token).await?))
}
