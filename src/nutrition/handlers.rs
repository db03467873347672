use axum::{extract::rejection::JsonRejection, routing::post, Json, Router};
use tracing::{debug, instrument};

use super::{
    dto::{MacroResult, UserParams},
    services::compute,
};
use crate::{error::AppError, state::AppState};

pub fn calculate_routes() -> Router<AppState> {
    Router::new().route("/calculate", post(calculate))
}

#[instrument(skip(payload))]
pub async fn calculate(
    payload: Result<Json<UserParams>, JsonRejection>,
) -> Result<Json<MacroResult>, AppError> {
    let Json(params) = payload?;
    let result = compute(&params);
    debug!(
        bmr = result.bmr,
        calories = result.calories,
        goal = ?params.goal,
        "macros calculated"
    );
    Ok(Json(result))
}
