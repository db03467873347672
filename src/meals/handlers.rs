use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use tracing::{instrument, warn};

use super::{
    dto::{MealError, MealQuery, MealResponse},
    services::{MealSuggestion, UnknownSlot},
};
use crate::{error::AppError, state::AppState};

pub fn meal_routes() -> Router<AppState> {
    Router::new().route("/get_meal", get(get_meal))
}

/// Always 200: unknown slots come back as `{"error": ...}` in the body.
#[instrument(skip(state, query))]
pub async fn get_meal(
    State(state): State<AppState>,
    query: Result<Query<MealQuery>, QueryRejection>,
) -> Result<Json<MealResponse>, AppError> {
    let Query(q) = query?;
    let response = match state.meals.suggest(&q.meal_type).await {
        MealSuggestion::Meal(meal) => MealResponse::Meal(meal),
        MealSuggestion::UnknownSlot => {
            warn!(meal_type = %q.meal_type, "unknown meal type");
            MealResponse::Error(MealError {
                error: UnknownSlot.to_string(),
            })
        }
    };
    Ok(Json(response))
}
