use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{RegisterRequest, RegisterResponse},
    services,
};
use crate::{error::AppError, state::AppState};

pub fn register_routes() -> Router<AppState> {
    Router::new().route("/register", post(register))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<RegisterResponse>, AppError> {
    let Json(req) = payload?;
    let user = services::register(state.users.as_ref(), req).await?;
    Ok(Json(RegisterResponse {
        message: "User registered successfully".into(),
        user_id: user.id,
    }))
}
