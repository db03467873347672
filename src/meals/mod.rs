pub mod catalog;
pub mod dto;
pub mod generator;
pub mod handlers;
pub mod llm;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::meal_routes()
}
