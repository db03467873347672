use std::net::SocketAddr;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::MealStrategy;
use crate::state::AppState;
use crate::{meals, nutrition, users};

#[derive(Debug, Serialize)]
pub struct Liveness {
    pub message: String,
}

async fn root(State(state): State<AppState>) -> Json<Liveness> {
    let message = match state.config.resolved_strategy() {
        Ok(MealStrategy::Ai) => "AI Server is running!",
        _ => "Server is running!",
    };
    Json(Liveness {
        message: message.into(),
    })
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .merge(nutrition::router())
        .merge(meals::router())
        .merge(users::router())
        .with_state(state)
        // any origin, method and header: the API is consumed by mobile and web clients
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::meals::{catalog::StaticCatalog, services::Slot};

    async fn call(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, value)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn liveness() {
        let app = build_app(AppState::fake().await);
        let (status, body) = call(app, get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Server is running!");
    }

    #[tokio::test]
    async fn calculate_reference_body() {
        let app = build_app(AppState::fake().await);
        let (status, body) = call(
            app,
            post_json(
                "/calculate",
                json!({
                    "gender": "male", "weight": 70, "height": 175,
                    "age": 30, "activity": 1.5, "goal": "maintain"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "bmr": 1648,
                "calories": 2473,
                "macros": { "protein": 185, "fat": 82, "carbs": 247 }
            })
        );
    }

    #[tokio::test]
    async fn calculate_coerces_numeric_strings() {
        let app = build_app(AppState::fake().await);
        let (status, body) = call(
            app,
            post_json(
                "/calculate",
                json!({
                    "gender": "male", "weight": "70", "height": 175,
                    "age": "30", "activity": "1.5", "goal": "maintain"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["bmr"], 1648);
        assert_eq!(body["calories"], 2473);
    }

    #[tokio::test]
    async fn calculate_rejects_wrong_types() {
        let app = build_app(AppState::fake().await);
        let (status, body) = call(
            app,
            post_json(
                "/calculate",
                json!({
                    "gender": "male", "weight": "heavy", "height": 175,
                    "age": 30, "activity": 1.5, "goal": "lose"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn get_meal_returns_catalog_member() {
        let app = build_app(AppState::fake().await);
        let (status, body) = call(app, get("/get_meal?type=dinner")).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<String> = StaticCatalog::candidates(Slot::Dinner)
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert!(names.contains(&body["name"].as_str().unwrap().to_string()));
        for key in ["desc", "cals", "p", "f", "c", "icon", "color"] {
            assert!(body.get(key).is_some(), "missing {key}");
        }
        assert!(body["cals"].is_i64(), "cals sent as {}", body["cals"]);
    }

    #[tokio::test]
    async fn get_meal_unknown_type_is_inline_error() {
        let app = build_app(AppState::fake().await);
        let (status, body) = call(app, get("/get_meal?type=lunch_typo")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "error": "Unknown meal type" }));
    }

    #[tokio::test]
    async fn get_meal_without_type_is_validation_error() {
        let app = build_app(AppState::fake().await);
        let (status, body) = call(app, get("/get_meal")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn register_then_duplicate() {
        let state = AppState::fake().await;
        let users = state.users.clone();
        let app = build_app(state);
        let body = json!({
            "name": "Iryna", "email": "iryna@example.com",
            "password": "s3cret", "calories": 1900
        });

        let (status, first) = call(app.clone(), post_json("/register", body.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["message"], "User registered successfully");
        assert!(first["user_id"].as_i64().unwrap() > 0);

        let (status, second) = call(app, post_json("/register", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(second["detail"], "Email already registered");
        assert_eq!(users.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn cors_allows_any_origin() {
        let app = build_app(AppState::fake().await);
        let req = Request::builder()
            .method(Method::OPTIONS)
            .uri("/calculate")
            .header(header::ORIGIN, "https://app.example")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }
}
