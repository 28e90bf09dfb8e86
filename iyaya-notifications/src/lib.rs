pub mod config;
pub mod handlers;
pub mod maintenance;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;

use axum::{
    extract::State,
    http::{HeaderValue, Method, StatusCode},
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::NotificationConfig;
use crate::services::{JwtService, MongoDb};

#[derive(Clone)]
pub struct AppState {
    pub config: NotificationConfig,
    pub db: MongoDb,
    pub jwt: JwtService,
}

pub fn build_router(state: AppState) -> Router {
    // Notification routes: the auth gate is layered onto the group as a
    // whole, so any route added here inherits it.
    let notification_routes = Router::new()
        .route(
            "/notifications",
            get(handlers::notifications::list_notifications),
        )
        .route(
            "/notifications/unread-count",
            get(handlers::notifications::unread_count),
        )
        .route(
            "/notifications/read-all",
            patch(handlers::notifications::mark_all_read),
        )
        .route(
            "/notifications/:notification_id/read",
            patch(handlers::notifications::mark_read),
        )
        .layer(from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    let cors = CorsLayer::new()
        .allow_origin(
            state
                .config
                .security
                .allowed_origins
                .iter()
                .map(|o| {
                    o.parse::<HeaderValue>().unwrap_or_else(|e| {
                        tracing::error!("Invalid CORS origin '{}': {}. Using fallback.", o, e);
                        HeaderValue::from_static("*")
                    })
                })
                .collect::<Vec<HeaderValue>>(),
        )
        .allow_methods([Method::GET, Method::PATCH, Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .merge(notification_routes)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(cors)
}

/// Health check endpoint for liveness probes.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "ok",
                "service": "iyaya-notifications",
                "version": env!("CARGO_PKG_VERSION")
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({
                "status": "unhealthy",
                "service": "iyaya-notifications",
                "error": e.to_string()
            })),
        ),
    }
}

/// Readiness check endpoint.
async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.health_check().await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
