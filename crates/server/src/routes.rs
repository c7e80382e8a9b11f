use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{warn, Level};

use common::types::{ComponentStatus, Health};
use service::storage::StorePing;

use crate::errors::ApiError;
use crate::observability;
use crate::openapi;
use crate::state::AppState;

pub mod phone_addresses;

/// Liveness plus store reachability. Never fails: a dead store reads as `degraded`.
#[utoipa::path(
    get, path = "/health", tag = "service",
    responses((status = 200, description = "Service status", body = crate::openapi::HealthResponse))
)]
pub async fn health(State(state): State<AppState>) -> Json<Health> {
    let redis = match state.store_health.ping().await {
        Ok(()) => ComponentStatus::Ok,
        Err(e) => {
            warn!(error = %e, "store ping failed");
            ComponentStatus::Unavailable
        }
    };
    Json(Health::from_store_status(redis))
}

async fn metrics() -> impl IntoResponse {
    let (status, body) = observability::encode_metrics();
    (status, [(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body)
}

async fn openapi_json(State(state): State<AppState>) -> Json<utoipa::openapi::OpenApi> {
    Json(openapi::document(&state.project_name))
}

async fn not_found() -> ApiError {
    ApiError::RouteNotFound
}

/// Build the full application router. `api_prefix` is prepended to the
/// phone-address collection, e.g. `/api/v1` → `/api/v1/phone-addresses`.
pub fn build_router(state: AppState, api_prefix: &str, cors: CorsLayer) -> Router {
    let collection = format!("{api_prefix}/phone-addresses");
    let item = format!("{collection}/:phone");

    let service_routes = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/api-docs/openapi.json", get(openapi_json));

    let api = Router::new()
        .route(&collection, axum::routing::post(phone_addresses::create_phone_address))
        .route(
            &format!("{collection}/"),
            axum::routing::post(phone_addresses::create_phone_address),
        )
        .route(
            &item,
            get(phone_addresses::get_phone_address)
                .put(phone_addresses::update_phone_address)
                .delete(phone_addresses::delete_phone_address),
        );

    service_routes
        .merge(api)
        .fallback(not_found)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx responses are logged at ERROR
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
