pub mod services;
pub mod subscriptions;

use axum::{
    extract::{rejection::PathRejection, Path},
    routing::{delete, get},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Pong;

use crate::errors::JsonApiError;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Row ids are serial keys; anything that is not a positive integer is a bad request.
pub(crate) fn path_id(id: Result<Path<i32>, PathRejection>) -> Result<i32, JsonApiError> {
    let Path(id) = id.map_err(|e| JsonApiError::bad_request(e.body_text()))?;
    if id <= 0 {
        return Err(JsonApiError::bad_request(format!("invalid id {id}: must be a positive integer")));
    }
    Ok(id)
}

#[utoipa::path(get, path = "/api/ping", tag = "health", responses((status = 200, description = "pong")))]
pub async fn ping() -> Json<Pong> {
    Json(Pong::default())
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: `/api` resources plus the OpenAPI document
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/ping", get(ping))
        .route("/services", get(services::list).post(services::create))
        .route("/services/:id", delete(services::delete))
        .route("/subs", get(subscriptions::list).post(subscriptions::create))
        .route("/subs/sum", get(subscriptions::sum))
        .route(
            "/subs/:id",
            get(subscriptions::get)
                .put(subscriptions::update)
                .delete(subscriptions::delete),
        );

    Router::new()
        .nest("/api", api)
        .route("/api-docs/openapi.json", get(openapi_json))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // status code and latency
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
